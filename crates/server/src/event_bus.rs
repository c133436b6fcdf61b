//! World-change event bus.
//!
//! Every write to the shared [`World`] (growth, terrain generation, any other
//! editor) publishes a [`WorldChangeBatch`] to a shared
//! `tokio::sync::broadcast` channel. The growth host subscribes and turns
//! each batch into a block-update notification for its engine, including
//! batches it published itself: fresh grass is what lets grass spread.

use std::sync::Arc;

use sprout_engine::{BlockTypeId, Position, World};
use tokio::sync::broadcast;

/// Batches a slow subscriber may fall behind by before it starts skipping.
/// Terrain generation publishes one batch; growth publishes one per tick.
pub const BUS_CAPACITY: usize = 256;

/// Identifies where a batch of world changes originated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeSource {
    /// The growth engine's host.
    Growth,
    /// Any other writer (terrain generation, tools, tests).
    External(&'static str),
}

/// Block changes written together by one writer, in write order.
///
/// Every subscriber gets its own clone of the batch; the changes themselves
/// are shared.
#[derive(Clone, Debug)]
pub struct WorldChangeBatch {
    pub source: ChangeSource,
    pub changes: Arc<[(Position, BlockTypeId)]>,
}

impl WorldChangeBatch {
    pub fn new(source: ChangeSource, changes: Vec<(Position, BlockTypeId)>) -> Self {
        Self {
            source,
            changes: changes.into(),
        }
    }
}

pub fn channel() -> broadcast::Sender<WorldChangeBatch> {
    let (tx, _) = broadcast::channel(BUS_CAPACITY);
    tx
}

/// Write `edits` into the world unconditionally and publish the ones that
/// changed something. Returns how many cells actually changed.
pub fn apply_external(
    world: &World,
    bus: &broadcast::Sender<WorldChangeBatch>,
    source: &'static str,
    edits: Vec<(Position, BlockTypeId)>,
) -> usize {
    let changes: Vec<_> = edits
        .into_iter()
        .filter(|(pos, block)| world.set_block(*pos, block.clone()) != *block)
        .collect();
    let n = changes.len();
    if n > 0 {
        // Nobody listening is fine; the world already holds the change.
        let _ = bus.send(WorldChangeBatch::new(ChangeSource::External(source), changes));
    }
    n
}
