use super::block::BlockTypeId;
use super::position::Position;
use super::shape::BoxShape;

/// Snapshot of the block types inside a box, as answered by a block store.
///
/// Nothing guarantees that `blocks` actually has `bounds.volume()` entries:
/// a sample is whatever came back over the wire. Consumers check
/// [`is_well_formed`](Self::is_well_formed) before indexing into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborhoodSample {
    bounds: BoxShape,
    blocks: Vec<BlockTypeId>,
}

impl NeighborhoodSample {
    pub fn new(bounds: BoxShape, blocks: Vec<BlockTypeId>) -> Self {
        Self { bounds, blocks }
    }

    pub const fn bounds(&self) -> BoxShape {
        self.bounds
    }

    /// Absolute position of local offset `(0, 0, 0)`.
    pub const fn origin(&self) -> Position {
        self.bounds.from()
    }

    pub fn blocks(&self) -> &[BlockTypeId] {
        &self.blocks
    }

    pub fn is_well_formed(&self) -> bool {
        self.blocks.len() == self.bounds.volume()
    }

    /// Block at a local offset from the origin.
    pub fn local(&self, x: i64, y: i64, z: i64) -> Option<&BlockTypeId> {
        self.bounds
            .index(Position::new(x, y, z))
            .and_then(|i| self.blocks.get(i))
    }

    /// Block at an absolute world position.
    pub fn get(&self, pos: Position) -> Option<&BlockTypeId> {
        let local = pos - self.origin();
        self.local(local.x, local.y, local.z)
    }
}
