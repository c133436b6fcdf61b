pub mod block;
pub mod filter;
pub mod position;
pub mod sample;
pub mod shape;

use block::BlockTypeId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use filter::BlockFilter;
use position::Position;
use sample::NeighborhoodSample;
use shape::BoxShape;

/// Result of a conditional replace against the [`World`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The filter matched; `old` was overwritten.
    Replaced { old: BlockTypeId },
    /// The filter did not match `current`; nothing was written.
    Rejected { current: BlockTypeId },
}

impl ReplaceOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, ReplaceOutcome::Replaced { .. })
    }
}

/// In-memory block store. Thread-safe, lock-sharded by position.
///
/// Only non-vacuum cells are stored; every other position reads as
/// [`BlockTypeId::VACUUM`]. This is the store the growth engine talks to
/// through box queries and conditional replaces; any number of other
/// writers may mutate it concurrently.
pub struct World {
    blocks: DashMap<Position, BlockTypeId>,
}

impl World {
    pub fn new() -> Self {
        Self {
            blocks: DashMap::new(),
        }
    }

    /// Read a block. Unset positions are vacuum.
    pub fn get_block(&self, pos: Position) -> BlockTypeId {
        match self.blocks.get(&pos) {
            Some(block) => block.clone(),
            None => BlockTypeId::VACUUM,
        }
    }

    /// Unconditionally write a block, returning the previous one.
    ///
    /// Takes `&self` (not `&mut self`) because `DashMap` provides interior
    /// mutability via per-shard locking.
    pub fn set_block(&self, pos: Position, block: BlockTypeId) -> BlockTypeId {
        let old = if block == BlockTypeId::VACUUM {
            self.blocks.remove(&pos).map(|(_, old)| old)
        } else {
            self.blocks.insert(pos, block)
        };
        old.unwrap_or(BlockTypeId::VACUUM)
    }

    /// Write `block` at `pos` only if the current block matches `filter`.
    ///
    /// The check and the write happen under the same shard lock, so a
    /// concurrent writer either lands before (and fails the filter) or after.
    pub fn replace_if(&self, pos: Position, block: BlockTypeId, filter: &BlockFilter) -> ReplaceOutcome {
        match self.blocks.entry(pos) {
            Entry::Occupied(mut entry) => {
                if !filter.matches(entry.get()) {
                    return ReplaceOutcome::Rejected {
                        current: entry.get().clone(),
                    };
                }
                let old = if block == BlockTypeId::VACUUM {
                    entry.remove()
                } else {
                    entry.insert(block)
                };
                ReplaceOutcome::Replaced { old }
            }
            Entry::Vacant(entry) => {
                if !filter.matches(&BlockTypeId::VACUUM) {
                    return ReplaceOutcome::Rejected {
                        current: BlockTypeId::VACUUM,
                    };
                }
                if block != BlockTypeId::VACUUM {
                    entry.insert(block);
                }
                ReplaceOutcome::Replaced {
                    old: BlockTypeId::VACUUM,
                }
            }
        }
    }

    /// Snapshot every cell of `bounds` in the box's flattening order.
    pub fn query(&self, bounds: BoxShape) -> NeighborhoodSample {
        let blocks = bounds.positions().map(|pos| self.get_block(pos)).collect();
        NeighborhoodSample::new(bounds, blocks)
    }

    /// Number of non-vacuum cells.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of cells holding exactly `block` (never counts vacuum).
    pub fn count_of(&self, block: &BlockTypeId) -> usize {
        self.blocks.iter().filter(|entry| entry.value() == block).count()
    }

    /// Highest non-vacuum y in the column at (x, z) within `[min_y, max_y]`.
    pub fn surface_height(&self, x: i64, z: i64, min_y: i64, max_y: i64) -> Option<i64> {
        (min_y..=max_y)
            .rev()
            .find(|&y| self.blocks.contains_key(&Position::new(x, y, z)))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
