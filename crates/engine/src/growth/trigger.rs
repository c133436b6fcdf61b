use crate::config::GrowthConfig;
use crate::world::block::BlockTypeId;
use crate::world::position::Position;
use crate::world::shape::BoxShape;

/// Neighborhood queries worth issuing for a batch of block changes.
///
/// A block that became substrate or a grown variant is queried around
/// itself. A block that became transparent may have exposed the block below
/// it, so that one is queried instead. Everything else is ignored.
pub fn queries_for(config: &GrowthConfig, changes: &[(Position, BlockTypeId)]) -> Vec<BoxShape> {
    changes
        .iter()
        .filter_map(|(pos, block)| {
            if config.is_substrate(block) || config.is_variant(block) {
                Some(BoxShape::around(*pos))
            } else if config.is_transparent(block) {
                Some(BoxShape::around(pos.below()))
            } else {
                None
            }
        })
        .collect()
}
