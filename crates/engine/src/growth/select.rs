//! Elevation-weighted variant selection (roulette wheel).
//!
//! Each configured variant gets weight `1 / max(1, |preferred - y|)`, so a
//! variant sitting exactly at its preferred elevation has weight 1 and the
//! weight falls off with distance. Weights at or below the variant's
//! fuzziness are zeroed.

use crate::config::{BlockConfig, GrowthConfig};
use crate::rng::RandomSource;
use crate::world::block::BlockTypeId;
use crate::world::position::Position;

/// Selection weight of one variant at elevation `y`.
pub fn weight(config: &BlockConfig, y: i64) -> f64 {
    let distance = config.preferred_elevation.abs_diff(y).max(1);
    let weight = 1.0 / distance as f64;
    if weight <= config.fuzziness { 0.0 } else { weight }
}

/// Pick a variant for `pos`, or `None` if every weight is zero.
pub fn pick<R>(config: &GrowthConfig, pos: Position, rng: &mut R) -> Option<BlockTypeId>
where
    R: RandomSource + ?Sized,
{
    let total: f64 = config.variants().map(|(_, c)| weight(c, pos.y)).sum();
    if total <= 0.0 {
        return None;
    }

    let r = rng.unit() * total;
    let mut cumulative = 0.0;
    let mut last_eligible = None;
    for (block, block_config) in config.variants() {
        let w = weight(block_config, pos.y);
        if w == 0.0 {
            continue;
        }
        cumulative += w;
        if cumulative > r {
            return Some(block.clone());
        }
        last_eligible = Some(block);
    }
    // Rounding can leave `cumulative` a hair under `r`.
    last_eligible.cloned()
}

/// Pick a variant for `pos`, falling back to `fallback` when nothing is eligible.
pub fn select<R>(config: &GrowthConfig, pos: Position, fallback: &BlockTypeId, rng: &mut R) -> BlockTypeId
where
    R: RandomSource + ?Sized,
{
    pick(config, pos, rng).unwrap_or_else(|| fallback.clone())
}
