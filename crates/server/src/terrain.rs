//! Deterministic demo terrain: rolling dirt hills over stone, sand in the
//! hollows, and a few pre-grown grass patches.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sprout_engine::{BlockTypeId, Position};

use crate::block;

#[derive(Clone, Debug)]
pub struct TerrainParams {
    /// Columns span `-radius..=radius` on both axes.
    pub radius: i64,
    pub base_height: i64,
    pub amplitude: f64,
    /// Dirt layers on top of each column, surface included.
    pub dirt_depth: i64,
    pub stone_depth: i64,
    /// Chance per thousand that a dirt column starts out grown.
    pub grass_per_mille: u32,
    pub seed: u64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            radius: 24,
            base_height: block::GRASS_ELEVATION,
            amplitude: 12.0,
            dirt_depth: 3,
            stone_depth: 2,
            grass_per_mille: 5,
            seed: 0,
        }
    }
}

/// Column heights derived from a seed. Same seed, same hills.
#[derive(Clone, Debug)]
pub struct Heightmap {
    base: i64,
    amplitude: f64,
    phases: [f64; 3],
}

impl Heightmap {
    pub fn new(params: &TerrainParams) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        Self {
            base: params.base_height,
            amplitude: params.amplitude,
            phases: [rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU)],
        }
    }

    pub fn height_at(&self, x: i64, z: i64) -> i64 {
        let (fx, fz) = (x as f64, z as f64);
        let h = 0.6 * (fx / 11.0 + self.phases[0]).sin()
            + 0.4 * (fz / 17.0 + self.phases[1]).cos()
            + 0.3 * ((fx + fz) / 29.0 + self.phases[2]).sin();
        self.base + (h * self.amplitude).round() as i64
    }

    /// Columns at or below this height get sand on top instead of dirt.
    pub fn shore_height(&self) -> i64 {
        self.base - (self.amplitude * 0.75).round() as i64
    }
}

/// Every block of the generated terrain, column by column, bottom up.
pub fn generate(params: &TerrainParams) -> Vec<(Position, BlockTypeId)> {
    let heights = Heightmap::new(params);
    let shore = heights.shore_height();
    // Separate stream from the heightmap so tweaking one leaves the other alone.
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed ^ 0x6772_6173_73);

    let r = params.radius;
    let mut blocks = Vec::new();
    for x in -r..=r {
        for z in -r..=r {
            let top = heights.height_at(x, z);
            let dirt_from = top - params.dirt_depth + 1;

            for y in dirt_from - params.stone_depth..dirt_from {
                blocks.push((Position::new(x, y, z), block::STONE));
            }
            for y in dirt_from..top {
                blocks.push((Position::new(x, y, z), block::DIRT));
            }

            let surface = if top <= shore {
                block::SAND
            } else if rng.gen_range(0..1000) < params.grass_per_mille {
                block::GRASS_DIRT
            } else {
                block::DIRT
            };
            blocks.push((Position::new(x, top, z), surface));
        }
    }

    tracing::debug!("Generated {} terrain blocks (radius {})", blocks.len(), r);
    blocks
}
