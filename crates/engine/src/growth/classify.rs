//! Neighborhood classification: turn a sampled 3x4x3 box into growth candidates.
//!
//! The box is centered (laterally) on the block that changed, with one layer
//! below it and two above. Only the four orthogonal lateral columns are
//! scanned, always from the top layer downward:
//!
//! ```text
//!   y=3  . # .      # = scanned column (local x/z = (0,1) (2,1) (1,0) (1,2))
//!   y=2  . # .      C = center, local (1,1,1)
//!   y=1  # C #
//!   y=0  . # .
//! ```
//!
//! - Substrate at the center only grows with open space right above it. It
//!   borrows the variant of the first grown block found in any lateral
//!   column, or is seeded from the weighted selector when there is none.
//! - A grown variant at the center spreads to the first opaque block of each
//!   column when that block is substrate below the top layer, occasionally
//!   re-rolling the variant for the new elevation.

use thiserror::Error;

use crate::config::GrowthConfig;
use crate::growth::queue::Candidate;
use crate::growth::select;
use crate::rng::RandomSource;
use crate::world::block::BlockTypeId;
use crate::world::position::Position;
use crate::world::sample::NeighborhoodSample;
use crate::world::shape::{NEIGHBORHOOD_CENTER, NEIGHBORHOOD_SIZE};

/// Local (x, z) of the four lateral columns.
const LATERAL_COLUMNS: [(i64, i64); 4] = [(0, 1), (2, 1), (1, 0), (1, 2)];

/// Local y of the highest sampled layer.
const TOP_LAYER: i64 = NEIGHBORHOOD_SIZE.y - 1;

/// Denominator of the change rate.
pub const CHANGE_RATE_SCALE: u32 = 10_000;

/// A sample that cannot be interpreted as a growth neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("sample at {origin} holds {actual} blocks but its box has {expected}")]
    VolumeMismatch {
        origin: Position,
        expected: usize,
        actual: usize,
    },
    #[error("sample at {origin} has size {size}, expected {expected}")]
    UnexpectedShape {
        origin: Position,
        size: Position,
        expected: Position,
    },
}

/// Check that `sample` is a complete growth neighborhood.
pub fn validate(sample: &NeighborhoodSample) -> Result<(), SampleError> {
    let bounds = sample.bounds();
    if bounds.size() != NEIGHBORHOOD_SIZE {
        return Err(SampleError::UnexpectedShape {
            origin: sample.origin(),
            size: bounds.size(),
            expected: NEIGHBORHOOD_SIZE,
        });
    }
    if !sample.is_well_formed() {
        return Err(SampleError::VolumeMismatch {
            origin: sample.origin(),
            expected: bounds.volume(),
            actual: sample.blocks().len(),
        });
    }
    Ok(())
}

/// Classify one neighborhood. Candidates come back in discovery order;
/// pushing them into a [`GrowthQueue`](crate::growth::queue::GrowthQueue)
/// lets the last one per position win.
pub fn classify<R>(
    sample: &NeighborhoodSample,
    config: &GrowthConfig,
    rng: &mut R,
) -> Result<Vec<Candidate>, SampleError>
where
    R: RandomSource + ?Sized,
{
    validate(sample)?;

    let c = NEIGHBORHOOD_CENTER;
    let Some(center) = sample.local(c.x, c.y, c.z) else {
        return Ok(Vec::new());
    };

    let candidates = if config.is_substrate(center) {
        classify_substrate(sample, config, rng)
    } else if config.is_variant(center) {
        classify_grown(sample, center, config, rng)
    } else {
        Vec::new()
    };
    Ok(candidates)
}

fn classify_substrate<R>(sample: &NeighborhoodSample, config: &GrowthConfig, rng: &mut R) -> Vec<Candidate>
where
    R: RandomSource + ?Sized,
{
    let center_pos = sample.origin() + NEIGHBORHOOD_CENTER;
    let c = NEIGHBORHOOD_CENTER;
    // Buried substrate never grows, whatever its neighbors are.
    let exposed = sample
        .local(c.x, c.y + 1, c.z)
        .is_some_and(|above| config.is_transparent(above));
    if !exposed {
        return Vec::new();
    }

    let mut out = Vec::new();
    for (lx, lz) in LATERAL_COLUMNS {
        let neighbor = (0..=TOP_LAYER)
            .rev()
            .filter_map(|ly| sample.local(lx, ly, lz))
            .find(|block| config.is_variant(block));
        if let Some(variant) = neighbor {
            tracing::trace!("Substrate at {} borrows {} from column ({}, {})", center_pos, variant, lx, lz);
            out.push(Candidate::new(center_pos, variant.clone()));
        }
    }

    if out.is_empty() {
        if let Some(variant) = select::pick(config, center_pos, rng) {
            tracing::trace!("Exposed substrate at {} seeded with {}", center_pos, variant);
            out.push(Candidate::new(center_pos, variant));
        }
    }

    out
}

fn classify_grown<R>(
    sample: &NeighborhoodSample,
    source: &BlockTypeId,
    config: &GrowthConfig,
    rng: &mut R,
) -> Vec<Candidate>
where
    R: RandomSource + ?Sized,
{
    let origin = sample.origin();
    let mut targets = Vec::new();

    for (lx, lz) in LATERAL_COLUMNS {
        for ly in (0..=TOP_LAYER).rev() {
            let Some(block) = sample.local(lx, ly, lz) else {
                break;
            };
            if config.is_transparent(block) {
                continue;
            }
            // First opaque block decides the column, substrate or not.
            if ly < TOP_LAYER && config.is_substrate(block) {
                targets.push(origin.offset(lx, ly, lz));
            }
            break;
        }
    }

    targets
        .into_iter()
        .map(|pos| {
            let block = spread_target(config, source, pos, rng);
            tracing::trace!("{} spreads to {} as {}", source, pos, block);
            Candidate::new(pos, block)
        })
        .collect()
}

/// Variant that `source` spreads as at `pos`.
///
/// With probability `(change_rate + bonus) / 10 000` the variant is re-rolled
/// for `pos`'s elevation; the bonus grows with the source's distance from its
/// own preferred elevation, so misplaced variants give way faster.
pub fn spread_target<R>(config: &GrowthConfig, source: &BlockTypeId, pos: Position, rng: &mut R) -> BlockTypeId
where
    R: RandomSource + ?Sized,
{
    let bonus = config
        .variant_config(source)
        .map(|c| {
            c.preferred_elevation
                .abs_diff(pos.y)
                .saturating_mul(u64::from(c.distance_multiplier))
        })
        .unwrap_or(0);
    let threshold = u64::from(config.change_rate()).saturating_add(bonus);

    if u64::from(rng.below(CHANGE_RATE_SCALE)) < threshold {
        select::select(config, pos, source, rng)
    } else {
        source.clone()
    }
}
