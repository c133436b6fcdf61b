//! Growth configuration: which blocks grow, into what, and how fast.
//!
//! [`GrowthSettings`] is the on-disk (TOML) shape, every field optional except
//! the block lists. [`GrowthConfig`] is the validated, immutable form the
//! engine reads; it is built once at startup and shared as
//! `Arc<GrowthConfig>`.
//!
//! ```toml
//! grows-on = ["org/konstructs/dirt"]
//! change-rate = 20
//!
//! [[variant]]
//! block = "org/konstructs/grass-dirt"
//! preferred-elevation = 32
//! fuzziness = 0.02
//! underneath = "org/konstructs/dirt"
//! distance-multiplier = 2
//! ```

use std::collections::HashSet;
use std::time::Duration;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::growth::throttle::Throttle;
use crate::world::block::BlockTypeId;
use crate::world::filter::BlockFilter;

/// Static parameters of one grown variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlockConfig {
    /// Elevation (y) where this variant is most likely to be chosen.
    pub preferred_elevation: i64,
    /// Selection weights at or below this value count as zero.
    #[serde(default)]
    pub fuzziness: f64,
    /// Block laid beneath a freshly grown block of this variant.
    #[serde(default)]
    pub underneath: Option<BlockTypeId>,
    /// Extra change-rate (per 10 000) per block of distance from the
    /// preferred elevation when this variant spreads.
    #[serde(default)]
    pub distance_multiplier: u32,
}

/// One `[[variant]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSettings {
    pub block: BlockTypeId,
    #[serde(flatten)]
    pub config: BlockConfig,
}

/// The configuration file as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GrowthSettings {
    pub grows_on: Vec<BlockTypeId>,
    pub transparent: Vec<BlockTypeId>,
    /// Grown types accepted as spread sources even without a `[[variant]]`.
    pub valid_variants: Vec<BlockTypeId>,
    #[serde(rename = "variant")]
    pub variants: Vec<VariantSettings>,
    /// Chance per 10 000 that a spreading block re-rolls its variant.
    pub change_rate: u32,
    pub tick_interval_ms: u64,
    pub drain_fraction: f64,
    pub min_tick_delay_ms: u64,
    pub per_item_reduction_ms: f64,
    pub queue_warn_threshold: usize,
    pub underneath_depth: u32,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        let throttle = Throttle::default();
        Self {
            grows_on: Vec::new(),
            transparent: vec![BlockTypeId::VACUUM],
            valid_variants: Vec::new(),
            variants: Vec::new(),
            change_rate: 20,
            tick_interval_ms: 1000,
            drain_fraction: throttle.drain_fraction,
            min_tick_delay_ms: throttle.min_delay.as_millis() as u64,
            per_item_reduction_ms: throttle.per_item_reduction.as_secs_f64() * 1000.0,
            queue_warn_threshold: 10_000,
            underneath_depth: 3,
        }
    }
}

impl GrowthSettings {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse growth config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`grows-on` must list at least one substrate block")]
    NoSubstrate,
    #[error("block `{0}` is listed both as substrate and as a grown variant")]
    SubstrateIsVariant(BlockTypeId),
    #[error("block `{0}` is transparent but also substrate or a grown variant")]
    TransparentConflict(BlockTypeId),
    #[error("variant `{0}` is configured more than once")]
    DuplicateVariant(BlockTypeId),
    #[error("drain fraction {0} must be within (0, 1]")]
    DrainFraction(f64),
    #[error("tick interval must be positive")]
    ZeroTickInterval,
    #[error("variant `{block}` has invalid fuzziness {value}")]
    Fuzziness { block: BlockTypeId, value: f64 },
    #[error("per-item reduction {0} ms must be a non-negative number")]
    PerItemReduction(f64),
}

/// Validated, read-only growth configuration.
#[derive(Debug, Clone)]
pub struct GrowthConfig {
    substrate: IndexSet<BlockTypeId>,
    transparent: HashSet<BlockTypeId>,
    variants: IndexMap<BlockTypeId, BlockConfig>,
    valid: HashSet<BlockTypeId>,
    change_rate: u32,
    tick_interval: Duration,
    throttle: Throttle,
    queue_warn_threshold: usize,
    underneath_depth: u32,
}

impl GrowthConfig {
    pub fn from_settings(settings: GrowthSettings) -> Result<Self, ConfigError> {
        if settings.grows_on.is_empty() {
            return Err(ConfigError::NoSubstrate);
        }
        if settings.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        let fraction = settings.drain_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::DrainFraction(fraction));
        }
        let reduction = settings.per_item_reduction_ms;
        let per_item_reduction = Duration::try_from_secs_f64(reduction / 1000.0)
            .map_err(|_| ConfigError::PerItemReduction(reduction))?;

        let substrate: IndexSet<BlockTypeId> = settings.grows_on.into_iter().collect();

        let mut variants = IndexMap::with_capacity(settings.variants.len());
        for VariantSettings { block, config } in settings.variants {
            if !(config.fuzziness.is_finite() && config.fuzziness >= 0.0) {
                return Err(ConfigError::Fuzziness {
                    block,
                    value: config.fuzziness,
                });
            }
            if variants.contains_key(&block) {
                return Err(ConfigError::DuplicateVariant(block));
            }
            variants.insert(block, config);
        }

        let valid: HashSet<BlockTypeId> = variants
            .keys()
            .cloned()
            .chain(settings.valid_variants)
            .collect();
        if let Some(both) = valid.iter().find(|b| substrate.contains(*b)) {
            return Err(ConfigError::SubstrateIsVariant(both.clone()));
        }

        let transparent: HashSet<BlockTypeId> = settings.transparent.into_iter().collect();
        if let Some(both) = transparent
            .iter()
            .find(|b| substrate.contains(*b) || valid.contains(*b))
        {
            return Err(ConfigError::TransparentConflict(both.clone()));
        }

        Ok(Self {
            substrate,
            transparent,
            variants,
            valid,
            change_rate: settings.change_rate,
            tick_interval: Duration::from_millis(settings.tick_interval_ms),
            throttle: Throttle {
                drain_fraction: fraction,
                min_delay: Duration::from_millis(settings.min_tick_delay_ms),
                per_item_reduction,
            },
            queue_warn_threshold: settings.queue_warn_threshold,
            underneath_depth: settings.underneath_depth,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_settings(GrowthSettings::from_toml_str(s)?)
    }

    pub fn is_substrate(&self, block: &BlockTypeId) -> bool {
        self.substrate.contains(block)
    }

    pub fn is_transparent(&self, block: &BlockTypeId) -> bool {
        self.transparent.contains(block)
    }

    /// Is `block` a grown variant (configured or merely listed as valid)?
    pub fn is_variant(&self, block: &BlockTypeId) -> bool {
        self.valid.contains(block)
    }

    pub fn variant_config(&self, block: &BlockTypeId) -> Option<&BlockConfig> {
        self.variants.get(block)
    }

    /// Configured variants in file order. This order is what makes weighted
    /// selection reproducible.
    pub fn variants(&self) -> impl Iterator<Item = (&BlockTypeId, &BlockConfig)> {
        self.variants.iter()
    }

    pub fn substrate(&self) -> impl Iterator<Item = &BlockTypeId> {
        self.substrate.iter()
    }

    /// "Current block is any substrate type."
    pub fn substrate_filter(&self) -> BlockFilter {
        BlockFilter::any_of(self.substrate.iter().cloned())
    }

    pub fn change_rate(&self) -> u32 {
        self.change_rate
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    pub fn queue_warn_threshold(&self) -> usize {
        self.queue_warn_threshold
    }

    pub fn underneath_depth(&self) -> u32 {
        self.underneath_depth
    }
}

impl TryFrom<GrowthSettings> for GrowthConfig {
    type Error = ConfigError;

    fn try_from(settings: GrowthSettings) -> Result<Self, Self::Error> {
        Self::from_settings(settings)
    }
}
