//! Konstructs block type ids and the default grass configuration.

use sprout_engine::{BlockConfig, BlockTypeId, GrowthSettings, VariantSettings};

pub const VACUUM: BlockTypeId = BlockTypeId::VACUUM;
pub const STONE: BlockTypeId = BlockTypeId::from_static("org/konstructs", "stone");
pub const DIRT: BlockTypeId = BlockTypeId::from_static("org/konstructs", "dirt");
pub const SAND: BlockTypeId = BlockTypeId::from_static("org/konstructs", "sand");
pub const GRASS_DIRT: BlockTypeId = BlockTypeId::from_static("org/konstructs", "grass-dirt");
pub const SNOW_DIRT: BlockTypeId = BlockTypeId::from_static("org/konstructs", "snow-dirt");

/// Elevation where grass is happiest.
pub const GRASS_ELEVATION: i64 = 32;
/// Elevation where snow takes over.
pub const SNOW_ELEVATION: i64 = 48;

/// Dirt grows grass around y = 32 and snow up high.
///
/// Both variants lay dirt underneath, which is substrate and therefore never
/// actually placed; it is listed so a config that swaps the substrate keeps
/// working.
pub fn default_settings() -> GrowthSettings {
    GrowthSettings {
        grows_on: vec![DIRT],
        transparent: vec![VACUUM],
        variants: vec![
            VariantSettings {
                block: GRASS_DIRT,
                config: BlockConfig {
                    preferred_elevation: GRASS_ELEVATION,
                    fuzziness: 0.01,
                    underneath: Some(DIRT),
                    distance_multiplier: 2,
                },
            },
            VariantSettings {
                block: SNOW_DIRT,
                config: BlockConfig {
                    preferred_elevation: SNOW_ELEVATION,
                    fuzziness: 0.05,
                    underneath: Some(DIRT),
                    distance_multiplier: 4,
                },
            },
        ],
        ..GrowthSettings::default()
    }
}

