//! Demo terrain and the default Konstructs growth config.

use std::collections::HashMap;

use sprout_engine::{BlockTypeId, GrowthConfig, Position, World};
use sprout_server::block::{self, DIRT, GRASS_DIRT, SAND, SNOW_DIRT, STONE, VACUUM};
use sprout_server::terrain::{self, Heightmap, TerrainParams};

fn params(seed: u64) -> TerrainParams {
    TerrainParams {
        radius: 8,
        seed,
        ..TerrainParams::default()
    }
}

#[test]
fn same_seed_same_terrain() {
    assert_eq!(terrain::generate(&params(5)), terrain::generate(&params(5)));
    assert_ne!(terrain::generate(&params(5)), terrain::generate(&params(6)));
}

#[test]
fn columns_are_stone_then_dirt_then_surface() {
    let p = params(11);
    let heights = Heightmap::new(&p);
    let blocks = terrain::generate(&p);

    let world = World::new();
    let mut per_column: HashMap<(i64, i64), usize> = HashMap::new();
    for (pos, block) in &blocks {
        world.set_block(*pos, block.clone());
        *per_column.entry((pos.x, pos.z)).or_default() += 1;
    }

    let side = (2 * p.radius + 1) as usize;
    assert_eq!(per_column.len(), side * side);
    assert!(per_column.values().all(|&n| n == (p.dirt_depth + p.stone_depth) as usize));

    for x in -p.radius..=p.radius {
        for z in -p.radius..=p.radius {
            let top = heights.height_at(x, z);
            assert_eq!(world.surface_height(x, z, top - 20, top + 20), Some(top));

            let surface = world.get_block(Position::new(x, top, z));
            assert!([DIRT, SAND, GRASS_DIRT].contains(&surface), "surface {surface}");
            assert_eq!(world.get_block(Position::new(x, top - 1, z)), DIRT);
            assert_eq!(world.get_block(Position::new(x, top - p.dirt_depth, z)), STONE);
            assert_eq!(world.get_block(Position::new(x, top + 1, z)), VACUUM);
        }
    }
}

#[test]
fn hollows_are_sandy() {
    let p = TerrainParams {
        radius: 40,
        grass_per_mille: 0,
        ..TerrainParams::default()
    };
    let heights = Heightmap::new(&p);
    for (pos, block) in terrain::generate(&p) {
        if pos.y == heights.height_at(pos.x, pos.z) {
            let expected = if pos.y <= heights.shore_height() { SAND } else { DIRT };
            assert_eq!(block, expected, "surface at {pos}");
        }
    }
}

#[test]
fn default_settings_are_valid() {
    let config = GrowthConfig::from_settings(block::default_settings()).unwrap();
    assert!(config.is_substrate(&DIRT));
    assert!(config.is_transparent(&VACUUM));
    assert!(!config.is_transparent(&SAND));

    let variants: Vec<&BlockTypeId> = config.variants().map(|(b, _)| b).collect();
    assert_eq!(variants, vec![&GRASS_DIRT, &SNOW_DIRT]);
    assert_eq!(
        config.variant_config(&GRASS_DIRT).unwrap().preferred_elevation,
        block::GRASS_ELEVATION
    );
}

#[test]
fn konstructs_ids_round_trip_through_text() {
    for id in [VACUUM, STONE, DIRT, SAND, GRASS_DIRT, SNOW_DIRT] {
        let parsed: BlockTypeId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
    assert_eq!(GRASS_DIRT.to_string(), "org/konstructs/grass-dirt");
}
