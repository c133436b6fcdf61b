//! Engine-level tests: queue laws, throttling, and end-to-end growth
//! scenarios with the engine driven by hand against a `World`.

use std::sync::Arc;
use std::time::Duration;

use sprout_engine::growth::throttle::Throttle;
use sprout_engine::world::ReplaceOutcome;
use sprout_engine::{
    BlockConfig, BlockTypeId, BoxShape, Candidate, GrowthConfig, GrowthEngine, GrowthQueue, GrowthSettings, Inbound,
    NeighborhoodSample, Outbound, Position, VariantSettings, World,
};

const DIRT: BlockTypeId = BlockTypeId::from_static("test", "dirt");
const GRASS: BlockTypeId = BlockTypeId::from_static("test", "grass");
const STONE: BlockTypeId = BlockTypeId::from_static("test", "stone");
const ROCK: BlockTypeId = BlockTypeId::from_static("test", "rock");

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One variant, GRASS, at home on y = 0 with no fuzziness.
fn config() -> Arc<GrowthConfig> {
    let settings = GrowthSettings {
        grows_on: vec![DIRT],
        variants: vec![VariantSettings {
            block: GRASS,
            config: BlockConfig {
                preferred_elevation: 0,
                fuzziness: 0.0,
                underneath: None,
                distance_multiplier: 0,
            },
        }],
        drain_fraction: 0.1,
        ..GrowthSettings::default()
    };
    Arc::new(GrowthConfig::from_settings(settings).unwrap())
}

fn engine() -> GrowthEngine {
    GrowthEngine::seeded(config(), 0xC0FFEE)
}

/// Answer every `QueryBox` from `world` and feed the result back into the
/// engine; return everything else untouched.
fn answer_queries(engine: &mut GrowthEngine, world: &World, out: Vec<Outbound>) -> Vec<Outbound> {
    let mut rest = Vec::new();
    for request in out {
        match request {
            Outbound::QueryBox(bounds) => {
                let followups = engine.handle(Inbound::QueryResult(world.query(bounds)));
                rest.extend(followups);
            }
            other => rest.push(other),
        }
    }
    rest
}

/// Run the engine against `world` for `steps` messages, starting from one
/// block-change notification. Queries are answered inline, successful
/// replaces are fed back as notifications, and a tick is sent whenever
/// nothing else is pending.
fn drive(engine: &mut GrowthEngine, world: &World, changes: Vec<(Position, BlockTypeId)>, steps: usize) {
    let mut inbox = vec![Inbound::BlocksUpdated(changes)];
    for _ in 0..steps {
        if inbox.is_empty() {
            inbox.push(Inbound::Tick);
        }
        let message = inbox.remove(0);
        for request in engine.handle(message) {
            match request {
                Outbound::QueryBox(bounds) => inbox.push(Inbound::QueryResult(world.query(bounds))),
                Outbound::ReplaceBlock { position, block, filter } => {
                    if world.replace_if(position, block.clone(), &filter).is_replaced() {
                        inbox.push(Inbound::BlocksUpdated(vec![(position, block)]));
                    }
                }
                Outbound::PlaceBlock { position, block } => {
                    world.set_block(position, block);
                }
                Outbound::ScheduleTick(_) => {}
            }
        }
    }
}

fn replaces(out: &[Outbound]) -> Vec<(Position, BlockTypeId)> {
    out.iter()
        .filter_map(|o| match o {
            Outbound::ReplaceBlock { position, block, .. } => Some((*position, block.clone())),
            _ => None,
        })
        .collect()
}

fn scheduled(out: &[Outbound]) -> Vec<Duration> {
    out.iter()
        .filter_map(|o| match o {
            Outbound::ScheduleTick(d) => Some(*d),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

#[test]
fn queue_keeps_last_target_per_position() {
    let mut queue = GrowthQueue::new(0);
    let p = Position::new(4, 4, 4);
    assert_eq!(queue.push(Candidate::new(p, GRASS)), None);
    assert_eq!(queue.push(Candidate::new(p, STONE)), Some(GRASS));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.get(&p), Some(&STONE));
}

#[test]
fn drain_random_never_repeats_a_position() {
    let mut queue = GrowthQueue::new(0);
    for x in 0..50 {
        queue.push(Candidate::new(Position::new(x, 0, 0), GRASS));
    }
    let mut rng = sprout_engine::rng::seeded(5);
    let mut drained = queue.drain_random(30, &mut rng);
    assert_eq!(drained.len(), 30);
    assert_eq!(queue.len(), 20);
    drained.sort_by_key(|c| c.position);
    drained.dedup_by_key(|c| c.position);
    assert_eq!(drained.len(), 30);
    for c in &drained {
        assert!(!queue.contains(&c.position));
    }

    // Asking for more than is left just empties the queue.
    assert_eq!(queue.drain_random(100, &mut rng).len(), 20);
    assert!(queue.is_empty());
}

#[test]
fn queue_over_warn_threshold_still_accepts() {
    let mut queue = GrowthQueue::new(3);
    for x in 0..10 {
        queue.push(Candidate::new(Position::new(x, 0, 0), GRASS));
    }
    assert_eq!(queue.len(), 10);
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

#[test]
fn batch_size_is_at_least_one_for_non_empty_queue() {
    let throttle = Throttle {
        drain_fraction: 0.01,
        min_delay: Duration::from_millis(10),
        per_item_reduction: Duration::from_millis(1),
    };
    assert_eq!(throttle.batch_size(0, 1.0), 0);
    for len in 1..300 {
        for speed in [0.001, 0.5, 1.0, 3.0, 1000.0] {
            let n = throttle.batch_size(len, speed);
            assert!(n >= 1, "len {len} speed {speed} -> {n}");
            assert!(n <= len, "len {len} speed {speed} -> {n}");
        }
    }
    assert_eq!(throttle.batch_size(1000, 1.0), 10);
    assert_eq!(throttle.batch_size(1000, 2.0), 20);
}

#[test]
fn next_delay_respects_floor_and_shrinks_with_backlog() {
    let throttle = Throttle {
        drain_fraction: 0.1,
        min_delay: Duration::from_millis(50),
        per_item_reduction: Duration::from_millis(1),
    };
    let base = Duration::from_secs(1);

    assert_eq!(throttle.next_delay(base, 1.0, 0), base);
    assert_eq!(throttle.next_delay(base, 2.0, 0), Duration::from_millis(500));
    assert_eq!(throttle.next_delay(base, 1.0, 100), Duration::from_millis(900));
    for remaining in [0, 10, 500, 949, 950, 951, 10_000, usize::MAX / 2] {
        for speed in [0.01, 1.0, 7.0, 1e9] {
            let d = throttle.next_delay(base, speed, remaining);
            assert!(d >= throttle.min_delay, "remaining {remaining} speed {speed} -> {d:?}");
        }
    }
    assert!(throttle.next_delay(base, 1.0, 10) > throttle.next_delay(base, 1.0, 500));
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn start_arms_exactly_one_tick() {
    let engine = engine();
    assert_eq!(engine.start(), vec![Outbound::ScheduleTick(Duration::from_secs(1))]);
}

#[test]
fn every_tick_rearms_exactly_once() {
    let mut engine = engine();
    for x in 0..25 {
        engine.enqueue(Candidate::new(Position::new(x, 0, 0), GRASS));
    }
    for _ in 0..40 {
        let out = engine.handle(Inbound::Tick);
        assert_eq!(scheduled(&out).len(), 1);
        assert!(matches!(out.last(), Some(Outbound::ScheduleTick(_))));
    }
    assert!(engine.queue().is_empty());
}

#[test]
fn simulation_speed_scales_delay_and_rejects_nonsense() {
    let mut engine = engine();
    assert!(engine.handle(Inbound::SimulationSpeed(4.0)).is_empty());
    assert_eq!(engine.simulation_speed(), 4.0);
    let out = engine.handle(Inbound::Tick);
    assert_eq!(scheduled(&out), vec![Duration::from_millis(250)]);

    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        engine.handle(Inbound::SimulationSpeed(bad));
        assert_eq!(engine.simulation_speed(), 4.0);
    }
}

#[test]
fn irrelevant_updates_issue_no_queries() {
    let mut engine = engine();
    let out = engine.handle(Inbound::BlocksUpdated(vec![(Position::new(0, 0, 0), STONE)]));
    assert!(out.is_empty());
}

#[test]
fn malformed_sample_leaves_queue_untouched() {
    let mut engine = engine();
    engine.enqueue(Candidate::new(Position::new(9, 9, 9), GRASS));

    let bounds = BoxShape::around(Position::new(0, 0, 0));
    let mut blocks = vec![BlockTypeId::VACUUM; 36];
    blocks[bounds.index(Position::new(1, 1, 1)).unwrap()] = DIRT;
    blocks.pop();

    let out = engine.handle(Inbound::QueryResult(NeighborhoodSample::new(bounds, blocks)));
    assert!(out.is_empty());
    assert_eq!(engine.queue().len(), 1);
    assert_eq!(engine.queue().get(&Position::new(9, 9, 9)), Some(&GRASS));
}

#[test]
fn later_classification_overwrites_pending_target() {
    let world = World::new();
    let center = Position::new(0, 0, 0);
    world.set_block(center, DIRT);

    let mut engine = engine();
    engine.enqueue(Candidate::new(center, ROCK));
    engine.on_query_result(&world.query(BoxShape::around(center)));

    assert_eq!(engine.queue().len(), 1);
    assert_eq!(engine.queue().get(&center), Some(&GRASS));
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn exposed_substrate_grows_after_one_tick() {
    let world = World::new();
    let origin = Position::new(0, 0, 0);
    world.set_block(origin, DIRT);

    let mut engine = engine();
    let out = engine.handle(Inbound::BlocksUpdated(vec![(origin, DIRT)]));
    assert_eq!(out, vec![Outbound::QueryBox(BoxShape::around(origin))]);

    let rest = answer_queries(&mut engine, &world, out);
    assert!(rest.is_empty());
    assert_eq!(engine.queue().len(), 1);
    assert_eq!(engine.queue().get(&origin), Some(&GRASS));

    let out = engine.handle(Inbound::Tick);
    assert_eq!(replaces(&out), vec![(origin, GRASS)]);
    assert!(engine.queue().is_empty());

    let Some(Outbound::ReplaceBlock { position, block, filter }) = out.first() else {
        panic!("expected a replace first, got {out:?}");
    };
    assert!(world.replace_if(*position, block.clone(), filter).is_replaced());
    assert_eq!(world.get_block(origin), GRASS);
}

#[test]
fn externally_changed_block_is_left_alone() {
    let world = World::new();
    let origin = Position::new(0, 0, 0);
    world.set_block(origin, DIRT);

    let mut engine = engine();
    let out = engine.handle(Inbound::BlocksUpdated(vec![(origin, DIRT)]));
    answer_queries(&mut engine, &world, out);
    assert_eq!(engine.queue().get(&origin), Some(&GRASS));

    // Someone else gets there first.
    world.set_block(origin, ROCK);

    let out = engine.handle(Inbound::Tick);
    assert_eq!(replaces(&out), vec![(origin, GRASS)]);
    let Some(Outbound::ReplaceBlock { position, block, filter }) = out.first() else {
        panic!("expected a replace first, got {out:?}");
    };
    assert_eq!(
        world.replace_if(*position, block.clone(), filter),
        ReplaceOutcome::Rejected { current: ROCK }
    );
    assert_eq!(world.get_block(origin), ROCK);

    // No retry: the candidate is gone and the next tick only re-arms.
    assert!(engine.queue().is_empty());
    let out = engine.handle(Inbound::Tick);
    assert!(replaces(&out).is_empty());
    assert_eq!(scheduled(&out).len(), 1);
}

#[test]
fn one_tick_drains_a_tenth_of_a_thousand() {
    let mut engine = engine();
    for i in 0..1000 {
        engine.enqueue(Candidate::new(Position::new(i % 40, 0, i / 40), GRASS));
    }
    assert_eq!(engine.queue().len(), 1000);

    let (out, report) = engine.tick();
    assert_eq!(report.drained, 100);
    assert_eq!(report.remaining, 900);
    assert_eq!(engine.queue().len(), 900);
    assert_eq!(replaces(&out).len(), 100);
    assert_eq!(engine.last_tick(), Some(report));
}

#[test]
fn grass_spreads_across_a_flat_field() {
    let world = World::new();
    for x in -3..=3 {
        for z in -3..=3 {
            world.set_block(Position::new(x, -1, z), STONE);
            world.set_block(Position::new(x, 0, z), DIRT);
        }
    }
    world.set_block(Position::new(0, 0, 0), GRASS);

    let mut engine = engine();
    drive(&mut engine, &world, vec![(Position::new(0, 0, 0), GRASS)], 400);

    assert_eq!(world.count_of(&DIRT), 0, "every dirt block should have grown");
    assert_eq!(world.count_of(&GRASS), 49);
    assert_eq!(world.count_of(&STONE), 49);
}

#[test]
fn buried_dirt_stays_dirt_next_to_grass() {
    let world = World::new();
    for x in -3..=3 {
        for z in -3..=3 {
            for y in -2..=0 {
                world.set_block(Position::new(x, y, z), DIRT);
            }
        }
    }
    world.set_block(Position::new(0, 0, 0), GRASS);

    let mut engine = engine();
    let notified = vec![(Position::new(0, 0, 0), GRASS), (Position::new(1, -1, 0), DIRT)];
    drive(&mut engine, &world, notified, 2000);

    assert_eq!(world.count_of(&GRASS), 49, "the whole surface should have grown");
    for x in -3..=3 {
        for z in -3..=3 {
            for y in -2..=-1 {
                let pos = Position::new(x, y, z);
                assert_eq!(world.get_block(pos), DIRT, "buried cell {pos} changed");
            }
        }
    }
}
