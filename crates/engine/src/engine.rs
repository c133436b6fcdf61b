//! The growth engine: one explicit state struct, one dispatch function.
//!
//! The engine is strictly sequential. Each [`Inbound`] message is handled to
//! completion before the next, so neither the queue nor the configuration
//! needs a lock. All waiting (for query answers, for the next tick) happens
//! in the host; the engine only ever returns the requests it wants sent.

use std::sync::Arc;
use std::time::Duration;

use rand_chacha::ChaCha8Rng;

use crate::config::GrowthConfig;
use crate::growth::queue::{Candidate, GrowthQueue};
use crate::growth::{apply, classify, trigger};
use crate::protocol::{Inbound, Outbound};
use crate::rng::{self, RandomSource};
use crate::world::block::BlockTypeId;
use crate::world::position::Position;
use crate::world::sample::NeighborhoodSample;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub drained: usize,
    pub remaining: usize,
    pub next_delay: Duration,
}

pub struct GrowthEngine<R = ChaCha8Rng> {
    config: Arc<GrowthConfig>,
    queue: GrowthQueue,
    simulation_speed: f64,
    rng: R,
    last_tick: Option<TickReport>,
}

impl GrowthEngine<ChaCha8Rng> {
    /// Engine driven by a ChaCha8 stream seeded with `seed`.
    pub fn seeded(config: Arc<GrowthConfig>, seed: u64) -> Self {
        Self::new(config, rng::seeded(seed))
    }
}

impl<R: RandomSource> GrowthEngine<R> {
    pub fn new(config: Arc<GrowthConfig>, rng: R) -> Self {
        let queue = GrowthQueue::new(config.queue_warn_threshold());
        Self {
            config,
            queue,
            simulation_speed: 1.0,
            rng,
            last_tick: None,
        }
    }

    /// Requests to issue once at startup: arms the first tick.
    pub fn start(&self) -> Vec<Outbound> {
        tracing::info!(
            "Growth engine started (tick interval {:?}, speed {})",
            self.config.tick_interval(),
            self.simulation_speed
        );
        vec![Outbound::ScheduleTick(self.next_delay())]
    }

    /// Handle one inbound message.
    pub fn handle(&mut self, message: Inbound) -> Vec<Outbound> {
        match message {
            Inbound::BlocksUpdated(changes) => self.on_blocks_updated(&changes),
            Inbound::SimulationSpeed(speed) => {
                self.set_simulation_speed(speed);
                Vec::new()
            }
            Inbound::QueryResult(sample) => {
                self.on_query_result(&sample);
                Vec::new()
            }
            Inbound::Tick => self.tick().0,
        }
    }

    /// Event trigger: one box query per relevant change.
    pub fn on_blocks_updated(&self, changes: &[(Position, BlockTypeId)]) -> Vec<Outbound> {
        trigger::queries_for(&self.config, changes)
            .into_iter()
            .map(Outbound::QueryBox)
            .collect()
    }

    /// Classify a query answer into the queue. Returns the number of
    /// candidates produced (zero for a malformed sample, which is logged).
    pub fn on_query_result(&mut self, sample: &NeighborhoodSample) -> usize {
        match classify::classify(sample, &self.config, &mut self.rng) {
            Ok(candidates) => {
                let n = candidates.len();
                self.queue.extend(candidates);
                n
            }
            Err(e) => {
                tracing::warn!("Discarding neighborhood sample: {}", e);
                0
            }
        }
    }

    /// Ignores non-finite or non-positive speeds.
    pub fn set_simulation_speed(&mut self, speed: f64) {
        if !(speed.is_finite() && speed > 0.0) {
            tracing::warn!("Ignoring invalid simulation speed {}", speed);
            return;
        }
        tracing::info!("Simulation speed {} -> {}", self.simulation_speed, speed);
        self.simulation_speed = speed;
    }

    /// Queue a candidate directly, bypassing classification.
    pub fn enqueue(&mut self, candidate: Candidate) -> Option<BlockTypeId> {
        self.queue.push(candidate)
    }

    /// Drain one adaptively sized batch and re-arm the timer.
    ///
    /// The returned requests always end with exactly one
    /// [`Outbound::ScheduleTick`].
    pub fn tick(&mut self) -> (Vec<Outbound>, TickReport) {
        let throttle = *self.config.throttle();
        let batch = throttle.batch_size(self.queue.len(), self.simulation_speed);

        let mut out = Vec::new();
        for candidate in self.queue.drain_random(batch, &mut self.rng) {
            out.extend(apply::apply(&self.config, candidate));
        }

        let report = TickReport {
            drained: batch,
            remaining: self.queue.len(),
            next_delay: self.next_delay(),
        };
        if report.drained > 0 {
            tracing::debug!(
                "Growth tick: {} applied, {} pending, next in {:?}",
                report.drained,
                report.remaining,
                report.next_delay
            );
        }
        out.push(Outbound::ScheduleTick(report.next_delay));
        self.last_tick = Some(report);
        (out, report)
    }

    fn next_delay(&self) -> Duration {
        self.config.throttle().next_delay(
            self.config.tick_interval(),
            self.simulation_speed,
            self.queue.len(),
        )
    }

    pub fn queue(&self) -> &GrowthQueue {
        &self.queue
    }

    pub fn config(&self) -> &Arc<GrowthConfig> {
        &self.config
    }

    pub fn simulation_speed(&self) -> f64 {
        self.simulation_speed
    }

    pub fn last_tick(&self) -> Option<TickReport> {
        self.last_tick
    }
}
