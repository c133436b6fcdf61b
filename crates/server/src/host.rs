//! Tokio host for a [`GrowthEngine`].
//!
//! The engine never touches the world or the clock. This module gives it
//! both: a single task owns the engine and services everything it asks for.
//!
//! - `QueryBox` is answered on a spawned task that reads the shared
//!   [`World`] and posts the sample back into the host's inbox.
//! - `ReplaceBlock` and `PlaceBlock` are applied to the world directly;
//!   whatever actually changed is published on the event bus as
//!   [`ChangeSource::Growth`].
//! - `ScheduleTick` re-arms the host's one timer. A newer request replaces
//!   the older one, so at most one tick is ever pending.
//!
//! Block-change notifications arrive from the event bus, including the
//! host's own growth batches, which is how grown blocks get to spread.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rand_chacha::ChaCha8Rng;
use sprout_engine::world::ReplaceOutcome;
use sprout_engine::{BlockTypeId, GrowthEngine, Inbound, Outbound, Position, RandomSource, World};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Sleep};

use crate::event_bus::{ChangeSource, WorldChangeBatch};
use crate::metrics::Metrics;

/// Stand-in deadline for delays too large to add to `Instant::now()`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Control surface for a running growth host.
///
/// Dropping the handle also stops the host.
pub struct GrowthHandle<R = ChaCha8Rng> {
    inbox: mpsc::UnboundedSender<Inbound>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<GrowthEngine<R>>,
    metrics: Arc<Metrics>,
}

impl<R> GrowthHandle<R> {
    /// Deliver block changes straight to the engine, bypassing the bus.
    pub fn notify_blocks(&self, changes: Vec<(Position, BlockTypeId)>) {
        if !changes.is_empty() {
            let _ = self.inbox.send(Inbound::BlocksUpdated(changes));
        }
    }

    pub fn set_simulation_speed(&self, speed: f64) {
        let _ = self.inbox.send(Inbound::SimulationSpeed(speed));
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Stop the host and hand back the engine with whatever is still queued.
    pub async fn shutdown(self) -> anyhow::Result<GrowthEngine<R>> {
        let _ = self.shutdown.send(());
        self.task.await.context("growth host task failed")
    }
}

/// Spawn the host task for `engine`.
///
/// The bus subscription is taken before this returns, so every batch
/// published afterwards reaches the engine.
pub fn spawn<R>(
    engine: GrowthEngine<R>,
    world: Arc<World>,
    bus: broadcast::Sender<WorldChangeBatch>,
) -> GrowthHandle<R>
where
    R: RandomSource + Send + 'static,
{
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let metrics = Arc::new(Metrics::new());
    let changes = bus.subscribe();

    let host = Host {
        world,
        bus,
        inbox: inbox_tx.clone(),
        metrics: Arc::clone(&metrics),
    };
    let task = tokio::spawn(host.run(engine, inbox_rx, changes, shutdown_rx));

    GrowthHandle {
        inbox: inbox_tx,
        shutdown: shutdown_tx,
        task,
        metrics,
    }
}

struct Host {
    world: Arc<World>,
    bus: broadcast::Sender<WorldChangeBatch>,
    /// Query answers come back through here.
    inbox: mpsc::UnboundedSender<Inbound>,
    metrics: Arc<Metrics>,
}

impl Host {
    async fn run<R: RandomSource>(
        self,
        mut engine: GrowthEngine<R>,
        mut inbox: mpsc::UnboundedReceiver<Inbound>,
        mut changes: broadcast::Receiver<WorldChangeBatch>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> GrowthEngine<R> {
        let timer = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(timer);
        let mut armed = false;

        tracing::info!("Growth host started");
        let requests = engine.start();
        self.dispatch(requests, timer.as_mut(), &mut armed);

        loop {
            let message = tokio::select! {
                _ = &mut shutdown => break,
                Some(message) = inbox.recv() => message,
                batch = changes.recv() => match batch {
                    Ok(batch) => {
                        self.metrics.record_notified(batch.changes.len());
                        Inbound::BlocksUpdated(batch.changes.to_vec())
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Growth host lagged the event bus, {} batches skipped", skipped);
                        self.metrics.record_lagged(skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Event bus closed, stopping growth host");
                        break;
                    }
                },
                () = &mut timer, if armed => {
                    armed = false;
                    Inbound::Tick
                }
            };

            let ticked = matches!(message, Inbound::Tick);
            let requests = engine.handle(message);
            if ticked {
                if let Some(report) = engine.last_tick() {
                    self.metrics.record_tick(report.drained, report.next_delay);
                }
            }
            self.metrics.set_queue_len(engine.queue().len());
            self.dispatch(requests, timer.as_mut(), &mut armed);
        }

        tracing::info!("Growth host stopped with {} queued candidates", engine.queue().len());
        engine
    }

    fn dispatch(&self, requests: Vec<Outbound>, mut timer: Pin<&mut Sleep>, armed: &mut bool) {
        let mut grown = Vec::new();

        for request in requests {
            match request {
                Outbound::QueryBox(bounds) => {
                    self.metrics.record_query_issued();
                    let world = Arc::clone(&self.world);
                    let inbox = self.inbox.clone();
                    let metrics = Arc::clone(&self.metrics);
                    tokio::spawn(async move {
                        let sample = world.query(bounds);
                        metrics.record_query_answered();
                        // A closed inbox means the host already stopped.
                        let _ = inbox.send(Inbound::QueryResult(sample));
                    });
                }
                Outbound::ReplaceBlock { position, block, filter } => {
                    match self.world.replace_if(position, block.clone(), &filter) {
                        ReplaceOutcome::Replaced { .. } => {
                            self.metrics.record_replace(true);
                            grown.push((position, block));
                        }
                        ReplaceOutcome::Rejected { current } => {
                            self.metrics.record_replace(false);
                            tracing::trace!("{} at {} rejected, cell is now {}", block, position, current);
                        }
                    }
                }
                Outbound::PlaceBlock { position, block } => {
                    if self.world.set_block(position, block.clone()) != block {
                        self.metrics.record_placed();
                        grown.push((position, block));
                    }
                }
                Outbound::ScheduleTick(delay) => {
                    timer.as_mut().reset(deadline(delay));
                    *armed = true;
                }
            }
        }

        if !grown.is_empty() {
            tracing::debug!("Growth applied {} block changes", grown.len());
            // Nobody listening is fine; the world already holds the change.
            let _ = self.bus.send(WorldChangeBatch::new(ChangeSource::Growth, grown));
        }
    }
}

fn deadline(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay).unwrap_or(now + FAR_FUTURE)
}
