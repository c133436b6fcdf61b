//! Lock-free growth counters.
//!
//! The host task bumps these with relaxed atomics as it services engine
//! requests; the stats logger reads them at its own pace.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::Instant;

pub struct Metrics {
    // Monotonic counters
    blocks_notified: AtomicU64,
    queries_issued: AtomicU64,
    queries_answered: AtomicU64,
    replaces_issued: AtomicU64,
    replaces_applied: AtomicU64,
    replaces_rejected: AtomicU64,
    blocks_placed: AtomicU64,
    ticks: AtomicU64,
    drained: AtomicU64,
    bus_lagged: AtomicU64,

    // Gauges
    queue_len: AtomicU64,
    last_delay_us: AtomicU64,

    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            blocks_notified: AtomicU64::new(0),
            queries_issued: AtomicU64::new(0),
            queries_answered: AtomicU64::new(0),
            replaces_issued: AtomicU64::new(0),
            replaces_applied: AtomicU64::new(0),
            replaces_rejected: AtomicU64::new(0),
            blocks_placed: AtomicU64::new(0),
            ticks: AtomicU64::new(0),
            drained: AtomicU64::new(0),
            bus_lagged: AtomicU64::new(0),
            queue_len: AtomicU64::new(0),
            last_delay_us: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn record_notified(&self, blocks: usize) {
        self.blocks_notified.fetch_add(blocks as u64, Relaxed);
    }

    pub fn record_query_issued(&self) {
        self.queries_issued.fetch_add(1, Relaxed);
    }

    pub fn record_query_answered(&self) {
        self.queries_answered.fetch_add(1, Relaxed);
    }

    /// One conditional replace request, and whether the world accepted it.
    pub fn record_replace(&self, applied: bool) {
        self.replaces_issued.fetch_add(1, Relaxed);
        if applied {
            self.replaces_applied.fetch_add(1, Relaxed);
        } else {
            self.replaces_rejected.fetch_add(1, Relaxed);
        }
    }

    pub fn record_placed(&self) {
        self.blocks_placed.fetch_add(1, Relaxed);
    }

    pub fn record_tick(&self, drained: usize, next_delay: std::time::Duration) {
        self.ticks.fetch_add(1, Relaxed);
        self.drained.fetch_add(drained as u64, Relaxed);
        self.last_delay_us
            .store(next_delay.as_micros().min(u64::MAX as u128) as u64, Relaxed);
    }

    pub fn record_lagged(&self, skipped: u64) {
        self.bus_lagged.fetch_add(skipped, Relaxed);
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len as u64, Relaxed);
    }

    pub fn replaces_applied(&self) -> u64 {
        self.replaces_applied.load(Relaxed)
    }

    pub fn replaces_rejected(&self) -> u64 {
        self.replaces_rejected.load(Relaxed)
    }

    pub fn blocks_placed(&self) -> u64 {
        self.blocks_placed.load(Relaxed)
    }

    pub fn queue_len(&self) -> u64 {
        self.queue_len.load(Relaxed)
    }

    /// Read all counters into a serializable snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs_f64(),
            blocks_notified: self.blocks_notified.load(Relaxed),
            queries_issued: self.queries_issued.load(Relaxed),
            queries_answered: self.queries_answered.load(Relaxed),
            replaces_issued: self.replaces_issued.load(Relaxed),
            replaces_applied: self.replaces_applied.load(Relaxed),
            replaces_rejected: self.replaces_rejected.load(Relaxed),
            blocks_placed: self.blocks_placed.load(Relaxed),
            ticks: self.ticks.load(Relaxed),
            drained: self.drained.load(Relaxed),
            bus_lagged: self.bus_lagged.load(Relaxed),
            queue_len: self.queue_len.load(Relaxed),
            last_delay_us: self.last_delay_us.load(Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of all counters at a point in time.
/// Rates come from diffing consecutive snapshots.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: f64,
    pub blocks_notified: u64,
    pub queries_issued: u64,
    pub queries_answered: u64,
    pub replaces_issued: u64,
    pub replaces_applied: u64,
    pub replaces_rejected: u64,
    pub blocks_placed: u64,
    pub ticks: u64,
    pub drained: u64,
    pub bus_lagged: u64,
    pub queue_len: u64,
    pub last_delay_us: u64,
}
