use std::time::Duration;

/// Adaptive batch sizing and tick spacing for the growth queue.
///
/// A larger backlog drains more per tick (the batch is a fraction of the
/// queue) and ticks sooner (each pending entry shaves a little off the base
/// interval), bounded below by `min_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    pub drain_fraction: f64,
    pub min_delay: Duration,
    pub per_item_reduction: Duration,
}

impl Throttle {
    /// Entries to process this tick: `max(1, floor(len * fraction * speed))`,
    /// never more than `queue_len`, and zero only for an empty queue.
    pub fn batch_size(&self, queue_len: usize, speed: f64) -> usize {
        if queue_len == 0 {
            return 0;
        }
        let wanted = (queue_len as f64 * self.drain_fraction * speed).floor();
        // NaN and negatives collapse to the floor of 1.
        let wanted = if wanted >= 1.0 { wanted as usize } else { 1 };
        wanted.min(queue_len)
    }

    /// Delay before the next tick: `max(min_delay, base / speed - remaining * per_item)`.
    pub fn next_delay(&self, base: Duration, speed: f64, remaining: usize) -> Duration {
        let scaled = base.as_secs_f64() / speed;
        let reduction = remaining as f64 * self.per_item_reduction.as_secs_f64();
        let secs = scaled - reduction;
        if secs.is_nan() || secs <= self.min_delay.as_secs_f64() {
            self.min_delay
        } else {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            drain_fraction: 0.1,
            min_delay: Duration::from_millis(20),
            per_item_reduction: Duration::from_micros(100),
        }
    }
}
