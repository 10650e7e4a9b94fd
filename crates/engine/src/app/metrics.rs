use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Loop health over the last metrics interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    /// Gameplay ticks per second; zero while loading or minimised.
    pub tps: f32,
    pub frame_time_ms: f32,
    /// Most projectiles alive at once during the interval.
    pub peak_live_projectiles: usize,
    /// Pool size after the last tick that ran.
    pub pooled_ids: usize,
}

/// Latest published snapshot, readable from any thread.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<Mutex<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *self.lock()
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        *self.lock() = snapshot;
    }

    // A snapshot is plain data, so a panic mid-write cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, LoopMetricsSnapshot> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Projectile population right after a tick.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PopulationSample {
    pub live_projectiles: usize,
    pub pooled_ids: usize,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
    peak_live_projectiles: usize,
    pooled_ids: usize,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            frames: 0,
            ticks: 0,
            frame_time_sum: Duration::ZERO,
            peak_live_projectiles: 0,
            pooled_ids: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self, population: PopulationSample) {
        self.ticks = self.ticks.saturating_add(1);
        self.peak_live_projectiles = self.peak_live_projectiles.max(population.live_projectiles);
        self.pooled_ids = population.pooled_ids;
    }

    /// Cuts a snapshot once the interval has elapsed and starts the next one.
    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time_sum.as_secs_f32() * 1000.0 / frames as f32,
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
            peak_live_projectiles: self.peak_live_projectiles,
            pooled_ids: self.pooled_ids,
        };

        self.interval_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_sum = Duration::ZERO;
        self.peak_live_projectiles = 0;
        Some(snapshot)
    }
}
