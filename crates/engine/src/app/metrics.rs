use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
}

#[derive(Debug, Default)]
struct IntervalCounts {
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
}

impl IntervalCounts {
    fn into_snapshot(self, elapsed: Duration) -> LoopMetricsSnapshot {
        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time_sum.as_secs_f32() * 1000.0 / frames as f32,
        };
        LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
        }
    }
}

/// Counts frames and ticks over a fixed wall-clock interval and turns them into rates.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval: Duration,
    started_at: Instant,
    counts: IntervalCounts,
    latest: LoopMetricsSnapshot,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            started_at: now,
            counts: IntervalCounts::default(),
            latest: LoopMetricsSnapshot::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.counts.frames = self.counts.frames.saturating_add(1);
        self.counts.frame_time_sum = self.counts.frame_time_sum.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self) {
        self.counts.ticks = self.counts.ticks.saturating_add(1);
    }

    /// Most recent completed interval; zeroed until the first interval elapses.
    pub(crate) fn latest(&self) -> LoopMetricsSnapshot {
        self.latest
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed < self.interval {
            return None;
        }
        self.started_at = now;
        self.latest = std::mem::take(&mut self.counts).into_snapshot(elapsed);
        Some(self.latest)
    }
}
