//! Frame timing
//!
//! Rolling frame-time window for the FPS readout in the control panel.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct PerformanceMetrics {
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
}

pub struct PerformanceMonitor {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    current_metrics: PerformanceMetrics,
    last_update: Instant,
    update_interval: Duration,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_samples(120)
    }

    pub fn with_samples(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            frame_start: None,
            current_metrics: PerformanceMetrics::default(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(250),
        }
    }

    /// Marks the start of a frame. Frames are measured start to start so the
    /// readout includes presentation waits.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        if let Some(start) = self.frame_start.replace(now) {
            self.record_frame(now - start);
            if self.last_update.elapsed() >= self.update_interval {
                self.update_metrics();
                self.last_update = now;
            }
        }
    }

    pub fn record_frame(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    pub fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let average_ms = total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;
        self.current_metrics.frame_time_ms = average_ms;
        self.current_metrics.fps = if average_ms > 0.0 { 1000.0 / average_ms } else { 0.0 };

        if let (Some(min), Some(max)) = (self.frame_times.iter().min(), self.frame_times.iter().max()) {
            self.current_metrics.min_frame_time_ms = min.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max.as_secs_f32() * 1000.0;
        }
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }
}
