use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window frame rate counter.
///
/// Call [`FrameRate::record`] once per presented frame. A new reading is
/// produced at most once per `report_interval`.
#[derive(Debug, Clone)]
pub struct FrameRate {
    window: Duration,
    report_interval: Duration,
    frames: VecDeque<Instant>,
    last_report: Instant,
}

impl FrameRate {
    /// One-second window, reported once per second.
    pub fn new() -> Self {
        Self::with_intervals(Duration::from_secs(1), Duration::from_secs(1))
    }

    pub fn with_intervals(window: Duration, report_interval: Duration) -> Self {
        Self {
            window,
            report_interval,
            frames: VecDeque::new(),
            last_report: Instant::now(),
        }
    }

    /// Records a frame presented at `now`.
    ///
    /// Returns the number of frames inside the window when a report is due.
    pub fn record(&mut self, now: Instant) -> Option<usize> {
        self.frames.push_back(now);
        while let Some(&oldest) = self.frames.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.frames.pop_front();
            } else {
                break;
            }
        }

        if now.saturating_duration_since(self.last_report) >= self.report_interval {
            self.last_report = now;
            Some(self.frames.len())
        } else {
            None
        }
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new()
    }
}
