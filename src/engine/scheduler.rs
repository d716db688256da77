//! Cooperative frame scheduler.
//!
//! The host owns the actual clock (a tokio interval); this only decides
//! whether a frame should run and keeps frame bookkeeping, so the whole
//! pipeline can be halted cleanly on teardown.

use std::time::{Duration, Instant};

pub const DEFAULT_FPS: u32 = 60;

/// Information about the frame being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub index: u64,
    /// Time since the previous frame (zero for the first).
    pub delta: Duration,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    running: bool,
    frames: u64,
    last_frame: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(1, 240);
        Self {
            interval: Duration::from_secs(1) / fps,
            running: false,
            frames: 0,
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!(interval_ms = self.interval.as_millis() as u64, "frame scheduler started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(frames = self.frames, "frame scheduler stopped");
        }
        self.running = false;
        self.last_frame = None;
    }

    /// Begin a frame at `now`, or `None` while stopped.
    pub fn begin_frame(&mut self, now: Instant) -> Option<FrameInfo> {
        if !self.running {
            return None;
        }
        let delta = self
            .last_frame
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or_default();
        let info = FrameInfo {
            index: self.frames,
            delta,
        };
        self.frames += 1;
        self.last_frame = Some(now);
        Some(info)
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_frames_until_started() {
        let mut s = FrameScheduler::default();
        assert!(s.begin_frame(Instant::now()).is_none());
        assert_eq!(s.frames(), 0);
    }

    #[test]
    fn counts_frames_and_deltas() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new(60);
        s.start();
        let a = s.begin_frame(t0).expect("running");
        let b = s.begin_frame(t0 + Duration::from_millis(16)).expect("running");
        assert_eq!(a.index, 0);
        assert_eq!(a.delta, Duration::ZERO);
        assert_eq!(b.index, 1);
        assert_eq!(b.delta, Duration::from_millis(16));
    }

    #[test]
    fn stop_halts_frames() {
        let mut s = FrameScheduler::default();
        s.start();
        assert!(s.begin_frame(Instant::now()).is_some());
        s.stop();
        assert!(!s.is_running());
        assert!(s.begin_frame(Instant::now()).is_none());
        assert_eq!(s.frames(), 1);
    }

    #[test]
    fn fps_is_clamped() {
        assert_eq!(FrameScheduler::new(0).interval(), Duration::from_secs(1));
        assert_eq!(FrameScheduler::new(50).interval(), Duration::from_millis(20));
    }
}
