//! Debounced resize → reload decision.
//!
//! The reader rebuilds everything on a meaningful resize rather than
//! re-deriving layout live.  Width changes always count; height changes only
//! when larger than [`HEIGHT_THRESHOLD_PX`], so small height jitter does not
//! trigger a reload.

use std::time::{Duration, Instant};

pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(500);
pub const HEIGHT_THRESHOLD_PX: f64 = 150.0;

#[derive(Debug, Clone)]
pub struct ResizeGate {
    width: u16,
    height_px: f64,
    px_per_row: f64,
    pending: Option<(Instant, u16, u16)>,
}

impl ResizeGate {
    pub fn new(width: u16, height: u16, px_per_row: f64) -> Self {
        Self {
            width,
            height_px: f64::from(height) * px_per_row,
            px_per_row,
            pending: None,
        }
    }

    /// Record a resize.  Returns `true` when a reload got (re)scheduled.
    /// While a reload is pending every resize counts, so it always runs at
    /// the latest size.
    pub fn observe(&mut self, width: u16, height: u16, now: Instant) -> bool {
        let height_px = f64::from(height) * self.px_per_row;
        let small = width == self.width && (height_px - self.height_px).abs() <= HEIGHT_THRESHOLD_PX;
        if small && !self.is_pending() {
            return false;
        }
        self.width = width;
        self.height_px = height_px;
        self.pending = Some((now + RELOAD_DEBOUNCE, width, height));
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Size to reload at, once the debounce has elapsed.
    pub fn due(&mut self, now: Instant) -> Option<(u16, u16)> {
        match self.pending {
            Some((at, w, h)) if now >= at => {
                self.pending = None;
                Some((w, h))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_height_changes_are_ignored() {
        let t0 = Instant::now();
        let mut gate = ResizeGate::new(100, 40, 16.0);
        assert!(!gate.observe(100, 45, t0));
        assert!(gate.due(t0 + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn width_change_reloads_after_debounce() {
        let t0 = Instant::now();
        let mut gate = ResizeGate::new(100, 40, 16.0);
        assert!(gate.observe(120, 40, t0));
        assert!(gate.due(t0 + Duration::from_millis(400)).is_none());
        assert_eq!(gate.due(t0 + RELOAD_DEBOUNCE), Some((120, 40)));
        assert!(gate.due(t0 + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn repeated_resizes_restart_debounce() {
        let t0 = Instant::now();
        let mut gate = ResizeGate::new(100, 40, 16.0);
        gate.observe(110, 40, t0);
        gate.observe(90, 30, t0 + Duration::from_millis(300));
        assert!(gate.due(t0 + Duration::from_millis(600)).is_none());
        assert_eq!(gate.due(t0 + Duration::from_millis(800)), Some((90, 30)));
    }

    #[test]
    fn small_change_while_pending_updates_reload_size() {
        let t0 = Instant::now();
        let mut gate = ResizeGate::new(100, 40, 16.0);
        assert!(gate.observe(120, 40, t0));
        assert!(gate.observe(120, 41, t0 + Duration::from_millis(100)));
        assert!(gate.due(t0 + RELOAD_DEBOUNCE).is_none());
        assert_eq!(gate.due(t0 + Duration::from_millis(600)), Some((120, 41)));
        assert!(!gate.is_pending());
        assert!(!gate.observe(120, 42, t0 + Duration::from_secs(1)));
    }

    #[test]
    fn large_height_change_reloads() {
        let t0 = Instant::now();
        let mut gate = ResizeGate::new(100, 40, 16.0);
        assert!(gate.observe(100, 20, t0));
    }
}
