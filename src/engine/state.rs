//! Shared scroll position state.
//!
//! Every writer (wheel, touch, auto-scroll, animated scroll-to) goes through
//! this one struct so the `0 <= target <= max_scroll` invariant is enforced in
//! a single place.

use super::page::Page;

/// Which writer currently owns the visible position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// The ease loop interpolates `current` toward `target`.
    #[default]
    Continuous,
    /// An animated scroll-to owns both fields and re-asserts them every frame.
    Animated,
}

impl ScrollMode {
    pub fn label(self) -> &'static str {
        match self {
            ScrollMode::Continuous => "ease",
            ScrollMode::Animated => "jump",
        }
    }
}

/// Target/current offset pair plus the scrollable extent.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    /// Offset the engine is driving toward.  Always within `[0, max_scroll]`
    /// after any mutation.
    pub(crate) target: f64,
    /// Offset rendered this frame, lagging `target`.
    pub(crate) current: f64,
    /// Content height last measured (or snapshotted) from the page.
    content_height: f64,
    viewport_height: f64,
    max_scroll: f64,
    pub(crate) mode: ScrollMode,
}

impl ScrollState {
    pub fn new(content_height: f64, viewport_height: f64) -> Self {
        let mut state = Self {
            target: 0.0,
            current: 0.0,
            content_height,
            viewport_height,
            max_scroll: 0.0,
            mode: ScrollMode::Continuous,
        };
        state.clamp();
        state
    }

    /// Start at whatever offset the page is already showing.
    pub fn from_page(page: &dyn Page) -> Self {
        let mut state = Self::new(page.measurements().content_height(), page.viewport_height());
        state.current = page.scroll_offset();
        state.target = page.scroll_offset();
        state.clamp();
        state
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    /// Replace the stored extent with a fresh page measurement.
    pub fn measure(&mut self, page: &dyn Page) {
        self.content_height = page.measurements().content_height();
        self.viewport_height = page.viewport_height();
    }

    /// Recompute `max_scroll` from the stored extent and pull `target` into
    /// `[0, max_scroll]`.  Idempotent.
    pub fn clamp(&mut self) {
        self.max_scroll = (self.content_height - self.viewport_height).max(0.0);
        self.target = self.target.min(self.max_scroll).max(0.0);
    }

    /// Add `delta` to the target, then clamp.
    pub fn nudge(&mut self, delta: f64) {
        if delta.is_finite() {
            self.target += delta;
        }
        self.clamp();
    }

    /// Force both fields to `y`.  Used by the animated path, which must leave
    /// the ease loop with zero residual.
    pub(crate) fn mirror(&mut self, y: f64) {
        self.current = y;
        self.target = y;
    }
}

/// Write `y` to the page.  Every visible movement goes through here.
pub fn apply_to_page(page: &mut dyn Page, y: f64) {
    page.set_scroll_offset(y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::page::testing::FakePage;

    #[test]
    fn max_scroll_is_content_minus_viewport() {
        let s = ScrollState::new(5000.0, 800.0);
        assert_eq!(s.max_scroll(), 4200.0);
    }

    #[test]
    fn short_content_has_no_extent() {
        let mut s = ScrollState::new(300.0, 800.0);
        s.nudge(50.0);
        assert_eq!(s.max_scroll(), 0.0);
        assert_eq!(s.target(), 0.0);
    }

    #[test]
    fn nudges_stay_in_bounds() {
        let mut s = ScrollState::new(2000.0, 500.0);
        for delta in [120.0, -500.0, 900.0, 900.0, 900.0, -37.5, 1e6, -1e6, 10.0] {
            s.nudge(delta);
            assert!(s.target() >= 0.0 && s.target() <= s.max_scroll(), "target {}", s.target());
        }
        assert_eq!(s.target(), 10.0);
    }

    #[test]
    fn clamp_is_idempotent() {
        let mut s = ScrollState::new(2000.0, 500.0);
        s.target = 9999.0;
        s.clamp();
        let once = s.target();
        s.clamp();
        assert_eq!(s.target(), once);
        assert_eq!(once, 1500.0);
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut s = ScrollState::new(2000.0, 500.0);
        s.nudge(100.0);
        s.nudge(f64::NAN);
        s.nudge(f64::INFINITY);
        assert_eq!(s.target(), 100.0);
    }

    #[test]
    fn from_page_adopts_visible_offset() {
        let mut page = FakePage::new(3000.0, 1000.0);
        page.offset = 750.0;
        let s = ScrollState::from_page(&page);
        assert_eq!(s.current(), 750.0);
        assert_eq!(s.target(), 750.0);
        assert_eq!(s.max_scroll(), 2000.0);
    }

    #[test]
    fn measure_then_clamp_picks_up_new_extent() {
        let mut page = FakePage::new(3000.0, 1000.0);
        let mut s = ScrollState::from_page(&page);
        s.nudge(1900.0);
        page.content_height = 1500.0;
        s.measure(&page);
        s.clamp();
        assert_eq!(s.max_scroll(), 500.0);
        assert_eq!(s.target(), 500.0);
    }
}
