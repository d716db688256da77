//! The virtual smooth-scroll engine.
//!
//! Owns the [`ScrollState`], the [`EaseLoop`] and the [`InputCapture`] for
//! one page.  Built once at startup and handed to whoever needs it.

use std::str::FromStr;
use std::time::Instant;

use super::ease::EaseLoop;
use super::input::{InputCapture, InputDisposition, TouchPoint, WheelInput};
use super::page::Page;
use super::state::{ScrollMode, ScrollState};

/// The two engine variants: they differ in defaults, in how the scrollable
/// extent is tracked and in whether reduced motion is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineProfile {
    /// Re-measures the page on every clamp; ignores reduced motion.
    #[default]
    Enhanced,
    /// Snapshots the extent at startup (refresh with [`SmoothScroll::update`])
    /// and declines to start when the user prefers reduced motion.
    Wheel,
}

impl EngineProfile {
    pub fn label(self) -> &'static str {
        match self {
            EngineProfile::Enhanced => "enhanced",
            EngineProfile::Wheel => "wheel",
        }
    }

    pub fn default_ease(self) -> f64 {
        match self {
            EngineProfile::Enhanced => 0.08,
            EngineProfile::Wheel => 0.05,
        }
    }

    pub fn default_wheel_sensitivity(self) -> f64 {
        match self {
            EngineProfile::Enhanced => 1.2,
            EngineProfile::Wheel => 1.0,
        }
    }

    pub fn touch_multiplier(self) -> f64 {
        match self {
            EngineProfile::Enhanced => 1.0,
            EngineProfile::Wheel => 2.0,
        }
    }

    fn measures_live(self) -> bool {
        self == EngineProfile::Enhanced
    }

    fn honours_reduced_motion(self) -> bool {
        self == EngineProfile::Wheel
    }
}

impl FromStr for EngineProfile {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enhanced" | "a" => Ok(EngineProfile::Enhanced),
            "wheel" | "b" => Ok(EngineProfile::Wheel),
            _ => Err(()),
        }
    }
}

/// Tuning applied when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub profile: EngineProfile,
    pub ease: f64,
    pub wheel_sensitivity: f64,
}

impl EngineSettings {
    pub fn for_profile(profile: EngineProfile) -> Self {
        Self {
            profile,
            ease: profile.default_ease(),
            wheel_sensitivity: profile.default_wheel_sensitivity(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::for_profile(EngineProfile::default())
    }
}

#[derive(Debug, Clone)]
pub struct SmoothScroll {
    profile: EngineProfile,
    state: ScrollState,
    ease: EaseLoop,
    input: InputCapture,
}

impl SmoothScroll {
    /// Build the engine against `page`, or `None` when the profile declines
    /// because the user prefers reduced motion.  In that case the host keeps
    /// native scrolling.
    pub fn init(settings: EngineSettings, page: &dyn Page) -> Option<Self> {
        if settings.profile.honours_reduced_motion() && page.prefers_reduced_motion() {
            tracing::info!("reduced motion preferred; virtual scrolling disabled");
            return None;
        }

        tracing::debug!(
            profile = settings.profile.label(),
            ease = settings.ease,
            "smooth scroll engine initialised"
        );
        Some(Self {
            profile: settings.profile,
            state: ScrollState::from_page(page),
            ease: EaseLoop::new(settings.ease),
            input: InputCapture::new(settings.wheel_sensitivity, settings.profile.touch_multiplier()),
        })
    }

    pub fn profile(&self) -> EngineProfile {
        self.profile
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ScrollState {
        &mut self.state
    }

    pub fn input(&self) -> &InputCapture {
        &self.input
    }

    pub fn ease(&self) -> &EaseLoop {
        &self.ease
    }

    pub fn ease_mut(&mut self) -> &mut EaseLoop {
        &mut self.ease
    }

    pub fn is_scrolling(&self) -> bool {
        self.input.is_active()
    }

    pub fn mode(&self) -> ScrollMode {
        self.state.mode()
    }

    /// Move the target by `delta` and clamp.  The only entry point for
    /// target changes that do not come from raw input.
    pub fn nudge_target(&mut self, delta: f64, page: &dyn Page) {
        if self.profile.measures_live() {
            self.state.measure(page);
        }
        self.state.nudge(delta);
    }

    pub fn on_wheel(&mut self, event: WheelInput, now: Instant, page: &dyn Page) -> InputDisposition {
        let delta = self.input.wheel(event, now);
        self.nudge_target(delta, page);
        InputDisposition::Captured
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint], page: &dyn Page) -> InputDisposition {
        let (disposition, delta) = self.input.touch_move(touches);
        if let Some(delta) = delta {
            self.nudge_target(delta, page);
        }
        disposition
    }

    pub fn on_touch_end(&mut self, now: Instant) {
        self.input.touch_end(now);
    }

    pub fn poll_timers(&mut self, now: Instant) {
        self.input.poll_timers(now);
    }

    /// One ease-loop frame.
    pub fn frame(&mut self, page: &mut dyn Page) {
        self.ease.tick(&mut self.state, page);
    }

    /// Re-read the page extent after content height changed.
    pub fn update(&mut self, page: &dyn Page) {
        self.state.measure(page);
        self.state.clamp();
        tracing::debug!(max_scroll = self.state.max_scroll(), "scroll extent refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::page::testing::FakePage;

    fn engine(profile: EngineProfile, page: &FakePage) -> SmoothScroll {
        SmoothScroll::init(EngineSettings::for_profile(profile), page).expect("engine starts")
    }

    #[test]
    fn wheel_profile_declines_under_reduced_motion() {
        let mut page = FakePage::new(5000.0, 1000.0);
        page.reduced_motion = true;
        assert!(SmoothScroll::init(EngineSettings::for_profile(EngineProfile::Wheel), &page).is_none());
        assert!(SmoothScroll::init(EngineSettings::for_profile(EngineProfile::Enhanced), &page).is_some());
    }

    #[test]
    fn wheel_sequence_keeps_target_in_bounds() {
        let page = FakePage::new(5000.0, 1000.0);
        let mut e = engine(EngineProfile::Enhanced, &page);
        let now = Instant::now();
        for delta_y in [300.0, 2000.0, 2000.0, -700.0, -9000.0, 4000.0, 53.0] {
            let d = e.on_wheel(WheelInput { delta_y }, now, &page);
            assert_eq!(d, InputDisposition::Captured);
            let t = e.state().target();
            assert!((0.0..=e.state().max_scroll()).contains(&t), "target {t}");
        }
        assert_eq!(e.state().target(), 4000.0);
    }

    #[test]
    fn touch_drag_moves_target() {
        let page = FakePage::new(5000.0, 1000.0);
        let mut e = engine(EngineProfile::Enhanced, &page);
        for y in [100.0, 80.0, 80.0] {
            e.on_touch_move(&[TouchPoint { y }], &page);
        }
        assert_eq!(e.state().target(), 20.0);

        let mut b = engine(EngineProfile::Wheel, &page);
        for y in [100.0, 80.0] {
            b.on_touch_move(&[TouchPoint { y }], &page);
        }
        assert_eq!(b.state().target(), 40.0);
    }

    #[test]
    fn enhanced_profile_measures_live() {
        let mut page = FakePage::new(5000.0, 1000.0);
        let mut e = engine(EngineProfile::Enhanced, &page);
        page.content_height = 9000.0;
        e.nudge_target(7000.0, &page);
        assert_eq!(e.state().target(), 7000.0);
    }

    #[test]
    fn wheel_profile_needs_update_for_new_extent() {
        let mut page = FakePage::new(5000.0, 1000.0);
        let mut e = engine(EngineProfile::Wheel, &page);
        page.content_height = 9000.0;

        e.nudge_target(7000.0, &page);
        assert_eq!(e.state().target(), 4000.0);

        e.update(&page);
        e.nudge_target(3000.0, &page);
        assert_eq!(e.state().target(), 7000.0);
    }

    #[test]
    fn update_reclamps_when_content_shrinks() {
        let mut page = FakePage::new(5000.0, 1000.0);
        let mut e = engine(EngineProfile::Wheel, &page);
        e.nudge_target(3500.0, &page);
        page.content_height = 2000.0;
        e.update(&page);
        assert_eq!(e.state().target(), 1000.0);
    }

    #[test]
    fn frames_converge_on_page() {
        let mut page = FakePage::new(5000.0, 1000.0);
        let mut e = engine(EngineProfile::Enhanced, &page);
        e.nudge_target(1000.0, &page);
        for _ in 0..300 {
            e.frame(&mut page);
        }
        assert!((page.offset - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn profile_parses_from_config_words() {
        assert_eq!("enhanced".parse(), Ok(EngineProfile::Enhanced));
        assert_eq!(" Wheel ".parse(), Ok(EngineProfile::Wheel));
        assert!("native".parse::<EngineProfile>().is_err());
    }
}
