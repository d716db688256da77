//! Duration-bounded animated scroll-to ("jump to section").
//!
//! While a request runs it owns the page position: each frame it writes the
//! page directly and mirrors the value into both [`ScrollState`] fields, so
//! the ease loop sees zero distance and contributes nothing.  The final frame
//! mirrors the exact destination, leaving no residual for the ease loop.

use std::str::FromStr;
use std::time::{Duration, Instant};

use super::error::EngineError;
use super::page::Page;
use super::smooth::SmoothScroll;
use super::state::{apply_to_page, ScrollMode};

/// Duration used for section navigation unless configured otherwise.
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(5000);

/// Ease-in-out cubic on `p` in `[0, 1]`.
pub fn ease_in_out_cubic(p: f64) -> f64 {
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// What happens when a new request arrives while another is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// The new request replaces the running one.
    #[default]
    Cancel,
    /// Both keep running; the newest request writes last every frame.
    Overlap,
}

impl OverlapPolicy {
    pub fn label(self) -> &'static str {
        match self {
            OverlapPolicy::Cancel => "cancel",
            OverlapPolicy::Overlap => "overlap",
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cancel" => Ok(OverlapPolicy::Cancel),
            "overlap" => Ok(OverlapPolicy::Overlap),
            _ => Err(()),
        }
    }
}

/// One animated scroll run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedScrollRequest {
    pub start_y: f64,
    pub target_y: f64,
    pub duration: Duration,
    /// Set on the first frame the request is ticked.
    start: Option<Instant>,
}

/// Outcome of ticking one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSample {
    pub position: f64,
    pub finished: bool,
}

impl AnimatedScrollRequest {
    pub fn new(start_y: f64, target_y: f64, duration: Duration) -> Self {
        Self {
            start_y,
            target_y,
            duration,
            start: None,
        }
    }

    /// Progress in `[0, 1]` at `now`.  The first call pins the start time.
    pub fn progress(&mut self, now: Instant) -> f64 {
        let start = *self.start.get_or_insert(now);
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Position at `now`.  Exactly `target_y` once the run is complete.
    pub fn sample(&mut self, now: Instant) -> AnimationSample {
        let p = self.progress(now);
        if p >= 1.0 {
            return AnimationSample {
                position: self.target_y,
                finished: true,
            };
        }
        AnimationSample {
            position: self.start_y + (self.target_y - self.start_y) * ease_in_out_cubic(p),
            finished: false,
        }
    }
}

/// Drives animated scroll requests frame by frame.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    policy: OverlapPolicy,
    /// Running requests in arrival order.
    running: Vec<AnimatedScrollRequest>,
}

impl ScrollAnimator {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            running: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.running.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.running.len()
    }

    /// Start animating from the page's current offset to `target_y`.
    pub fn scroll_to(
        &mut self,
        target_y: f64,
        duration: Duration,
        page: &dyn Page,
    ) -> Result<(), EngineError> {
        if !target_y.is_finite() {
            return Err(EngineError::NonFiniteOffset(target_y));
        }
        let start_y = page.scroll_offset();
        if self.policy == OverlapPolicy::Cancel && !self.running.is_empty() {
            tracing::debug!(dropped = self.running.len(), "replacing in-flight scroll animation");
            self.running.clear();
        }
        tracing::debug!(start_y, target_y, ms = duration.as_millis() as u64, "animated scroll requested");
        self.running
            .push(AnimatedScrollRequest::new(start_y, target_y, duration));
        Ok(())
    }

    /// Tick every running request.  Must run after every other writer of the
    /// frame so its value is the one that sticks.
    pub fn frame(&mut self, now: Instant, mut engine: Option<&mut SmoothScroll>, page: &mut dyn Page) {
        if self.running.is_empty() {
            return;
        }

        self.running.retain_mut(|request| {
            let sample = request.sample(now);
            apply_to_page(page, sample.position);
            // Mirror the offset the page accepted, which may be clamped.
            if let Some(engine) = engine.as_deref_mut() {
                engine.state_mut().mirror(page.scroll_offset());
            }
            !sample.finished
        });

        if let Some(engine) = engine {
            engine.state_mut().mode = if self.running.is_empty() {
                ScrollMode::Continuous
            } else {
                ScrollMode::Animated
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::page::testing::FakePage;
    use crate::engine::smooth::EngineSettings;

    const EPS: f64 = 1e-12;

    #[test]
    fn ease_curve_samples() {
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < EPS);
        assert!((ease_in_out_cubic(0.75) - 0.9375).abs() < EPS);
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn ease_branches_meet_at_half() {
        let lower = 4.0 * 0.5_f64.powi(3);
        let upper = 1.0 - (-2.0 * 0.5_f64 + 2.0).powi(3) / 2.0;
        assert_eq!(lower, 0.5);
        assert_eq!(upper, 0.5);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
    }

    #[test]
    fn request_boundaries_are_exact() {
        let t0 = Instant::now();
        let mut req = AnimatedScrollRequest::new(0.0, 10_000.0, Duration::from_millis(5000));

        let first = req.sample(t0);
        assert_eq!(first.position, 0.0);
        assert!(!first.finished);

        let mid = req.sample(t0 + Duration::from_millis(2500));
        assert!((mid.position - 5000.0).abs() < 1e-9);

        let last = req.sample(t0 + Duration::from_millis(5000));
        assert_eq!(last.position, 10_000.0);
        assert!(last.finished);
    }

    #[test]
    fn start_time_is_set_lazily() {
        let t0 = Instant::now();
        let mut req = AnimatedScrollRequest::new(0.0, 100.0, Duration::from_millis(100));
        // First tick arrives late; progress still starts at zero.
        assert_eq!(req.progress(t0 + Duration::from_secs(3)), 0.0);
        assert_eq!(req.progress(t0 + Duration::from_secs(3) + Duration::from_millis(50)), 0.5);
    }

    #[test]
    fn zero_duration_lands_immediately() {
        let mut req = AnimatedScrollRequest::new(10.0, 20.0, Duration::ZERO);
        let s = req.sample(Instant::now());
        assert_eq!(s.position, 20.0);
        assert!(s.finished);
    }

    #[test]
    fn mirrors_state_so_ease_loop_does_not_fight() {
        let t0 = Instant::now();
        let mut page = FakePage::new(20_000.0, 1000.0);
        let mut engine = SmoothScroll::init(EngineSettings::default(), &page).expect("engine");
        let mut animator = ScrollAnimator::new(OverlapPolicy::Cancel);
        animator
            .scroll_to(10_000.0, Duration::from_millis(5000), &page)
            .expect("finite target");

        let mut t = t0;
        for _ in 0..10 {
            animator.frame(t, Some(&mut engine), &mut page);
            let written = page.offset;
            assert_eq!(engine.state().current(), written);
            assert_eq!(engine.state().target(), written);
            assert_eq!(engine.mode(), ScrollMode::Animated);

            engine.frame(&mut page);
            assert_eq!(page.offset, written, "ease loop moved the page mid-animation");
            t += Duration::from_millis(16);
        }

        animator.frame(t0 + Duration::from_millis(5000), Some(&mut engine), &mut page);
        assert!(!animator.is_active());
        assert_eq!(engine.mode(), ScrollMode::Continuous);
        assert_eq!(engine.state().current(), 10_000.0);
        assert_eq!(engine.state().target(), 10_000.0);

        engine.frame(&mut page);
        assert_eq!(page.offset, 10_000.0);
    }

    #[test]
    fn input_mid_animation_is_overridden() {
        let t0 = Instant::now();
        let mut page = FakePage::new(20_000.0, 1000.0);
        let mut engine = SmoothScroll::init(EngineSettings::default(), &page).expect("engine");
        let mut animator = ScrollAnimator::default();
        animator.scroll_to(8000.0, Duration::from_millis(1000), &page).expect("finite");

        animator.frame(t0, Some(&mut engine), &mut page);
        engine.nudge_target(3000.0, &page);
        animator.frame(t0 + Duration::from_millis(500), Some(&mut engine), &mut page);
        assert_eq!(engine.state().target(), 4000.0);
    }

    #[test]
    fn runs_without_an_engine() {
        let t0 = Instant::now();
        let mut page = FakePage::new(20_000.0, 1000.0);
        page.offset = 1000.0;
        let mut animator = ScrollAnimator::default();
        animator.scroll_to(3000.0, Duration::from_millis(200), &page).expect("finite");
        animator.frame(t0, None, &mut page);
        assert_eq!(page.offset, 1000.0);
        animator.frame(t0 + Duration::from_millis(200), None, &mut page);
        assert_eq!(page.offset, 3000.0);
        assert!(!animator.is_active());
    }

    #[test]
    fn cancel_policy_replaces_running_request() {
        let t0 = Instant::now();
        let mut page = FakePage::new(20_000.0, 1000.0);
        let mut animator = ScrollAnimator::new(OverlapPolicy::Cancel);
        animator.scroll_to(5000.0, Duration::from_millis(1000), &page).expect("finite");
        animator.frame(t0, None, &mut page);
        animator.frame(t0 + Duration::from_millis(500), None, &mut page);
        let midway = page.offset;

        animator.scroll_to(0.0, Duration::from_millis(1000), &page).expect("finite");
        assert_eq!(animator.in_flight(), 1);

        let t1 = t0 + Duration::from_millis(600);
        animator.frame(t1, None, &mut page);
        assert_eq!(page.offset, midway);
        animator.frame(t1 + Duration::from_millis(1000), None, &mut page);
        assert_eq!(page.offset, 0.0);
    }

    #[test]
    fn overlap_policy_lets_newest_write_last() {
        let t0 = Instant::now();
        let mut page = FakePage::new(20_000.0, 1000.0);
        let mut animator = ScrollAnimator::new(OverlapPolicy::Overlap);
        animator.scroll_to(5000.0, Duration::from_millis(1000), &page).expect("finite");
        animator.scroll_to(9000.0, Duration::from_millis(2000), &page).expect("finite");
        assert_eq!(animator.in_flight(), 2);

        animator.frame(t0, None, &mut page);
        animator.frame(t0 + Duration::from_millis(1000), None, &mut page);
        // First run finished at 5000 but the second wrote after it.
        assert_eq!(animator.in_flight(), 1);
        assert!((page.offset - 4500.0).abs() < 1e-9);

        animator.frame(t0 + Duration::from_millis(2000), None, &mut page);
        assert_eq!(page.offset, 9000.0);
    }

    #[test]
    fn rejects_non_finite_target() {
        let page = FakePage::new(1000.0, 100.0);
        let mut animator = ScrollAnimator::default();
        assert!(matches!(
            animator.scroll_to(f64::NAN, DEFAULT_SCROLL_DURATION, &page),
            Err(EngineError::NonFiniteOffset(_))
        ));
        assert!(!animator.is_active());
    }

    #[test]
    fn policy_parses() {
        assert_eq!("overlap".parse(), Ok(OverlapPolicy::Overlap));
        assert_eq!("Cancel".parse(), Ok(OverlapPolicy::Cancel));
        assert!("sometimes".parse::<OverlapPolicy>().is_err());
    }
}
