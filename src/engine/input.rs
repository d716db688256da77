//! Wheel and touch normalisation.
//!
//! Raw input becomes a signed delta on the scroll target.  Positive deltas
//! move further down the page.  Each gesture gets an [`InputSession`] that
//! tracks the previous touch sample and a resettable "actively scrolling"
//! flag.

use std::time::{Duration, Instant};

/// Quiet period after the last wheel event before the session goes idle.
pub const WHEEL_IDLE: Duration = Duration::from_millis(150);
/// Settle delay after a touch ends before the session goes idle.
pub const TOUCH_SETTLE: Duration = Duration::from_millis(300);

/// One wheel event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    /// Raw vertical delta in pixels.  Positive = scroll down.
    pub delta_y: f64,
}

/// One touch point position, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub y: f64,
}

/// Whether the host should suppress its own handling of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    /// The engine consumed the event; native behaviour must be suppressed.
    Captured,
    /// The engine ignored the event (e.g. multi-touch pinch).
    PassThrough,
}

/// A one-shot timer that can only be replaced, never cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleTimer {
    deadline: Option<Instant>,
}

impl IdleTimer {
    /// Replace any pending deadline with `now + after`.
    pub fn restart(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    /// True once, when the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Per-gesture input state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSession {
    pub last_touch_y: Option<f64>,
    pub is_active: bool,
    wheel_idle: IdleTimer,
    touch_settle: IdleTimer,
}

/// Turns raw wheel/touch events into target deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct InputCapture {
    wheel_sensitivity: f64,
    touch_multiplier: f64,
    session: InputSession,
}

impl InputCapture {
    pub fn new(wheel_sensitivity: f64, touch_multiplier: f64) -> Self {
        Self {
            wheel_sensitivity,
            touch_multiplier,
            session: InputSession::default(),
        }
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active
    }

    pub fn wheel_sensitivity(&self) -> f64 {
        self.wheel_sensitivity
    }

    /// Delta to add to the target for a wheel event.  Marks the session
    /// active and restarts the wheel idle timer.
    pub fn wheel(&mut self, event: WheelInput, now: Instant) -> f64 {
        self.session.is_active = true;
        self.session.wheel_idle.restart(now, WHEEL_IDLE);
        event.delta_y * self.wheel_sensitivity
    }

    /// Delta for a touch-move sample, or `None` when the sample only seeds
    /// the gesture.  Multi-touch is passed through untouched.
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> (InputDisposition, Option<f64>) {
        let [touch] = touches else {
            return (InputDisposition::PassThrough, None);
        };

        let delta = self
            .session
            .last_touch_y
            .map(|prev| (prev - touch.y) * self.touch_multiplier);
        self.session.last_touch_y = Some(touch.y);
        self.session.is_active = true;
        (InputDisposition::Captured, delta)
    }

    /// End the touch gesture.  The session goes idle after [`TOUCH_SETTLE`].
    pub fn touch_end(&mut self, now: Instant) {
        self.session.last_touch_y = None;
        self.session.touch_settle.restart(now, TOUCH_SETTLE);
    }

    /// Expire idle timers.  Called once per frame.
    pub fn poll_timers(&mut self, now: Instant) {
        let wheel_fired = self.session.wheel_idle.fire(now);
        let touch_fired = self.session.touch_settle.fire(now);
        if wheel_fired || touch_fired {
            self.session.is_active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(y: f64) -> [TouchPoint; 1] {
        [TouchPoint { y }]
    }

    #[test]
    fn wheel_delta_scales_by_sensitivity() {
        let mut input = InputCapture::new(1.2, 1.0);
        let d = input.wheel(WheelInput { delta_y: 100.0 }, Instant::now());
        assert!((d - 120.0).abs() < 1e-9);
        assert!(input.is_active());
    }

    #[test]
    fn first_touch_sample_only_seeds() {
        let mut input = InputCapture::new(1.2, 1.0);
        let mut total = 0.0;
        for y in [100.0, 80.0, 80.0] {
            let (disposition, delta) = input.touch_move(&touch(y));
            assert_eq!(disposition, InputDisposition::Captured);
            total += delta.unwrap_or(0.0);
        }
        assert_eq!(total, 20.0);

        let mut fresh = InputCapture::new(1.2, 1.0);
        assert_eq!(fresh.touch_move(&touch(100.0)).1, None);
    }

    #[test]
    fn dragging_down_scrolls_up() {
        let mut input = InputCapture::new(1.0, 2.0);
        input.touch_move(&touch(100.0));
        let (_, delta) = input.touch_move(&touch(130.0));
        assert_eq!(delta, Some(-60.0));
    }

    #[test]
    fn multi_touch_passes_through() {
        let mut input = InputCapture::new(1.0, 1.0);
        let two = [TouchPoint { y: 10.0 }, TouchPoint { y: 50.0 }];
        assert_eq!(input.touch_move(&two), (InputDisposition::PassThrough, None));
        assert_eq!(input.session().last_touch_y, None);
        assert!(!input.is_active());
    }

    #[test]
    fn touch_end_clears_last_sample() {
        let mut input = InputCapture::new(1.0, 1.0);
        input.touch_move(&touch(100.0));
        input.touch_end(Instant::now());
        assert_eq!(input.touch_move(&touch(50.0)).1, None);
    }

    #[test]
    fn wheel_goes_idle_after_quiet_period() {
        let t0 = Instant::now();
        let mut input = InputCapture::new(1.0, 1.0);
        input.wheel(WheelInput { delta_y: 10.0 }, t0);
        input.wheel(WheelInput { delta_y: 10.0 }, t0 + Duration::from_millis(100));

        // The second event replaced the first timer.
        input.poll_timers(t0 + Duration::from_millis(200));
        assert!(input.is_active());

        input.poll_timers(t0 + Duration::from_millis(250));
        assert!(!input.is_active());
    }

    #[test]
    fn touch_settles_after_longer_delay() {
        let t0 = Instant::now();
        let mut input = InputCapture::new(1.0, 1.0);
        input.touch_move(&touch(10.0));
        input.touch_end(t0);

        input.poll_timers(t0 + Duration::from_millis(299));
        assert!(input.is_active());
        input.poll_timers(t0 + TOUCH_SETTLE);
        assert!(!input.is_active());
    }

    #[test]
    fn idle_timer_fires_once() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::default();
        timer.restart(t0, Duration::from_millis(5));
        assert_eq!(timer.deadline, Some(t0 + Duration::from_millis(5)));
        assert!(!timer.fire(t0));
        assert!(timer.fire(t0 + Duration::from_millis(5)));
        assert!(!timer.fire(t0 + Duration::from_millis(50)));
        assert_eq!(timer.deadline, None);
    }
}
