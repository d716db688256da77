//! Per-frame orchestration of every scroll writer.
//!
//! [`ScrollRuntime`] is the single owner of the engine, the auto-scroll
//! driver, the animator and the scheduler.  Input is applied as it arrives;
//! frames run the writers in a fixed order so the animator always has the
//! last word:
//!
//! 1. input idle timers expire
//! 2. auto-scroll nudges the target
//! 3. the animator writes the page and mirrors state
//! 4. the ease loop steps and commits

use std::time::{Duration, Instant};

use super::animator::{OverlapPolicy, ScrollAnimator, DEFAULT_SCROLL_DURATION};
use super::autoscroll::AutoScrollDriver;
use super::error::EngineError;
use super::input::{InputDisposition, TouchPoint, WheelInput};
use super::navigation::resolve_destination;
use super::page::{Page, Timeline};
use super::scheduler::{FrameInfo, FrameScheduler, DEFAULT_FPS};
use super::smooth::{EngineSettings, SmoothScroll};
use super::state::ScrollMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeSettings {
    pub engine: EngineSettings,
    pub overlap: OverlapPolicy,
    pub scroll_duration: Duration,
    pub fps: u32,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            overlap: OverlapPolicy::default(),
            scroll_duration: DEFAULT_SCROLL_DURATION,
            fps: DEFAULT_FPS,
        }
    }
}

#[derive(Debug)]
pub struct ScrollRuntime {
    /// `None` when the engine declined to start; native scrolling applies.
    engine: Option<SmoothScroll>,
    autoscroll: AutoScrollDriver,
    animator: ScrollAnimator,
    scheduler: FrameScheduler,
    scroll_duration: Duration,
    /// Last touch sample seen while scrolling natively.
    native_touch_y: Option<f64>,
}

impl ScrollRuntime {
    /// Enable scrolling for `page`: build the engine, start the scheduler,
    /// then let the timeline re-measure against the final layout.
    pub fn start(settings: RuntimeSettings, page: &dyn Page, timeline: &mut dyn Timeline) -> Self {
        let engine = SmoothScroll::init(settings.engine, page);
        let mut scheduler = FrameScheduler::new(settings.fps);
        scheduler.start();
        timeline.refresh(page);

        Self {
            engine,
            autoscroll: AutoScrollDriver::default(),
            animator: ScrollAnimator::new(settings.overlap),
            scheduler,
            scroll_duration: settings.scroll_duration,
            native_touch_y: None,
        }
    }

    /// Carry UI-level state (auto-scroll, smoothing) over from a runtime that
    /// is being replaced by a reload.
    pub fn inherit(&mut self, previous: &ScrollRuntime) {
        self.autoscroll = previous.autoscroll;
        if let (Some(engine), Some(old)) = (self.engine.as_mut(), previous.engine.as_ref()) {
            engine.ease_mut().set_smoothing(old.ease().ease());
        }
    }

    pub fn engine(&self) -> Option<&SmoothScroll> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut SmoothScroll> {
        self.engine.as_mut()
    }

    pub fn is_virtual(&self) -> bool {
        self.engine.is_some()
    }

    pub fn autoscroll(&self) -> &AutoScrollDriver {
        &self.autoscroll
    }

    pub fn autoscroll_mut(&mut self) -> &mut AutoScrollDriver {
        &mut self.autoscroll
    }

    pub fn animator(&self) -> &ScrollAnimator {
        &self.animator
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn frame_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    pub fn mode(&self) -> ScrollMode {
        match &self.engine {
            Some(engine) => engine.mode(),
            None if self.animator.is_active() => ScrollMode::Animated,
            None => ScrollMode::Continuous,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.engine.as_ref().is_some_and(SmoothScroll::is_scrolling)
    }

    /// Run one frame.  `None` once the scheduler is stopped.
    pub fn frame(&mut self, now: Instant, page: &mut dyn Page) -> Option<FrameInfo> {
        let info = self.scheduler.begin_frame(now)?;

        if let Some(engine) = self.engine.as_mut() {
            engine.poll_timers(now);
        }
        self.autoscroll.frame(self.engine.as_mut(), page);
        self.animator.frame(now, self.engine.as_mut(), page);
        if let Some(engine) = self.engine.as_mut() {
            engine.frame(page);
        }

        Some(info)
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn wheel(&mut self, event: WheelInput, now: Instant, page: &mut dyn Page) -> InputDisposition {
        match self.engine.as_mut() {
            Some(engine) => engine.on_wheel(event, now, page),
            None => {
                native_scroll_by(page, event.delta_y);
                InputDisposition::PassThrough
            }
        }
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint], page: &mut dyn Page) -> InputDisposition {
        if let Some(engine) = self.engine.as_mut() {
            return engine.on_touch_move(touches, page);
        }
        if let [touch] = touches {
            if let Some(prev) = self.native_touch_y.replace(touch.y) {
                native_scroll_by(page, prev - touch.y);
            }
        }
        InputDisposition::PassThrough
    }

    pub fn touch_end(&mut self, now: Instant) {
        self.native_touch_y = None;
        if let Some(engine) = self.engine.as_mut() {
            engine.on_touch_end(now);
        }
    }

    /// Keyboard-style relative scroll.
    pub fn scroll_by(&mut self, delta: f64, page: &mut dyn Page) {
        match self.engine.as_mut() {
            Some(engine) => engine.nudge_target(delta, page),
            None => native_scroll_by(page, delta),
        }
    }

    /// Start an animated scroll to `anchor`.
    pub fn navigate(
        &mut self,
        anchor: &str,
        page: &dyn Page,
        timeline: &dyn Timeline,
    ) -> Result<f64, EngineError> {
        let destination = resolve_destination(anchor, page, timeline)?;
        self.animator
            .scroll_to(destination, self.scroll_duration, page)?;
        tracing::info!(anchor, destination, "navigating");
        Ok(destination)
    }

    /// Content height changed without a reload.
    pub fn update(&mut self, page: &dyn Page, timeline: &mut dyn Timeline) {
        if let Some(engine) = self.engine.as_mut() {
            engine.update(page);
        }
        timeline.refresh(page);
    }
}

fn native_scroll_by(page: &mut dyn Page, delta: f64) {
    let max = (page.measurements().content_height() - page.viewport_height()).max(0.0);
    let y = (page.scroll_offset() + delta).clamp(0.0, max);
    page.set_scroll_offset(y);
}
