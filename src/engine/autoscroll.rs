//! Continuous forward auto-scroll.
//!
//! Only ever nudges the scroll target; the ease loop turns that into motion,
//! which is why speed changes accelerate smoothly instead of jumping.

use super::page::Page;
use super::smooth::SmoothScroll;

/// Selectable speeds in pixels per frame.
pub const SPEED_TABLE: [f64; 5] = [1.0, 2.11, 4.47, 9.46, 20.0];

/// Index into [`SPEED_TABLE`] used at startup.
pub const DEFAULT_SPEED_INDEX: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoScrollDriver {
    enabled: bool,
    speed_index: usize,
}

impl Default for AutoScrollDriver {
    fn default() -> Self {
        Self {
            enabled: false,
            speed_index: DEFAULT_SPEED_INDEX,
        }
    }
}

impl AutoScrollDriver {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip play/pause.  Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        tracing::info!(enabled = self.enabled, speed = self.speed(), "auto-scroll toggled");
        self.enabled
    }

    pub fn speed_index(&self) -> usize {
        self.speed_index
    }

    /// 1-based speed step for display.
    pub fn speed_step(&self) -> usize {
        self.speed_index + 1
    }

    pub fn speed(&self) -> f64 {
        SPEED_TABLE[self.speed_index]
    }

    /// Step up one speed.  Saturates at the fastest entry.
    pub fn increase_speed(&mut self) -> bool {
        if self.speed_index + 1 >= SPEED_TABLE.len() {
            return false;
        }
        self.speed_index += 1;
        tracing::info!(speed = self.speed(), "auto-scroll speed increased");
        true
    }

    /// Step down one speed.  Saturates at the slowest entry.
    pub fn decrease_speed(&mut self) -> bool {
        if self.speed_index == 0 {
            return false;
        }
        self.speed_index -= 1;
        tracing::info!(speed = self.speed(), "auto-scroll speed decreased");
        true
    }

    /// Per-frame callback.  No-op unless enabled and an engine is running.
    pub fn frame(&self, engine: Option<&mut SmoothScroll>, page: &dyn Page) {
        if !self.enabled {
            return;
        }
        if let Some(engine) = engine {
            engine.nudge_target(self.speed(), page);
        }
    }
}
