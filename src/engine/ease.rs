//! Per-frame exponential ease toward the target offset.
//!
//! Each frame closes a fixed fraction of the remaining distance, so for a
//! constant target the error decays by `(1 - ease)` per frame.  There is no
//! snap: the residual shrinks geometrically but never reaches zero here.

use super::page::Page;
use super::state::{apply_to_page, ScrollState};

pub const MIN_EASE: f64 = 0.01;
pub const MAX_EASE: f64 = 0.3;

/// Multiplier applied by [`EaseLoop::increase_smoothing`].
const SMOOTHER_STEP: f64 = 0.8;
/// Multiplier applied by [`EaseLoop::decrease_smoothing`].
const SHARPER_STEP: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EaseLoop {
    /// Fraction of the remaining distance closed per frame.
    ease: f64,
}

impl EaseLoop {
    pub fn new(ease: f64) -> Self {
        Self {
            ease: clamp_ease(ease),
        }
    }

    pub fn ease(&self) -> f64 {
        self.ease
    }

    pub fn set_smoothing(&mut self, value: f64) {
        self.ease = clamp_ease(value);
    }

    /// Smoother, slower convergence.
    pub fn increase_smoothing(&mut self) {
        self.set_smoothing(self.ease * SMOOTHER_STEP);
    }

    /// Snappier convergence.
    pub fn decrease_smoothing(&mut self) {
        self.set_smoothing(self.ease * SHARPER_STEP);
    }

    /// Advance `current` toward `target` by one step without touching the page.
    pub fn step(&self, state: &mut ScrollState) {
        let diff = state.target - state.current;
        state.current += diff * self.ease;
    }

    /// One display frame: step, then commit `current` to the page.
    pub fn tick(&self, state: &mut ScrollState, page: &mut dyn Page) {
        self.step(state);
        apply_to_page(page, state.current);
    }
}

fn clamp_ease(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_EASE;
    }
    value.clamp(MIN_EASE, MAX_EASE)
}
