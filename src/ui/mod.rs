//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! Widgets read the app state and draw it; no scroll state is mutated here.

pub mod drawer;
pub mod layout;
pub mod progress;
pub mod reader;
pub mod status;
pub mod theme;
