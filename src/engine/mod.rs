//! Virtual smooth-scroll core.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The page
//! being scrolled is reached only through the [`page::Page`] and
//! [`page::Timeline`] traits, so the same engine drives the terminal reader
//! and the in-memory pages used by the tests.

pub mod animator;
pub mod autoscroll;
pub mod ease;
pub mod error;
pub mod input;
pub mod navigation;
pub mod page;
pub mod progress;
pub mod runtime;
pub mod scheduler;
pub mod smooth;
pub mod state;
