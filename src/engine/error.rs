//! Failure taxonomy for the scroll core.
//!
//! The core degrades instead of aborting: callers log these and carry on.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Navigation named an anchor that neither the timeline nor the page knows.
    #[error("no element or pinned section for anchor `#{0}`")]
    UnknownAnchor(String),

    /// The href is not an in-page anchor (`#id`).
    #[error("`{0}` is not an in-page anchor")]
    NotAnAnchor(String),

    /// An animated scroll was requested with a non-finite endpoint.
    #[error("animated scroll endpoint is not finite: {0}")]
    NonFiniteOffset(f64),
}
