//! The long-form narrative shown by the reader: parsing, wrapping into rows,
//! and the pinned-section timeline.
//!
//! Nothing here draws to the terminal.

pub mod document;
pub mod layout;
pub mod timeline;
