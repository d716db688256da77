//! In-page anchor navigation: href parsing and destination resolution.

use super::error::EngineError;
use super::page::{Page, Timeline};

/// Anchor id named by an in-page href.
///
/// `Ok(None)` for the bare `"#"` link, which navigates nowhere.
pub fn parse_anchor_href(href: &str) -> Result<Option<&str>, EngineError> {
    let Some(id) = href.strip_prefix('#') else {
        return Err(EngineError::NotAnAnchor(href.to_string()));
    };
    if id.is_empty() {
        return Ok(None);
    }
    Ok(Some(id))
}

/// Offset to scroll to for `anchor`.
///
/// A pinned section triggered by the anchor wins, since its recorded start
/// accounts for pin spacing; otherwise the element's document offset is used.
pub fn resolve_destination(
    anchor: &str,
    page: &dyn Page,
    timeline: &dyn Timeline,
) -> Result<f64, EngineError> {
    if let Some(start) = timeline.trigger_start(anchor) {
        tracing::debug!(anchor, start, "destination from pinned section trigger");
        return Ok(start);
    }
    page.anchor_offset(anchor)
        .ok_or_else(|| EngineError::UnknownAnchor(anchor.to_string()))
}
