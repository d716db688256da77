//! The terminal as a scrollable page.
//!
//! Text rows are mapped onto page pixels at `px_per_row`, so the engine's
//! pixel constants mean the same thing here as in a browser.

use crate::engine::page::{ContentMeasurements, Page};
use crate::narrative::layout::NarrativeLayout;

#[derive(Debug, Clone)]
pub struct TerminalPage {
    layout: NarrativeLayout,
    viewport_rows: u16,
    px_per_row: f64,
    offset_px: f64,
    reduced_motion: bool,
}

impl TerminalPage {
    pub fn new(layout: NarrativeLayout, viewport_rows: u16, px_per_row: f64, reduced_motion: bool) -> Self {
        Self {
            layout,
            viewport_rows,
            px_per_row,
            offset_px: 0.0,
            reduced_motion,
        }
    }

    pub fn layout(&self) -> &NarrativeLayout {
        &self.layout
    }

    pub fn viewport_rows(&self) -> u16 {
        self.viewport_rows
    }

    /// Resize the viewport in place.  The offset is re-clamped to the new extent.
    pub fn set_viewport_rows(&mut self, viewport_rows: u16) {
        self.viewport_rows = viewport_rows.max(1);
        self.offset_px = self.offset_px.clamp(0.0, self.max_scroll_px());
    }

    pub fn px_per_row(&self) -> f64 {
        self.px_per_row
    }

    /// Scroll offset in (fractional) scroll rows.
    pub fn offset_rows(&self) -> f64 {
        self.offset_px / self.px_per_row
    }

    pub fn max_scroll_px(&self) -> f64 {
        (self.measurements().content_height() - self.viewport_height()).max(0.0)
    }

    fn rows_to_px(&self, rows: usize) -> f64 {
        rows as f64 * self.px_per_row
    }
}

impl Page for TerminalPage {
    fn measurements(&self) -> ContentMeasurements {
        let scroll = self.rows_to_px(self.layout.scroll_rows());
        let content = self.rows_to_px(self.layout.content_rows());
        let viewport = self.viewport_height();
        ContentMeasurements {
            body_scroll_height: scroll,
            body_offset_height: content,
            root_client_height: viewport,
            root_scroll_height: scroll.max(viewport),
            root_offset_height: scroll,
        }
    }

    fn viewport_height(&self) -> f64 {
        self.rows_to_px(usize::from(self.viewport_rows))
    }

    fn scroll_offset(&self) -> f64 {
        self.offset_px
    }

    /// Clamped to the scrollable extent, like a browser viewport.
    fn set_scroll_offset(&mut self, y: f64) {
        if y.is_finite() {
            self.offset_px = y.clamp(0.0, self.max_scroll_px());
        }
    }

    fn anchor_offset(&self, anchor: &str) -> Option<f64> {
        self.layout.anchor_row(anchor).map(|row| self.rows_to_px(row))
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::document::Narrative;

    fn page(viewport_rows: u16) -> TerminalPage {
        let n = Narrative::parse("## One {#one}\na\n\n## Two {#two pinned}\nb\n\n## Three {#three}\nc\n")
            .expect("valid");
        TerminalPage::new(NarrativeLayout::build(&n, 40, 5), viewport_rows, 10.0, false)
    }

    #[test]
    fn measurements_include_pin_spacers() {
        let p = page(4);
        // 12 content rows + 5 pin rows
        let m = p.measurements();
        assert_eq!(m.body_offset_height, 120.0);
        assert_eq!(m.content_height(), 170.0);
        assert_eq!(p.max_scroll_px(), 130.0);
    }

    #[test]
    fn offset_is_clamped() {
        let mut p = page(4);
        p.set_scroll_offset(500.0);
        assert_eq!(p.scroll_offset(), 130.0);
        p.set_scroll_offset(-3.0);
        assert_eq!(p.scroll_offset(), 0.0);
        p.set_scroll_offset(f64::NAN);
        assert_eq!(p.scroll_offset(), 0.0);
        p.set_scroll_offset(25.0);
        assert_eq!(p.offset_rows(), 2.5);
    }

    #[test]
    fn anchors_in_pixels() {
        let p = page(4);
        assert_eq!(p.anchor_offset("two"), Some(40.0));
        assert_eq!(p.anchor_offset("three"), Some(130.0));
        assert_eq!(p.anchor_offset("zzz"), None);
    }

    #[test]
    fn taller_viewport_reclamps_offset() {
        let mut p = page(4);
        p.set_scroll_offset(130.0);
        p.set_viewport_rows(8);
        assert_eq!(p.max_scroll_px(), 90.0);
        assert_eq!(p.scroll_offset(), 90.0);
    }
}
