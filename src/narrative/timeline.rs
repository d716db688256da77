//! Pinned-section timeline.
//!
//! Records where each pinned section's pin starts, in page pixels.  The
//! values are only trustworthy after [`Timeline::refresh`] has run against
//! the final layout.

use std::collections::HashMap;

use crate::engine::page::{Page, Timeline};

use super::layout::NarrativeLayout;

#[derive(Debug, Clone, Default)]
pub struct SectionTimeline {
    /// Anchor → pin start in scroll rows.
    pin_rows: Vec<(String, usize)>,
    px_per_row: f64,
    /// Anchor → trigger start in pixels; filled by `refresh`.
    starts: HashMap<String, f64>,
}

impl SectionTimeline {
    pub fn new(layout: &NarrativeLayout, px_per_row: f64) -> Self {
        let pin_rows = layout
            .pins
            .iter()
            .map(|pin| (layout.sections[pin.section].anchor.clone(), layout.pin_start(pin)))
            .collect();
        Self {
            pin_rows,
            px_per_row,
            starts: HashMap::new(),
        }
    }

    pub fn is_measured(&self) -> bool {
        !self.starts.is_empty() || self.pin_rows.is_empty()
    }
}

impl Timeline for SectionTimeline {
    fn trigger_start(&self, anchor: &str) -> Option<f64> {
        self.starts.get(anchor).copied()
    }

    fn refresh(&mut self, page: &dyn Page) {
        let max_scroll = (page.measurements().content_height() - page.viewport_height()).max(0.0);
        self.starts = self
            .pin_rows
            .iter()
            .map(|(anchor, row)| (anchor.clone(), (*row as f64 * self.px_per_row).min(max_scroll)))
            .collect();
        tracing::debug!(pins = self.starts.len(), max_scroll, "timeline refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::page::testing::FakePage;
    use crate::narrative::document::Narrative;

    fn layout() -> NarrativeLayout {
        let n = Narrative::parse("## One {#one}\na\n\n## Two {#two pinned}\nb\n\n## Three {#three}\nc\n")
            .expect("valid");
        NarrativeLayout::build(&n, 40, 10)
    }

    #[test]
    fn unmeasured_until_refresh() {
        let layout = layout();
        let mut timeline = SectionTimeline::new(&layout, 16.0);
        assert!(!timeline.is_measured());
        assert_eq!(timeline.trigger_start("two"), None);

        timeline.refresh(&FakePage::new(10_000.0, 320.0));
        assert!(timeline.is_measured());
        assert_eq!(timeline.trigger_start("two"), Some(4.0 * 16.0));
        assert_eq!(timeline.trigger_start("one"), None);
    }

    #[test]
    fn starts_are_clamped_to_scroll_extent() {
        let layout = layout();
        let mut timeline = SectionTimeline::new(&layout, 16.0);
        timeline.refresh(&FakePage::new(100.0, 60.0));
        assert_eq!(timeline.trigger_start("two"), Some(40.0));
    }
}
