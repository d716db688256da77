//! Narrative reader widget.
//!
//! Draws the content rows visible at the current scroll offset.  While a
//! pinned section holds the view, its text rows fade in from dim to full as
//! the pin progresses.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::narrative::layout::{NarrativeLayout, RowKind};

use super::theme::Theme;

const PIN_MARKER: &str = " ◆";

pub struct NarrativeView<'a> {
    layout: &'a NarrativeLayout,
    /// Scroll offset in (fractional) scroll rows.
    scroll_row: f64,
    block: Option<Block<'a>>,
}

impl<'a> NarrativeView<'a> {
    pub fn new(layout: &'a NarrativeLayout, scroll_row: f64) -> Self {
        Self {
            layout,
            scroll_row,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Styled lines for a viewport `height` rows tall.
    pub fn visible_lines(&self, height: usize) -> Vec<Line<'a>> {
        let origin = self.layout.view_at(self.scroll_row);
        let first = origin.row.floor().max(0.0) as usize;

        self.layout
            .rows
            .iter()
            .enumerate()
            .skip(first)
            .take(height)
            .map(|(idx, row)| match row.kind {
                RowKind::Title => Line::from(Span::styled(row.text.as_str(), Theme::title_style())),
                RowKind::Heading { section } => {
                    let span = &self.layout.sections[section];
                    if span.pinned {
                        Line::from(vec![
                            Span::styled(row.text.as_str(), Theme::pinned_heading_style()),
                            Span::styled(PIN_MARKER, Theme::pinned_heading_style()),
                        ])
                    } else {
                        Line::from(Span::styled(row.text.as_str(), Theme::heading_style()))
                    }
                }
                RowKind::Text { section } => {
                    Line::from(Span::styled(row.text.as_str(), self.text_style(section, idx)))
                }
                RowKind::Blank => Line::raw(""),
            })
            .collect()
    }

    /// Text rows of a pinned section are shown once the reveal passes them.
    fn text_style(&self, section: usize, row: usize) -> Style {
        let span = &self.layout.sections[section];
        if !span.pinned {
            return Theme::text_style();
        }
        let reveal = self.layout.reveal(section, self.scroll_row);
        let body = (span.end_row - span.first_row).max(1) as f64;
        let position = (row - span.first_row) as f64 / body;
        if position < reveal {
            Theme::text_style()
        } else {
            Theme::hidden_text_style()
        }
    }
}

impl<'a> Widget for NarrativeView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        let lines = self.visible_lines(usize::from(inner.height));
        let mut paragraph = Paragraph::new(lines);
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}
