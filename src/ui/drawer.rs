//! Menu drawer overlay listing the narrative's sections.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, StatefulWidget, Widget},
};

use crate::narrative::layout::SectionSpan;

use super::theme::Theme;

/// Rows above the first item: top border and a blank line.
pub const ITEMS_TOP: u16 = 2;
/// Rows below the last item: blank line, hint and bottom border.
const ITEMS_BOTTOM: u16 = 3;

/// Open flag, selection and scroll offset of the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawerState {
    pub open: bool,
    /// Index of the highlighted section.
    pub selected: usize,
    /// First section shown in the list.
    pub offset: usize,
}

impl DrawerState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.selected < max - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Ensure the selected item is visible within `height` item rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

/// Number of section rows that fit in a drawer of this size.
pub fn item_rows(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(ITEMS_TOP + ITEMS_BOTTOM))
}

pub struct MenuDrawer<'a> {
    pub sections: &'a [SectionSpan],
    /// Section currently at the top of the reader.
    pub current: Option<usize>,
}

impl<'a> MenuDrawer<'a> {
    fn item_line(&self, idx: usize, selected: usize, section: &'a SectionSpan) -> Line<'a> {
        let prefix = if idx == selected { " ▸ " } else { "   " };
        let style = if idx == selected {
            Theme::selected_style()
        } else if section.pinned {
            Theme::pinned_heading_style()
        } else {
            Theme::text_style()
        };
        let mut spans = vec![Span::styled(format!("{prefix}{}", section.title), style)];
        if self.current == Some(idx) {
            spans.push(Span::styled("  •", Theme::autoscroll_style()));
        }
        Line::from(spans)
    }
}

impl<'a> StatefulWidget for MenuDrawer<'a> {
    type State = DrawerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut DrawerState) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(" Sections ")
            .title_style(Theme::heading_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_style());

        let height = item_rows(area);
        state.clamp_scroll(height);

        // Blank line under the border; the mouse handler relies on it.
        let mut lines = vec![Line::raw("")];
        lines.extend(
            self.sections
                .iter()
                .enumerate()
                .skip(state.offset)
                .take(height)
                .map(|(idx, section)| self.item_line(idx, state.selected, section)),
        );
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "   Enter: go  Esc: close",
            Theme::hidden_text_style(),
        )));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
