//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

/// Width of the menu drawer when open.
pub const DRAWER_WIDTH: u16 = 34;

/// Reader pane, reading-progress bar and bottom status bar.
pub struct AppLayout {
    pub reader_area: Rect,
    pub progress_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // reader (takes all remaining space)
                Constraint::Length(1), // progress bar
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            reader_area: chunks[0],
            progress_area: chunks[1],
            status_area: chunks[2],
        }
    }

    /// Reader area minus side padding: where text rows are drawn.
    pub fn reader_text_area(&self) -> Rect {
        self.reader_area.inner(Margin {
            horizontal: 2,
            vertical: 0,
        })
    }

    /// Drawer overlay anchored to the left edge of the reader.
    pub fn drawer_area(&self) -> Rect {
        let width = DRAWER_WIDTH.min(self.reader_area.width);
        Rect::new(self.reader_area.x, self.reader_area.y, width, self.reader_area.height)
    }
}

/// Is the cell at (`col`, `row`) inside `area`?
pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}
