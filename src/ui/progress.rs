//! Reading-progress bar: a one-row gauge whose filled width follows the
//! scroll percentage.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::theme::Theme;

const FILL: &str = "━";
const TRACK: &str = "─";

pub struct ProgressBar {
    /// Percentage in `[0, 100]`.
    pub percent: f64,
}

impl ProgressBar {
    /// Number of filled cells for a bar `width` cells wide.
    pub fn filled_cells(&self, width: u16) -> u16 {
        let fraction = (self.percent / 100.0).clamp(0.0, 1.0);
        (f64::from(width) * fraction).round() as u16
    }
}

impl Widget for ProgressBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let filled = self.filled_cells(area.width);
        for x in 0..area.width {
            let (symbol, style) = if x < filled {
                (FILL, Theme::progress_fill_style())
            } else {
                (TRACK, Theme::progress_track_style())
            };
            buf[(area.x + x, area.y)].set_symbol(symbol).set_style(style);
        }
    }
}
