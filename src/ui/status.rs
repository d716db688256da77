//! Bottom status bar: hint or message on the left, engine readout on the right.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::engine::runtime::ScrollRuntime;

use super::theme::Theme;

pub struct StatusBar<'a> {
    pub message: &'a str,
    pub runtime: &'a ScrollRuntime,
    pub percent: f64,
}

impl<'a> StatusBar<'a> {
    /// Right-hand readout, e.g. `▶ 3 · enhanced 0.080 · jump · 42%`.
    pub fn readout(&self) -> Line<'static> {
        let autoscroll = self.runtime.autoscroll();
        let play = if autoscroll.is_enabled() { "▶" } else { "⏸" };
        let mut spans = vec![Span::styled(
            format!("{play} {}", autoscroll.speed_step()),
            Theme::autoscroll_style(),
        )];

        match self.runtime.engine() {
            Some(engine) => {
                spans.push(Span::raw(format!(
                    " · {} {:.3}",
                    engine.profile().label(),
                    engine.ease().ease()
                )));
            }
            None => spans.push(Span::raw(" · native")),
        }
        spans.push(Span::raw(format!(" · {}", self.runtime.mode().label())));
        if self.runtime.is_scrolling() {
            spans.push(Span::raw(" ⇅"));
        }
        spans.push(Span::raw(format!(" · {:>3.0}% ", self.percent)));
        Line::from(spans)
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let readout = self.readout();
        let readout_width = u16::try_from(readout.width()).unwrap_or(area.width);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(readout_width)])
            .split(area);

        Paragraph::new(format!(" {}", self.message))
            .style(Theme::status_bar_style())
            .render(chunks[0], buf);
        Paragraph::new(readout)
            .style(Theme::status_bar_style())
            .render(chunks[1], buf);
    }
}
