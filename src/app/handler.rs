//! Input handling: maps key and mouse events to scroll runtime calls.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::engine::input::{TouchPoint, WheelInput};
use crate::engine::page::Page;
use crate::ui::drawer::{item_rows, ITEMS_TOP};
use crate::ui::layout::{contains, AppLayout};

use super::state::AppState;

/// Fraction of the viewport moved by page up/down.
const PAGE_FRACTION: f64 = 0.9;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, _now: Instant) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.drawer.open {
        handle_drawer_key(state, key);
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let wheel_step = state.config.wheel_line_px * wheel_sensitivity(state);
    match action {
        Action::Quit => state.should_quit = true,
        Action::ScrollDown => state.runtime.scroll_by(wheel_step, &mut state.page),
        Action::ScrollUp => state.runtime.scroll_by(-wheel_step, &mut state.page),
        Action::PageDown => {
            let delta = state.page.viewport_height() * PAGE_FRACTION;
            state.runtime.scroll_by(delta, &mut state.page);
        }
        Action::PageUp => {
            let delta = state.page.viewport_height() * PAGE_FRACTION;
            state.runtime.scroll_by(-delta, &mut state.page);
        }
        Action::ToggleAutoScroll => {
            let enabled = state.runtime.autoscroll_mut().toggle();
            state.status_message = Some(if enabled { "Auto-scroll on".into() } else { "Auto-scroll off".into() });
        }
        Action::SpeedUp => {
            if state.runtime.autoscroll_mut().increase_speed() {
                state.status_message = Some(speed_message(state));
            }
        }
        Action::SpeedDown => {
            if state.runtime.autoscroll_mut().decrease_speed() {
                state.status_message = Some(speed_message(state));
            }
        }
        Action::Smoother => adjust_smoothing(state, true),
        Action::Sharper => adjust_smoothing(state, false),
        Action::OpenMenu => {
            state.drawer.open = true;
            state.drawer.selected = state.current_section().unwrap_or(0);
            let rows = item_rows(AppLayout::from_area(state.terminal_area).drawer_area());
            state.drawer.clamp_scroll(rows);
        }
        Action::NextSection => {
            let next = state.current_section().map_or(0, |i| i + 1);
            navigate_to_section(state, next);
        }
        Action::PrevSection => {
            if let Some(prev) = previous_section(state) {
                navigate_to_section(state, prev);
            }
        }
    }
}

fn handle_drawer_key(state: &mut AppState, key: KeyEvent) {
    let count = state.page.layout().sections.len();
    match key.code {
        KeyCode::Esc => state.drawer.open = false,
        KeyCode::Up | KeyCode::Char('k') => state.drawer.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.drawer.select_next(count),
        KeyCode::Enter => {
            let selected = state.drawer.selected;
            navigate_to_section(state, selected);
        }
        _ => {
            if matches!(state.config.match_key(key), Some(Action::OpenMenu | Action::Quit)) {
                state.drawer.open = false;
            }
        }
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let layout = AppLayout::from_area(state.terminal_area);

    if state.drawer.open {
        handle_drawer_mouse(state, &layout, mouse);
        return;
    }
    if !contains(layout.reader_area, mouse.column, mouse.row) {
        // A drag that leaves the reader still has to end.
        if let MouseEventKind::Up(MouseButton::Left) = mouse.kind {
            state.runtime.touch_end(now);
        }
        return;
    }

    let touch = [TouchPoint {
        y: f64::from(mouse.row) * state.page.px_per_row(),
    }];
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            let event = WheelInput { delta_y: state.config.wheel_line_px };
            state.runtime.wheel(event, now, &mut state.page);
        }
        MouseEventKind::ScrollUp => {
            let event = WheelInput { delta_y: -state.config.wheel_line_px };
            state.runtime.wheel(event, now, &mut state.page);
        }
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            state.runtime.touch_move(&touch, &mut state.page);
        }
        MouseEventKind::Up(MouseButton::Left) => state.runtime.touch_end(now),
        _ => {}
    }
}

fn handle_drawer_mouse(state: &mut AppState, layout: &AppLayout, mouse: MouseEvent) {
    let drawer = layout.drawer_area();
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !contains(drawer, mouse.column, mouse.row) {
                state.drawer.open = false;
                return;
            }
            let rows = item_rows(drawer);
            state.drawer.clamp_scroll(rows);
            let first_item_row = drawer.y + ITEMS_TOP;
            if mouse.row < first_item_row {
                return;
            }
            let row = usize::from(mouse.row - first_item_row);
            if row >= rows {
                return;
            }
            let idx = row + state.drawer.offset;
            if idx < state.page.layout().sections.len() {
                state.drawer.selected = idx;
                navigate_to_section(state, idx);
            }
        }
        MouseEventKind::ScrollDown => {
            let count = state.page.layout().sections.len();
            state.drawer.select_next(count);
        }
        MouseEventKind::ScrollUp => state.drawer.select_prev(),
        _ => {}
    }
}

// ── Navigation ──────────────────────────────────────────────────

/// Close the drawer and start the animated scroll to section `idx`.
fn navigate_to_section(state: &mut AppState, idx: usize) {
    state.drawer.open = false;
    let Some(section) = state.page.layout().sections.get(idx) else {
        return;
    };
    let href = format!("#{}", section.anchor);
    navigate_href(state, &href);
}

/// Follow an in-page link.  Bare `#` and unknown anchors are skipped.
pub fn navigate_href(state: &mut AppState, href: &str) {
    let anchor = match crate::engine::navigation::parse_anchor_href(href) {
        Ok(Some(anchor)) => anchor,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!("{e}");
            return;
        }
    };
    match state.runtime.navigate(anchor, &state.page, &state.timeline) {
        Ok(_) => {
            let title = state
                .narrative
                .section_by_anchor(anchor)
                .map(|section| section.title.clone())
                .unwrap_or_default();
            state.status_message = Some(format!("→ {title}"));
        }
        Err(e) => {
            tracing::warn!("navigation skipped: {e}");
            state.status_message = Some(e.to_string());
        }
    }
}

/// Start of the current section when we are well inside it, else the one before.
fn previous_section(state: &AppState) -> Option<usize> {
    let current = state.current_section()?;
    let layout = state.page.layout();
    let start = layout.anchor_row(&layout.sections[current].anchor)? as f64;
    if state.page.offset_rows() - start > 1.0 {
        Some(current)
    } else {
        current.checked_sub(1)
    }
}

fn wheel_sensitivity(state: &AppState) -> f64 {
    state
        .runtime
        .engine()
        .map_or(1.0, |engine| engine.input().wheel_sensitivity())
}

fn adjust_smoothing(state: &mut AppState, smoother: bool) {
    let Some(engine) = state.runtime.engine_mut() else {
        return;
    };
    let ease = engine.ease_mut();
    if smoother {
        ease.increase_smoothing();
    } else {
        ease.decrease_smoothing();
    }
    state.status_message = Some(format!("Ease factor {:.3}", ease.ease()));
}

fn speed_message(state: &AppState) -> String {
    let driver = state.runtime.autoscroll();
    format!("Speed {} ({:.2} px/frame)", driver.speed_step(), driver.speed())
}
