//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! The scroll runtime, page and timeline are built once per layout and passed
//! explicitly to whatever needs them.

use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::engine::page::Page;
use crate::engine::runtime::ScrollRuntime;
use crate::narrative::document::Narrative;
use crate::narrative::layout::NarrativeLayout;
use crate::narrative::timeline::SectionTimeline;
use crate::ui::drawer::DrawerState;
use crate::ui::layout::AppLayout;

use super::page::TerminalPage;
use super::resize::ResizeGate;

/// Top-level application state.
pub struct AppState {
    pub narrative: Narrative,
    pub config: AppConfig,
    pub page: TerminalPage,
    pub timeline: SectionTimeline,
    pub runtime: ScrollRuntime,
    pub drawer: DrawerState,
    /// Full terminal area the current layout was built for.
    pub terminal_area: Rect,
    pub resize: ResizeGate,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Number of reloads performed (shown in debug logs).
    pub reloads: u32,
}

impl AppState {
    pub fn new(narrative: Narrative, config: AppConfig, terminal_area: Rect) -> Self {
        if narrative.title.is_empty() {
            tracing::warn!("narrative has no title block; skipping title banner");
        }

        let (page, mut timeline) = build_page(&narrative, &config, terminal_area);
        let runtime = ScrollRuntime::start(config.runtime_settings(), &page, &mut timeline);
        if !runtime.is_virtual() {
            tracing::info!("native scrolling active");
        }

        Self {
            narrative,
            resize: ResizeGate::new(terminal_area.width, terminal_area.height, config.px_per_row),
            config,
            page,
            timeline,
            runtime,
            drawer: DrawerState::default(),
            terminal_area,
            should_quit: false,
            status_message: None,
            reloads: 0,
        }
    }

    /// Rebuild page, timeline and runtime for a new terminal size, keeping the
    /// reader's position.
    pub fn reload(&mut self, terminal_area: Rect) {
        let offset = self.page.scroll_offset();
        let (mut page, mut timeline) = build_page(&self.narrative, &self.config, terminal_area);
        page.set_scroll_offset(offset);

        let mut runtime = ScrollRuntime::start(self.config.runtime_settings(), &page, &mut timeline);
        runtime.inherit(&self.runtime);
        self.runtime.stop();

        self.page = page;
        self.timeline = timeline;
        self.runtime = runtime;
        self.terminal_area = terminal_area;
        self.reloads += 1;
        tracing::debug!(
            reloads = self.reloads,
            width = terminal_area.width,
            height = terminal_area.height,
            "reloaded layout"
        );
    }

    /// Terminal resized.  Large changes schedule a debounced reload; small
    /// height changes only refresh the extent in place.
    pub fn on_resize(&mut self, width: u16, height: u16, now: Instant) {
        if self.resize.observe(width, height, now) || height == self.terminal_area.height {
            return;
        }
        let area = Rect::new(0, 0, width, height);
        let reader = AppLayout::from_area(area).reader_text_area();
        self.page.set_viewport_rows(reader.height);
        self.terminal_area = area;
        self.runtime.update(&self.page, &mut self.timeline);
        tracing::debug!(height, "viewport updated without reload");
    }

    /// Run one frame of the scroll pipeline, plus any due reload.
    pub fn on_frame(&mut self, now: Instant) {
        if let Some((width, height)) = self.resize.due(now) {
            self.reload(Rect::new(0, 0, width, height));
        }
        let Some(info) = self.runtime.frame(now, &mut self.page) else {
            return;
        };
        if info.delta > self.runtime.frame_interval() * 4 {
            tracing::debug!(
                frame = info.index,
                ms = info.delta.as_millis() as u64,
                "slow frame"
            );
        }
    }

    /// Index of the section at the top of the viewport.
    pub fn current_section(&self) -> Option<usize> {
        self.page.layout().section_at(self.page.offset_rows())
    }

    pub fn progress_percent(&self) -> f64 {
        crate::engine::progress::progress_percent(
            self.page.scroll_offset(),
            self.page.measurements().content_height(),
            self.page.viewport_height(),
        )
    }
}

/// Lay out the narrative for the reader area inside `terminal_area`.
fn build_page(narrative: &Narrative, config: &AppConfig, terminal_area: Rect) -> (TerminalPage, SectionTimeline) {
    let reader = AppLayout::from_area(terminal_area).reader_text_area();
    let viewport_rows = reader.height.max(1);
    let layout = NarrativeLayout::build(narrative, reader.width, usize::from(viewport_rows));
    let timeline = SectionTimeline::new(&layout, config.px_per_row);
    let page = TerminalPage::new(layout, viewport_rows, config.px_per_row, config.reduced_motion);
    (page, timeline)
}
