//! A terminal reader for long-form narratives with virtual smooth scrolling.
//!
//! Run the binary with a narrative file to open it.  Wheel, drag and keys
//! feed an eased scroll engine; sections can be jumped to from the menu
//! drawer and the page can scroll itself at a chosen speed.

mod app;
mod config;
mod engine;
mod narrative;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Padding},
    Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::engine::ease::{MAX_EASE, MIN_EASE};
use crate::narrative::document::Narrative;
use crate::ui::{
    drawer::MenuDrawer, layout::AppLayout, progress::ProgressBar, reader::NarrativeView, status::StatusBar,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Smooth-scrolling terminal reader for long-form narratives")]
struct Cli {
    /// Narrative file to open.
    path: PathBuf,

    /// Scroll engine: `enhanced` or `wheel`.
    #[arg(long)]
    profile: Option<String>,

    /// Ease factor (fraction of the remaining distance covered per frame).
    #[arg(long)]
    ease: Option<f64>,

    /// Duration of animated section jumps, in milliseconds.
    #[arg(long = "duration-ms")]
    duration_ms: Option<u64>,

    /// Behave as if the user asked for reduced motion.
    #[arg(long)]
    reduced_motion: bool,

    /// What a new section jump does to one still running: `cancel` or `overlap`.
    #[arg(long)]
    overlap: Option<String>,

    /// Frame rate of the scroll loop.
    #[arg(long)]
    fps: Option<u32>,

    /// Override a key binding for this run, e.g. `--bind quit=Ctrl+q`.
    #[arg(long = "bind", value_name = "ACTION=KEY")]
    bindings: Vec<String>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(profile) = &self.profile {
            config.profile = profile
                .parse()
                .map_err(|()| anyhow::anyhow!("unknown profile {profile:?} (expected enhanced or wheel)"))?;
        }
        if let Some(ease) = self.ease {
            config.ease_factor = Some(ease.clamp(MIN_EASE, MAX_EASE));
        }
        if let Some(ms) = self.duration_ms {
            config.scroll_duration_ms = ms;
        }
        if self.reduced_motion {
            config.reduced_motion = true;
        }
        if let Some(overlap) = &self.overlap {
            config.overlap_policy = overlap
                .parse()
                .map_err(|()| anyhow::anyhow!("unknown overlap policy {overlap:?} (expected cancel or overlap)"))?;
        }
        if let Some(fps) = self.fps {
            config.fps = fps.clamp(10, 240);
        }
        for spec in &self.bindings {
            config.apply_binding_override(spec)?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut user_config = AppConfig::load();
    cli.apply(&mut user_config)?;
    if cli.write_config {
        user_config.save()?;
        println!("{}", config::config_path().display());
        return Ok(());
    }

    let narrative =
        Narrative::load(&cli.path).with_context(|| format!("failed to open {}", cli.path.display()))?;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let area = ratatui::layout::Rect::new(0, 0, size.width, size.height);
    let mut state = AppState::new(narrative, user_config, area);

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(state.runtime.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            let reader = NarrativeView::new(state.page.layout(), state.page.offset_rows())
                .block(Block::default().padding(Padding::horizontal(2)));
            frame.render_widget(reader, layout.reader_area);

            frame.render_widget(
                ProgressBar {
                    percent: state.progress_percent(),
                },
                layout.progress_area,
            );

            let hint = state.config.status_bar_hint();
            frame.render_widget(
                StatusBar {
                    message: state.status_message.as_deref().unwrap_or(&hint),
                    runtime: &state.runtime,
                    percent: state.progress_percent(),
                },
                layout.status_area,
            );

            if state.drawer.open {
                let drawer = MenuDrawer {
                    sections: &state.page.layout().sections,
                    current: state.current_section(),
                };
                frame.render_stateful_widget(drawer, layout.drawer_area(), &mut state.drawer);
            }
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                let now = Instant::now();
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k, now),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m, now),
                    AppEvent::Resize(w, h) => state.on_resize(w, h, now),
                }
            }

            _ = frames.tick() => {
                state.on_frame(Instant::now());
            }
        }

        if state.should_quit {
            break;
        }
    }

    state.runtime.stop();

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    Ok(())
}
