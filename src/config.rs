//! User configuration: key bindings and scroll engine tuning.
//!
//! Stored as a plain `key = value` text file at
//! `$XDG_CONFIG_HOME/scrollreel/config.toml` (default
//! `~/.config/scrollreel/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::animator::{OverlapPolicy, DEFAULT_SCROLL_DURATION};
use crate::engine::ease::{MAX_EASE, MIN_EASE};
use crate::engine::runtime::RuntimeSettings;
use crate::engine::scheduler::DEFAULT_FPS;
use crate::engine::smooth::{EngineProfile, EngineSettings};

// ───────────────────────────────────────── actions ───────────

/// Every bindable reader action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ToggleAutoScroll,
    SpeedUp,
    SpeedDown,
    Smoother,
    Sharper,
    OpenMenu,
    NextSection,
    PrevSection,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::ScrollDown,
        Action::ScrollUp,
        Action::PageDown,
        Action::PageUp,
        Action::ToggleAutoScroll,
        Action::SpeedUp,
        Action::SpeedDown,
        Action::Smoother,
        Action::Sharper,
        Action::OpenMenu,
        Action::NextSection,
        Action::PrevSection,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollDown => "scroll_down",
            Action::ScrollUp => "scroll_up",
            Action::PageDown => "page_down",
            Action::PageUp => "page_up",
            Action::ToggleAutoScroll => "toggle_autoscroll",
            Action::SpeedUp => "speed_up",
            Action::SpeedDown => "speed_down",
            Action::Smoother => "smoother",
            Action::Sharper => "sharper",
            Action::OpenMenu => "open_menu",
            Action::NextSection => "next_section",
            Action::PrevSection => "prev_section",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// Named keys shared by display, serialisation and parsing.
const NAMED_KEYS: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Up, "↑", "Up"),
    (KeyCode::Down, "↓", "Down"),
    (KeyCode::Left, "←", "Left"),
    (KeyCode::Right, "→", "Right"),
    (KeyCode::Enter, "Enter", "Enter"),
    (KeyCode::Esc, "Esc", "Esc"),
    (KeyCode::Tab, "Tab", "Tab"),
    (KeyCode::Home, "Home", "Home"),
    (KeyCode::End, "End", "End"),
    (KeyCode::PageUp, "PgUp", "PageUp"),
    (KeyCode::PageDown, "PgDn", "PageDown"),
    (KeyCode::Char(' '), "Space", "Space"),
];

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT take part in matching.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Short label for the status bar (e.g. `"↓"`, `"Ctrl+c"`).
    pub fn display(&self) -> String {
        self.render(|&(_, shown, _)| shown)
    }

    fn to_config_string(&self) -> String {
        self.render(|&(_, _, stored)| stored)
    }

    fn render(&self, pick: fn(&(KeyCode, &'static str, &'static str)) -> &'static str) -> String {
        let mut s = modifier_prefix(self.modifiers);
        match NAMED_KEYS.iter().find(|(code, _, _)| *code == self.code) {
            Some(entry) => s.push_str(pick(entry)),
            None => match self.code {
                KeyCode::Char(c) => s.push(c),
                KeyCode::F(n) => s.push_str(&format!("F{n}")),
                other => s.push_str(&format!("{other:?}")),
            },
        }
        s
    }

    /// Parse `"Ctrl+c"`, `"PageDown"`, `"+"`, `"Shift+N"`.
    fn parse(s: &str) -> Option<Self> {
        let mut rest = s.trim();
        let mut modifiers = KeyModifiers::NONE;
        loop {
            if let Some(tail) = strip_modifier(rest, "ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = tail;
            } else if let Some(tail) = strip_modifier(rest, "alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = tail;
            } else if let Some(tail) = strip_modifier(rest, "shift+") {
                modifiers |= KeyModifiers::SHIFT;
                rest = tail;
            } else {
                break;
            }
        }

        let lower = rest.to_lowercase();
        if let Some((code, _, _)) = NAMED_KEYS
            .iter()
            .find(|(_, _, stored)| stored.to_lowercase() == lower)
        {
            return Some(KeyBind::new(*code, modifiers));
        }
        let code = match lower.as_str() {
            "return" => KeyCode::Enter,
            "escape" => KeyCode::Esc,
            "pgup" => KeyCode::PageUp,
            "pgdn" => KeyCode::PageDown,
            f if f.starts_with('f') && f.len() > 1 => KeyCode::F(f[1..].parse().ok()?),
            _ => {
                let mut chars = rest.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };
        Some(KeyBind::new(code, modifiers))
    }
}

/// Case-insensitive modifier prefix strip.  A lone `"+"` after the prefix is
/// the key itself, so the tail must be non-empty.
fn strip_modifier<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    let tail = &s[prefix.len()..];
    (head.eq_ignore_ascii_case(prefix) && !tail.is_empty()).then_some(tail)
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

// ───────────────────────────────────────── config ────────────

/// Reader configuration: bindings plus engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub profile: EngineProfile,
    /// `None` uses the profile's default.
    pub ease_factor: Option<f64>,
    /// `None` uses the profile's default.
    pub wheel_sensitivity: Option<f64>,
    pub scroll_duration_ms: u64,
    pub overlap_policy: OverlapPolicy,
    /// Report a reduced-motion preference to the engine.
    pub reduced_motion: bool,
    /// Page pixels per text row.
    pub px_per_row: f64,
    /// Raw wheel delta of one mouse-wheel notch, in pixels.
    pub wheel_line_px: f64,
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            profile: EngineProfile::default(),
            ease_factor: None,
            wheel_sensitivity: None,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION.as_millis() as u64,
            overlap_policy: OverlapPolicy::default(),
            reduced_motion: false,
            px_per_row: 16.0,
            wheel_line_px: 100.0,
            fps: DEFAULT_FPS,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let key = |c: char| KeyBind::new(KeyCode::Char(c), n);
        let mut m = HashMap::new();

        m.insert(Action::ScrollDown, vec![KeyBind::new(KeyCode::Down, n), key('j')]);
        m.insert(Action::ScrollUp, vec![KeyBind::new(KeyCode::Up, n), key('k')]);
        m.insert(Action::PageDown, vec![KeyBind::new(KeyCode::PageDown, n), key(' ')]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(Action::ToggleAutoScroll, vec![key('p')]);
        m.insert(Action::SpeedUp, vec![key('+'), key('=')]);
        m.insert(Action::SpeedDown, vec![key('-')]);
        m.insert(Action::Smoother, vec![key('[')]);
        m.insert(Action::Sharper, vec![key(']')]);
        m.insert(Action::OpenMenu, vec![key('m'), KeyBind::new(KeyCode::Tab, n)]);
        m.insert(Action::NextSection, vec![key('n')]);
        m.insert(
            Action::PrevSection,
            vec![KeyBind::new(KeyCode::Char('N'), shift), key('N')],
        );
        m.insert(Action::Quit, vec![key('q')]);

        m
    }

    /// Action bound to `event`.  The binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Bind `bind` to `action`, taking it away from whatever held it before.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Apply an `action=Key` override such as `quit=Ctrl+q`.
    pub fn apply_binding_override(&mut self, spec: &str) -> anyhow::Result<()> {
        let (action, key) = spec
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected action=Key, got {spec:?}"))?;
        let action = Action::from_config_key(action.trim())
            .ok_or_else(|| anyhow::anyhow!("unknown action {:?}", action.trim()))?;
        let bind = KeyBind::parse(key).ok_or_else(|| anyhow::anyhow!("unrecognised key {:?}", key.trim()))?;
        self.add_binding(action, bind);
        Ok(())
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: play | {}/{}: speed | {}: sections | {}: quit",
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ToggleAutoScroll),
            self.short_binding(Action::SpeedUp),
            self.short_binding(Action::SpeedDown),
            self.short_binding(Action::OpenMenu),
            self.short_binding(Action::Quit),
        )
    }

    /// Engine/runtime settings derived from this config.
    pub fn runtime_settings(&self) -> RuntimeSettings {
        let mut engine = EngineSettings::for_profile(self.profile);
        if let Some(ease) = self.ease_factor {
            engine.ease = ease;
        }
        if let Some(sensitivity) = self.wheel_sensitivity {
            engine.wheel_sensitivity = sensitivity;
        }
        RuntimeSettings {
            engine,
            overlap: self.overlap_policy,
            scroll_duration: Duration::from_millis(self.scroll_duration_ms),
            fps: self.fps,
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from disk, falling back to defaults for anything missing.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Self::parse(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "profile" => {
                    if let Ok(p) = value.parse() {
                        config.profile = p;
                    }
                }
                "ease_factor" => {
                    config.ease_factor = value.parse::<f64>().ok().map(|v| v.clamp(MIN_EASE, MAX_EASE));
                }
                "wheel_sensitivity" => {
                    config.wheel_sensitivity = value.parse::<f64>().ok().map(|v| v.clamp(0.1, 10.0));
                }
                "scroll_duration_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.scroll_duration_ms = v.min(60_000);
                    }
                }
                "overlap_policy" => {
                    if let Ok(p) = value.parse() {
                        config.overlap_policy = p;
                    }
                }
                "reduced_motion" => config.reduced_motion = value == "true",
                "px_per_row" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.px_per_row = v.clamp(1.0, 128.0);
                    }
                }
                "wheel_line_px" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.wheel_line_px = v.clamp(1.0, 1000.0);
                    }
                }
                "fps" => {
                    if let Ok(v) = value.parse::<u32>() {
                        config.fps = v.clamp(10, 240);
                    }
                }
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        tracing::debug!(key, "ignoring unknown config key");
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        config.bindings.insert(action, parsed);
                    }
                }
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# scrollreel configuration".to_string(),
            String::new(),
            "# Scroll engine".to_string(),
            format!("profile = {}", self.profile.label()),
        ];
        if let Some(ease) = self.ease_factor {
            lines.push(format!("ease_factor = {ease}"));
        }
        if let Some(sensitivity) = self.wheel_sensitivity {
            lines.push(format!("wheel_sensitivity = {sensitivity}"));
        }
        lines.extend([
            format!("scroll_duration_ms = {}", self.scroll_duration_ms),
            format!("overlap_policy = {}", self.overlap_policy.label()),
            format!("reduced_motion = {}", self.reduced_motion),
            format!("px_per_row = {}", self.px_per_row),
            format!("wheel_line_px = {}", self.wheel_line_px),
            format!("fps = {}", self.fps),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ]);

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `$XDG_CONFIG_HOME/scrollreel/config.toml`.
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("scrollreel").join("config.toml")
}
