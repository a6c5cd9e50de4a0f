//! The seam between the browser shell and the embedded rendering engine.
//!
//! `BrowserWindow` only talks to engine views through [`EngineView`], and only
//! learns about them through [`EngineEvent`]s. The `wry` implementation lives
//! in `ui::wry_view`; tests use a recording fake.

use crate::types::errors::EngineError;
use crate::types::tab::TabId;

/// Position and size of a view inside its window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Commands the shell forwards to one engine view.
pub trait EngineView {
    fn load_url(&self, url: &str) -> Result<(), EngineError>;
    /// Replaces the page with locally generated markup.
    fn load_html(&self, html: &str) -> Result<(), EngineError>;
    fn go_back(&self) -> Result<(), EngineError>;
    fn go_forward(&self) -> Result<(), EngineError>;
    fn reload(&self) -> Result<(), EngineError>;
    fn set_visible(&self, visible: bool) -> Result<(), EngineError>;
    fn set_bounds(&self, bounds: ViewBounds) -> Result<(), EngineError>;
    fn reset_zoom(&self) -> Result<(), EngineError>;
    fn scroll_to_top(&self) -> Result<(), EngineError>;
}

/// Creates engine views for new tabs.
pub trait ViewFactory {
    type View: EngineView;

    /// Creates a view for `tab` that starts loading `url` immediately.
    fn create_view(
        &mut self,
        tab: TabId,
        url: &str,
        bounds: ViewBounds,
    ) -> Result<Self::View, EngineError>;
}

/// Severity of a page console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warning,
    Error,
}

impl ConsoleLevel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "info" | "log" | "debug" => Some(ConsoleLevel::Info),
            "warn" | "warning" => Some(ConsoleLevel::Warning),
            "error" => Some(ConsoleLevel::Error),
            _ => None,
        }
    }
}

/// State changes reported by an engine view, delivered on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    LoadStarted { url: String },
    LoadProgress { progress: u8 },
    LoadFinished { url: String, ok: bool },
    UrlChanged { url: String },
    TitleChanged { title: String },
    IconChanged { href: Option<String> },
    ConsoleMessage {
        level: Option<ConsoleLevel>,
        message: String,
        source: String,
        line: u32,
    },
    /// The load probe could not reach the page of `generation`.
    LoadFailed { generation: u64, reason: String },
}

/// URL schemes engines use for their built-in network error pages.
const ENGINE_ERROR_PREFIXES: &[&str] = &["chrome-error://", "edge-error://", "about:neterror"];

/// True when the engine itself reports `url` as its error page.
pub fn is_engine_error_url(url: &str) -> bool {
    ENGINE_ERROR_PREFIXES.iter().any(|p| url.starts_with(p))
}
