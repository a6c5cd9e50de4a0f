use serde::{Deserialize, Serialize};

use super::tab::TabId;

/// Everything the chrome webview needs to redraw itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromeSnapshot {
    pub window_title: String,
    pub address_bar: String,
    pub tabs: Vec<TabStripItem>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// `Some` while the active tab is loading; the progress bar is hidden otherwise.
    pub progress: Option<u8>,
    /// One-shot status bar message, cleared once rendered.
    pub status: Option<StatusMessage>,
}

/// One entry of the tab strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabStripItem {
    pub id: TabId,
    pub label: String,
    pub tooltip: String,
    pub favicon: Option<String>,
    pub loading: bool,
    pub active: bool,
}

/// Status bar text, optionally cleared after `timeout_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub timeout_ms: Option<u32>,
}

impl StatusMessage {
    pub fn sticky(text: impl Into<String>) -> Self {
        Self { text: text.into(), timeout_ms: None }
    }

    pub fn timed(text: impl Into<String>, timeout_ms: u32) -> Self {
        Self { text: text.into(), timeout_ms: Some(timeout_ms) }
    }
}
