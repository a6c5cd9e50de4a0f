use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::managers::navigation_history::NavigationHistory;

/// Opaque handle for a tab and the engine view it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a tab came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabOrigin {
    /// Toolbar button, menu entry or keyboard shortcut.
    User,
    /// The page asked the engine for a new window.
    Popup,
    /// First tab of a freshly opened window.
    WindowStart,
}

/// Load state as last reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Idle,
    Loading { progress: u8 },
    Loaded,
    Failed,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }
}

/// A browser tab: the application's copy of what its engine view last reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub favicon: Option<String>,
    pub load: LoadState,
    /// Set while the static error page replaces a failed load.
    pub failed_url: Option<String>,
    /// Bumped on every top-level navigation; probe results for older
    /// generations are ignored.
    pub load_generation: u64,
    pub history: NavigationHistory,
    pub origin: TabOrigin,
    pub created_at: i64,
}

impl Tab {
    pub fn new(id: TabId, url: &str, origin: TabOrigin, created_at: i64) -> Self {
        Self {
            id,
            url: url.to_string(),
            title: String::new(),
            favicon: None,
            load: LoadState::Loading { progress: 0 },
            failed_url: None,
            load_generation: 0,
            history: NavigationHistory::new(),
            origin,
            created_at,
        }
    }

    /// True while the static error page is displayed.
    pub fn shows_error_page(&self) -> bool {
        self.failed_url.is_some()
    }

    /// The URL the address bar should show for this tab.
    pub fn address_url(&self) -> &str {
        self.failed_url.as_deref().unwrap_or(&self.url)
    }
}
