//! Shortcut Manager for Clow Browser.
//!
//! Manages keyboard shortcut bindings with conflict detection
//! and platform-specific modifier key adaptation.

use std::collections::HashMap;
use std::str::FromStr;

use crate::types::errors::ShortcutError;
use crate::types::settings::BrowserSettings;

/// Browser actions reachable from the keyboard, toolbar or menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NewTab,
    CloseTab,
    Reload,
    FocusAddressBar,
    Back,
    Forward,
    Home,
    NewWindow,
    CloseWindow,
}

impl FromStr for Action {
    type Err = ShortcutError;

    /// Parses a settings action name. `_alt` suffixes bind a second key
    /// combination to the same action.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim_end_matches("_alt") {
            "new_tab" => Ok(Action::NewTab),
            "close_tab" => Ok(Action::CloseTab),
            "reload" => Ok(Action::Reload),
            "address_bar" => Ok(Action::FocusAddressBar),
            "back" => Ok(Action::Back),
            "forward" => Ok(Action::Forward),
            "home" => Ok(Action::Home),
            "new_window" => Ok(Action::NewWindow),
            "close_window" => Ok(Action::CloseWindow),
            _ => Err(ShortcutError::UnknownAction(name.to_string())),
        }
    }
}

/// Trait defining shortcut management operations.
pub trait ShortcutManagerTrait {
    fn register_shortcut(&mut self, action: &str, keys: &str) -> Result<(), ShortcutError>;
    fn unregister_shortcut(&mut self, action: &str) -> Result<(), ShortcutError>;
    fn get_shortcut(&self, action: &str) -> Option<&str>;
    fn list_shortcuts(&self) -> &HashMap<String, String>;
    fn reset_to_defaults(&mut self);
    fn has_conflict(&self, keys: &str, exclude_action: Option<&str>) -> Option<String>;
    fn resolve(&self, keys: &str) -> Option<Action>;
    fn bound_keys(&self) -> Vec<String>;
}

/// Shortcut manager with in-memory storage and platform adaptation.
pub struct ShortcutManager {
    shortcuts: HashMap<String, String>,
}

impl ShortcutManager {
    pub fn new() -> Self {
        Self {
            shortcuts: Self::default_shortcuts(),
        }
    }

    /// Builds a manager from the `shortcuts` settings section. Entries with
    /// unknown actions, empty keys or conflicting keys are skipped.
    pub fn from_settings(bindings: &HashMap<String, String>) -> Self {
        let mut mgr = Self {
            shortcuts: HashMap::new(),
        };
        let mut entries: Vec<_> = bindings.iter().collect();
        entries.sort();
        for (action, keys) in entries {
            if let Err(e) = mgr.register_shortcut(action, keys) {
                tracing::warn!(action = %action, keys = %keys, "ignoring shortcut: {}", e);
            }
        }
        mgr
    }

    fn default_shortcuts() -> HashMap<String, String> {
        BrowserSettings::default_shortcuts()
            .into_iter()
            .map(|(a, k)| (a, Self::adapt_for_platform(&k)))
            .collect()
    }

    /// Adapts modifier keys for the current platform.
    fn adapt_for_platform(keys: &str) -> String {
        if cfg!(target_os = "macos") {
            keys.replace("Ctrl+", "Cmd+")
        } else {
            keys.to_string()
        }
    }

    /// Lowercases for comparison so "ctrl+t" and "Ctrl+T" match.
    fn normalize(keys: &str) -> String {
        Self::adapt_for_platform(keys).to_ascii_lowercase()
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutManagerTrait for ShortcutManager {
    fn register_shortcut(&mut self, action: &str, keys: &str) -> Result<(), ShortcutError> {
        if keys.trim().is_empty() {
            return Err(ShortcutError::InvalidKeys("Keys cannot be empty".to_string()));
        }
        action.parse::<Action>()?;

        if let Some(conflicting_action) = self.has_conflict(keys, Some(action)) {
            return Err(ShortcutError::Conflict(format!(
                "'{}' is already bound to '{}'",
                keys, conflicting_action
            )));
        }

        let adapted = Self::adapt_for_platform(keys);
        self.shortcuts.insert(action.to_string(), adapted);
        Ok(())
    }

    fn unregister_shortcut(&mut self, action: &str) -> Result<(), ShortcutError> {
        self.shortcuts
            .remove(action)
            .map(|_| ())
            .ok_or_else(|| ShortcutError::NotFound(action.to_string()))
    }

    fn get_shortcut(&self, action: &str) -> Option<&str> {
        self.shortcuts.get(action).map(|s| s.as_str())
    }

    fn list_shortcuts(&self) -> &HashMap<String, String> {
        &self.shortcuts
    }

    fn reset_to_defaults(&mut self) {
        self.shortcuts = Self::default_shortcuts();
    }

    fn has_conflict(&self, keys: &str, exclude_action: Option<&str>) -> Option<String> {
        let wanted = Self::normalize(keys);
        self.shortcuts
            .iter()
            .filter(|(action, _)| Some(action.as_str()) != exclude_action)
            .find(|(_, bound)| bound.to_ascii_lowercase() == wanted)
            .map(|(action, _)| action.clone())
    }

    /// Maps a key combination reported by a webview to its action.
    fn resolve(&self, keys: &str) -> Option<Action> {
        let wanted = Self::normalize(keys);
        self.shortcuts
            .iter()
            .find(|(_, bound)| bound.to_ascii_lowercase() == wanted)
            .and_then(|(action, _)| action.parse().ok())
    }

    fn bound_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.shortcuts.values().cloned().collect();
        keys.sort();
        keys
    }
}
