//! Theme Engine: dark/light/system palettes, accent color, and CSS variables
//! for the chrome webview and the load-error page.

use std::collections::BTreeMap;

use crate::types::errors::ThemeError;
use crate::types::settings::ThemeMode;

/// Trait defining the theme engine interface.
pub trait ThemeEngineTrait {
    fn set_theme(&mut self, mode: ThemeMode);
    fn get_theme(&self) -> &ThemeMode;
    fn set_accent_color(&mut self, color: &str) -> Result<(), ThemeError>;
    fn get_accent_color(&self) -> &str;
    fn detect_system_theme(&self) -> ThemeMode;
    fn get_css_variables(&self) -> BTreeMap<String, String>;
}

/// One set of chrome colors.
struct Palette {
    window_bg: &'static str,
    toolbar_bg: &'static str,
    tab_bg: &'static str,
    tab_hover_bg: &'static str,
    pressed_bg: &'static str,
    text: &'static str,
    text_muted: &'static str,
    border: &'static str,
    input_bg: &'static str,
    error_text: &'static str,
}

/// Charcoal palette with a blue focus color.
const DARK: Palette = Palette {
    window_bg: "#202124",
    toolbar_bg: "#2d2e30",
    tab_bg: "#2d2e30",
    tab_hover_bg: "#3c4043",
    pressed_bg: "#5f6368",
    text: "#e8eaed",
    text_muted: "#9aa0a6",
    border: "#3c4043",
    input_bg: "#3c4043",
    error_text: "#f28b82",
};

/// Light window with a slate toolbar.
const LIGHT: Palette = Palette {
    window_bg: "#f5f5f5",
    toolbar_bg: "#2c3e50",
    tab_bg: "#34495e",
    tab_hover_bg: "#3d566e",
    pressed_bg: "#1a2a3a",
    text: "#ecf0f1",
    text_muted: "#bdc3c7",
    border: "#1a2a3a",
    input_bg: "#ffffff",
    error_text: "#c0392b",
};

const FONT_STACK: &str = "'Segoe UI', Arial, sans-serif";

/// Validates a hex color string (e.g. "#8ab4f8" or "#fff").
fn is_valid_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// The theme engine implementation.
pub struct ThemeEngine {
    current_theme: ThemeMode,
    accent_color: String,
}

impl ThemeEngine {
    /// Creates a new ThemeEngine with the given initial mode and default accent color.
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            current_theme: mode,
            accent_color: "#8ab4f8".to_string(),
        }
    }

    /// Returns the effective theme, resolving `System` to a concrete mode.
    pub fn effective_theme(&self) -> ThemeMode {
        match &self.current_theme {
            ThemeMode::System => self.detect_system_theme(),
            other => other.clone(),
        }
    }

    fn palette(&self) -> &'static Palette {
        match self.effective_theme() {
            ThemeMode::Light => &LIGHT,
            _ => &DARK,
        }
    }

    /// Renders the variables as a `:root { ... }` block.
    pub fn css_root_block(&self) -> String {
        let body: String = self
            .get_css_variables()
            .iter()
            .map(|(k, v)| format!("{}:{};", k, v))
            .collect();
        format!(":root{{{}}}", body)
    }
}

impl ThemeEngineTrait for ThemeEngine {
    fn set_theme(&mut self, mode: ThemeMode) {
        self.current_theme = mode;
    }

    fn get_theme(&self) -> &ThemeMode {
        &self.current_theme
    }

    fn set_accent_color(&mut self, color: &str) -> Result<(), ThemeError> {
        if !is_valid_hex_color(color) {
            return Err(ThemeError::InvalidColor(color.to_string()));
        }
        self.accent_color = color.to_string();
        Ok(())
    }

    fn get_accent_color(&self) -> &str {
        &self.accent_color
    }

    fn detect_system_theme(&self) -> ThemeMode {
        // No portable "prefers dark" query without a running toolkit; GTK_THEME
        // is the one hint available before the event loop starts.
        if let Ok(gtk_theme) = std::env::var("GTK_THEME") {
            if gtk_theme.to_lowercase().contains("dark") {
                return ThemeMode::Dark;
            }
            return ThemeMode::Light;
        }
        ThemeMode::Dark
    }

    fn get_css_variables(&self) -> BTreeMap<String, String> {
        let p = self.palette();
        [
            ("--window-bg", p.window_bg),
            ("--toolbar-bg", p.toolbar_bg),
            ("--tab-bg", p.tab_bg),
            ("--tab-hover-bg", p.tab_hover_bg),
            ("--pressed-bg", p.pressed_bg),
            ("--text", p.text),
            ("--text-muted", p.text_muted),
            ("--border", p.border),
            ("--input-bg", p.input_bg),
            ("--error-text", p.error_text),
            ("--accent", self.accent_color.as_str()),
            ("--font", FONT_STACK),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}
