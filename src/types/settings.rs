use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level browser settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrowserSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default = "BrowserSettings::default_shortcuts")]
    pub shortcuts: HashMap<String, String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            appearance: AppearanceSettings::default(),
            window: WindowSettings::default(),
            engine: EngineSettings::default(),
            shortcuts: Self::default_shortcuts(),
        }
    }
}

impl BrowserSettings {
    /// Returns the default keyboard shortcuts, before platform adaptation.
    pub fn default_shortcuts() -> HashMap<String, String> {
        [
            ("new_tab", "Ctrl+T"),
            ("close_tab", "Ctrl+W"),
            ("reload", "F5"),
            ("reload_alt", "Ctrl+R"),
            ("address_bar", "Ctrl+L"),
            ("address_bar_alt", "F6"),
            ("back", "Alt+Left"),
            ("forward", "Alt+Right"),
            ("home", "Alt+Home"),
            ("new_window", "Ctrl+N"),
        ]
        .into_iter()
        .map(|(a, k)| (a.to_string(), k.to_string()))
        .collect()
    }
}

/// Navigation defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub home_page: String,
    /// Search endpoint; the query goes into the `q` parameter.
    pub search_url: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            home_page: "https://www.google.com".to_string(),
            search_url: "https://www.google.com/search".to_string(),
        }
    }
}

/// Appearance and chrome presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppearanceSettings {
    pub theme: ThemeMode,
    pub accent_color: String,
    pub tab_title_max_chars: usize,
    pub strip_url_scheme: bool,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            accent_color: "#8ab4f8".to_string(),
            tab_title_max_chars: 25,
            strip_url_scheme: true,
        }
    }
}

/// Theme mode selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}

/// Top-level window geometry and decoration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    #[serde(default)]
    pub icon_path: Option<String>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Clow Browser".to_string(),
            width: 1280,
            height: 800,
            min_width: 1280,
            min_height: 800,
            icon_path: None,
        }
    }
}

/// Engine profile configuration, applied once per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    /// Full user agent override. When unset a desktop UA is derived.
    #[serde(default)]
    pub user_agent: Option<String>,
    pub product_token: String,
    /// Cache root override. Defaults to the platform cache directory.
    #[serde(default)]
    pub cache_dir: Option<String>,
    pub cache_max_size_mb: u64,
    pub persistent_cookies: bool,
    pub ignore_certificate_errors: bool,
    pub disable_sandbox: bool,
    pub disable_gpu: bool,
    pub extra_flags: Vec<String>,
    pub probe_timeout_secs: u64,
    #[serde(default)]
    pub features: EngineFeatures,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            user_agent: None,
            product_token: format!("ClowBrowser/{}", env!("CARGO_PKG_VERSION")),
            cache_dir: None,
            cache_max_size_mb: 500,
            persistent_cookies: true,
            ignore_certificate_errors: true,
            disable_sandbox: false,
            disable_gpu: false,
            extra_flags: vec![
                "--enable-gpu-rasterization".to_string(),
                "--enable-accelerated-video-decode".to_string(),
            ],
            probe_timeout_secs: 20,
            features: EngineFeatures::default(),
        }
    }
}

/// Individual engine feature switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineFeatures {
    pub javascript: bool,
    pub local_storage: bool,
    pub webgl: bool,
    pub accelerated_2d_canvas: bool,
    pub autoplay: bool,
    pub clipboard: bool,
    pub insecure_content: bool,
    pub devtools: bool,
}

impl Default for EngineFeatures {
    fn default() -> Self {
        Self {
            javascript: true,
            local_storage: true,
            webgl: true,
            accelerated_2d_canvas: true,
            autoplay: true,
            clipboard: true,
            insecure_content: true,
            devtools: cfg!(debug_assertions),
        }
    }
}
