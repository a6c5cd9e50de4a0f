//! App Core for Clow Browser.
//!
//! Holds the per-run services shared by every window and runs the start-up
//! and shutdown sequences.

use std::path::Path;

use anyhow::Context;

use crate::browser_window::{self, WindowConfig};
use crate::managers::shortcut_manager::ShortcutManager;
use crate::services::engine_env;
use crate::services::engine_profile::EngineProfile;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
use crate::types::settings::BrowserSettings;

/// Central application struct holding settings and the services built from them.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub theme_engine: ThemeEngine,
    pub shortcut_manager: ShortcutManager,
    pub profile: EngineProfile,
    /// Secret shared by the content bridge and generated pages for this run.
    pub ipc_token: String,
}

impl App {
    /// Loads settings from `config_path` (the platform default when `None`)
    /// and derives the theme, shortcuts and engine profile from them.
    ///
    /// A malformed settings file is logged and replaced by defaults for this
    /// run; only an unusable engine profile is fatal.
    pub fn new(config_path: Option<String>) -> anyhow::Result<Self> {
        let mut settings_engine = SettingsEngine::new(config_path);
        if let Err(e) = settings_engine.load() {
            tracing::warn!(path = settings_engine.get_config_path(), "{}; using defaults", e);
        }
        let settings = settings_engine.get_settings().clone();

        let mut theme_engine = ThemeEngine::new(settings.appearance.theme.clone());
        if let Err(e) = theme_engine.set_accent_color(&settings.appearance.accent_color) {
            tracing::warn!("{}; keeping {}", e, theme_engine.get_accent_color());
        }

        let shortcut_manager = ShortcutManager::from_settings(&settings.shortcuts);
        let profile =
            EngineProfile::from_settings(&settings.engine).context("invalid engine settings")?;

        Ok(Self {
            settings_engine,
            theme_engine,
            shortcut_manager,
            profile,
            ipc_token: browser_window::new_ipc_token(),
        })
    }

    pub fn settings(&self) -> &BrowserSettings {
        self.settings_engine.get_settings()
    }

    /// Startup sequence: write a settings file on first run, create the
    /// profile directories, publish engine flags to the environment.
    ///
    /// Must run before the first webview is created.
    pub fn startup(&mut self) -> anyhow::Result<()> {
        if !Path::new(self.settings_engine.get_config_path()).exists() {
            if let Err(e) = self.settings_engine.save() {
                tracing::warn!("could not write default settings: {}", e);
            }
        }

        self.profile
            .prepare_dirs()
            .context("failed to prepare the engine profile")?;
        for message in self.profile.unsupported_settings() {
            tracing::warn!("{}", message);
        }

        let vars = engine_env::apply(&self.profile);
        tracing::info!(
            user_agent = %self.profile.user_agent,
            storage = %self.profile.storage_dir.display(),
            env_vars = vars.len(),
            "engine profile ready"
        );
        Ok(())
    }

    /// Window defaults, including the themed CSS for generated pages.
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig::from_settings(
            self.settings(),
            self.theme_engine.css_root_block(),
            self.ipc_token.clone(),
        )
    }

    /// Shutdown sequence: nothing is owned beyond the engine's own profile,
    /// which flushes itself when the last view is dropped.
    pub fn shutdown(&mut self) {
        tracing::info!("shutting down");
    }
}
