//! App start-up against a temporary profile.

use std::fs;

use clowbrowser::app::App;
use clowbrowser::managers::shortcut_manager::{Action, ShortcutManagerTrait};
use clowbrowser::services::engine_profile::EngineProfile;
use clowbrowser::services::settings_engine::SettingsEngineTrait;
use clowbrowser::types::settings::{BrowserSettings, EngineSettings};
use tempfile::TempDir;

/// Writes a settings file whose cache lives inside `dir`.
fn config_in(dir: &TempDir) -> String {
    let mut settings = BrowserSettings::default();
    settings.general.home_page = "https://start.test/".to_string();
    settings.engine.cache_dir = Some(dir.path().join("cache").to_string_lossy().to_string());
    let path = dir.path().join("settings.json");
    fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_new_loads_settings_file() {
    let dir = TempDir::new().unwrap();
    let app = App::new(Some(config_in(&dir))).unwrap();

    assert_eq!(app.settings().general.home_page, "https://start.test/");
    assert_eq!(app.profile.cache_dir, dir.path().join("cache"));
    assert_eq!(app.shortcut_manager.resolve("Alt+Left"), Some(Action::Back));
}

#[test]
fn test_window_config_follows_settings() {
    let dir = TempDir::new().unwrap();
    let app = App::new(Some(config_in(&dir))).unwrap();
    let config = app.window_config();

    assert_eq!(config.home_page, "https://start.test/");
    assert_eq!(config.product_title, "Clow Browser");
    assert_eq!(config.tab_title_max_chars, 25);
    assert!(config.theme_css.starts_with(":root{"));
}

#[test]
fn test_malformed_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();

    let app = App::new(Some(path.to_string_lossy().to_string())).unwrap();
    assert_eq!(app.settings(), &BrowserSettings::default());
}

#[test]
fn test_invalid_accent_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let mut settings = BrowserSettings::default();
    settings.appearance.accent_color = "blue".to_string();
    let path = dir.path().join("settings.json");
    fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

    assert!(App::new(Some(path.to_string_lossy().to_string())).is_ok());
}

#[test]
fn test_unusable_engine_settings_are_fatal() {
    let dir = TempDir::new().unwrap();
    let mut settings = BrowserSettings::default();
    settings.engine.probe_timeout_secs = 0;
    let path = dir.path().join("settings.json");
    fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

    let err = App::new(Some(path.to_string_lossy().to_string())).err().unwrap();
    assert!(err.to_string().contains("invalid engine settings"));
}

#[test]
fn test_startup_prepares_profile() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(Some(config_in(&dir))).unwrap();

    app.startup().unwrap();

    assert!(dir.path().join("cache").join("storage").is_dir());
    app.shutdown();
}

#[test]
fn test_first_startup_writes_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh").join("settings.json");
    let mut app = App::new(Some(path.to_string_lossy().to_string())).unwrap();
    app.profile = EngineProfile::from_settings(&EngineSettings {
        cache_dir: Some(dir.path().join("cache").to_string_lossy().to_string()),
        ..EngineSettings::default()
    })
    .unwrap();

    app.startup().unwrap();

    assert!(path.exists());
    assert_eq!(app.settings_engine.get_config_path(), path.to_string_lossy());
}
