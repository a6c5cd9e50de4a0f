// Clow Browser platform paths for Linux
// Config: ~/.config/clowbrowser
// Cache:  ~/.cache/clowbrowser

use std::env;
use std::path::PathBuf;

pub const ENGINE_NAME: &str = "WebKitGTK";

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/clowbrowser` if set, otherwise `~/.config/clowbrowser`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("clowbrowser"),
        _ => home_dir().join(".config").join("clowbrowser"),
    }
}

/// Uses `$XDG_CACHE_HOME/clowbrowser` if set, otherwise `~/.cache/clowbrowser`.
pub fn get_cache_dir() -> PathBuf {
    match env::var("XDG_CACHE_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("clowbrowser"),
        _ => home_dir().join(".cache").join("clowbrowser"),
    }
}
