// Clow Browser platform abstraction
// Provides platform-specific paths and engine defaults for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as current;

#[cfg(target_os = "macos")]
use macos as current;

#[cfg(target_os = "windows")]
use windows as current;

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/clowbrowser` (or `$XDG_CONFIG_HOME/clowbrowser`)
/// - **macOS**: `~/Library/Application Support/ClowBrowser`
/// - **Windows**: `%APPDATA%/ClowBrowser`
pub fn get_config_dir() -> PathBuf {
    current::get_config_dir()
}

/// Returns the platform-specific cache directory, the root of the engine profile.
///
/// - **Linux**: `~/.cache/clowbrowser` (or `$XDG_CACHE_HOME/clowbrowser`)
/// - **macOS**: `~/Library/Caches/ClowBrowser`
/// - **Windows**: `%LOCALAPPDATA%/ClowBrowser/cache`
pub fn get_cache_dir() -> PathBuf {
    current::get_cache_dir()
}

/// Desktop user agent of a current Chromium on this OS, used when the
/// engine's own UA is not known before the first view exists.
pub fn desktop_user_agent() -> &'static str {
    current::DESKTOP_USER_AGENT
}

/// Name of the rendering engine behind `wry` on this OS.
pub fn engine_name() -> &'static str {
    current::ENGINE_NAME
}
