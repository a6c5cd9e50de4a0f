// Clow Browser platform paths for Windows
// Config: %APPDATA%/ClowBrowser
// Cache:  %LOCALAPPDATA%/ClowBrowser/cache

use std::env;
use std::path::PathBuf;

pub const ENGINE_NAME: &str = "WebView2";

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// `%APPDATA%/ClowBrowser`
pub fn get_config_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("ClowBrowser")
}

/// `%LOCALAPPDATA%/ClowBrowser/cache`
pub fn get_cache_dir() -> PathBuf {
    let local_appdata = env::var("LOCALAPPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Local"));
    PathBuf::from(local_appdata).join("ClowBrowser").join("cache")
}
