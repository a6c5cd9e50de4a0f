// Clow Browser platform paths for macOS
// Config: ~/Library/Application Support/ClowBrowser
// Cache:  ~/Library/Caches/ClowBrowser

use std::env;
use std::path::PathBuf;

pub const ENGINE_NAME: &str = "WKWebView";

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `~/Library/Application Support/ClowBrowser`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("ClowBrowser")
}

/// `~/Library/Caches/ClowBrowser`
pub fn get_cache_dir() -> PathBuf {
    home_dir().join("Library").join("Caches").join("ClowBrowser")
}
