//! Engine profile: the per-run persistence context shared by every view.
//!
//! Built once from the `engine` settings section before the first view
//! exists. Holds the resolved user agent, the cache and storage directories,
//! the feature switches, and the start-up flags handed to the engine process.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::platform;
use crate::types::errors::ProfileError;
use crate::types::settings::{EngineFeatures, EngineSettings};

/// Resolved engine configuration for this run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineProfile {
    pub user_agent: String,
    pub cache_dir: PathBuf,
    /// Cookies, local storage and IndexedDB live here.
    pub storage_dir: PathBuf,
    pub cache_max_bytes: u64,
    pub persistent_cookies: bool,
    pub ignore_certificate_errors: bool,
    pub disable_sandbox: bool,
    pub disable_gpu: bool,
    pub probe_timeout: Duration,
    pub features: EngineFeatures,
    extra_flags: Vec<String>,
}

impl EngineProfile {
    pub fn from_settings(settings: &EngineSettings) -> Result<Self, ProfileError> {
        if settings.probe_timeout_secs == 0 {
            return Err(ProfileError::InvalidSetting(
                "engine.probe_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let cache_dir = match settings.cache_dir.as_deref() {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ProfileError::InvalidSetting(
                    "engine.cache_dir is empty".to_string(),
                ))
            }
            Some(dir) => PathBuf::from(dir),
            None => platform::get_cache_dir(),
        };
        let storage_dir = cache_dir.join("storage");

        let user_agent = match settings.user_agent.as_deref() {
            Some(ua) if !ua.trim().is_empty() => ua.trim().to_string(),
            _ => desktop_user_agent(platform::desktop_user_agent(), &settings.product_token),
        };

        Ok(Self {
            user_agent,
            cache_dir,
            storage_dir,
            cache_max_bytes: settings.cache_max_size_mb.saturating_mul(1024 * 1024),
            persistent_cookies: settings.persistent_cookies,
            ignore_certificate_errors: settings.ignore_certificate_errors,
            disable_sandbox: settings.disable_sandbox,
            disable_gpu: settings.disable_gpu,
            probe_timeout: Duration::from_secs(settings.probe_timeout_secs),
            features: settings.features.clone(),
            extra_flags: settings.extra_flags.clone(),
        })
    }

    /// Creates the cache and storage directories.
    pub fn prepare_dirs(&self) -> Result<(), ProfileError> {
        for dir in [&self.cache_dir, &self.storage_dir] {
            create_dir(dir)?;
        }
        Ok(())
    }

    /// Start-up flags for Chromium-based engines, without duplicates.
    pub fn browser_args(&self) -> Vec<String> {
        let mut args = vec![format!("--disk-cache-size={}", self.cache_max_bytes)];

        let switches = [
            (!self.features.local_storage, "--disable-local-storage"),
            (!self.features.webgl, "--disable-webgl"),
            (
                !self.features.accelerated_2d_canvas,
                "--disable-accelerated-2d-canvas",
            ),
            (self.features.insecure_content, "--allow-running-insecure-content"),
            (self.ignore_certificate_errors, "--ignore-certificate-errors"),
            (self.disable_sandbox, "--no-sandbox"),
            (self.disable_gpu, "--disable-gpu"),
        ];
        for (on, flag) in switches {
            if on {
                args.push(flag.to_string());
            }
        }

        for flag in &self.extra_flags {
            let flag = flag.trim();
            if !flag.is_empty() && !args.iter().any(|a| a == flag) {
                args.push(flag.to_string());
            }
        }
        args
    }

    /// Settings the embedded engine cannot honour, as log-ready messages.
    pub fn unsupported_settings(&self) -> Vec<String> {
        self.unsupported_settings_for(platform::engine_name())
    }

    /// Same as [`unsupported_settings`](Self::unsupported_settings) for a
    /// named engine. Only WebView2 reads the Chromium start-up flags.
    pub fn unsupported_settings_for(&self, engine: &str) -> Vec<String> {
        let mut out = Vec::new();
        if !self.features.javascript {
            out.push(format!(
                "engine.features.javascript=false is not supported by {}; JavaScript stays enabled",
                engine
            ));
        }
        if engine == "WebView2" {
            return out;
        }

        let ignored = [
            (!self.features.local_storage, "engine.features.local_storage=false"),
            (!self.features.webgl, "engine.features.webgl=false"),
            (
                !self.features.accelerated_2d_canvas,
                "engine.features.accelerated_2d_canvas=false",
            ),
            (self.features.insecure_content, "engine.features.insecure_content=true"),
        ];
        for (set, name) in ignored {
            if set {
                out.push(format!(
                    "{} is not supported by {}; the engine default applies",
                    name, engine
                ));
            }
        }
        if self.cache_max_bytes > 0 {
            out.push(format!(
                "engine.cache_max_size_mb is not enforced by {}; the cache size is engine-managed",
                engine
            ));
        }
        out
    }
}

fn create_dir(dir: &Path) -> Result<(), ProfileError> {
    fs::create_dir_all(dir).map_err(|e| ProfileError::Directory {
        path: dir.display().to_string(),
        message: e.to_string(),
    })
}

/// Turns an engine user agent into a desktop one: drops any `Mobile` token
/// and appends the product token.
pub fn desktop_user_agent(base: &str, product_token: &str) -> String {
    let mut parts: Vec<&str> = base
        .split_whitespace()
        .filter(|part| !part.to_ascii_lowercase().starts_with("mobile"))
        .collect();
    let token = product_token.trim();
    if !token.is_empty() && !parts.contains(&token) {
        parts.push(token);
    }
    parts.join(" ")
}
