//! Process environment the platform engines read their start-up flags from.
//!
//! Must run before the first webview is created; engines read these once.

use std::env;

use crate::services::engine_profile::EngineProfile;

/// Extra command-line arguments for WebView2.
pub const CHROMIUM_ARGS_VAR: &str = "WEBVIEW2_ADDITIONAL_BROWSER_ARGUMENTS";
/// Turns off accelerated compositing in WebKitGTK.
pub const WEBKIT_COMPOSITING_VAR: &str = "WEBKIT_DISABLE_COMPOSITING_MODE";

/// Appends each flag of `flags` missing from the space-separated `existing`.
/// Flags already present keep their position.
pub fn merge_flags(existing: &str, flags: &[String]) -> String {
    let mut merged: Vec<String> = existing.split_whitespace().map(str::to_string).collect();
    for flag in flags {
        if !merged.iter().any(|f| f == flag) {
            merged.push(flag.clone());
        }
    }
    merged.join(" ")
}

/// Computes the variables to set for `profile`. `lookup` reads the current
/// value of a variable.
pub fn plan<F>(profile: &EngineProfile, lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut vars = Vec::new();

    let existing = lookup(CHROMIUM_ARGS_VAR).unwrap_or_default();
    let merged = merge_flags(&existing, &profile.browser_args());
    if merged != existing {
        vars.push((CHROMIUM_ARGS_VAR, merged));
    }

    if profile.disable_gpu && lookup(WEBKIT_COMPOSITING_VAR).is_none() {
        vars.push((WEBKIT_COMPOSITING_VAR, "1".to_string()));
    }
    vars
}

/// Sets the planned variables on this process and returns them.
pub fn apply(profile: &EngineProfile) -> Vec<(&'static str, String)> {
    let vars = plan(profile, |key| env::var(key).ok());
    for (key, value) in &vars {
        tracing::debug!(var = key, value = %value, "engine environment");
        env::set_var(key, value);
    }
    vars
}
