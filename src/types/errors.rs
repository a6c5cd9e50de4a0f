use thiserror::Error;

// === TabError ===

/// Errors related to tab management operations.
#[derive(Debug, Error)]
pub enum TabError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(String),
    /// The provided tab index is out of bounds.
    #[error("Invalid tab index: {0}")]
    InvalidIndex(usize),
    /// The window would be left without tabs.
    #[error("Cannot close the last remaining tab")]
    LastTab,
}

// === NavigationError ===

/// Errors raised while turning address-bar input into a navigation.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The input did not produce a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// There is no active tab to navigate.
    #[error("No active tab")]
    NoActiveTab,
    /// The engine refused the command.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

// === EngineError ===

/// Errors reported by the embedded rendering engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A view could not be created.
    #[error("Failed to create view: {0}")]
    ViewCreation(String),
    /// A command sent to an existing view failed.
    #[error("View command failed: {0}")]
    Command(String),
}

// === SettingsError ===

/// Errors related to the settings engine.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the config file failed.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// The config file or a value could not be (de)serialized.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The dot-path key does not name a setting.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The value does not fit the setting's type.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ThemeError ===

/// Errors related to theme configuration.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The color is not a `#rgb` or `#rrggbb` hex string.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

// === ShortcutError ===

/// Errors related to keyboard shortcut management.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// Shortcut for the given action was not found.
    #[error("Shortcut not found for action: {0}")]
    NotFound(String),
    /// The shortcut keys conflict with an existing binding.
    #[error("Shortcut conflict: {0}")]
    Conflict(String),
    /// The provided key combination is invalid.
    #[error("Invalid shortcut keys: {0}")]
    InvalidKeys(String),
    /// The action name is not one the browser knows.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

// === ProfileError ===

/// Errors raised while preparing the engine profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The cache or storage directory could not be created.
    #[error("Failed to create profile directory {path}: {message}")]
    Directory { path: String, message: String },
    /// A configured value is unusable.
    #[error("Invalid profile setting: {0}")]
    InvalidSetting(String),
}

// === ProbeError ===

/// Errors produced by the load probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe client could not be built.
    #[error("Probe client error: {0}")]
    Client(String),
    /// The target could not be reached.
    #[error("Unreachable: {0}")]
    Unreachable(String),
    /// The URL is not something the probe can check.
    #[error("Unsupported URL: {0}")]
    Unsupported(String),
}

// === IpcError ===

/// Reasons a message posted by page content is dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IpcError {
    /// A privileged message did not carry the bridge token of this run.
    #[error("Untrusted {0} message")]
    Untrusted(&'static str),
    /// A same-document URL change claimed a different origin.
    #[error("URL change from {from} to {to} crosses origins")]
    CrossOrigin { from: String, to: String },
}
