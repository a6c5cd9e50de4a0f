//! JSON messages posted by the webviews through `window.ipc.postMessage`.

use serde::{Deserialize, Serialize};

use super::errors::IpcError;
use super::tab::TabId;
use crate::engine::{ConsoleLevel, EngineEvent};
use crate::services::url_resolver;

/// Messages from the chrome webview (tab strip, toolbar, status bar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ChromeCommand {
    Ready,
    Navigate { input: String },
    Back,
    Forward,
    Reload,
    Home,
    NewTab,
    CloseTab { id: TabId },
    SwitchTab { id: TabId },
    MoveTab { id: TabId, index: usize },
    NewWindow,
    CloseWindow,
    Shortcut { keys: String },
    /// A chrome overlay (the menu) opened or closed over the content area.
    Overlay { open: bool },
}

/// Messages from the bridge script injected into every content page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ContentMessage {
    Favicon { href: Option<String> },
    Progress { value: u8 },
    UrlChanged { url: String },
    Console {
        level: String,
        message: String,
        #[serde(default)]
        source: String,
        #[serde(default)]
        line: u32,
    },
    /// Only honoured with the bridge token.
    Shortcut {
        keys: String,
        #[serde(default)]
        token: String,
    },
    /// A button on the load-error page.
    ErrorPage {
        action: ErrorPageAction,
        #[serde(default)]
        token: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPageAction {
    Back,
    Reload,
    Home,
}

impl ChromeCommand {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

impl ContentMessage {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Checks a message posted by the page at `page_url` before it is acted
    /// on. Shortcuts and error-page actions need the run's bridge token; URL
    /// changes must stay on the page's origin.
    pub fn verify(&self, token: &str, page_url: &str) -> Result<(), IpcError> {
        let trusted = |sent: &str| !token.is_empty() && sent == token;
        match self {
            ContentMessage::Shortcut { token: sent, .. } if !trusted(sent.as_str()) => {
                Err(IpcError::Untrusted("shortcut"))
            }
            ContentMessage::ErrorPage { token: sent, .. } if !trusted(sent.as_str()) => {
                Err(IpcError::Untrusted("error_page"))
            }
            ContentMessage::UrlChanged { url } if !url_resolver::same_origin(page_url, url) => {
                Err(IpcError::CrossOrigin {
                    from: page_url.to_string(),
                    to: url.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// What a content message means to the window owning the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentInput {
    Engine(EngineEvent),
    Shortcut(String),
    ErrorPage(ErrorPageAction),
}

impl ContentMessage {
    pub fn into_input(self) -> ContentInput {
        match self {
            ContentMessage::Favicon { href } => ContentInput::Engine(EngineEvent::IconChanged { href }),
            ContentMessage::Progress { value } => {
                ContentInput::Engine(EngineEvent::LoadProgress { progress: value })
            }
            ContentMessage::UrlChanged { url } => ContentInput::Engine(EngineEvent::UrlChanged { url }),
            ContentMessage::Console {
                level,
                message,
                source,
                line,
            } => ContentInput::Engine(EngineEvent::ConsoleMessage {
                level: ConsoleLevel::from_name(&level),
                message,
                source,
                line,
            }),
            ContentMessage::Shortcut { keys, .. } => ContentInput::Shortcut(keys),
            ContentMessage::ErrorPage { action, .. } => ContentInput::ErrorPage(action),
        }
    }
}
