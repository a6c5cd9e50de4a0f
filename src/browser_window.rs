//! One browser window: its tabs, their engine views, and the chrome state
//! mirrored from them.
//!
//! `BrowserWindow` never reads state back from a view. Everything it knows
//! about a page arrives as an [`EngineEvent`] and overwrites the tab's copy;
//! the chrome is redrawn from [`BrowserWindow::render_chrome`] afterwards.
//!
//! Invariants kept here:
//! - the address bar shows the active tab's last known URL, or the URL that
//!   failed to load while the error page is up;
//! - the last tab of a window cannot be closed;
//! - exactly one tab is active and only its view is visible.

use std::collections::HashMap;

use uuid::Uuid;

use crate::engine::{
    is_engine_error_url, ConsoleLevel, EngineEvent, EngineView, ViewBounds, ViewFactory,
};
use crate::managers::navigation_history::Traversal;
use crate::managers::shortcut_manager::Action;
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::services::url_resolver::{self, Resolved};
use crate::services::error_page;
use crate::types::chrome::{ChromeSnapshot, StatusMessage, TabStripItem};
use crate::types::errors::{EngineError, NavigationError, TabError};
use crate::types::ipc::ErrorPageAction;
use crate::types::settings::BrowserSettings;
use crate::types::tab::{LoadState, Tab, TabId, TabOrigin};

const PAGE_LOADED_MS: u32 = 2000;
const FAILURE_MS: u32 = 3000;

/// Per-window presentation and navigation defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub product_title: String,
    pub home_page: String,
    pub search_url: String,
    pub tab_title_max_chars: usize,
    pub strip_url_scheme: bool,
    /// `:root { ... }` block styling generated pages.
    pub theme_css: String,
    /// Bridge token embedded in generated pages that post privileged messages.
    pub ipc_token: String,
}

impl WindowConfig {
    pub fn from_settings(settings: &BrowserSettings, theme_css: String, ipc_token: String) -> Self {
        Self {
            product_title: settings.window.title.clone(),
            home_page: settings.general.home_page.clone(),
            search_url: settings.general.search_url.clone(),
            tab_title_max_chars: settings.appearance.tab_title_max_chars,
            strip_url_scheme: settings.appearance.strip_url_scheme,
            theme_css,
            ipc_token,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::from_settings(&BrowserSettings::default(), String::new(), new_ipc_token())
    }
}

/// Fresh secret for one run of the content bridge.
pub fn new_ipc_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Work the window cannot do itself and hands to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellRequest {
    FocusAddressBar,
    OpenWindow,
    CloseWindow,
}

/// A navigation the shell should check with the load probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub tab: TabId,
    pub generation: u64,
    pub url: String,
}

/// Tabs, views and chrome state of one top-level window.
pub struct BrowserWindow<V: EngineView> {
    config: WindowConfig,
    tabs: TabManager,
    views: HashMap<TabId, V>,
    content_bounds: ViewBounds,
    status: Option<StatusMessage>,
    probes: Vec<ProbeRequest>,
    overlay_open: bool,
}

impl<V: EngineView> BrowserWindow<V> {
    pub fn new(config: WindowConfig, content_bounds: ViewBounds) -> Self {
        Self {
            config,
            tabs: TabManager::new(),
            views: HashMap::new(),
            content_bounds,
            status: Some(StatusMessage::sticky("Ready")),
            probes: Vec::new(),
            overlay_open: false,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn view(&self, tab_id: TabId) -> Option<&V> {
        self.views.get(&tab_id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get_active_tab()
    }

    pub fn content_bounds(&self) -> ViewBounds {
        self.content_bounds
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    // ─── Tabs ───

    /// Opens a tab on `url` (the home page when `None`) and activates it.
    pub fn new_tab<F>(
        &mut self,
        factory: &mut F,
        url: Option<&str>,
        origin: TabOrigin,
    ) -> Result<TabId, EngineError>
    where
        F: ViewFactory<View = V>,
    {
        let url = url.unwrap_or(&self.config.home_page).to_string();
        let id = TabId::new();
        let view = factory.create_view(id, &url, self.content_bounds)?;
        self.views.insert(id, view);
        self.tabs.create_tab(id, &url, origin, true);
        tracing::debug!(tab = %id, url = %url, ?origin, "tab opened");
        self.sync_visibility()?;
        Ok(id)
    }

    /// Opens a tab for a page-requested popup. Non-network targets are ignored.
    pub fn open_popup<F>(&mut self, factory: &mut F, url: &str) -> Result<Option<TabId>, EngineError>
    where
        F: ViewFactory<View = V>,
    {
        if !url_resolver::is_network_url(url) {
            tracing::debug!(url = %url, "popup ignored");
            return Ok(None);
        }
        self.new_tab(factory, Some(url), TabOrigin::Popup).map(Some)
    }

    /// Closes a tab and destroys its view. Refused for the last tab.
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let closed = self.tabs.close_tab(tab_id)?;
        self.views.remove(&tab_id);
        tracing::debug!(tab = %tab_id, url = %closed.url, "tab closed");
        self.sync_visibility_logged();
        Ok(())
    }

    pub fn close_active_tab(&mut self) -> Result<(), TabError> {
        match self.tabs.active_tab_id() {
            Some(id) => self.close_tab(id),
            None => Err(TabError::LastTab),
        }
    }

    pub fn switch_tab(&mut self, tab_id: TabId) -> Result<(), TabError> {
        self.tabs.switch_tab(tab_id)?;
        self.sync_visibility_logged();
        Ok(())
    }

    pub fn switch_to_index(&mut self, index: usize) -> Result<TabId, TabError> {
        let id = self.tabs.switch_to_index(index)?;
        self.sync_visibility_logged();
        Ok(id)
    }

    pub fn move_tab(&mut self, tab_id: TabId, index: usize) -> Result<(), TabError> {
        self.tabs.move_tab(tab_id, index)
    }

    /// Destroys every view. The window is unusable afterwards.
    pub fn shutdown(&mut self) -> usize {
        let count = self.views.len();
        self.views.clear();
        count
    }

    // ─── Navigation ───

    /// Loads address-bar input in the active tab.
    pub fn navigate(&mut self, input: &str) -> Result<(), NavigationError> {
        let url = match url_resolver::resolve_input(input, &self.config.search_url) {
            Ok(Resolved::Empty) => return Ok(()),
            Ok(Resolved::Url(url)) => url,
            Err(e) => {
                self.status = Some(StatusMessage::timed("Invalid URL", FAILURE_MS));
                return Err(e);
            }
        };
        self.status = Some(StatusMessage::sticky("Loading..."));
        let id = self.active_id()?;
        self.load_in(id, &url)
    }

    pub fn go_home(&mut self) -> Result<(), NavigationError> {
        let id = self.active_id()?;
        let home = self.config.home_page.clone();
        self.load_in(id, &home)
    }

    pub fn go_back(&mut self) -> Result<(), NavigationError> {
        let id = self.active_id()?;
        self.back_in(id)
    }

    pub fn go_forward(&mut self) -> Result<(), NavigationError> {
        let id = self.active_id()?;
        self.forward_in(id)
    }

    pub fn reload(&mut self) -> Result<(), NavigationError> {
        let id = self.active_id()?;
        self.reload_in(id)
    }

    /// A button on the error page shown in `tab_id`. Ignored unless that tab
    /// is actually showing the error page.
    pub fn handle_error_page_action(
        &mut self,
        tab_id: TabId,
        action: ErrorPageAction,
    ) -> Result<(), NavigationError> {
        let showing = self
            .tabs
            .get_tab(tab_id)
            .map_or(false, Tab::shows_error_page);
        if !showing {
            return Ok(());
        }
        match action {
            ErrorPageAction::Back => self.back_in(tab_id),
            ErrorPageAction::Reload => self.reload_in(tab_id),
            ErrorPageAction::Home => {
                let home = self.config.home_page.clone();
                self.load_in(tab_id, &home)
            }
        }
    }

    /// Runs a keyboard or menu action.
    pub fn perform<F>(
        &mut self,
        action: Action,
        factory: &mut F,
    ) -> Result<Option<ShellRequest>, NavigationError>
    where
        F: ViewFactory<View = V>,
    {
        match action {
            Action::NewTab => {
                self.new_tab(factory, None, TabOrigin::User)?;
            }
            Action::CloseTab => {
                if let Err(e) = self.close_active_tab() {
                    tracing::debug!("close tab refused: {}", e);
                }
            }
            Action::Reload => self.reload()?,
            Action::Back => self.go_back()?,
            Action::Forward => self.go_forward()?,
            Action::Home => self.go_home()?,
            Action::FocusAddressBar => return Ok(Some(ShellRequest::FocusAddressBar)),
            Action::NewWindow => return Ok(Some(ShellRequest::OpenWindow)),
            Action::CloseWindow => return Ok(Some(ShellRequest::CloseWindow)),
        }
        Ok(None)
    }

    fn load_in(&mut self, tab_id: TabId, url: &str) -> Result<(), NavigationError> {
        let tab = self
            .tabs
            .get_tab_mut(tab_id)
            .ok_or(NavigationError::NoActiveTab)?;
        tab.history.begin(Traversal::Navigate);
        tab.url = url.to_string();
        tab.failed_url = None;
        tab.load = LoadState::Loading { progress: 0 };
        tracing::debug!(tab = %tab_id, url = %url, "navigate");
        self.view_of(tab_id)?.load_url(url)?;
        Ok(())
    }

    fn back_in(&mut self, tab_id: TabId) -> Result<(), NavigationError> {
        let tab = self
            .tabs
            .get_tab_mut(tab_id)
            .ok_or(NavigationError::NoActiveTab)?;
        if tab.shows_error_page() {
            // The failed load never entered the history; return to the page that did.
            let last = tab.history.current().map(str::to_string);
            return match last {
                Some(last) => self.load_in(tab_id, &last),
                None => Ok(()),
            };
        }
        if tab.history.begin(Traversal::Back) {
            self.view_of(tab_id)?.go_back()?;
        }
        Ok(())
    }

    fn forward_in(&mut self, tab_id: TabId) -> Result<(), NavigationError> {
        let tab = self
            .tabs
            .get_tab_mut(tab_id)
            .ok_or(NavigationError::NoActiveTab)?;
        if tab.shows_error_page() {
            return Ok(());
        }
        if tab.history.begin(Traversal::Forward) {
            self.view_of(tab_id)?.go_forward()?;
        }
        Ok(())
    }

    fn reload_in(&mut self, tab_id: TabId) -> Result<(), NavigationError> {
        let tab = self
            .tabs
            .get_tab_mut(tab_id)
            .ok_or(NavigationError::NoActiveTab)?;
        if let Some(failed) = tab.failed_url.clone() {
            return self.load_in(tab_id, &failed);
        }
        tab.history.begin(Traversal::Reload);
        tab.load = LoadState::Loading { progress: 0 };
        self.view_of(tab_id)?.reload()?;
        Ok(())
    }

    // ─── Engine events ───

    /// Applies a notification from the view of `tab_id`. Events for closed
    /// tabs are dropped.
    pub fn handle_engine_event(
        &mut self,
        tab_id: TabId,
        event: EngineEvent,
    ) -> Result<(), EngineError> {
        let active = self.tabs.active_tab_id() == Some(tab_id);
        let Some(tab) = self.tabs.get_tab_mut(tab_id) else {
            return Ok(());
        };

        match event {
            EngineEvent::LoadStarted { url } => {
                // The error page's own load.
                if tab.shows_error_page() && !url_resolver::is_network_url(&url) {
                    return Ok(());
                }
                if is_engine_error_url(&url) {
                    return self.fail_load(tab_id, "engine error page");
                }
                tab.failed_url = None;
                tab.url = url.clone();
                tab.load = LoadState::Loading { progress: 0 };
                tab.load_generation += 1;
                let generation = tab.load_generation;

                if url_resolver::is_network_url(&url) {
                    self.probes.push(ProbeRequest {
                        tab: tab_id,
                        generation,
                        url: url.clone(),
                    });
                }
                if active {
                    if let Some(host) = url_resolver::host_of(&url) {
                        self.status = Some(StatusMessage::sticky(format!("Loading: {}", host)));
                    }
                }
                if let Some(view) = self.views.get(&tab_id) {
                    view.reset_zoom()?;
                }
            }
            EngineEvent::LoadProgress { progress } => {
                if tab.load.is_loading() && !tab.shows_error_page() {
                    tab.load = LoadState::Loading {
                        progress: progress.min(100),
                    };
                }
            }
            EngineEvent::LoadFinished { url, ok } => {
                if tab.shows_error_page() {
                    return Ok(());
                }
                if !ok || is_engine_error_url(&url) {
                    return self.fail_load(tab_id, "engine reported failure");
                }
                tab.url = url.clone();
                tab.load = LoadState::Loaded;
                tab.history.commit(&url);
                if active {
                    self.status = Some(StatusMessage::timed("Page loaded", PAGE_LOADED_MS));
                }
                if let Some(view) = self.views.get(&tab_id) {
                    view.scroll_to_top()?;
                }
            }
            EngineEvent::UrlChanged { url } => {
                if tab.shows_error_page() || tab.url == url {
                    return Ok(());
                }
                // Same-document changes never leave the page's origin.
                if !url_resolver::same_origin(&tab.url, &url) {
                    tracing::debug!(tab = %tab_id, from = %tab.url, to = %url, "cross-origin URL change dropped");
                    return Ok(());
                }
                tab.url = url.clone();
                if !tab.load.is_loading() {
                    tab.history.commit(&url);
                }
                if active {
                    if let Some(host) = url_resolver::host_of(&url) {
                        self.status = Some(StatusMessage::timed(
                            format!("Loading: {}", host),
                            PAGE_LOADED_MS,
                        ));
                    }
                }
            }
            EngineEvent::TitleChanged { title } => {
                tab.title = title;
            }
            EngineEvent::IconChanged { href } => {
                tab.favicon = href.filter(|h| !h.trim().is_empty());
            }
            EngineEvent::ConsoleMessage {
                level,
                message,
                source,
                line,
            } => log_console(tab_id, level, &message, &source, line),
            EngineEvent::LoadFailed { generation, reason } => {
                if generation != tab.load_generation || tab.shows_error_page() {
                    tracing::debug!(tab = %tab_id, generation, "stale probe result dropped");
                    return Ok(());
                }
                return self.fail_load(tab_id, &reason);
            }
        }
        Ok(())
    }

    /// Replaces the tab's page with the static error page.
    fn fail_load(&mut self, tab_id: TabId, reason: &str) -> Result<(), EngineError> {
        let active = self.tabs.active_tab_id() == Some(tab_id);
        let Some(tab) = self.tabs.get_tab_mut(tab_id) else {
            return Ok(());
        };
        let failed = tab.url.clone();
        tab.failed_url = Some(failed.clone());
        tab.load = LoadState::Failed;
        tab.history.cancel_pending();
        tracing::warn!(tab = %tab_id, url = %failed, reason, "page failed to load");

        if active {
            self.status = Some(StatusMessage::timed("Failed to load page", FAILURE_MS));
        }
        let html = error_page::render(&failed, &self.config.theme_css, &self.config.ipc_token);
        match self.views.get(&tab_id) {
            Some(view) => view.load_html(&html),
            None => Ok(()),
        }
    }

    /// Navigations started since the last call that need a load probe.
    pub fn take_probe_requests(&mut self) -> Vec<ProbeRequest> {
        std::mem::take(&mut self.probes)
    }

    // ─── Layout ───

    /// Resizes every view to the content area.
    pub fn relayout(&mut self, bounds: ViewBounds) -> Result<(), EngineError> {
        self.content_bounds = bounds;
        for view in self.views.values() {
            view.set_bounds(bounds)?;
        }
        Ok(())
    }

    /// Hides the active view while a chrome overlay covers the content area.
    pub fn set_overlay(&mut self, open: bool) -> Result<(), EngineError> {
        self.overlay_open = open;
        self.sync_visibility()
    }

    fn sync_visibility(&self) -> Result<(), EngineError> {
        let active = self.tabs.active_tab_id();
        for (id, view) in &self.views {
            let visible = Some(*id) == active && !self.overlay_open;
            if visible {
                view.set_bounds(self.content_bounds)?;
            }
            view.set_visible(visible)?;
        }
        Ok(())
    }

    fn sync_visibility_logged(&self) {
        if let Err(e) = self.sync_visibility() {
            tracing::warn!("failed to update view visibility: {}", e);
        }
    }

    // ─── Chrome ───

    /// Address-bar text for the active tab.
    pub fn address_bar(&self) -> String {
        self.tabs
            .get_active_tab()
            .map(|t| url_resolver::display_url(t.address_url(), self.config.strip_url_scheme))
            .unwrap_or_default()
    }

    pub fn window_title(&self) -> String {
        match self.tabs.get_active_tab() {
            Some(tab) if !tab.title.trim().is_empty() => {
                format!("{} - {}", tab.title.trim(), self.config.product_title)
            }
            _ => self.config.product_title.clone(),
        }
    }

    /// Current chrome state, keeping any pending status message.
    pub fn snapshot(&self) -> ChromeSnapshot {
        let active_id = self.tabs.active_tab_id();
        let active = self.tabs.get_active_tab();
        let tabs = self
            .tabs
            .get_all_tabs()
            .into_iter()
            .map(|tab| self.strip_item(tab, Some(tab.id) == active_id))
            .collect();

        let (can_go_back, can_go_forward) = match active {
            Some(tab) if tab.shows_error_page() => (tab.history.current().is_some(), false),
            Some(tab) => (tab.history.can_go_back(), tab.history.can_go_forward()),
            None => (false, false),
        };
        let progress = match active.map(|t| t.load) {
            Some(LoadState::Loading { progress }) if progress < 100 => Some(progress),
            _ => None,
        };

        ChromeSnapshot {
            window_title: self.window_title(),
            address_bar: self.address_bar(),
            tabs,
            can_go_back,
            can_go_forward,
            progress,
            status: self.status.clone(),
        }
    }

    /// Chrome state for a redraw. The status message is handed out once.
    pub fn render_chrome(&mut self) -> ChromeSnapshot {
        let mut snapshot = self.snapshot();
        snapshot.status = self.status.take();
        snapshot
    }

    fn strip_item(&self, tab: &Tab, active: bool) -> TabStripItem {
        let tooltip = if tab.title.trim().is_empty() {
            tab.address_url().to_string()
        } else {
            tab.title.clone()
        };
        TabStripItem {
            id: tab.id,
            label: url_resolver::tab_label(&tab.title, self.config.tab_title_max_chars),
            tooltip,
            favicon: tab.favicon.clone(),
            loading: tab.load.is_loading(),
            active,
        }
    }

    fn active_id(&self) -> Result<TabId, NavigationError> {
        self.tabs
            .active_tab_id()
            .ok_or(NavigationError::NoActiveTab)
    }

    fn view_of(&self, tab_id: TabId) -> Result<&V, NavigationError> {
        self.views
            .get(&tab_id)
            .ok_or(NavigationError::NoActiveTab)
    }
}

fn log_console(tab: TabId, level: Option<ConsoleLevel>, message: &str, source: &str, line: u32) {
    match level {
        Some(ConsoleLevel::Error) => {
            tracing::error!(target: "js", %tab, source, line, "{}", message)
        }
        Some(ConsoleLevel::Warning) => {
            tracing::warn!(target: "js", %tab, source, line, "{}", message)
        }
        _ => tracing::info!(target: "js", %tab, source, line, "{}", message),
    }
}
