//! WebView-based browser application using `wry` + `tao`.
//!
//! Architecture:
//! - One chrome webview per window covers the whole window and draws the tab
//!   strip, toolbar, menu and status bar from a `ChromeSnapshot`.
//! - Each tab is a child webview placed over the content area; only the
//!   active one is visible.
//! - IPC from JS → Rust via `window.ipc.postMessage()`. Engine callbacks and
//!   IPC handlers post `UserEvent`s; all state changes happen in the loop.
//! - Rust → chrome via `evaluate_script("window.__clow.apply(...)")`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use tao::dpi::{LogicalSize, PhysicalSize};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget};
use tao::window::{Icon, Window, WindowBuilder, WindowId};
use wry::{WebContext, WebView, WebViewBuilder};

use crate::app::App;
use crate::browser_window::{BrowserWindow, ShellRequest};
use crate::engine::{EngineEvent, ViewBounds};
use crate::managers::shortcut_manager::ShortcutManagerTrait;
use crate::services::error_page::escape_html;
use crate::types::ipc::{ChromeCommand, ContentInput, ContentMessage};
use crate::types::tab::{TabId, TabOrigin};
use crate::ui::wry_view::{to_rect, ViewHost, ViewOptions, WryView, WryViewFactory};

#[cfg(feature = "network")]
use crate::services::load_probe::LoadProbe;
#[cfg(feature = "network")]
use crate::types::errors::ProbeError;

const TAB_STRIP_HEIGHT: f64 = 36.0;
const TOOLBAR_HEIGHT: f64 = 44.0;
const STATUS_BAR_HEIGHT: f64 = 24.0;

const CHROME_HTML: &str = include_str!("../../resources/ui/chrome.html");
const CHROME_JS: &str = include_str!("../../resources/ui/chrome.js");

#[derive(Debug)]
pub enum UserEvent {
    /// A command from a window's chrome webview.
    Chrome {
        window: WindowId,
        command: ChromeCommand,
    },
    /// A message from the bridge script of a tab's page.
    Content {
        window: WindowId,
        tab: TabId,
        message: ContentMessage,
    },
    /// A load or title notification from a tab's webview.
    Engine {
        window: WindowId,
        tab: TabId,
        event: EngineEvent,
    },
    /// A page asked for a new window.
    Popup { window: WindowId, url: String },
}

/// Content area below the toolbar and above the status bar.
fn content_bounds(size: LogicalSize<f64>) -> ViewBounds {
    let top = TAB_STRIP_HEIGHT + TOOLBAR_HEIGHT;
    ViewBounds {
        x: 0.0,
        y: top,
        width: size.width,
        height: (size.height - top - STATUS_BAR_HEIGHT).max(0.0),
    }
}

fn full_bounds(size: LogicalSize<f64>) -> ViewBounds {
    ViewBounds {
        x: 0.0,
        y: 0.0,
        width: size.width,
        height: size.height,
    }
}

fn chrome_html(app: &App) -> String {
    let keys = serde_json::to_string(&app.shortcut_manager.bound_keys())
        .unwrap_or_else(|_| "[]".to_string());
    CHROME_HTML
        .replace("{{THEME}}", &app.theme_engine.css_root_block())
        .replace("{{TITLE}}", &escape_html(&app.settings().window.title))
        .replace("{{SCRIPT}}", CHROME_JS)
        .replace("__CLOW_SHORTCUTS__", &keys)
}

/// Loads the window icon. Any failure leaves the platform default.
fn load_icon(path: &Path) -> Option<Icon> {
    let image = match image::open(path) {
        Ok(image) => image.into_rgba8(),
        Err(e) => {
            tracing::debug!(path = %path.display(), "window icon not loaded: {}", e);
            return None;
        }
    };
    let (width, height) = image.dimensions();
    match Icon::from_rgba(image.into_raw(), width, height) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::debug!(path = %path.display(), "window icon rejected: {}", e);
            None
        }
    }
}

/// One top-level window. Fields drop in order: tab views, chrome, host, window.
struct WindowShell {
    browser: BrowserWindow<WryView>,
    chrome: WebView,
    chrome_ready: bool,
    host: ViewHost,
    window: Window,
}

impl WindowShell {
    /// Pushes the current chrome state to the chrome webview and the title bar.
    fn sync_chrome(&mut self) {
        if !self.chrome_ready {
            return;
        }
        let snapshot = self.browser.render_chrome();
        self.window.set_title(&snapshot.window_title);
        match serde_json::to_string(&snapshot) {
            Ok(json) => {
                let script = format!("window.__clow && window.__clow.apply({})", json);
                if let Err(e) = self.chrome.evaluate_script(&script) {
                    tracing::warn!("chrome update failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("chrome snapshot not serialisable: {}", e),
        }
    }

    fn focus_address_bar(&self) {
        let _ = self.chrome.focus();
        let _ = self
            .chrome
            .evaluate_script("window.__clow && window.__clow.focusAddress()");
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let logical: LogicalSize<f64> = size.to_logical(self.window.scale_factor());
        if let Err(e) = self.chrome.set_bounds(to_rect(full_bounds(logical))) {
            tracing::warn!("chrome resize failed: {}", e);
        }
        if let Err(e) = self.browser.relayout(content_bounds(logical)) {
            tracing::warn!("content resize failed: {}", e);
        }
    }
}

/// All windows of the process plus the per-run engine profile.
struct Shell {
    app: App,
    context: WebContext,
    options: ViewOptions,
    windows: HashMap<WindowId, WindowShell>,
    proxy: EventLoopProxy<UserEvent>,
    #[cfg(feature = "network")]
    probe: Option<(tokio::runtime::Runtime, LoadProbe)>,
}

impl Shell {
    fn new(mut app: App, proxy: EventLoopProxy<UserEvent>) -> anyhow::Result<Self> {
        app.startup()?;
        let context = WebContext::new(Some(app.profile.storage_dir.clone()));
        let options = ViewOptions::new(
            &app.profile,
            &app.shortcut_manager.bound_keys(),
            &app.ipc_token,
        );

        #[cfg(feature = "network")]
        let probe = match Self::start_probe(&app) {
            Ok(probe) => Some(probe),
            Err(e) => {
                tracing::warn!("load probe disabled: {:#}", e);
                None
            }
        };

        Ok(Self {
            app,
            context,
            options,
            windows: HashMap::new(),
            proxy,
            #[cfg(feature = "network")]
            probe,
        })
    }

    #[cfg(feature = "network")]
    fn start_probe(app: &App) -> anyhow::Result<(tokio::runtime::Runtime, LoadProbe)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("clow-probe")
            .enable_all()
            .build()
            .context("failed to start the probe runtime")?;
        let probe = LoadProbe::new(
            app.profile.probe_timeout,
            app.profile.ignore_certificate_errors,
            &app.profile.user_agent,
        )?;
        Ok((runtime, probe))
    }

    /// Opens a window with one tab on the home page.
    fn open_window(&mut self, target: &EventLoopWindowTarget<UserEvent>) -> anyhow::Result<WindowId> {
        let settings = self.app.settings().window.clone();
        let mut builder = WindowBuilder::new()
            .with_title(&settings.title)
            .with_inner_size(LogicalSize::new(settings.width as f64, settings.height as f64))
            .with_min_inner_size(LogicalSize::new(
                settings.min_width as f64,
                settings.min_height as f64,
            ));
        if let Some(path) = settings.icon_path.as_deref() {
            builder = builder.with_window_icon(load_icon(Path::new(path)));
        }
        let window = builder.build(target).context("failed to create window")?;
        let window_id = window.id();

        let logical: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
        let host = ViewHost::new(&window)?;

        let chrome_proxy = self.proxy.clone();
        let chrome_builder = WebViewBuilder::new()
            .with_html(chrome_html(&self.app))
            .with_bounds(to_rect(full_bounds(logical)))
            .with_devtools(self.options.devtools)
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                match ChromeCommand::parse(request.body()) {
                    Ok(command) => {
                        let _ = chrome_proxy.send_event(UserEvent::Chrome {
                            window: window_id,
                            command,
                        });
                    }
                    Err(e) => tracing::warn!("unrecognised chrome command: {}", e),
                }
            });
        let chrome = host.build(&window, chrome_builder)?;

        let mut browser = BrowserWindow::new(self.app.window_config(), content_bounds(logical));
        {
            let mut factory = WryViewFactory::new(
                &window,
                &host,
                &mut self.context,
                &self.options,
                self.proxy.clone(),
            );
            browser.new_tab(&mut factory, None, TabOrigin::WindowStart)?;
        }

        self.windows.insert(
            window_id,
            WindowShell {
                browser,
                chrome,
                chrome_ready: false,
                host,
                window,
            },
        );
        tracing::info!(windows = self.windows.len(), "window opened");
        Ok(window_id)
    }

    /// Closes a window. Returns true when it was the last one.
    fn close_window(&mut self, id: WindowId) -> bool {
        if let Some(mut shell) = self.windows.remove(&id) {
            let tabs = shell.browser.shutdown();
            tracing::info!(tabs, "window closed");
        }
        self.windows.is_empty()
    }

    fn handle_chrome(&mut self, id: WindowId, command: ChromeCommand) -> Option<ShellRequest> {
        let Some(ws) = self.windows.get_mut(&id) else {
            return None;
        };
        let mut factory = WryViewFactory::new(
            &ws.window,
            &ws.host,
            &mut self.context,
            &self.options,
            self.proxy.clone(),
        );

        let outcome: Result<Option<ShellRequest>, String> = match command {
            ChromeCommand::Ready => {
                ws.chrome_ready = true;
                Ok(None)
            }
            ChromeCommand::Navigate { input } => {
                ws.browser.navigate(&input).map(|_| None).map_err(|e| e.to_string())
            }
            ChromeCommand::Back => ws.browser.go_back().map(|_| None).map_err(|e| e.to_string()),
            ChromeCommand::Forward => {
                ws.browser.go_forward().map(|_| None).map_err(|e| e.to_string())
            }
            ChromeCommand::Reload => ws.browser.reload().map(|_| None).map_err(|e| e.to_string()),
            ChromeCommand::Home => ws.browser.go_home().map(|_| None).map_err(|e| e.to_string()),
            ChromeCommand::NewTab => ws
                .browser
                .new_tab(&mut factory, None, TabOrigin::User)
                .map(|_| None)
                .map_err(|e| e.to_string()),
            ChromeCommand::CloseTab { id: tab } => {
                if let Err(e) = ws.browser.close_tab(tab) {
                    tracing::debug!("close tab refused: {}", e);
                }
                Ok(None)
            }
            ChromeCommand::SwitchTab { id: tab } => {
                ws.browser.switch_tab(tab).map(|_| None).map_err(|e| e.to_string())
            }
            ChromeCommand::MoveTab { id: tab, index } => ws
                .browser
                .move_tab(tab, index)
                .map(|_| None)
                .map_err(|e| e.to_string()),
            ChromeCommand::NewWindow => Ok(Some(ShellRequest::OpenWindow)),
            ChromeCommand::CloseWindow => Ok(Some(ShellRequest::CloseWindow)),
            ChromeCommand::Shortcut { keys } => match self.app.shortcut_manager.resolve(&keys) {
                Some(action) => ws
                    .browser
                    .perform(action, &mut factory)
                    .map_err(|e| e.to_string()),
                None => Ok(None),
            },
            ChromeCommand::Overlay { open } => ws
                .browser
                .set_overlay(open)
                .map(|_| None)
                .map_err(|e| e.to_string()),
        };
        drop(factory);

        let request = match outcome {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("chrome command failed: {}", e);
                None
            }
        };
        if request == Some(ShellRequest::FocusAddressBar) {
            ws.focus_address_bar();
        }
        ws.sync_chrome();
        self.dispatch_probes(id);
        request
    }

    fn handle_content(&mut self, id: WindowId, tab: TabId, message: ContentMessage) -> Option<ShellRequest> {
        match message.into_input() {
            ContentInput::Engine(event) => {
                self.handle_engine(id, tab, event);
                None
            }
            ContentInput::Shortcut(keys) => {
                let action = self.app.shortcut_manager.resolve(&keys)?;
                let ws = self.windows.get_mut(&id)?;
                let mut factory = WryViewFactory::new(
                    &ws.window,
                    &ws.host,
                    &mut self.context,
                    &self.options,
                    self.proxy.clone(),
                );
                let outcome = ws.browser.perform(action, &mut factory);
                drop(factory);
                let request = outcome.unwrap_or_else(|e| {
                    tracing::warn!("shortcut failed: {}", e);
                    None
                });
                if request == Some(ShellRequest::FocusAddressBar) {
                    ws.focus_address_bar();
                }
                ws.sync_chrome();
                self.dispatch_probes(id);
                request
            }
            ContentInput::ErrorPage(action) => {
                let ws = self.windows.get_mut(&id)?;
                if let Err(e) = ws.browser.handle_error_page_action(tab, action) {
                    tracing::warn!("error page action failed: {}", e);
                }
                ws.sync_chrome();
                self.dispatch_probes(id);
                None
            }
        }
    }

    fn handle_engine(&mut self, id: WindowId, tab: TabId, event: EngineEvent) {
        let Some(ws) = self.windows.get_mut(&id) else {
            return;
        };
        if let Err(e) = ws.browser.handle_engine_event(tab, event) {
            tracing::warn!(%tab, "engine event not applied: {}", e);
        }
        ws.sync_chrome();
        self.dispatch_probes(id);
    }

    fn handle_popup(&mut self, id: WindowId, url: String) {
        let Some(ws) = self.windows.get_mut(&id) else {
            return;
        };
        let mut factory = WryViewFactory::new(
            &ws.window,
            &ws.host,
            &mut self.context,
            &self.options,
            self.proxy.clone(),
        );
        if let Err(e) = ws.browser.open_popup(&mut factory, &url) {
            tracing::warn!(url = %url, "popup tab not opened: {}", e);
        }
        drop(factory);
        ws.sync_chrome();
    }

    /// Starts a load probe for each navigation the window recorded.
    #[cfg(feature = "network")]
    fn dispatch_probes(&mut self, id: WindowId) {
        let Some(ws) = self.windows.get_mut(&id) else {
            return;
        };
        let requests = ws.browser.take_probe_requests();
        let Some((runtime, probe)) = self.probe.as_ref() else {
            return;
        };
        for request in requests {
            let probe = probe.clone();
            let proxy = self.proxy.clone();
            runtime.spawn(async move {
                match probe.probe(&request.url).await {
                    Ok(status) => {
                        tracing::debug!(url = %request.url, status, "probe reached server");
                    }
                    Err(ProbeError::Unreachable(reason)) => {
                        let event = EngineEvent::LoadFailed {
                            generation: request.generation,
                            reason,
                        };
                        let _ = proxy.send_event(UserEvent::Engine {
                            window: id,
                            tab: request.tab,
                            event,
                        });
                    }
                    Err(e) => tracing::debug!(url = %request.url, "probe skipped: {}", e),
                }
            });
        }
    }

    #[cfg(not(feature = "network"))]
    fn dispatch_probes(&mut self, id: WindowId) {
        if let Some(ws) = self.windows.get_mut(&id) {
            ws.browser.take_probe_requests();
        }
    }
}

// ─── Main entry point ───

pub fn run() -> anyhow::Result<()> {
    let app = App::new(None)?;

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let mut shell = Shell::new(app, proxy)?;
    shell.open_window(&event_loop)?;

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        let (origin, request) = match event {
            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => (window_id, Some(ShellRequest::CloseWindow)),

            Event::WindowEvent {
                window_id,
                event: WindowEvent::Resized(size),
                ..
            } => {
                if let Some(ws) = shell.windows.get_mut(&window_id) {
                    ws.resize(size);
                }
                return;
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::Chrome { window, command } => {
                    (window, shell.handle_chrome(window, command))
                }
                UserEvent::Content {
                    window,
                    tab,
                    message,
                } => (window, shell.handle_content(window, tab, message)),
                UserEvent::Engine { window, tab, event } => {
                    shell.handle_engine(window, tab, event);
                    return;
                }
                UserEvent::Popup { window, url } => {
                    shell.handle_popup(window, url);
                    return;
                }
            },

            _ => return,
        };

        match request {
            Some(ShellRequest::OpenWindow) => {
                if let Err(e) = shell.open_window(target) {
                    tracing::error!("new window failed: {:#}", e);
                }
            }
            Some(ShellRequest::CloseWindow) => {
                if shell.close_window(origin) {
                    shell.app.shutdown();
                    *control_flow = ControlFlow::Exit;
                }
            }
            Some(ShellRequest::FocusAddressBar) | None => {}
        }
    });
}
