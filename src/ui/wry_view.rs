//! `EngineView` on top of a `wry` child webview.
//!
//! Each tab owns one child webview placed over the content area of its
//! window. Engine callbacks run on the UI thread but outside the event loop
//! handler, so they only post [`UserEvent`]s through the proxy.

use tao::event_loop::EventLoopProxy;
use tao::window::{Window, WindowId};
use wry::dpi::{LogicalPosition, LogicalSize};
use wry::{NewWindowResponse, PageLoadEvent, Rect, WebContext, WebView, WebViewBuilder};

use crate::engine::{EngineEvent, EngineView, ViewBounds, ViewFactory};
use crate::services::engine_profile::EngineProfile;
use crate::types::errors::EngineError;
use crate::types::ipc::ContentMessage;
use crate::types::tab::TabId;
use crate::ui::webview_app::UserEvent;

const BRIDGE_JS: &str = include_str!("../../resources/ui/content_bridge.js");

/// Builder options shared by every content view of the run.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub user_agent: String,
    pub incognito: bool,
    pub autoplay: bool,
    pub clipboard: bool,
    pub devtools: bool,
    /// Bridge script with the bound shortcut list and token filled in.
    pub init_script: String,
    pub ipc_token: String,
}

impl ViewOptions {
    pub fn new(profile: &EngineProfile, bound_keys: &[String], ipc_token: &str) -> Self {
        let keys = serde_json::to_string(bound_keys).unwrap_or_else(|_| "[]".to_string());
        let token = serde_json::to_string(ipc_token).unwrap_or_else(|_| "\"\"".to_string());
        Self {
            user_agent: profile.user_agent.clone(),
            incognito: !profile.persistent_cookies,
            autoplay: profile.features.autoplay,
            clipboard: profile.features.clipboard,
            devtools: profile.features.devtools,
            init_script: BRIDGE_JS
                .replace("__CLOW_TOKEN__", &token)
                .replace("__CLOW_SHORTCUTS__", &keys),
            ipc_token: ipc_token.to_string(),
        }
    }
}

pub(crate) fn to_rect(bounds: ViewBounds) -> Rect {
    Rect {
        position: LogicalPosition::new(bounds.x, bounds.y).into(),
        size: LogicalSize::new(bounds.width.max(0.0), bounds.height.max(0.0)).into(),
    }
}

fn command_error(e: wry::Error) -> EngineError {
    EngineError::Command(e.to_string())
}

/// Native container child webviews are attached to.
///
/// On Linux the webviews live in a `gtk::Fixed` packed into the window so
/// their bounds are honoured; elsewhere they are children of the window.
pub struct ViewHost {
    #[cfg(target_os = "linux")]
    fixed: gtk::Fixed,
}

impl ViewHost {
    #[cfg(target_os = "linux")]
    pub fn new(window: &Window) -> Result<Self, EngineError> {
        use gtk::prelude::*;
        use tao::platform::unix::WindowExtUnix;

        let vbox = window
            .default_vbox()
            .ok_or_else(|| EngineError::ViewCreation("window has no GTK container".into()))?;
        let fixed = gtk::Fixed::new();
        vbox.pack_start(&fixed, true, true, 0);
        fixed.show_all();
        Ok(Self { fixed })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn new(_window: &Window) -> Result<Self, EngineError> {
        Ok(Self {})
    }

    pub fn build(&self, window: &Window, builder: WebViewBuilder<'_>) -> Result<WebView, EngineError> {
        #[cfg(target_os = "linux")]
        let built = {
            use wry::WebViewBuilderExtUnix;
            let _ = window;
            builder.build_gtk(&self.fixed)
        };
        #[cfg(not(target_os = "linux"))]
        let built = builder.build_as_child(window);

        built.map_err(|e| EngineError::ViewCreation(e.to_string()))
    }
}

/// A tab's webview.
pub struct WryView {
    webview: WebView,
}

impl EngineView for WryView {
    fn load_url(&self, url: &str) -> Result<(), EngineError> {
        self.webview.load_url(url).map_err(command_error)
    }

    fn load_html(&self, html: &str) -> Result<(), EngineError> {
        self.webview.load_html(html).map_err(command_error)
    }

    // wry has no history API; the page's own history object is the engine's.
    fn go_back(&self) -> Result<(), EngineError> {
        self.webview
            .evaluate_script("history.back()")
            .map_err(command_error)
    }

    fn go_forward(&self) -> Result<(), EngineError> {
        self.webview
            .evaluate_script("history.forward()")
            .map_err(command_error)
    }

    fn reload(&self) -> Result<(), EngineError> {
        self.webview.reload().map_err(command_error)
    }

    fn set_visible(&self, visible: bool) -> Result<(), EngineError> {
        self.webview.set_visible(visible).map_err(command_error)
    }

    fn set_bounds(&self, bounds: ViewBounds) -> Result<(), EngineError> {
        self.webview.set_bounds(to_rect(bounds)).map_err(command_error)
    }

    fn reset_zoom(&self) -> Result<(), EngineError> {
        self.webview.zoom(1.0).map_err(command_error)
    }

    fn scroll_to_top(&self) -> Result<(), EngineError> {
        self.webview
            .evaluate_script("window.scrollTo(0, 0)")
            .map_err(command_error)
    }
}

/// Creates tab webviews inside one window, sharing the run's profile.
pub struct WryViewFactory<'a> {
    window: &'a Window,
    host: &'a ViewHost,
    context: &'a mut WebContext,
    options: &'a ViewOptions,
    proxy: EventLoopProxy<UserEvent>,
}

impl<'a> WryViewFactory<'a> {
    pub fn new(
        window: &'a Window,
        host: &'a ViewHost,
        context: &'a mut WebContext,
        options: &'a ViewOptions,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Self {
        Self {
            window,
            host,
            context,
            options,
            proxy,
        }
    }
}

impl ViewFactory for WryViewFactory<'_> {
    type View = WryView;

    fn create_view(
        &mut self,
        tab: TabId,
        url: &str,
        bounds: ViewBounds,
    ) -> Result<WryView, EngineError> {
        let window: WindowId = self.window.id();

        let load_proxy = self.proxy.clone();
        let title_proxy = self.proxy.clone();
        let ipc_proxy = self.proxy.clone();
        let popup_proxy = self.proxy.clone();
        let token = self.options.ipc_token.clone();

        let builder = WebViewBuilder::new_with_web_context(self.context)
            .with_url(url)
            .with_bounds(to_rect(bounds))
            .with_visible(false)
            .with_user_agent(&self.options.user_agent)
            .with_incognito(self.options.incognito)
            .with_autoplay(self.options.autoplay)
            .with_clipboard(self.options.clipboard)
            .with_devtools(self.options.devtools)
            .with_initialization_script(&self.options.init_script)
            .with_on_page_load_handler(move |event, url| {
                let event = match event {
                    PageLoadEvent::Started => EngineEvent::LoadStarted { url },
                    PageLoadEvent::Finished => EngineEvent::LoadFinished { url, ok: true },
                };
                let _ = load_proxy.send_event(UserEvent::Engine { window, tab, event });
            })
            .with_document_title_changed_handler(move |title| {
                let event = EngineEvent::TitleChanged { title };
                let _ = title_proxy.send_event(UserEvent::Engine { window, tab, event });
            })
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                let message = match ContentMessage::parse(request.body()) {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::debug!(%tab, "unrecognised content message: {}", e);
                        return;
                    }
                };
                let page_url = request.uri().to_string();
                if let Err(e) = message.verify(&token, &page_url) {
                    tracing::warn!(%tab, page = %page_url, "content message dropped: {}", e);
                    return;
                }
                let _ = ipc_proxy.send_event(UserEvent::Content {
                    window,
                    tab,
                    message,
                });
            })
            .with_new_window_req_handler(move |url, _features| {
                let _ = popup_proxy.send_event(UserEvent::Popup { window, url });
                NewWindowResponse::Deny
            });

        let webview = self.host.build(self.window, builder)?;
        tracing::debug!(%tab, url, "webview created");
        Ok(WryView { webview })
    }
}
