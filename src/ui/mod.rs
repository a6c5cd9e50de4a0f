//! Clow Browser UI layer.
//!
//! Uses `wry` for the platform webview and `tao` for windows:
//! - Windows: WebView2
//! - Linux: WebKitGTK
//! - macOS: WKWebView
//!
//! The chrome (tabs, toolbar, menu, status bar) is HTML/CSS/JS in its own
//! webview; each tab's page is a separate child webview.

pub mod webview_app;
pub mod wry_view;
