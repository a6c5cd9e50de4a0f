//! Clow Browser: a tabbed desktop browser shell around the platform webview.
//!
//! Entry point: opens the browser window on the platform webview.
//! When built without the `gui` feature, runs a console walkthrough of the
//! components against an engine view that prints the commands it receives.

#[cfg(feature = "gui")]
fn main() -> anyhow::Result<()> {
    clowbrowser::logging::init();
    clowbrowser::ui::webview_app::run()
}

#[cfg(not(feature = "gui"))]
fn main() -> anyhow::Result<()> {
    clowbrowser::logging::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Clow Browser v{} - Demo Mode                 ║", env!("CARGO_PKG_VERSION"));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo::settings()?;
    demo::theme();
    demo::shortcuts();
    demo::address_bar();
    demo::profile()?;
    demo::window()?;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo finished. Build with the `gui` feature for the real window.");
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

#[cfg(not(feature = "gui"))]
mod demo {
    use clowbrowser::browser_window::{BrowserWindow, WindowConfig};
    use clowbrowser::engine::{EngineEvent, EngineView, ViewBounds, ViewFactory};
    use clowbrowser::types::errors::EngineError;
    use clowbrowser::types::tab::TabId;

    fn section(name: &str) {
        println!("───────────────────────────────────────────────────────────────");
        println!("  📦 {}", name);
        println!("───────────────────────────────────────────────────────────────");
    }

    /// Engine view that prints every command.
    struct PrintView {
        tab: TabId,
    }

    impl PrintView {
        fn say(&self, what: &str) -> Result<(), EngineError> {
            let id = self.tab.to_string();
            println!("    [view {}] {}", &id[..8], what);
            Ok(())
        }
    }

    impl EngineView for PrintView {
        fn load_url(&self, url: &str) -> Result<(), EngineError> {
            self.say(&format!("load_url {}", url))
        }
        fn load_html(&self, html: &str) -> Result<(), EngineError> {
            self.say(&format!("load_html ({} bytes)", html.len()))
        }
        fn go_back(&self) -> Result<(), EngineError> {
            self.say("go_back")
        }
        fn go_forward(&self) -> Result<(), EngineError> {
            self.say("go_forward")
        }
        fn reload(&self) -> Result<(), EngineError> {
            self.say("reload")
        }
        fn set_visible(&self, visible: bool) -> Result<(), EngineError> {
            self.say(&format!("set_visible {}", visible))
        }
        fn set_bounds(&self, _bounds: ViewBounds) -> Result<(), EngineError> {
            Ok(())
        }
        fn reset_zoom(&self) -> Result<(), EngineError> {
            self.say("reset_zoom")
        }
        fn scroll_to_top(&self) -> Result<(), EngineError> {
            self.say("scroll_to_top")
        }
    }

    struct PrintFactory;

    impl ViewFactory for PrintFactory {
        type View = PrintView;

        fn create_view(
            &mut self,
            tab: TabId,
            url: &str,
            _bounds: ViewBounds,
        ) -> Result<PrintView, EngineError> {
            let view = PrintView { tab };
            view.say(&format!("created on {}", url))?;
            Ok(view)
        }
    }

    pub fn settings() -> anyhow::Result<()> {
        use clowbrowser::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
        section("Settings Engine");

        let path = std::env::temp_dir().join("clowbrowser_demo_settings.json");
        let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
        let settings = engine.load()?;
        println!("  Home page: {}", settings.general.home_page);
        println!("  Theme: {:?}", settings.appearance.theme);
        println!("  Cache limit: {} MB", settings.engine.cache_max_size_mb);

        engine.set_value("general.home_page", serde_json::json!("https://www.rust-lang.org"))?;
        println!("  Changed home page to: {}", engine.get_settings().general.home_page);

        engine.reset()?;
        println!("  Reset to defaults: {}", engine.get_settings().general.home_page);
        let _ = std::fs::remove_file(&path);
        println!("  ✓ SettingsEngine OK");
        println!();
        Ok(())
    }

    pub fn theme() {
        use clowbrowser::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
        use clowbrowser::types::settings::ThemeMode;
        section("Theme Engine");

        let mut engine = ThemeEngine::new(ThemeMode::Dark);
        println!("  Dark: {}", engine.css_root_block());
        engine.set_theme(ThemeMode::Light);
        println!("  Light window background: {}", engine.get_css_variables()["--window-bg"]);
        println!("  ✓ ThemeEngine OK");
        println!();
    }

    pub fn shortcuts() {
        use clowbrowser::managers::shortcut_manager::{ShortcutManager, ShortcutManagerTrait};
        section("Shortcut Manager");

        let mgr = ShortcutManager::new();
        for keys in mgr.bound_keys() {
            println!("  {:<12} → {:?}", keys, mgr.resolve(&keys));
        }
        println!("  Conflict for Ctrl+T: {:?}", mgr.has_conflict("Ctrl+T", None));
        println!("  ✓ ShortcutManager OK");
        println!();
    }

    pub fn address_bar() {
        use clowbrowser::services::url_resolver::{display_url, resolve_input, tab_label};
        section("Address Bar");

        let search = "https://www.google.com/search";
        for input in ["example.com", "rust borrow checker", "localhost", "http://a.b/c"] {
            println!("  {:<22} → {:?}", input, resolve_input(input, search));
        }
        println!("  display https://example.com/ → {:?}", display_url("https://example.com/", true));
        println!("  label → {}", tab_label("The Rust Programming Language Book", 25));
        println!("  ✓ URL resolution OK");
        println!();
    }

    pub fn profile() -> anyhow::Result<()> {
        use clowbrowser::services::engine_env;
        use clowbrowser::services::engine_profile::EngineProfile;
        use clowbrowser::types::settings::EngineSettings;
        section("Engine Profile");

        let profile = EngineProfile::from_settings(&EngineSettings::default())?;
        println!("  User agent: {}", profile.user_agent);
        println!("  Storage: {}", profile.storage_dir.display());
        println!("  Flags: {}", profile.browser_args().join(" "));
        for (key, value) in engine_env::plan(&profile, |_| None) {
            println!("  {}={}", key, value);
        }
        println!("  ✓ EngineProfile OK");
        println!();
        Ok(())
    }

    pub fn window() -> anyhow::Result<()> {
        section("Browser Window");

        let mut factory = PrintFactory;
        let mut window: BrowserWindow<PrintView> =
            BrowserWindow::new(WindowConfig::default(), ViewBounds::default());
        let first = window.new_tab(&mut factory, None, clowbrowser::types::tab::TabOrigin::WindowStart)?;
        window.handle_engine_event(first, EngineEvent::LoadStarted { url: "https://www.google.com/".into() })?;
        window.handle_engine_event(first, EngineEvent::TitleChanged { title: "Google".into() })?;
        window.handle_engine_event(first, EngineEvent::LoadFinished { url: "https://www.google.com/".into(), ok: true })?;
        let chrome = window.render_chrome();
        println!("  Title: {} | Address: {}", chrome.window_title, chrome.address_bar);

        window.navigate("no-such-host.invalid")?;
        window.handle_engine_event(first, EngineEvent::LoadStarted { url: "https://no-such-host.invalid/".into() })?;
        for probe in window.take_probe_requests() {
            window.handle_engine_event(
                probe.tab,
                EngineEvent::LoadFailed { generation: probe.generation, reason: "dns error".into() },
            )?;
        }
        let chrome = window.render_chrome();
        println!("  After failure: address={} status={:?}", chrome.address_bar, chrome.status.map(|s| s.text));

        if let Err(e) = window.close_active_tab() {
            println!("  Closing the last tab: {}", e);
        }
        println!("  ✓ BrowserWindow OK");
        Ok(())
    }
}
