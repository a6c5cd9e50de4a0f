//! Window controller tests: tabs, navigation, load failure handling and the
//! chrome snapshot, driven through a recording engine view.

#[path = "../support/recording_view.rs"]
mod recording_view;

use clowbrowser::browser_window::{BrowserWindow, ShellRequest, WindowConfig};
use clowbrowser::engine::{EngineEvent, ViewBounds};
use clowbrowser::managers::shortcut_manager::Action;
use clowbrowser::managers::tab_manager::TabManagerTrait;
use clowbrowser::types::errors::{EngineError, NavigationError, TabError};
use clowbrowser::types::ipc::{ContentInput, ContentMessage, ErrorPageAction};
use clowbrowser::types::tab::{LoadState, TabId, TabOrigin};
use recording_view::{Call, RecordingFactory, RecordingView};

const HOME: &str = "https://www.google.com";

fn bounds() -> ViewBounds {
    ViewBounds {
        x: 0.0,
        y: 80.0,
        width: 1280.0,
        height: 696.0,
    }
}

fn window() -> (BrowserWindow<RecordingView>, RecordingFactory, TabId) {
    let mut factory = RecordingFactory::default();
    let mut w = BrowserWindow::new(WindowConfig::default(), bounds());
    let first = w
        .new_tab(&mut factory, None, TabOrigin::WindowStart)
        .unwrap();
    (w, factory, first)
}

fn load(w: &mut BrowserWindow<RecordingView>, tab: TabId, url: &str) {
    w.handle_engine_event(tab, EngineEvent::LoadStarted { url: url.into() })
        .unwrap();
    w.handle_engine_event(
        tab,
        EngineEvent::LoadFinished {
            url: url.into(),
            ok: true,
        },
    )
    .unwrap();
}

/// Navigates to `host` and lets the probe report it unreachable.
fn fail(w: &mut BrowserWindow<RecordingView>, tab: TabId, host: &str) {
    w.navigate(host).unwrap();
    let url = format!("https://{}/", host);
    w.handle_engine_event(tab, EngineEvent::LoadStarted { url })
        .unwrap();
    let probe = w.take_probe_requests().pop().unwrap();
    w.handle_engine_event(
        tab,
        EngineEvent::LoadFailed {
            generation: probe.generation,
            reason: "connection refused".into(),
        },
    )
    .unwrap();
}

// ─── Tabs ───

#[test]
fn test_first_tab_opens_home_and_is_visible() {
    let (w, factory, first) = window();
    assert_eq!(factory.created, vec![(first, HOME.to_string())]);
    assert_eq!(w.view(first).unwrap().visible(), Some(true));
    let tab = w.active_tab().unwrap();
    assert_eq!(tab.url, HOME);
    assert_eq!(tab.origin, TabOrigin::WindowStart);
    assert_eq!(tab.load, LoadState::Loading { progress: 0 });
}

#[test]
fn test_new_tab_takes_over_visibility() {
    let (mut w, mut factory, first) = window();
    let second = w
        .new_tab(&mut factory, Some("https://example.com/"), TabOrigin::User)
        .unwrap();

    assert_eq!(w.active_tab().unwrap().id, second);
    assert_eq!(w.view(first).unwrap().visible(), Some(false));
    assert_eq!(w.view(second).unwrap().visible(), Some(true));
    assert_eq!(w.view(second).unwrap().initial_url, "https://example.com/");
}

#[test]
fn test_switch_tab_swaps_visible_view() {
    let (mut w, mut factory, first) = window();
    let second = w.new_tab(&mut factory, None, TabOrigin::User).unwrap();

    w.switch_tab(first).unwrap();

    assert_eq!(w.view(first).unwrap().visible(), Some(true));
    assert_eq!(w.view(second).unwrap().visible(), Some(false));
    assert!(w.view(first).unwrap().calls().contains(&Call::Bounds(bounds())));
}

#[test]
fn test_last_tab_cannot_be_closed() {
    let (mut w, _factory, first) = window();
    assert!(matches!(w.close_active_tab(), Err(TabError::LastTab)));
    assert_eq!(w.tabs().tab_count(), 1);
    assert!(w.view(first).is_some());
}

#[test]
fn test_closing_active_tab_selects_right_neighbour() {
    let (mut w, mut factory, first) = window();
    let second = w.new_tab(&mut factory, None, TabOrigin::User).unwrap();
    let third = w.new_tab(&mut factory, None, TabOrigin::User).unwrap();
    w.switch_tab(second).unwrap();

    w.close_tab(second).unwrap();

    assert!(w.view(second).is_none());
    assert_eq!(w.active_tab().unwrap().id, third);
    assert_eq!(w.view(third).unwrap().visible(), Some(true));
    assert_eq!(w.view(first).unwrap().visible(), Some(false));
}

#[test]
fn test_view_creation_failure_leaves_tabs_untouched() {
    let (mut w, mut factory, first) = window();
    factory.fail_next = true;
    let result = w.new_tab(&mut factory, None, TabOrigin::User);
    assert!(matches!(result, Err(EngineError::ViewCreation(_))));
    assert_eq!(w.tabs().tab_count(), 1);
    assert_eq!(w.active_tab().unwrap().id, first);
}

#[test]
fn test_popups_open_network_urls_only() {
    let (mut w, mut factory, _) = window();
    assert_eq!(w.open_popup(&mut factory, "javascript:void(0)").unwrap(), None);
    assert_eq!(w.tabs().tab_count(), 1);

    let popup = w
        .open_popup(&mut factory, "https://popup.test/")
        .unwrap()
        .unwrap();
    let tab = w.active_tab().unwrap();
    assert_eq!(tab.id, popup);
    assert_eq!(tab.origin, TabOrigin::Popup);
}

#[test]
fn test_shutdown_destroys_every_view() {
    let (mut w, mut factory, first) = window();
    w.new_tab(&mut factory, None, TabOrigin::User).unwrap();
    assert_eq!(w.shutdown(), 2);
    assert!(w.view(first).is_none());
}

// ─── Navigation ───

#[test]
fn test_navigate_loads_resolved_address() {
    let (mut w, _factory, first) = window();
    w.navigate("example.com").unwrap();

    assert_eq!(
        w.view(first).unwrap().loaded_urls(),
        vec!["https://example.com/".to_string()]
    );
    assert_eq!(w.active_tab().unwrap().url, "https://example.com/");
    assert_eq!(w.render_chrome().status.unwrap().text, "Loading...");
}

#[test]
fn test_navigate_searches_plain_text() {
    let (mut w, _factory, first) = window();
    w.navigate("rust lang").unwrap();
    assert_eq!(
        w.view(first).unwrap().loaded_urls(),
        vec!["https://www.google.com/search?q=rust+lang".to_string()]
    );
}

#[test]
fn test_blank_input_does_nothing() {
    let (mut w, _factory, first) = window();
    w.render_chrome();
    w.navigate("   ").unwrap();
    assert!(w.view(first).unwrap().loaded_urls().is_empty());
    assert_eq!(w.render_chrome().status, None);
}

#[test]
fn test_invalid_address_reports_status() {
    let (mut w, _factory, first) = window();
    let err = w.navigate("example.com:99999").unwrap_err();
    assert!(matches!(err, NavigationError::InvalidUrl(_)));
    assert!(w.view(first).unwrap().loaded_urls().is_empty());

    let status = w.render_chrome().status.unwrap();
    assert_eq!(status.text, "Invalid URL");
    assert_eq!(status.timeout_ms, Some(3000));
}

#[test]
fn test_back_and_forward_follow_history() {
    let (mut w, _factory, first) = window();
    load(&mut w, first, "https://a.test/");
    load(&mut w, first, "https://b.test/");
    assert!(w.snapshot().can_go_back);
    assert!(!w.snapshot().can_go_forward);

    w.go_back().unwrap();
    assert!(w.view(first).unwrap().calls().contains(&Call::Back));
    load(&mut w, first, "https://a.test/");

    let snapshot = w.snapshot();
    assert!(!snapshot.can_go_back);
    assert!(snapshot.can_go_forward);

    w.go_forward().unwrap();
    assert!(w.view(first).unwrap().calls().contains(&Call::Forward));
}

#[test]
fn test_typing_previous_address_adds_an_entry() {
    let (mut w, _factory, first) = window();
    load(&mut w, first, "https://a.test/");
    w.navigate("b.test").unwrap();
    load(&mut w, first, "https://b.test/");

    w.navigate("a.test").unwrap();
    load(&mut w, first, "https://a.test/");

    let snapshot = w.snapshot();
    assert!(snapshot.can_go_back);
    assert!(!snapshot.can_go_forward);
    assert_eq!(
        w.active_tab().unwrap().history.entries(),
        &[
            "https://a.test/".to_string(),
            "https://b.test/".to_string(),
            "https://a.test/".to_string(),
        ]
    );
}

#[test]
fn test_home_after_going_back_clears_forward() {
    let (mut w, _factory, first) = window();
    load(&mut w, first, "https://a.test/");
    load(&mut w, first, "https://b.test/");
    load(&mut w, first, "https://c.test/");
    w.go_back().unwrap();
    load(&mut w, first, "https://b.test/");
    assert!(w.snapshot().can_go_forward);

    w.go_home().unwrap();
    load(&mut w, first, HOME);

    assert!(!w.snapshot().can_go_forward);
    assert_eq!(
        w.active_tab().unwrap().history.entries(),
        &[
            "https://a.test/".to_string(),
            "https://b.test/".to_string(),
            HOME.to_string(),
        ]
    );
}

#[test]
fn test_back_without_history_is_a_no_op() {
    let (mut w, _factory, first) = window();
    w.go_back().unwrap();
    w.go_forward().unwrap();
    let calls = w.view(first).unwrap().calls();
    assert!(!calls.contains(&Call::Back));
    assert!(!calls.contains(&Call::Forward));
}

#[test]
fn test_home_and_reload_actions() {
    let (mut w, mut factory, first) = window();
    load(&mut w, first, "https://a.test/");

    assert_eq!(w.perform(Action::Reload, &mut factory).unwrap(), None);
    assert!(w.view(first).unwrap().calls().contains(&Call::Reload));
    assert!(w.active_tab().unwrap().load.is_loading());

    w.perform(Action::Home, &mut factory).unwrap();
    assert_eq!(
        w.view(first).unwrap().loaded_urls().last().map(String::as_str),
        Some(HOME)
    );
}

#[test]
fn test_perform_tab_and_shell_actions() {
    let (mut w, mut factory, _) = window();

    w.perform(Action::NewTab, &mut factory).unwrap();
    assert_eq!(w.tabs().tab_count(), 2);
    w.perform(Action::CloseTab, &mut factory).unwrap();
    assert_eq!(w.tabs().tab_count(), 1);
    // Refused quietly on the last tab.
    assert_eq!(w.perform(Action::CloseTab, &mut factory).unwrap(), None);
    assert_eq!(w.tabs().tab_count(), 1);

    assert_eq!(
        w.perform(Action::FocusAddressBar, &mut factory).unwrap(),
        Some(ShellRequest::FocusAddressBar)
    );
    assert_eq!(
        w.perform(Action::NewWindow, &mut factory).unwrap(),
        Some(ShellRequest::OpenWindow)
    );
    assert_eq!(
        w.perform(Action::CloseWindow, &mut factory).unwrap(),
        Some(ShellRequest::CloseWindow)
    );
}

// ─── Engine events ───

#[test]
fn test_load_started_queues_probe_and_resets_zoom() {
    let (mut w, _factory, first) = window();
    w.handle_engine_event(
        first,
        EngineEvent::LoadStarted {
            url: "https://example.com/".into(),
        },
    )
    .unwrap();

    let probes = w.take_probe_requests();
    assert_eq!(probes.len(), 1);
    assert_eq!(probes[0].tab, first);
    assert_eq!(probes[0].generation, 1);
    assert_eq!(probes[0].url, "https://example.com/");
    assert!(w.take_probe_requests().is_empty());

    assert!(w.view(first).unwrap().calls().contains(&Call::ResetZoom));
    assert_eq!(w.render_chrome().status.unwrap().text, "Loading: example.com");
}

#[test]
fn test_local_loads_are_not_probed() {
    let (mut w, _factory, first) = window();
    w.handle_engine_event(
        first,
        EngineEvent::LoadStarted {
            url: "about:blank".into(),
        },
    )
    .unwrap();
    assert!(w.take_probe_requests().is_empty());
    assert_eq!(w.active_tab().unwrap().load_generation, 1);
}

#[test]
fn test_load_finished_commits_and_scrolls() {
    let (mut w, _factory, first) = window();
    w.render_chrome();
    load(&mut w, first, "https://example.com/");

    let tab = w.active_tab().unwrap();
    assert_eq!(tab.load, LoadState::Loaded);
    assert_eq!(tab.history.current(), Some("https://example.com/"));
    assert!(w.view(first).unwrap().calls().contains(&Call::ScrollTop));

    let status = w.render_chrome().status.unwrap();
    assert_eq!(status.text, "Page loaded");
    assert_eq!(status.timeout_ms, Some(2000));
}

#[test]
fn test_progress_is_shown_only_while_loading() {
    let (mut w, _factory, first) = window();
    w.handle_engine_event(
        first,
        EngineEvent::LoadStarted {
            url: "https://example.com/".into(),
        },
    )
    .unwrap();
    w.handle_engine_event(first, EngineEvent::LoadProgress { progress: 60 })
        .unwrap();
    assert_eq!(w.snapshot().progress, Some(60));

    w.handle_engine_event(first, EngineEvent::LoadProgress { progress: 250 })
        .unwrap();
    assert_eq!(w.snapshot().progress, None);

    w.handle_engine_event(
        first,
        EngineEvent::LoadFinished {
            url: "https://example.com/".into(),
            ok: true,
        },
    )
    .unwrap();
    w.handle_engine_event(first, EngineEvent::LoadProgress { progress: 10 })
        .unwrap();
    assert_eq!(w.snapshot().progress, None);
}

#[test]
fn test_same_document_url_change() {
    let (mut w, _factory, first) = window();
    load(&mut w, first, "https://a.test/");
    w.handle_engine_event(
        first,
        EngineEvent::UrlChanged {
            url: "https://a.test/#section".into(),
        },
    )
    .unwrap();

    assert_eq!(w.address_bar(), "a.test/#section");
    assert!(w.snapshot().can_go_back);
}

#[test]
fn test_cross_origin_url_change_is_ignored() {
    let (mut w, _factory, first) = window();
    load(&mut w, first, "https://evil.test/");
    let msg =
        ContentMessage::parse(r#"{"cmd":"url_changed","url":"https://bank.example/login"}"#).unwrap();
    match msg.into_input() {
        ContentInput::Engine(event) => w.handle_engine_event(first, event).unwrap(),
        other => panic!("unexpected input: {:?}", other),
    }

    assert_eq!(w.address_bar(), "evil.test");
    assert_eq!(w.active_tab().unwrap().url, "https://evil.test/");
    assert!(!w.snapshot().can_go_back);
}

#[test]
fn test_error_page_embeds_window_token() {
    let mut factory = RecordingFactory::default();
    let mut config = WindowConfig::default();
    config.ipc_token = "run-secret".to_string();
    let mut w = BrowserWindow::new(config, bounds());
    let first = w.new_tab(&mut factory, None, TabOrigin::WindowStart).unwrap();
    fail(&mut w, first, "down.test");

    let html = w.view(first).unwrap().last_html().unwrap();
    assert!(html.contains(r#""run-secret""#));
}

#[test]
fn test_title_drives_window_title_and_label() {
    let (mut w, _factory, first) = window();
    assert_eq!(w.window_title(), "Clow Browser");
    assert_eq!(w.snapshot().tabs[0].label, "New Tab");
    assert_eq!(w.snapshot().tabs[0].tooltip, HOME);

    w.handle_engine_event(
        first,
        EngineEvent::TitleChanged {
            title: "The Rust Programming Language".into(),
        },
    )
    .unwrap();

    let snapshot = w.snapshot();
    assert_eq!(
        snapshot.window_title,
        "The Rust Programming Language - Clow Browser"
    );
    assert_eq!(snapshot.tabs[0].label, "The Rust Programming Lang...");
    assert_eq!(snapshot.tabs[0].tooltip, "The Rust Programming Language");
    assert!(snapshot.tabs[0].active);
}

#[test]
fn test_blank_favicon_is_dropped() {
    let (mut w, _factory, first) = window();
    w.handle_engine_event(
        first,
        EngineEvent::IconChanged {
            href: Some("https://a.test/favicon.ico".into()),
        },
    )
    .unwrap();
    assert_eq!(
        w.snapshot().tabs[0].favicon.as_deref(),
        Some("https://a.test/favicon.ico")
    );

    w.handle_engine_event(
        first,
        EngineEvent::IconChanged {
            href: Some("  ".into()),
        },
    )
    .unwrap();
    assert_eq!(w.snapshot().tabs[0].favicon, None);
}

#[test]
fn test_events_for_unknown_tabs_are_dropped() {
    let (mut w, _factory, _) = window();
    w.handle_engine_event(
        TabId::new(),
        EngineEvent::LoadStarted {
            url: "https://a.test/".into(),
        },
    )
    .unwrap();
    assert!(w.take_probe_requests().is_empty());
}

// ─── Load failures ───

#[test]
fn test_probe_failure_shows_error_page() {
    let (mut w, _factory, first) = window();
    load(&mut w, first, "https://good.test/");
    fail(&mut w, first, "bad.test");

    let tab = w.active_tab().unwrap();
    assert_eq!(tab.load, LoadState::Failed);
    assert_eq!(tab.failed_url.as_deref(), Some("https://bad.test/"));

    let html = w.view(first).unwrap().last_html().unwrap();
    assert!(html.contains("https://bad.test/"));
    assert_eq!(w.address_bar(), "bad.test");

    let snapshot = w.render_chrome();
    assert_eq!(snapshot.status.unwrap().text, "Failed to load page");
    assert!(snapshot.can_go_back);
    assert!(!snapshot.can_go_forward);
    assert_eq!(snapshot.progress, None);
}

#[test]
fn test_error_page_load_keeps_failed_address() {
    let (mut w, _factory, first) = window();
    fail(&mut w, first, "bad.test");

    // The engine reports the error page's own load.
    load(&mut w, first, "about:blank");

    assert_eq!(w.address_bar(), "bad.test");
    assert!(w.active_tab().unwrap().shows_error_page());
}

#[test]
fn test_stale_probe_result_is_ignored() {
    let (mut w, _factory, first) = window();
    w.handle_engine_event(
        first,
        EngineEvent::LoadStarted {
            url: "https://slow.test/".into(),
        },
    )
    .unwrap();
    load(&mut w, first, "https://fast.test/");

    w.handle_engine_event(
        first,
        EngineEvent::LoadFailed {
            generation: 1,
            reason: "timed out".into(),
        },
    )
    .unwrap();

    assert!(!w.active_tab().unwrap().shows_error_page());
    assert_eq!(w.view(first).unwrap().last_html(), None);
}

#[test]
fn test_engine_error_url_counts_as_failure() {
    let (mut w, _factory, first) = window();
    w.navigate("bad.test").unwrap();
    w.handle_engine_event(
        first,
        EngineEvent::LoadStarted {
            url: "chrome-error://chromewebdata/".into(),
        },
    )
    .unwrap();

    let tab = w.active_tab().unwrap();
    assert_eq!(tab.failed_url.as_deref(), Some("https://bad.test/"));
    assert!(w.view(first).unwrap().last_html().is_some());
}

#[test]
fn test_unsuccessful_finish_counts_as_failure() {
    let (mut w, _factory, first) = window();
    w.handle_engine_event(
        first,
        EngineEvent::LoadFinished {
            url: "https://down.test/".into(),
            ok: false,
        },
    )
    .unwrap();
    assert!(w.active_tab().unwrap().shows_error_page());
}

#[test]
fn test_reload_on_error_page_retries_failed_url() {
    let (mut w, _factory, first) = window();
    fail(&mut w, first, "bad.test");
    w.view(first).unwrap().clear();

    w.reload().unwrap();

    assert_eq!(
        w.view(first).unwrap().loaded_urls(),
        vec!["https://bad.test/".to_string()]
    );
    assert!(!w.active_tab().unwrap().shows_error_page());
    assert_eq!(w.address_bar(), "bad.test");
}

#[test]
fn test_back_on_error_page_returns_to_last_good_page() {
    let (mut w, _factory, first) = window();
    load(&mut w, first, "https://good.test/");
    fail(&mut w, first, "bad.test");
    w.view(first).unwrap().clear();

    w.go_back().unwrap();

    let view = w.view(first).unwrap();
    assert_eq!(view.loaded_urls(), vec!["https://good.test/".to_string()]);
    assert!(!view.calls().contains(&Call::Back));
}

#[test]
fn test_error_page_buttons() {
    let (mut w, _factory, first) = window();

    // Ignored on ordinary pages.
    load(&mut w, first, "https://a.test/");
    w.view(first).unwrap().clear();
    w.handle_error_page_action(first, ErrorPageAction::Home)
        .unwrap();
    assert!(w.view(first).unwrap().loaded_urls().is_empty());

    fail(&mut w, first, "bad.test");
    w.view(first).unwrap().clear();
    w.handle_error_page_action(first, ErrorPageAction::Home)
        .unwrap();
    assert_eq!(w.view(first).unwrap().loaded_urls(), vec![HOME.to_string()]);
}

#[test]
fn test_failure_in_background_tab_keeps_status() {
    let (mut w, mut factory, first) = window();
    let second = w.new_tab(&mut factory, None, TabOrigin::User).unwrap();
    w.render_chrome();

    w.handle_engine_event(
        first,
        EngineEvent::LoadFinished {
            url: "https://down.test/".into(),
            ok: false,
        },
    )
    .unwrap();

    assert_eq!(w.render_chrome().status, None);
    assert!(w.tabs().get_tab(first).unwrap().shows_error_page());
    assert!(!w.tabs().get_tab(second).unwrap().shows_error_page());
}

// ─── Chrome ───

#[test]
fn test_status_is_rendered_once() {
    let (mut w, _factory, _) = window();
    assert_eq!(w.render_chrome().status.unwrap().text, "Ready");
    assert_eq!(w.render_chrome().status, None);
}

#[test]
fn test_overlay_hides_active_view() {
    let (mut w, _factory, first) = window();
    w.set_overlay(true).unwrap();
    assert!(w.is_overlay_open());
    assert_eq!(w.view(first).unwrap().visible(), Some(false));

    w.set_overlay(false).unwrap();
    assert_eq!(w.view(first).unwrap().visible(), Some(true));
}

#[test]
fn test_relayout_resizes_every_view() {
    let (mut w, mut factory, first) = window();
    let second = w.new_tab(&mut factory, None, TabOrigin::User).unwrap();
    let resized = ViewBounds {
        x: 0.0,
        y: 80.0,
        width: 800.0,
        height: 500.0,
    };

    w.relayout(resized).unwrap();

    assert_eq!(w.content_bounds(), resized);
    for id in [first, second] {
        assert_eq!(w.view(id).unwrap().calls().last(), Some(&Call::Bounds(resized)));
    }
}
