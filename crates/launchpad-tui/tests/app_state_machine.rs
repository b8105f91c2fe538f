//! State machine tests for the TUI App.
//!
//! Each test spawns a mock backend on a separate thread (to avoid nested tokio runtime panics),
//! creates a BlockingHttpService, builds an App, and simulates key events to test panel transitions.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use launchpad_core::details::{INVALID_SCHEME_MESSAGE, LOAD_FAILED_MESSAGE};
use launchpad_core::{Panel, ReportCategory, ScrollLock};
use launchpad_server::test_helpers::{spawn_mock_backend, MockBackend, RequestLog};
use launchpad_service::BlockingHttpService;
use launchpad_tui::app::App;
use launchpad_tui::apply::{REPORT_CREATED_MESSAGE, REPORT_FAILED_MESSAGE};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde_json::json;

const WAIT: Duration = Duration::from_secs(5);

/// Spawn the mock backend on a separate thread, return the base URL and its request log.
/// BlockingHttpService creates its own tokio Runtime, so the server
/// must live in a separate thread's Runtime to avoid nesting.
fn spawn_backend(backend: MockBackend) -> (String, RequestLog) {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let server = spawn_mock_backend(backend).await;
            tx.send((server.base_url.clone(), server.requests.clone()))
                .unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        app.handle_key(char_key(c));
    }
}

fn make_app_with(backend: MockBackend, token: Option<&str>) -> (App, RequestLog) {
    let (url, log) = spawn_backend(backend);
    let svc = BlockingHttpService::new(&url).unwrap();
    (App::new(svc, token.map(String::from)), log)
}

fn make_app(token: Option<&str>) -> (App, RequestLog) {
    make_app_with(MockBackend::default(), token)
}

/// Open the highlighted scheme and wait for its details to settle.
fn open_and_load(app: &mut App) {
    app.handle_key(key(KeyCode::Enter));
    assert!(app.apply().is_open());
    assert!(app.wait_load(WAIT), "details never settled");
}

fn draw(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

// ---- Browsing ----

#[test]
fn app_starts_on_list() {
    let (app, log) = make_app(None);
    assert_eq!(app.list().len(), 3);
    assert!(!app.apply().is_open());
    assert!(!app.scroll_lock().is_locked());
    assert!(!app.is_input_mode());
    assert_eq!(log.count_path("/api/schemes"), 1);
}

#[test]
fn list_failure_is_not_fatal() {
    let (app, _) = make_app_with(
        MockBackend {
            schemes_status: 500,
            ..MockBackend::default()
        },
        None,
    );
    assert!(app.list().is_empty());
    assert!(app.status_message().unwrap().starts_with("Error fetching schemes"));
}

#[test]
fn reload_refetches_list() {
    let (mut app, log) = make_app(None);
    app.handle_key(char_key('R'));
    assert_eq!(log.count_path("/api/schemes"), 2);
}

#[test]
fn click_selects_row() {
    let (mut app, _) = make_app(None);
    draw(&mut app);
    // Title bar is row 0 and the list border row 1, so the second scheme is on row 3.
    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 5,
        row: 3,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(app.list().selected_index(), Some(1));
}

// ---- Fetch outcomes ----

#[test]
fn open_fetches_details() {
    let (mut app, log) = make_app(None);
    open_and_load(&mut app);

    let details = app.apply().load().details().unwrap();
    assert_eq!(details.criteria.len(), 2);
    assert_eq!(details.documents.len(), 2);
    assert_eq!(log.count_path("/api/schemes/1/criteria/"), 1);
    assert_eq!(log.count_path("/api/schemes/1/documents/"), 1);
    assert!(!app.needs_polling());
}

#[test]
fn failed_fetch_shows_message() {
    let (mut app, _) = make_app_with(
        MockBackend {
            criteria_status: 500,
            ..MockBackend::default()
        },
        None,
    );
    open_and_load(&mut app);
    assert_eq!(app.apply().load().error(), Some(LOAD_FAILED_MESSAGE));
    assert!(app.apply().load().details().is_none());
    assert!(draw(&mut app).contains(LOAD_FAILED_MESSAGE));
}

#[test]
fn failed_fetch_keeps_scheme_fields() {
    let (mut app, _) = make_app_with(
        MockBackend {
            criteria_status: 500,
            ..MockBackend::default()
        },
        Some("tok"),
    );
    open_and_load(&mut app);

    let screen = draw(&mut app);
    assert!(screen.contains(LOAD_FAILED_MESSAGE));
    assert!(screen.contains("Department: Agriculture"));
    assert!(screen.contains("Apply: https://pmkisan.gov.in"));
    assert!(screen.contains("[s] Save for later"));
    assert!(screen.contains("Not sure how to apply?"));
    assert!(!screen.contains("Eligibility Criteria"));

    app.handle_key(char_key('s'));
    assert!(app.apply().visibility().toast());
}

#[test]
fn retry_after_failure_refetches() {
    let (mut app, log) = make_app_with(
        MockBackend {
            documents_status: 404,
            ..MockBackend::default()
        },
        None,
    );
    open_and_load(&mut app);
    app.handle_key(char_key('R'));
    assert!(app.wait_load(WAIT));
    assert_eq!(log.count_path("/api/schemes/1/documents/"), 2);
}

#[test]
fn scheme_without_id_makes_no_request() {
    let (mut app, log) = make_app(None);
    app.handle_key(char_key('G'));
    app.handle_key(key(KeyCode::Enter));

    assert!(app.apply().is_open());
    assert_eq!(app.apply().load().error(), Some(INVALID_SCHEME_MESSAGE));
    assert!(!app.needs_polling());
    assert_eq!(log.len(), 1);
}

#[test]
fn loading_is_rendered_until_results_arrive() {
    let (mut app, _) = make_app_with(
        MockBackend {
            details_delay: Some(Duration::from_millis(300)),
            ..MockBackend::default()
        },
        None,
    );
    app.handle_key(key(KeyCode::Enter));
    assert!(app.needs_polling());
    let screen = draw(&mut app);
    assert!(screen.contains("Loading..."));
    assert!(screen.contains("Department: Agriculture"));
    assert!(screen.contains("Not sure how to apply?"));

    assert!(app.wait_load(WAIT));
    let screen = draw(&mut app);
    assert!(screen.contains("Eligibility Criteria"));
    assert!(screen.contains("Aadhaar card"));
}

#[test]
fn switching_schemes_discards_stale_fetch() {
    let (mut app, _) = make_app_with(
        MockBackend {
            details_delay: Some(Duration::from_millis(200)),
            ..MockBackend::default()
        },
        None,
    );
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Esc));
    app.handle_key(char_key('j'));
    app.handle_key(key(KeyCode::Enter));

    assert!(app.wait_load(WAIT));
    assert_eq!(app.apply().load().scheme_id(), Some(2));
    assert!(app.apply().load().details().is_some());
    // Nothing left in flight from the first scheme.
    assert!(!app.poll_load());
}

// ---- Scroll lock ----

#[test]
fn scroll_lock_held_while_panel_open() {
    let (mut app, _) = make_app(None);
    app.handle_key(key(KeyCode::Enter));
    assert!(app.scroll_lock().is_locked());
    assert_eq!(app.scroll_lock().holders(), 1);

    app.handle_key(key(KeyCode::Esc));
    assert!(!app.apply().is_open());
    assert!(!app.scroll_lock().is_locked());
}

#[test]
fn scroll_lock_released_when_app_dropped() {
    let lock = ScrollLock::new();
    let (url, _) = spawn_backend(MockBackend::default());
    let svc = BlockingHttpService::new(&url).unwrap();
    let mut app = App::with_scroll_lock(svc, None, lock.clone());
    app.handle_key(key(KeyCode::Enter));
    assert!(lock.is_locked());

    drop(app);
    assert!(!lock.is_locked());
}

#[test]
fn locked_list_ignores_navigation() {
    let lock = ScrollLock::new();
    let guard = lock.acquire();
    let (url, _) = spawn_backend(MockBackend::default());
    let svc = BlockingHttpService::new(&url).unwrap();
    let mut app = App::with_scroll_lock(svc, None, lock.clone());

    app.handle_key(char_key('j'));
    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(app.list().selected_index(), Some(0));

    drop(guard);
    app.handle_key(char_key('j'));
    assert_eq!(app.list().selected_index(), Some(1));
}

#[test]
fn q_closes_panel_instead_of_quitting() {
    let (mut app, _) = make_app(None);
    app.handle_key(key(KeyCode::Enter));
    assert!(app.is_input_mode());
    app.handle_key(char_key('q'));
    assert!(!app.apply().is_open());
    assert!(!app.is_input_mode());
}

// ---- Description overflow ----

#[test]
fn read_more_toggles_without_request() {
    let (mut app, log) = make_app(None);
    open_and_load(&mut app);
    assert!(draw(&mut app).contains("Read More"));
    assert!(app.apply().overflow().is_long());
    let before = log.len();

    app.handle_key(char_key('m'));
    assert!(app.apply().overflow().is_expanded());
    assert!(draw(&mut app).contains("Read Less"));

    app.handle_key(char_key('m'));
    assert!(!app.apply().overflow().is_expanded());
    assert_eq!(log.len(), before);
}

#[test]
fn short_description_has_no_toggle() {
    let (mut app, _) = make_app(None);
    app.handle_key(char_key('j'));
    open_and_load(&mut app);
    assert!(!draw(&mut app).contains("Read More"));
    app.handle_key(char_key('m'));
    assert!(!app.apply().overflow().is_expanded());
}

// ---- Nested panels ----

#[test]
fn how_to_apply_releases_capture() {
    let (mut app, _) = make_app(None);
    open_and_load(&mut app);
    assert!(app.apply().visibility().blocks_background_interaction());

    app.handle_key(char_key('h'));
    assert_eq!(app.apply().visibility().topmost(), Some(Panel::HowToApply));
    assert!(!app.apply().visibility().blocks_background_interaction());

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.apply().visibility().topmost(), Some(Panel::Primary));
    assert!(app.apply().is_open());
}

// ---- Reports ----

#[test]
fn report_success_resets_and_alerts() {
    let (mut app, log) = make_app(Some("tok"));
    open_and_load(&mut app);

    app.handle_key(char_key('r'));
    assert_eq!(app.apply().visibility().topmost(), Some(Panel::ReportForm));

    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "test");
    assert_eq!(
        app.apply().report.draft.category,
        Some(ReportCategory::IncorrectInfo)
    );
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.alert(), Some(REPORT_CREATED_MESSAGE));
    assert!(!app.apply().visibility().is_open(Panel::ReportForm));
    assert!(app.apply().report.draft.is_empty());

    let sent = log.last_for("/api/feedback/scheme-reports/").unwrap();
    assert_eq!(sent.authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(
        sent.body,
        Some(json!({
            "scheme_id": 1,
            "description": "test",
            "report_category": "incorrect_info"
        }))
    );

    // The alert swallows keys until dismissed.
    app.handle_key(key(KeyCode::Esc));
    assert!(app.alert().is_none());
    assert!(app.apply().is_open());
}

#[test]
fn report_failure_keeps_draft() {
    let (mut app, _) = make_app_with(
        MockBackend {
            report_status: 500,
            ..MockBackend::default()
        },
        Some("tok"),
    );
    open_and_load(&mut app);
    app.handle_key(char_key('r'));
    app.handle_key(key(KeyCode::Left));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "broken link");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.alert(), Some(REPORT_FAILED_MESSAGE));
    app.handle_key(key(KeyCode::Enter));
    assert!(app.apply().visibility().is_open(Panel::ReportForm));
    assert_eq!(app.apply().report.draft.description, "broken link");
    assert_eq!(
        app.apply().report.draft.category,
        Some(ReportCategory::Other)
    );
}

#[test]
fn incomplete_report_is_not_sent() {
    let (mut app, log) = make_app(Some("tok"));
    open_and_load(&mut app);
    app.handle_key(char_key('r'));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "no category picked");
    app.handle_key(key(KeyCode::Enter));

    assert!(app.alert().is_none());
    assert_eq!(app.apply().report.hint(), Some("category is required"));
    assert_eq!(log.count_path("/api/feedback/scheme-reports/"), 0);
}

#[test]
fn report_without_token_prompts_sign_in() {
    let (mut app, log) = make_app(None);
    open_and_load(&mut app);
    app.handle_key(char_key('r'));

    assert_eq!(app.apply().visibility().topmost(), Some(Panel::SavePrompt));
    assert!(!app.apply().visibility().is_open(Panel::ReportForm));
    assert_eq!(log.count_path("/api/feedback/scheme-reports/"), 0);

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.apply().visibility().topmost(), Some(Panel::Primary));
}

#[test]
fn cancel_report_discards_draft() {
    let (mut app, _) = make_app(Some("tok"));
    open_and_load(&mut app);
    app.handle_key(char_key('r'));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "draft");
    app.handle_key(key(KeyCode::Esc));

    assert!(!app.apply().visibility().is_open(Panel::ReportForm));
    assert!(app.apply().report.draft.is_empty());
}

// ---- Save for later ----

#[test]
fn save_shows_toast() {
    let (mut app, log) = make_app(Some("tok"));
    open_and_load(&mut app);
    app.handle_key(char_key('s'));

    assert!(app.apply().visibility().toast());
    assert_eq!(log.count_path("/api/schemes/1/save/"), 1);

    app.handle_key(char_key('j'));
    assert!(!app.apply().visibility().toast());
}

#[test]
fn save_without_token_prompts_sign_in() {
    let (mut app, log) = make_app(None);
    open_and_load(&mut app);
    app.handle_key(char_key('s'));
    assert_eq!(app.apply().visibility().topmost(), Some(Panel::SavePrompt));
    assert_eq!(log.count_path("/api/schemes/1/save/"), 0);
}

#[test]
fn save_failure_prompts_sign_in() {
    let (mut app, _) = make_app_with(
        MockBackend {
            save_status: 401,
            ..MockBackend::default()
        },
        Some("expired"),
    );
    open_and_load(&mut app);
    app.handle_key(char_key('s'));
    assert!(!app.apply().visibility().toast());
    assert_eq!(app.apply().visibility().topmost(), Some(Panel::SavePrompt));
}

#[test]
fn save_not_offered_without_apply_link() {
    let (mut app, log) = make_app(Some("tok"));
    app.handle_key(char_key('j'));
    open_and_load(&mut app);
    app.handle_key(char_key('s'));
    assert_eq!(app.apply().visibility().topmost(), Some(Panel::Primary));
    assert_eq!(log.count_path("/api/schemes/2/save/"), 0);
}
