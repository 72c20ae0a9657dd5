use std::sync::Arc;
use std::time::Duration;

use armory_app::console::{persistence, runner};
use armory_core::{CategoryStatus, ConsoleState, OperationPhase, PowerCategory};
use armory_engine::{ApiSettings, EngineHandle, HttpArmoryApi, PollSettings};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> EngineHandle {
    let api = HttpArmoryApi::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("api client");
    EngineHandle::new(
        Arc::new(api),
        PollSettings {
            interval: Duration::from_millis(20),
            ..PollSettings::default()
        },
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn scrape_mission_completes_and_persists_the_log() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "task_id": "abc123",
            "message": "Scraping operation started",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": "running",
            "progress": 30.0,
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": "completed",
            "progress": 100.0,
            "data": { "airpower": { "status": "success", "count": 42 } },
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let temp = TempDir::new().unwrap();
    let state_dir = temp.path().to_path_buf();

    let view = tokio::task::spawn_blocking(move || {
        runner::run_mission(
            &engine,
            ConsoleState::new(),
            &state_dir,
            "india",
            PowerCategory::Airpower,
            |_| {},
        )
    })
    .await
    .unwrap();

    assert_eq!(view.phase, OperationPhase::Completed);
    assert_eq!(view.progress, 100.0);
    assert_eq!(view.categories.len(), 1);
    assert_eq!(view.categories[0].name, "airpower");
    assert_eq!(view.categories[0].status, CategoryStatus::Success);
    assert_eq!(view.categories[0].count, 42);
    assert_eq!(view.missions.len(), 1);

    let log = persistence::load_mission_log(temp.path());
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].country, "india");
    assert_eq!(log[0].power, PowerCategory::Airpower);
    assert_eq!(log[0].records, 42);
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_country_never_reaches_the_network() {
    let server = MockServer::start().await;
    let engine = engine_for(&server);
    let temp = TempDir::new().unwrap();
    let state_dir = temp.path().to_path_buf();

    let view = tokio::task::spawn_blocking(move || {
        runner::run_mission(
            &engine,
            ConsoleState::new(),
            &state_dir,
            "   ",
            PowerCategory::All,
            |_| {},
        )
    })
    .await
    .unwrap();

    assert_eq!(view.phase, OperationPhase::Idle);
    assert_eq!(view.form_error.as_deref(), Some("Country name is required"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn reported_job_error_surfaces_in_the_final_view() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "task_id": "abc123",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": "error",
            "progress": 55.0,
            "message": "scraper pool exhausted",
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let temp = TempDir::new().unwrap();
    let state_dir = temp.path().to_path_buf();

    let view = tokio::task::spawn_blocking(move || {
        runner::run_mission(
            &engine,
            ConsoleState::new(),
            &state_dir,
            "india",
            PowerCategory::Landpower,
            |_| {},
        )
    })
    .await
    .unwrap();

    assert_eq!(view.phase, OperationPhase::Error);
    assert_eq!(view.error.as_deref(), Some("scraper pool exhausted"));
    // Failed operations never reach the mission log.
    assert!(persistence::load_mission_log(temp.path()).is_empty());
}
