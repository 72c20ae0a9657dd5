use std::sync::Once;

use armory_core::{
    update, ConsoleState, Effect, Msg, OperationPhase, PowerCategory, ScrapeRequest,
    INITIALIZING_MESSAGE, NETWORK_ERROR_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ops_logging::initialize_for_tests);
}

fn submit(
    state: ConsoleState,
    country: &str,
    power: PowerCategory,
) -> (ConsoleState, Vec<Effect>) {
    let (state, _) = update(state, Msg::CountryInput(country.to_string()));
    let (state, _) = update(state, Msg::PowerSelected(power));
    update(state, Msg::SubmitClicked)
}

#[test]
fn submit_enters_submitting_and_emits_effect() {
    init_logging();
    let state = ConsoleState::new();

    let (mut state, effects) = submit(state, "  india  ", PowerCategory::Airpower);

    let request = ScrapeRequest::new("india", PowerCategory::Airpower).unwrap();
    assert_eq!(
        effects,
        vec![Effect::SubmitScrape {
            generation: 1,
            request,
        }]
    );
    let view = state.view();
    assert_eq!(view.phase, OperationPhase::Submitting);
    assert_eq!(view.progress, 0.0);
    assert_eq!(view.status_message.as_deref(), Some(INITIALIZING_MESSAGE));
    assert!(state.consume_dirty());
}

#[test]
fn blank_country_fails_fast_without_effect() {
    init_logging();
    let state = ConsoleState::new();

    let (state, effects) = submit(state, "   ", PowerCategory::All);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, OperationPhase::Idle);
    assert_eq!(view.form_error.as_deref(), Some("Country name is required"));
}

#[test]
fn editing_the_form_clears_the_validation_error() {
    init_logging();
    let state = ConsoleState::new();
    let (state, _effects) = submit(state, "", PowerCategory::Airpower);
    assert!(state.view().form_error.is_some());

    let (state, _effects) = update(state, Msg::CountryInput("russia".to_string()));
    assert!(state.view().form_error.is_none());
}

#[test]
fn accepted_submission_starts_running_with_server_message() {
    init_logging();
    let state = ConsoleState::new();
    let (state, _effects) = submit(state, "india", PowerCategory::Airpower);

    let (state, effects) = update(
        state,
        Msg::SubmissionAccepted {
            generation: 1,
            task_id: "abc123".to_string(),
            message: Some("Scraping operation queued".to_string()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, OperationPhase::Running);
    assert_eq!(
        view.status_message.as_deref(),
        Some("Scraping operation queued")
    );
}

#[test]
fn rejected_submission_surfaces_server_message() {
    init_logging();
    let state = ConsoleState::new();
    let (state, _effects) = submit(state, "india", PowerCategory::Airpower);

    let (state, effects) = update(
        state,
        Msg::SubmissionRejected {
            generation: 1,
            message: "target not supported".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, OperationPhase::Error);
    assert_eq!(view.error.as_deref(), Some("target not supported"));
}

#[test]
fn unreachable_submission_reports_network_error() {
    init_logging();
    let state = ConsoleState::new();
    let (state, _effects) = submit(state, "india", PowerCategory::Airpower);

    let (state, effects) = update(state, Msg::SubmissionUnreachable { generation: 1 });

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, OperationPhase::Error);
    assert_eq!(view.error.as_deref(), Some(NETWORK_ERROR_MESSAGE));
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    init_logging();
    let state = ConsoleState::new();
    let (state, _effects) = submit(state, "india", PowerCategory::Airpower);
    let (state, _effects) = update(
        state,
        Msg::SubmissionAccepted {
            generation: 1,
            task_id: "abc123".to_string(),
            message: None,
        },
    );

    let (state, effects) = submit(state, "russia", PowerCategory::Landpower);

    assert!(effects.is_empty());
    assert_eq!(state.view().phase, OperationPhase::Running);
    assert_eq!(state.generation(), 1);
}

#[test]
fn cancel_stops_polling_and_is_safe_to_repeat() {
    init_logging();
    let state = ConsoleState::new();
    let (state, _effects) = submit(state, "india", PowerCategory::Airpower);
    let (state, _effects) = update(
        state,
        Msg::SubmissionAccepted {
            generation: 1,
            task_id: "abc123".to_string(),
            message: None,
        },
    );

    let (state, effects) = update(state, Msg::CancelClicked);
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(state.view().phase, OperationPhase::Idle);

    // Already idle: repeat cancels are no-ops.
    let (mut state, effects) = update(state, Msg::CancelClicked);
    assert!(effects.is_empty());
    state.consume_dirty();
    let before = state.view();
    let (state, effects) = update(state, Msg::CancelClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}

#[test]
fn stale_generation_events_are_ignored_after_cancel() {
    init_logging();
    let state = ConsoleState::new();
    let (state, _effects) = submit(state, "india", PowerCategory::Airpower);

    let (mut state, _effects) = update(state, Msg::CancelClicked);
    state.consume_dirty();
    let before = state.view();

    // The submission response from the cancelled operation resolves late.
    let (mut state, effects) = update(
        state,
        Msg::SubmissionAccepted {
            generation: 1,
            task_id: "abc123".to_string(),
            message: None,
        },
    );

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view(), before);
}

#[test]
fn restore_mission_log_populates_view() {
    init_logging();
    let state = ConsoleState::new();

    let (state, effects) = update(
        state,
        Msg::RestoreMissionLog(vec![armory_core::MissionRecord {
            country: "india".to_string(),
            power: PowerCategory::Airpower,
            records: 42,
        }]),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.missions.len(), 1);
    assert_eq!(view.missions[0].country, "india");
    assert_eq!(view.missions[0].records, 42);
}

#[test]
fn tick_and_noop_change_nothing() {
    init_logging();
    let mut state = ConsoleState::new();
    state.consume_dirty();
    let before = state.view();

    let (state, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    let (mut state, effects) = update(state, Msg::NoOp);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view(), before);
}
