use crate::{
    ConsoleState, Effect, JobPhase, Msg, OperationPhase, ScrapeRequest, NETWORK_ERROR_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// One operation at a time: `SubmitClicked` only acts from `Idle`. From any
/// other phase it is rejected as a no-op; the caller must cancel or reset
/// first. This keeps exactly one poll loop alive and never silently replaces
/// an in-flight one.
pub fn update(mut state: ConsoleState, msg: Msg) -> (ConsoleState, Vec<Effect>) {
    let effects = match msg {
        Msg::CountryInput(text) => {
            state.set_country(text);
            Vec::new()
        }
        Msg::PowerSelected(power) => {
            state.set_power(power);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.phase() != OperationPhase::Idle {
                return (state, Vec::new());
            }
            match ScrapeRequest::new(state.form_country(), state.form_power()) {
                Ok(request) => {
                    let generation = state.begin_submission(request.clone());
                    vec![Effect::SubmitScrape {
                        generation,
                        request,
                    }]
                }
                Err(err) => {
                    state.set_form_error(err.to_string());
                    Vec::new()
                }
            }
        }
        Msg::SubmissionAccepted {
            generation,
            task_id,
            message,
        } => {
            state.accept_submission(generation, task_id, message);
            Vec::new()
        }
        Msg::SubmissionRejected {
            generation,
            message,
        } => {
            state.fail_submission(generation, message);
            Vec::new()
        }
        Msg::SubmissionUnreachable { generation } => {
            state.fail_submission(generation, NETWORK_ERROR_MESSAGE.to_string());
            Vec::new()
        }
        Msg::SnapshotReceived {
            generation,
            seq,
            snapshot,
        } => match state.apply_snapshot(generation, seq, snapshot) {
            Some(JobPhase::Completed) => vec![
                Effect::StopPolling,
                Effect::PersistMissionLog(state.missions().to_vec()),
            ],
            Some(JobPhase::Error) => vec![Effect::StopPolling],
            _ => Vec::new(),
        },
        Msg::PollingAborted {
            generation,
            message,
        } => {
            // The engine already stopped its own loop before reporting this.
            state.abort_polling(generation, message);
            Vec::new()
        }
        Msg::CancelClicked => {
            if state.cancel() {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::ResetClicked => {
            if state.reset() {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::RestoreMissionLog(records) => {
            state.restore_missions(records);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
