use std::path::Path;
use std::time::Duration;

use armory_core::{update, ConsoleState, ConsoleViewModel, Msg, OperationPhase, PowerCategory};
use armory_engine::EngineHandle;

use super::effects::{msg_from_event, EffectRunner};

const EVENT_WAIT: Duration = Duration::from_millis(250);

/// Drives one acquisition operation to its terminal phase.
///
/// Feeds the submit through the state machine, executes the resulting
/// effects, then pumps engine events back into the machine until it reaches
/// `Completed` or `Error`. `on_view` fires for every dirty state, the final
/// one included. Returns early when validation rejects the form. With the
/// default retry policy a hung remote job keeps this loop alive until the
/// process is interrupted.
pub fn run_mission(
    engine: &EngineHandle,
    state: ConsoleState,
    state_dir: &Path,
    country: &str,
    power: PowerCategory,
    mut on_view: impl FnMut(&ConsoleViewModel),
) -> ConsoleViewModel {
    let runner = EffectRunner::new(engine, state_dir.to_path_buf());

    let (state, _) = update(state, Msg::CountryInput(country.to_string()));
    let (state, _) = update(state, Msg::PowerSelected(power));
    let (mut state, effects) = update(state, Msg::SubmitClicked);
    runner.run(effects);

    if state.consume_dirty() {
        on_view(&state.view());
    }
    if state.phase() == OperationPhase::Idle {
        // Validation rejected the form; nothing was submitted.
        return state.view();
    }

    while !matches!(
        state.phase(),
        OperationPhase::Completed | OperationPhase::Error
    ) {
        if let Some(event) = engine.recv_timeout(EVENT_WAIT) {
            let (next, effects) = update(state, msg_from_event(event));
            state = next;
            runner.run(effects);
            if state.consume_dirty() {
                on_view(&state.view());
            }
        }
    }

    state.view()
}
