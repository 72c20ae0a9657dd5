use std::path::PathBuf;

use armory_core::{Effect, Msg};
use armory_engine::{EngineEvent, EngineHandle};
use ops_logging::{ops_error, ops_info};

use super::persistence;

/// Executes state-machine effects against the engine and the state file.
pub struct EffectRunner<'a> {
    engine: &'a EngineHandle,
    state_dir: PathBuf,
}

impl<'a> EffectRunner<'a> {
    pub fn new(engine: &'a EngineHandle, state_dir: PathBuf) -> Self {
        Self { engine, state_dir }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitScrape {
                    generation,
                    request,
                } => {
                    ops_info!(
                        "SubmitScrape generation={} country={} power={}",
                        generation,
                        request.country_name(),
                        request.power()
                    );
                    match armory_engine::ScrapeRequest::new(
                        request.country_name(),
                        map_power_out(request.power()),
                    ) {
                        Ok(engine_request) => self.engine.submit(generation, engine_request),
                        Err(err) => {
                            ops_error!("invalid request reached the engine boundary: {}", err)
                        }
                    }
                }
                Effect::StopPolling => self.engine.cancel_polling(),
                Effect::PersistMissionLog(records) => {
                    persistence::save_mission_log(&self.state_dir, &records);
                }
            }
        }
    }
}

/// Translates one engine event into the state machine's vocabulary.
pub fn msg_from_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SubmissionAccepted {
            generation,
            task_id,
            message,
        } => Msg::SubmissionAccepted {
            generation,
            task_id: task_id.as_str().to_string(),
            message,
        },
        EngineEvent::SubmissionRejected {
            generation,
            message,
        } => Msg::SubmissionRejected {
            generation,
            message,
        },
        EngineEvent::SubmissionUnreachable { generation } => {
            Msg::SubmissionUnreachable { generation }
        }
        EngineEvent::Snapshot {
            generation,
            seq,
            snapshot,
        } => Msg::SnapshotReceived {
            generation,
            seq,
            snapshot: map_snapshot(snapshot),
        },
        EngineEvent::PollingAborted {
            generation,
            message,
        } => Msg::PollingAborted {
            generation,
            message,
        },
    }
}

fn map_power_out(power: armory_core::PowerCategory) -> armory_engine::PowerCategory {
    match power {
        armory_core::PowerCategory::Airpower => armory_engine::PowerCategory::Airpower,
        armory_core::PowerCategory::Navalpower => armory_engine::PowerCategory::Navalpower,
        armory_core::PowerCategory::Droneforce => armory_engine::PowerCategory::Droneforce,
        armory_core::PowerCategory::Landpower => armory_engine::PowerCategory::Landpower,
        armory_core::PowerCategory::All => armory_engine::PowerCategory::All,
    }
}

fn map_snapshot(snapshot: armory_engine::StatusSnapshot) -> armory_core::StatusSnapshot {
    armory_core::StatusSnapshot {
        phase: map_phase(snapshot.phase),
        progress: snapshot.progress,
        message: snapshot.message,
        current_power: snapshot.current_power,
        data: snapshot
            .data
            .into_iter()
            .map(|(category, progress)| {
                (
                    category,
                    armory_core::CategoryProgress {
                        status: map_category_status(progress.status),
                        count: progress.count,
                    },
                )
            })
            .collect(),
    }
}

fn map_phase(phase: armory_engine::JobPhase) -> armory_core::JobPhase {
    match phase {
        armory_engine::JobPhase::Pending => armory_core::JobPhase::Pending,
        armory_engine::JobPhase::Running => armory_core::JobPhase::Running,
        armory_engine::JobPhase::Completed => armory_core::JobPhase::Completed,
        armory_engine::JobPhase::Error => armory_core::JobPhase::Error,
    }
}

fn map_category_status(status: armory_engine::CategoryStatus) -> armory_core::CategoryStatus {
    match status {
        armory_engine::CategoryStatus::Pending => armory_core::CategoryStatus::Pending,
        armory_engine::CategoryStatus::Success => armory_core::CategoryStatus::Success,
        armory_engine::CategoryStatus::Failed => armory_core::CategoryStatus::Failed,
    }
}
