use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use armory_core::{MissionRecord, PowerCategory};
use armory_engine::{ensure_state_dir, AtomicFileWriter};
use chrono::Utc;
use ops_logging::{ops_error, ops_info, ops_warn};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".armory_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedMission {
    country: String,
    power: String,
    records: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    #[serde(default)]
    saved_utc: String,
    completed: Vec<PersistedMission>,
}

pub fn load_mission_log(state_dir: &Path) -> Vec<MissionRecord> {
    let path = state_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Vec::new();
        }
        Err(err) => {
            ops_warn!("Failed to read mission log from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    let state: PersistedState = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            ops_warn!("Failed to parse mission log from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    let completed = state
        .completed
        .into_iter()
        .filter_map(|mission| match PowerCategory::from_str(&mission.power) {
            Ok(power) => Some(MissionRecord {
                country: mission.country,
                power,
                records: mission.records,
            }),
            Err(err) => {
                ops_warn!("Skipping persisted mission: {}", err);
                None
            }
        })
        .collect();

    ops_info!("Loaded mission log from {:?}", path);
    completed
}

pub fn save_mission_log(state_dir: &Path, records: &[MissionRecord]) {
    if let Err(err) = ensure_state_dir(state_dir) {
        ops_error!("Failed to ensure state dir {:?}: {}", state_dir, err);
        return;
    }

    let state = PersistedState {
        saved_utc: Utc::now().to_rfc3339(),
        completed: records
            .iter()
            .map(|record| PersistedMission {
                country: record.country.clone(),
                power: record.power.wire_name().to_string(),
                records: record.records,
            })
            .collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            ops_error!("Failed to serialize mission log: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(state_dir));
    if let Err(err) = writer.write(STATE_FILENAME, &content) {
        ops_error!("Failed to write mission log to {:?}: {}", state_dir, err);
    }
}
