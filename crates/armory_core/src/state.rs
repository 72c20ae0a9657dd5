use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::view_model::{CategoryRowView, ConsoleViewModel, MissionRowView};

/// Monotonic counter distinguishing one submitted operation from the next.
/// Events tagged with an older generation are discarded.
pub type Generation = u64;

/// Per-operation status tick counter, strictly increasing in send order.
pub type PollSeq = u64;

/// Status message seeded while the submission request is in flight.
pub const INITIALIZING_MESSAGE: &str = "Initializing scraping operation...";
/// Error shown when the submission endpoint could not be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";
/// Fallback when the server reports a terminal error without a message.
pub const OPERATION_FAILED_MESSAGE: &str = "Scraping operation failed";

/// Force category selectable for an acquisition operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PowerCategory {
    #[default]
    Airpower,
    Navalpower,
    Droneforce,
    Landpower,
    All,
}

impl PowerCategory {
    pub const ALL_CATEGORIES: [PowerCategory; 5] = [
        PowerCategory::Airpower,
        PowerCategory::Navalpower,
        PowerCategory::Droneforce,
        PowerCategory::Landpower,
        PowerCategory::All,
    ];

    /// Identifier used on the wire and in persisted state.
    pub fn wire_name(self) -> &'static str {
        match self {
            PowerCategory::Airpower => "airpower",
            PowerCategory::Navalpower => "navalpower",
            PowerCategory::Droneforce => "droneforce",
            PowerCategory::Landpower => "landpower",
            PowerCategory::All => "all",
        }
    }

    /// Human-facing label for console rendering.
    pub fn label(self) -> &'static str {
        match self {
            PowerCategory::Airpower => "AIR POWER",
            PowerCategory::Navalpower => "NAVAL POWER",
            PowerCategory::Droneforce => "DRONE FORCE",
            PowerCategory::Landpower => "LAND POWER",
            PowerCategory::All => "ALL FORCES",
        }
    }
}

impl fmt::Display for PowerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePowerError(String);

impl fmt::Display for ParsePowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown power category: {}", self.0)
    }
}

impl std::error::Error for ParsePowerError {}

impl FromStr for PowerCategory {
    type Err = ParsePowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "airpower" => Ok(PowerCategory::Airpower),
            "navalpower" => Ok(PowerCategory::Navalpower),
            "droneforce" => Ok(PowerCategory::Droneforce),
            "landpower" => Ok(PowerCategory::Landpower),
            "all" => Ok(PowerCategory::All),
            other => Err(ParsePowerError(other.to_string())),
        }
    }
}

/// Lifecycle phase reported by the remote job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Pending,
    Running,
    Completed,
    Error,
}

/// Per-category scraping outcome within a status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProgress {
    pub status: CategoryStatus,
    pub count: u64,
}

/// Wholesale-replaced status record. Observers only ever see copies.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub phase: JobPhase,
    /// Percentage in 0..=100 as reported; the remote value is authoritative
    /// and is surfaced even if it regresses.
    pub progress: f64,
    pub message: Option<String>,
    pub current_power: Option<String>,
    pub data: BTreeMap<String, CategoryProgress>,
}

impl StatusSnapshot {
    /// Placeholder snapshot shown while the submission request is in flight.
    pub fn initializing() -> Self {
        Self {
            phase: JobPhase::Pending,
            progress: 0.0,
            message: Some(INITIALIZING_MESSAGE.to_string()),
            current_power: None,
            data: BTreeMap::new(),
        }
    }
}

/// Validated input for one acquisition operation. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    country_name: String,
    power: PowerCategory,
}

impl ScrapeRequest {
    /// Trims the country name and rejects names empty after trimming.
    /// No network traffic happens before this check passes.
    pub fn new(country_name: &str, power: PowerCategory) -> Result<Self, ValidationError> {
        let trimmed = country_name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCountryName);
        }
        Ok(Self {
            country_name: trimmed.to_string(),
            power,
        })
    }

    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    pub fn power(&self) -> PowerCategory {
        self.power
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyCountryName,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyCountryName => f.write_str("Country name is required"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Summary of one completed acquisition, kept in the persisted mission log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionRecord {
    pub country: String,
    pub power: PowerCategory,
    /// Records acquired across categories that finished with `Success`.
    pub records: u64,
}

/// Controller phase. `Completed` and `Error` are terminal until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationPhase {
    #[default]
    Idle,
    Submitting,
    Running,
    Completed,
    Error,
}

/// State of the acquisition console. All transitions go through
/// [`crate::update`]; IO happens elsewhere via [`crate::Effect`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsoleState {
    phase: OperationPhase,
    form_country: String,
    form_power: PowerCategory,
    form_error: Option<String>,
    generation: Generation,
    task_id: Option<String>,
    active_request: Option<ScrapeRequest>,
    last_seq: PollSeq,
    snapshot: Option<StatusSnapshot>,
    error: Option<String>,
    missions: Vec<MissionRecord>,
    dirty: bool,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> OperationPhase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn form_country(&self) -> &str {
        &self.form_country
    }

    pub fn form_power(&self) -> PowerCategory {
        self.form_power
    }

    pub fn missions(&self) -> &[MissionRecord] {
        &self.missions
    }

    /// Immutable copy of the observable state for rendering.
    pub fn view(&self) -> ConsoleViewModel {
        let (progress, status_message, current_target, categories) = match &self.snapshot {
            Some(snap) => (
                snap.progress,
                snap.message.clone(),
                snap.current_power.clone(),
                snap.data
                    .iter()
                    .map(|(name, progress)| CategoryRowView {
                        name: name.clone(),
                        status: progress.status,
                        count: progress.count,
                    })
                    .collect(),
            ),
            None => (0.0, None, None, Vec::new()),
        };

        ConsoleViewModel {
            phase: self.phase,
            progress,
            status_message,
            current_target,
            categories,
            error: self.error.clone(),
            form_country: self.form_country.clone(),
            form_power: self.form_power,
            form_error: self.form_error.clone(),
            missions: self
                .missions
                .iter()
                .map(|record| MissionRowView {
                    country: record.country.clone(),
                    power: record.power,
                    records: record.records,
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_country(&mut self, text: String) {
        self.form_country = text;
        self.form_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_power(&mut self, power: PowerCategory) {
        self.form_power = power;
        self.form_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_form_error(&mut self, message: String) {
        self.form_error = Some(message);
        self.mark_dirty();
    }

    /// Idle -> Submitting. Bumps the generation so events from any earlier
    /// operation can no longer reach this one.
    pub(crate) fn begin_submission(&mut self, request: ScrapeRequest) -> Generation {
        self.generation += 1;
        self.phase = OperationPhase::Submitting;
        self.active_request = Some(request);
        self.task_id = None;
        self.last_seq = 0;
        self.error = None;
        self.form_error = None;
        self.snapshot = Some(StatusSnapshot::initializing());
        self.mark_dirty();
        self.generation
    }

    /// Submitting -> Running once the server accepted and issued a task id.
    pub(crate) fn accept_submission(
        &mut self,
        generation: Generation,
        task_id: String,
        message: Option<String>,
    ) {
        if generation != self.generation || self.phase != OperationPhase::Submitting {
            return;
        }
        self.phase = OperationPhase::Running;
        self.task_id = Some(task_id);
        if let Some(message) = message {
            if let Some(snapshot) = &mut self.snapshot {
                snapshot.message = Some(message);
            }
        }
        self.mark_dirty();
    }

    /// Submitting -> Error. No polling was started for this operation.
    pub(crate) fn fail_submission(&mut self, generation: Generation, message: String) {
        if generation != self.generation || self.phase != OperationPhase::Submitting {
            return;
        }
        self.phase = OperationPhase::Error;
        self.error = Some(message);
        self.task_id = None;
        self.active_request = None;
        self.mark_dirty();
    }

    /// Applies one status snapshot wholesale, in send order.
    ///
    /// Ignored unless the operation is `Running`, the generation matches, and
    /// `seq` is newer than the last applied tick. Absent `message` and
    /// `current_power` inherit the previous snapshot's values; everything
    /// else is replaced. Returns the job phase when the snapshot was applied.
    pub(crate) fn apply_snapshot(
        &mut self,
        generation: Generation,
        seq: PollSeq,
        mut snapshot: StatusSnapshot,
    ) -> Option<JobPhase> {
        if generation != self.generation
            || self.phase != OperationPhase::Running
            || seq <= self.last_seq
        {
            return None;
        }

        if let Some(previous) = &self.snapshot {
            if snapshot.message.is_none() {
                snapshot.message = previous.message.clone();
            }
            if snapshot.current_power.is_none() {
                snapshot.current_power = previous.current_power.clone();
            }
        }

        let phase = snapshot.phase;
        self.last_seq = seq;
        self.snapshot = Some(snapshot);

        match phase {
            JobPhase::Completed => {
                self.phase = OperationPhase::Completed;
                self.push_mission_record();
                self.task_id = None;
            }
            JobPhase::Error => {
                self.phase = OperationPhase::Error;
                self.error = Some(
                    self.snapshot
                        .as_ref()
                        .and_then(|snap| snap.message.clone())
                        .unwrap_or_else(|| OPERATION_FAILED_MESSAGE.to_string()),
                );
                self.task_id = None;
                self.active_request = None;
            }
            JobPhase::Pending | JobPhase::Running => {}
        }

        self.mark_dirty();
        Some(phase)
    }

    /// Running -> Error when the engine gave up polling per its retry policy.
    pub(crate) fn abort_polling(&mut self, generation: Generation, message: String) {
        if generation != self.generation || self.phase != OperationPhase::Running {
            return;
        }
        self.phase = OperationPhase::Error;
        self.error = Some(message);
        self.task_id = None;
        self.active_request = None;
        self.mark_dirty();
    }

    /// Submitting/Running -> Idle. The generation bump guarantees any poll
    /// response still in flight is discarded when it arrives. Returns false
    /// (and changes nothing) from any other phase.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.phase {
            OperationPhase::Submitting | OperationPhase::Running => {
                self.generation += 1;
                self.phase = OperationPhase::Idle;
                self.task_id = None;
                self.active_request = None;
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }

    /// Cancel plus clearing the last snapshot, error, and form. After reset
    /// the observable state matches a fresh construction; only the persisted
    /// mission log is kept. Returns true when a poll loop had to be stopped.
    pub(crate) fn reset(&mut self) -> bool {
        let was_active = self.cancel();
        self.snapshot = None;
        self.error = None;
        self.form_country = String::new();
        self.form_power = PowerCategory::default();
        self.form_error = None;
        self.last_seq = 0;
        self.mark_dirty();
        was_active
    }

    pub(crate) fn restore_missions(&mut self, records: Vec<MissionRecord>) {
        self.missions = records;
        self.mark_dirty();
    }

    fn push_mission_record(&mut self) {
        let Some(request) = self.active_request.take() else {
            return;
        };
        let records = self
            .snapshot
            .as_ref()
            .map(|snap| {
                snap.data
                    .values()
                    .filter(|progress| progress.status == CategoryStatus::Success)
                    .map(|progress| progress.count)
                    .sum()
            })
            .unwrap_or(0);
        self.missions.push(MissionRecord {
            country: request.country_name().to_string(),
            power: request.power(),
            records,
        });
    }
}
