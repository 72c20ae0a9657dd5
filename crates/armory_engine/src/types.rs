use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Monotonic counter distinguishing one submitted operation from the next.
pub type Generation = u64;

/// Per-operation status tick counter, strictly increasing in send order.
pub type PollSeq = u64;

/// Fallback when the server rejects a submission without a message.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Failed to start scraping";

/// Force category accepted by the scrape endpoint.
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

    /// Identifier sent in the submission body.
    pub fn wire_name(self) -> &'static str {
        match self {
            PowerCategory::Airpower => "airpower",
            PowerCategory::Navalpower => "navalpower",
            PowerCategory::Droneforce => "droneforce",
            PowerCategory::Landpower => "landpower",
            PowerCategory::All => "all",
        }
    }
}

impl fmt::Display for PowerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown power category: {0}")]
pub struct ParsePowerError(String);

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

/// Validated input for one acquisition operation. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    country_name: String,
    power: PowerCategory,
}

impl ScrapeRequest {
    /// Trims the country name and rejects names empty after trimming,
    /// before any network traffic happens.
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("country name is required")]
    EmptyCountryName,
}

/// Opaque job handle issued by the server on acceptance. Non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub(crate) fn new(raw: String) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepted submission: the handle to poll plus the server's initial message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub task_id: TaskId,
    pub message: Option<String>,
}

/// Lifecycle phase reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Pending,
    Running,
    Completed,
    Error,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Error)
    }

    pub(crate) fn from_wire(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobPhase::Pending),
            "running" => Some(JobPhase::Running),
            "completed" => Some(JobPhase::Completed),
            "error" => Some(JobPhase::Error),
            _ => None,
        }
    }
}

/// Per-category scraping outcome within a status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStatus {
    Pending,
    Success,
    Failed,
}

impl CategoryStatus {
    pub(crate) fn from_wire(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CategoryStatus::Pending),
            "success" => Some(CategoryStatus::Success),
            "failed" => Some(CategoryStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProgress {
    pub status: CategoryStatus,
    pub count: u64,
}

/// One wholesale status record as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub phase: JobPhase,
    /// Percentage clamped into 0..=100; the reported value is otherwise
    /// passed through untouched, regressions included.
    pub progress: f64,
    pub message: Option<String>,
    pub current_power: Option<String>,
    pub data: BTreeMap<String, CategoryProgress>,
}

/// Submission failures, reported synchronously for the submit call.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The server answered but refused to start the job.
    #[error("submission rejected: {message}")]
    Rejected { message: String },
    /// The submission request never reached the server.
    #[error("submission endpoint unreachable: {0}")]
    Unreachable(String),
    /// The server answered with a payload this client cannot interpret.
    #[error("malformed submission response: {0}")]
    Malformed(String),
}

/// Per-tick status failures. Never terminal by themselves; the poll loop
/// decides what to do with them based on its [`RetryPolicy`].
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("status endpoint unreachable: {0}")]
    Transport(String),
    #[error("status endpoint returned http {0}")]
    Http(u16),
    #[error("malformed status response: {0}")]
    Malformed(String),
}

impl StatusError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatusError::Http(404))
    }
}

/// What the poll loop does with failed ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Keep polling through failed ticks until a terminal phase or cancel.
    /// A hung remote job therefore polls forever unless cancelled.
    Unlimited,
    /// Abort the operation after this many consecutive failed ticks.
    MaxConsecutiveFailures(NonZeroU32),
}

/// Polling configuration. The defaults reproduce the service's reference
/// client: one tick per second, never give up on transient failures, and
/// a 404 from the status endpoint is transient like everything else.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub retry: RetryPolicy,
    /// Treat http 404 from the status endpoint as fatal. The job id being
    /// unknown to the server usually means it will never come back, but
    /// distinguishing that from a transient failure is a policy choice.
    pub not_found_is_fatal: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            retry: RetryPolicy::Unlimited,
            not_found_is_fatal: false,
        }
    }
}

/// Events emitted by the engine, tagged so stale ones can be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SubmissionAccepted {
        generation: Generation,
        task_id: TaskId,
        message: Option<String>,
    },
    SubmissionRejected {
        generation: Generation,
        message: String,
    },
    SubmissionUnreachable {
        generation: Generation,
    },
    Snapshot {
        generation: Generation,
        seq: PollSeq,
        snapshot: StatusSnapshot,
    },
    PollingAborted {
        generation: Generation,
        message: String,
    },
}
