//! Armory engine: remote acquisition client, poll loop, and data plumbing.
mod api;
mod country_stats;
mod engine;
mod inventory;
mod news;
mod persist;
mod poller;
mod types;

pub use api::{ApiSettings, ArmoryApi, HttpArmoryApi, HttpClientError};
pub use country_stats::{stats_for_country, StatLine};
pub use engine::EngineHandle;
pub use inventory::{
    load_dataset, DatasetKind, InventoryError, InventoryFilter, InventoryStats, ParseDatasetError,
    UnitRecord,
};
pub use news::{NewsArticle, NewsError};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use types::{
    Accepted, CategoryProgress, CategoryStatus, EngineEvent, Generation, JobPhase, ParsePowerError,
    PollSeq, PollSettings, PowerCategory, RetryPolicy, ScrapeRequest, StatusError, StatusSnapshot,
    SubmitError, TaskId, ValidationError, SUBMISSION_FAILED_MESSAGE,
};
