//! Armory core: pure acquisition state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    CategoryProgress, CategoryStatus, ConsoleState, Generation, JobPhase, MissionRecord,
    OperationPhase, ParsePowerError, PollSeq, PowerCategory, ScrapeRequest, StatusSnapshot,
    ValidationError, INITIALIZING_MESSAGE, NETWORK_ERROR_MESSAGE, OPERATION_FAILED_MESSAGE,
};
pub use update::update;
pub use view_model::{CategoryRowView, ConsoleViewModel, MissionRowView};
