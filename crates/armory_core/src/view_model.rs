use crate::{CategoryStatus, OperationPhase, PowerCategory};

/// Immutable render snapshot of the console. Observers must treat this as
/// read-only; the next tick replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsoleViewModel {
    pub phase: OperationPhase,
    pub progress: f64,
    pub status_message: Option<String>,
    pub current_target: Option<String>,
    pub categories: Vec<CategoryRowView>,
    pub error: Option<String>,
    pub form_country: String,
    pub form_power: PowerCategory,
    pub form_error: Option<String>,
    pub missions: Vec<MissionRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRowView {
    pub name: String,
    pub status: CategoryStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionRowView {
    pub country: String,
    pub power: PowerCategory,
    pub records: u64,
}
