use crate::{Generation, MissionRecord, PollSeq, PowerCategory, StatusSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the target-country input.
    CountryInput(String),
    /// User picked a force category.
    PowerSelected(PowerCategory),
    /// User asked to start the acquisition operation.
    SubmitClicked,
    /// Server accepted the submission and issued a task id.
    SubmissionAccepted {
        generation: Generation,
        task_id: String,
        message: Option<String>,
    },
    /// Server rejected the submission; message is what it sent, or a fallback.
    SubmissionRejected {
        generation: Generation,
        message: String,
    },
    /// The submission request never reached the server.
    SubmissionUnreachable { generation: Generation },
    /// One status tick from the poll loop, tagged for stale-response discard.
    SnapshotReceived {
        generation: Generation,
        seq: PollSeq,
        snapshot: StatusSnapshot,
    },
    /// The poll loop gave up per its retry policy.
    PollingAborted {
        generation: Generation,
        message: String,
    },
    /// User cancelled the in-flight operation.
    CancelClicked,
    /// User asked for a fresh console.
    ResetClicked,
    /// Restore the mission log from persisted state.
    RestoreMissionLog(Vec<MissionRecord>),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
