use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use ops_logging::{ops_info, ops_warn};
use tokio_util::sync::CancellationToken;

use crate::poller::poll_job;
use crate::{
    ArmoryApi, EngineEvent, Generation, PollSettings, ScrapeRequest, SubmitError,
    SUBMISSION_FAILED_MESSAGE,
};

enum EngineCommand {
    Submit {
        generation: Generation,
        request: ScrapeRequest,
    },
    CancelPolling,
}

/// Handle to the acquisition engine: a dedicated thread owning a tokio
/// runtime, fed commands and drained for events over channels.
///
/// At most one operation is in flight. The state machine upstream enforces
/// the idle precondition for submits; the engine additionally cancels any
/// loop still alive when a new submit arrives, so an orphaned poll timer
/// cannot exist.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn ArmoryApi>, settings: PollSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut active: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Submit {
                        generation,
                        request,
                    } => {
                        if let Some(token) = active.take() {
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        active = Some(token.clone());

                        ops_info!(
                            "submit generation={} country={} power={}",
                            generation,
                            request.country_name(),
                            request.power()
                        );

                        let api = api.clone();
                        let events = event_tx.clone();
                        let settings = settings.clone();
                        runtime.spawn(async move {
                            run_operation(api, generation, request, settings, token, events).await;
                        });
                    }
                    EngineCommand::CancelPolling => {
                        if let Some(token) = active.take() {
                            token.cancel();
                        }
                    }
                }
            }

            // Handle dropped: tear down whatever loop is still alive.
            if let Some(token) = active.take() {
                token.cancel();
            }
        });

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        }
    }

    /// Submit a request and start polling under the given generation.
    pub fn submit(&self, generation: Generation, request: ScrapeRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            generation,
            request,
        });
    }

    /// Stop the in-flight poll loop, if any. Safe to call repeatedly.
    pub fn cancel_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelPolling);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Blocking receive for dispatch loops that want to sleep between events.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn run_operation(
    api: Arc<dyn ArmoryApi>,
    generation: Generation,
    request: ScrapeRequest,
    settings: PollSettings,
    cancel: CancellationToken,
    events: mpsc::Sender<EngineEvent>,
) {
    let submitted = tokio::select! {
        _ = cancel.cancelled() => return,
        result = api.submit(&request) => result,
    };

    match submitted {
        Ok(accepted) => {
            ops_info!(
                "submission accepted generation={} task={}",
                generation,
                accepted.task_id
            );
            if events
                .send(EngineEvent::SubmissionAccepted {
                    generation,
                    task_id: accepted.task_id.clone(),
                    message: accepted.message,
                })
                .is_err()
            {
                return;
            }
            poll_job(api, accepted.task_id, generation, settings, cancel, events).await;
        }
        Err(SubmitError::Unreachable(err)) => {
            ops_warn!("submission unreachable generation={}: {}", generation, err);
            let _ = events.send(EngineEvent::SubmissionUnreachable { generation });
        }
        Err(SubmitError::Rejected { message }) => {
            ops_warn!(
                "submission rejected generation={}: {}",
                generation,
                message
            );
            let _ = events.send(EngineEvent::SubmissionRejected {
                generation,
                message,
            });
        }
        Err(SubmitError::Malformed(err)) => {
            ops_warn!(
                "submission response malformed generation={}: {}",
                generation,
                err
            );
            let _ = events.send(EngineEvent::SubmissionRejected {
                generation,
                message: SUBMISSION_FAILED_MESSAGE.to_string(),
            });
        }
    }
}
