use std::sync::mpsc;
use std::sync::Arc;

use ops_logging::{ops_debug, ops_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{
    ArmoryApi, EngineEvent, Generation, PollSeq, PollSettings, RetryPolicy, TaskId,
};

/// Drives the status poll loop for one accepted job.
///
/// One tick, one request: the next status request is only issued after the
/// previous one resolved, so ticks can never overlap even when the server is
/// slower than the interval (`MissedTickBehavior::Delay`). The loop ends on a
/// terminal snapshot, on cancellation, or when the retry policy gives up.
/// After cancellation is observed no further event is emitted.
pub(crate) async fn poll_job(
    api: Arc<dyn ArmoryApi>,
    task_id: TaskId,
    generation: Generation,
    settings: PollSettings,
    cancel: CancellationToken,
    events: mpsc::Sender<EngineEvent>,
) {
    let mut interval = tokio::time::interval(settings.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately; consume it so the first
    // status request goes out one full interval after acceptance.
    interval.tick().await;

    let mut seq: PollSeq = 0;
    let mut consecutive_failures: u32 = 0;
    let mut last_progress: Option<f64> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = interval.tick() => {}
        }

        seq += 1;
        ops_logging::set_poll_seq(seq);

        let result = tokio::select! {
            _ = cancel.cancelled() => return,
            result = api.status(&task_id) => result,
        };

        match result {
            Ok(snapshot) => {
                consecutive_failures = 0;
                if let Some(previous) = last_progress {
                    if snapshot.progress < previous {
                        // Surfaced as-is; the remote value is authoritative.
                        ops_debug!(
                            "task {} progress regressed from {} to {}",
                            task_id,
                            previous,
                            snapshot.progress
                        );
                    }
                }
                last_progress = Some(snapshot.progress);

                let terminal = snapshot.phase.is_terminal();
                if events
                    .send(EngineEvent::Snapshot {
                        generation,
                        seq,
                        snapshot,
                    })
                    .is_err()
                {
                    return;
                }
                if terminal {
                    return;
                }
            }
            Err(err) => {
                consecutive_failures += 1;
                ops_warn!("task {} status tick {} failed: {}", task_id, seq, err);

                let fatal_not_found = settings.not_found_is_fatal && err.is_not_found();
                let give_up = fatal_not_found
                    || match settings.retry {
                        RetryPolicy::Unlimited => false,
                        RetryPolicy::MaxConsecutiveFailures(max) => {
                            consecutive_failures >= max.get()
                        }
                    };

                if give_up {
                    let message = if fatal_not_found {
                        format!("status endpoint no longer knows task {task_id}")
                    } else {
                        format!(
                            "status polling gave up after {consecutive_failures} consecutive failures"
                        )
                    };
                    let _ = events.send(EngineEvent::PollingAborted {
                        generation,
                        message,
                    });
                    return;
                }
                // Transient: skip this tick, retry on the next one.
            }
        }
    }
}
