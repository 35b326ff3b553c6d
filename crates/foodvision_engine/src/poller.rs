use std::sync::Arc;
use std::time::Duration;

use foodvision_core::{JobId, Msg, PollObservation, PollState};
use foodvision_logging::{fv_debug, fv_info, fv_warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::settings::ClientSettings;
use crate::store::{StatusStore, StoreQueryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// `None` keeps polling until cancelled.
    pub max_attempts: Option<u32>,
}

impl From<&ClientSettings> for PollSettings {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            interval: settings.poll_interval(),
            max_attempts: settings.max_poll_attempts,
        }
    }
}

/// A running status poll. Dropping the handle cancels the poll.
#[derive(Debug)]
pub struct PollHandle {
    job_id: JobId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Stop the poll. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start querying the status store for `job_id` every `settings.interval`.
///
/// Every tick is reported as [`Msg::StatusObserved`]. The loop ends on its own
/// after a terminal status or after `max_attempts` ticks (reported as
/// [`Msg::PollExhausted`]). Cancellation drops any query still in flight.
pub fn spawn_poller(
    store: Arc<dyn StatusStore>,
    job_id: JobId,
    settings: PollSettings,
    msg_tx: UnboundedSender<Msg>,
) -> PollHandle {
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run_poll(
        store,
        job_id.clone(),
        settings,
        cancel.clone(),
        msg_tx,
    ));
    PollHandle {
        job_id,
        cancel,
        task,
    }
}

async fn run_poll(
    store: Arc<dyn StatusStore>,
    job_id: JobId,
    settings: PollSettings,
    cancel: CancellationToken,
    msg_tx: UnboundedSender<Msg>,
) {
    // First query happens one full interval after the upload was accepted.
    let mut ticker = time::interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut state = PollState::arm();
    let mut attempts: u32 = 0;
    fv_info!(
        "Polling armed job_id={} interval_ms={} max_attempts={:?}",
        job_id,
        settings.interval.as_millis(),
        settings.max_attempts
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                fv_debug!("Polling cancelled job_id={} attempts={}", job_id, attempts);
                return;
            }
            _ = ticker.tick() => {}
        }

        attempts = attempts.saturating_add(1);
        let observation = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                fv_debug!("Polling cancelled mid-query job_id={}", job_id);
                return;
            }
            result = store.query(&job_id) => match result {
                Ok(status) => PollObservation::Status(status),
                Err(StoreQueryError::UnrecognizedStatus(status)) => {
                    fv_debug!("Unrecognized status {:?} for job_id={}; still waiting", status, job_id);
                    PollObservation::Transient(format!("unrecognized status {status:?}"))
                }
                Err(err) => {
                    fv_warn!("Status query failed job_id={} attempt={}: {}", job_id, attempts, err);
                    err.into_observation()
                }
            },
        };

        state = state.observe(&observation);
        fv_debug!(
            "Poll tick job_id={} attempt={} state={:?}",
            job_id,
            attempts,
            state
        );
        let delivered = msg_tx.send(Msg::StatusObserved {
            job_id: job_id.clone(),
            observation,
        });
        if delivered.is_err() {
            return;
        }

        if state.is_terminal() {
            fv_info!("Polling finished job_id={} state={:?}", job_id, state);
            return;
        }

        if settings.max_attempts.is_some_and(|max| attempts >= max) {
            fv_warn!(
                "Polling gave up job_id={} after {} attempts",
                job_id,
                attempts
            );
            let _ = msg_tx.send(Msg::PollExhausted {
                job_id: job_id.clone(),
                attempts,
            });
            return;
        }
    }
}
