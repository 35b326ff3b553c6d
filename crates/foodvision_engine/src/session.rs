use std::sync::Arc;

use foodvision_core::{
    update, AppState, Effect, Job, JobId, JobIdGenerator, Msg, SessionSnapshot,
};
use foodvision_logging::{fv_debug, fv_info, fv_warn};
use tokio::sync::{mpsc, watch};

use crate::encode::EncodingError;
use crate::enrich::{enrich, Enricher, UsdaEnricher};
use crate::http::build_client;
use crate::poller::{spawn_poller, PollHandle, PollSettings};
use crate::settings::{parse_url, ClientSettings, ConfigError};
use crate::store::{HttpStatusStore, StatusStore};
use crate::submit::{submit_job, HttpUploader, Uploader};

/// Millisecond wall clock used to stamp jobs and derive their ids.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// The three external services a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub uploader: Arc<dyn Uploader>,
    pub status_store: Arc<dyn StatusStore>,
    pub enricher: Arc<dyn Enricher>,
}

impl Collaborators {
    /// HTTP collaborators sharing one connection pool.
    pub fn http(settings: &ClientSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let client = build_client(settings)?;
        Ok(Self {
            uploader: Arc::new(HttpUploader::with_client(
                client.clone(),
                parse_url("upload_url", &settings.upload_url)?,
            )),
            status_store: Arc::new(HttpStatusStore::with_client(
                client.clone(),
                parse_url("status_url", &settings.status_url)?,
            )),
            enricher: Arc::new(UsdaEnricher::with_client(
                client,
                parse_url("enrichment_url", &settings.enrichment_url)?,
                settings,
            )),
        })
    }
}

fn system_clock() -> Clock {
    Arc::new(|| u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default())
}

/// Owns the session state and executes the effects `update` asks for.
///
/// All state changes happen on the caller's task inside [`SessionDriver::process_next`]
/// and the command methods. Background work (upload, poll, enrichment) only
/// sends messages back over the driver's channel.
pub struct SessionDriver {
    state: AppState,
    collaborators: Collaborators,
    poll_settings: PollSettings,
    job_ids: JobIdGenerator,
    clock: Clock,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    active_poll: Option<PollHandle>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl SessionDriver {
    pub fn new(collaborators: Collaborators, settings: &ClientSettings) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let state = AppState::new();
        let (snapshot_tx, _) = watch::channel(state.view());
        Self {
            state,
            collaborators,
            poll_settings: PollSettings::from(settings),
            job_ids: JobIdGenerator::new(),
            clock: system_clock(),
            msg_tx,
            msg_rx,
            active_poll: None,
            snapshot_tx,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.view()
    }

    /// Receiver that observes a fresh snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Whether a poll task is currently running.
    pub fn is_polling(&self) -> bool {
        self.active_poll
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Make `artifact` the session's job. Any job in flight is abandoned.
    pub fn select_artifact(&mut self, artifact: impl Into<Arc<[u8]>>) -> JobId {
        let now_ms = (self.clock)();
        let job_id = self.job_ids.next(now_ms);
        let job = Job::new(job_id.clone(), artifact, now_ms);
        fv_info!(
            "Artifact selected job_id={} bytes={}",
            job_id,
            job.payload.len()
        );
        self.dispatch(Msg::ArtifactSelected(job));
        job_id
    }

    /// Record an artifact that could not be read. The session fails with an
    /// encoding error without uploading anything.
    pub fn select_unreadable(&mut self, error: &EncodingError) -> JobId {
        let job_id = self.select_artifact(Vec::<u8>::new());
        self.dispatch(Msg::EncodingFailed {
            job_id: job_id.clone(),
            message: error.to_string(),
        });
        job_id
    }

    pub fn submit(&mut self) {
        self.dispatch(Msg::SubmitClicked);
    }

    /// Dismiss the result and return to an empty idle session.
    pub fn reset(&mut self) {
        self.dispatch(Msg::ResultDismissed);
    }

    /// Wait for the next background message and apply it.
    pub async fn process_next(&mut self) -> SessionSnapshot {
        // The driver owns a sender, so the channel never closes.
        if let Some(msg) = self.msg_rx.recv().await {
            self.dispatch(msg);
        }
        self.snapshot()
    }

    /// Apply background messages until no request or poll is outstanding.
    pub async fn run_until_settled(&mut self) -> SessionSnapshot {
        while self.state.view().busy {
            self.process_next().await;
        }
        self.snapshot()
    }

    fn dispatch(&mut self, msg: Msg) {
        if let Some(job_id) = msg.job_id() {
            if self.state.current_job_id() != Some(job_id) {
                fv_warn!(
                    "Dropping stale message for job_id={} (current={:?})",
                    job_id,
                    self.state.current_job_id().map(JobId::as_str)
                );
                return;
            }
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        self.state = state;

        if changed {
            let view = self.state.view();
            fv_info!(
                "Session phase={:?} job_id={:?}",
                view.phase,
                view.job_id.as_ref().map(JobId::as_str)
            );
            if view.show_result {
                if let Some(started) = view.submitted_at_ms {
                    fv_info!(
                        "Job settled after {} ms",
                        (self.clock)().saturating_sub(started)
                    );
                }
            }
            self.snapshot_tx.send_replace(view);
        }

        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        fv_debug!("Executing {:?}", EffectLabel(&effect));
        match effect {
            Effect::Upload { job_id, payload } => {
                let uploader = Arc::clone(&self.collaborators.uploader);
                let msg_tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = match submit_job(uploader.as_ref(), &job_id, &payload).await {
                        Ok(outcome) => Msg::UploadFinished { job_id, outcome },
                        Err(err) => Msg::EncodingFailed {
                            job_id,
                            message: err.to_string(),
                        },
                    };
                    let _ = msg_tx.send(msg);
                });
            }
            Effect::StartPolling { job_id } => {
                if let Some(previous) = self.active_poll.take() {
                    previous.cancel();
                }
                self.active_poll = Some(spawn_poller(
                    Arc::clone(&self.collaborators.status_store),
                    job_id,
                    self.poll_settings,
                    self.msg_tx.clone(),
                ));
            }
            Effect::StopPolling { job_id } => match self.active_poll.take() {
                Some(handle) if handle.job_id() == &job_id => handle.cancel(),
                other => self.active_poll = other,
            },
            Effect::Enrich { job_id, category } => {
                let enricher = Arc::clone(&self.collaborators.enricher);
                let msg_tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let nutrients = enrich(enricher.as_ref(), category).await;
                    let _ = msg_tx.send(Msg::EnrichmentFinished { job_id, nutrients });
                });
            }
        }
    }
}

/// Effect formatter that leaves out the payload bytes.
struct EffectLabel<'a>(&'a Effect);

impl std::fmt::Debug for EffectLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Effect::Upload { job_id, payload } => write!(
                f,
                "Upload {{ job_id: {job_id}, payload_len: {} }}",
                payload.len()
            ),
            Effect::StartPolling { job_id } => write!(f, "StartPolling {{ job_id: {job_id} }}"),
            Effect::StopPolling { job_id } => write!(f, "StopPolling {{ job_id: {job_id} }}"),
            Effect::Enrich { job_id, category } => {
                write!(f, "Enrich {{ job_id: {job_id}, category: {category} }}")
            }
        }
    }
}
