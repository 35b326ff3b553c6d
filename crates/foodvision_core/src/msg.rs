use crate::{Job, JobId, NutrientRecord, PollObservation};

/// Result of the single upload attempt for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted,
    /// `status` is `None` when the request never produced an HTTP response.
    Rejected { status: Option<u16> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a new artifact. Replaces any job in flight.
    ArtifactSelected(Job),
    /// User asked to classify the selected artifact.
    SubmitClicked,
    /// User closed the result view or abandoned the session.
    ResultDismissed,
    /// The artifact could not be read or turned into an upload payload.
    EncodingFailed { job_id: JobId, message: String },
    /// The upload endpoint answered.
    UploadFinished {
        job_id: JobId,
        outcome: UploadOutcome,
    },
    /// One poll tick completed.
    StatusObserved {
        job_id: JobId,
        observation: PollObservation,
    },
    /// The poller reached its attempt ceiling without a terminal status.
    PollExhausted { job_id: JobId, attempts: u32 },
    /// Nutrition lookup finished. Failures arrive as an empty list.
    EnrichmentFinished {
        job_id: JobId,
        nutrients: Vec<NutrientRecord>,
    },
}

impl Msg {
    /// Job the message reports on, for messages produced by background work.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Msg::EncodingFailed { job_id, .. }
            | Msg::UploadFinished { job_id, .. }
            | Msg::StatusObserved { job_id, .. }
            | Msg::PollExhausted { job_id, .. }
            | Msg::EnrichmentFinished { job_id, .. } => Some(job_id),
            Msg::ArtifactSelected(_) | Msg::SubmitClicked | Msg::ResultDismissed => None,
        }
    }
}
