use crate::view_model::{Phase, SessionSnapshot};
use crate::{Category, Job, JobId, NutrientRecord, PollState};

/// Failures visible to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Could not read the selected image: {0}")]
    Encoding(String),
    #[error("Upload failed.")]
    UploadRejected { status: Option<u16> },
    /// Failure text reported by the classifier, shown verbatim.
    #[error("{0}")]
    Classification(String),
    #[error("Classification returned an invalid result: {0}")]
    InvalidResult(String),
    #[error("Gave up waiting for classification after {attempts} status checks.")]
    PollTimeout { attempts: u32 },
}

/// Session lifecycle. Each variant carries exactly the data valid in that phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Idle {
        job: Option<Job>,
    },
    Uploading {
        job: Job,
    },
    Polling {
        job: Job,
        poll: PollState,
    },
    Enriching {
        job: Job,
        category: Category,
    },
    Done {
        job: Job,
        category: Category,
        nutrients: Vec<NutrientRecord>,
    },
    Failed {
        job: Job,
        error: SessionError,
    },
}

impl Default for Session {
    fn default() -> Self {
        Session::Idle { job: None }
    }
}

impl Session {
    pub fn phase(&self) -> Phase {
        match self {
            Session::Idle { .. } => Phase::Idle,
            Session::Uploading { .. } => Phase::Uploading,
            Session::Polling { .. } => Phase::Polling,
            Session::Enriching { .. } => Phase::Enriching,
            Session::Done { .. } => Phase::Done,
            Session::Failed { .. } => Phase::Failed,
        }
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            Session::Idle { job } => job.as_ref(),
            Session::Uploading { job }
            | Session::Polling { job, .. }
            | Session::Enriching { job, .. }
            | Session::Done { job, .. }
            | Session::Failed { job, .. } => Some(job),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: Session,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn current_job_id(&self) -> Option<&JobId> {
        self.session.job().map(|job| &job.id)
    }

    /// Id of the job whose status is being polled, if any.
    pub fn polling_job_id(&self) -> Option<&JobId> {
        match &self.session {
            Session::Polling { job, .. } => Some(&job.id),
            _ => None,
        }
    }

    pub fn view(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(&self.session)
    }

    /// Returns whether a transition happened since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn transition(&mut self, next: Session) {
        if self.session != next {
            self.session = next;
            self.dirty = true;
        }
    }
}
