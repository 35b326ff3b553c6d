/// Job state as reported by the status store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Processing,
    Success(i64),
    Failure(String),
}

/// What one poll tick learned about a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollObservation {
    /// The store answered with a recognised status.
    Status(JobStatus),
    /// Network trouble, a non-2xx answer or an unknown status value.
    /// The next tick retries.
    Transient(String),
    /// The store reported success but the result cannot be decoded.
    Malformed(String),
}

/// Poller lifecycle for a single job id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    Armed,
    Pending,
    Processing,
    Succeeded(i64),
    Failed(String),
    Malformed(String),
}

impl PollState {
    /// Arm the poller for a freshly accepted job.
    pub fn arm() -> Self {
        PollState::Armed
    }

    /// Fold one observation into the poller state.
    ///
    /// Terminal and idle states absorb every observation. Transient errors keep
    /// the current polling state.
    pub fn observe(&self, observation: &PollObservation) -> PollState {
        if !self.is_polling() {
            return self.clone();
        }
        match observation {
            PollObservation::Status(JobStatus::Pending) => PollState::Pending,
            PollObservation::Status(JobStatus::Processing) => PollState::Processing,
            PollObservation::Status(JobStatus::Success(index)) => PollState::Succeeded(*index),
            PollObservation::Status(JobStatus::Failure(message)) => {
                PollState::Failed(message.clone())
            }
            PollObservation::Malformed(reason) => PollState::Malformed(reason.clone()),
            PollObservation::Transient(_) => self.clone(),
        }
    }

    pub fn is_polling(&self) -> bool {
        matches!(
            self,
            PollState::Armed | PollState::Pending | PollState::Processing
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Succeeded(_) | PollState::Failed(_) | PollState::Malformed(_)
        )
    }
}
