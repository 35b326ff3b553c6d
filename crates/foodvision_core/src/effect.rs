use std::sync::Arc;

use crate::{Category, JobId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Encode the payload and send it to the upload endpoint once.
    Upload { job_id: JobId, payload: Arc<[u8]> },
    /// Start the periodic status query for an accepted job.
    StartPolling { job_id: JobId },
    /// Cancel the poll for `job_id`. Cancelling a stopped poll is a no-op.
    StopPolling { job_id: JobId },
    /// Look up nutrition data for a classified job.
    Enrich { job_id: JobId, category: Category },
}
