use crate::{Category, JobId, NutrientRecord, Session, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Polling,
    Enriching,
    Done,
    Failed,
}

/// Read-only view of the session handed to the presentation layer.
///
/// `category` and `error_message` are never both set: `Done` fills the
/// category path, `Failed` fills the error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub job_id: Option<JobId>,
    /// Wall-clock millis at which the current artifact was selected.
    pub submitted_at_ms: Option<u64>,
    pub category: Option<Category>,
    pub nutrients: Vec<NutrientRecord>,
    pub error_message: Option<String>,
    pub status_line: &'static str,
    /// A request or poll is outstanding.
    pub busy: bool,
    /// The result popup should be visible.
    pub show_result: bool,
}

impl SessionSnapshot {
    pub(crate) fn from_session(session: &Session) -> Self {
        let phase = session.phase();
        let job_id = session.job().map(|job| job.id.clone());
        let submitted_at_ms = session.job().map(|job| job.submitted_at_ms);
        let (category, nutrients, error_message, status_line) = match session {
            Session::Idle { .. } => (None, Vec::new(), None, ""),
            Session::Uploading { .. } => (None, Vec::new(), None, "Uploading..."),
            Session::Polling { .. } => (None, Vec::new(), None, "Uploaded. Processing..."),
            Session::Enriching { .. } => (None, Vec::new(), None, "Fetching nutrition..."),
            Session::Done {
                category,
                nutrients,
                ..
            } => (
                Some(*category),
                nutrients.clone(),
                None,
                "Processing complete.",
            ),
            Session::Failed { error, .. } => {
                let line = match error {
                    SessionError::UploadRejected { .. } => "Upload failed.",
                    _ => "Processing failed.",
                };
                (None, Vec::new(), Some(error.to_string()), line)
            }
        };

        Self {
            phase,
            job_id,
            submitted_at_ms,
            category,
            nutrients,
            error_message,
            status_line,
            busy: matches!(
                phase,
                Phase::Uploading | Phase::Polling | Phase::Enriching
            ),
            show_result: matches!(phase, Phase::Done | Phase::Failed),
        }
    }
}
