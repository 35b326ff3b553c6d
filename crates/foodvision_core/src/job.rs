use std::fmt;
use std::sync::Arc;

/// Opaque identifier shared with the upload endpoint and the status store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selected artifact awaiting classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub payload: Arc<[u8]>,
    pub submitted_at_ms: u64,
}

impl Job {
    pub fn new(id: JobId, payload: impl Into<Arc<[u8]>>, submitted_at_ms: u64) -> Self {
        Self {
            id,
            payload: payload.into(),
            submitted_at_ms,
        }
    }
}

/// Issues `{millis}-{client}` job ids.
///
/// The status store is shared by every client, so each generator carries a
/// random client tag. Within one generator the millisecond part never repeats:
/// when the clock stalls or steps backwards the next value is `last + 1`.
#[derive(Debug, Clone)]
pub struct JobIdGenerator {
    client_tag: String,
    last: Option<u64>,
}

impl Default for JobIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JobIdGenerator {
    pub fn new() -> Self {
        let tag: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect();
        Self::with_client_tag(tag)
    }

    /// Generator with a fixed client tag.
    pub fn with_client_tag(tag: impl Into<String>) -> Self {
        Self {
            client_tag: tag.into(),
            last: None,
        }
    }

    pub fn client_tag(&self) -> &str {
        &self.client_tag
    }

    pub fn next(&mut self, now_ms: u64) -> JobId {
        let issued = match self.last {
            Some(last) if now_ms <= last => last + 1,
            _ => now_ms,
        };
        self.last = Some(issued);
        JobId(format!("{}-{}", issued, self.client_tag))
    }
}
