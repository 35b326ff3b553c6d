use std::io;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("artifact is empty")]
    Empty,
    #[error("failed to read artifact {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Transport-safe form of an artifact: plain standard base64, no data-URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn encode_artifact(bytes: &[u8]) -> Result<EncodedPayload, EncodingError> {
    if bytes.is_empty() {
        return Err(EncodingError::Empty);
    }
    Ok(EncodedPayload(general_purpose::STANDARD.encode(bytes)))
}

/// Read an artifact from disk. An empty file is reported as unreadable.
pub async fn read_artifact(path: &Path) -> Result<Vec<u8>, EncodingError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| EncodingError::Read {
            path: path.display().to_string(),
            source,
        })?;
    if bytes.is_empty() {
        return Err(EncodingError::Empty);
    }
    Ok(bytes)
}
