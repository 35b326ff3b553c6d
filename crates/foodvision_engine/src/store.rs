use foodvision_core::{JobId, JobStatus, PollObservation};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::http::build_client;
use crate::settings::{parse_url, ClientSettings, ConfigError};

/// Message used when the store reports a failure without error text.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Processing failed.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreQueryError {
    #[error("status query failed: {0}")]
    Network(String),
    #[error("status store answered http {0}")]
    HttpStatus(u16),
    #[error("status body is not valid json: {0}")]
    Decode(String),
    #[error("unrecognized status {0:?}")]
    UnrecognizedStatus(String),
    #[error("success reported without a usable class index: {0}")]
    MalformedResult(String),
}

impl StoreQueryError {
    /// Map a failed query onto what the poller should do next.
    pub fn into_observation(self) -> PollObservation {
        let message = self.to_string();
        match self {
            StoreQueryError::MalformedResult(_) => PollObservation::Malformed(message),
            _ => PollObservation::Transient(message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode a status store answer.
///
/// The store writes the class index JSON-encoded, so `result` may arrive as
/// `5` or as `"5"`. `in_progress` and `processing` both mean the job started.
pub fn decode_status(body: &[u8]) -> Result<JobStatus, StoreQueryError> {
    let body: StatusBody =
        serde_json::from_slice(body).map_err(|err| StoreQueryError::Decode(err.to_string()))?;

    match body.status.as_deref() {
        Some("pending") => Ok(JobStatus::Pending),
        Some("in_progress") | Some("processing") => Ok(JobStatus::Processing),
        Some("success") => decode_class_index(body.result.as_ref()).map(JobStatus::Success),
        Some("failure") => Ok(JobStatus::Failure(
            body.error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        )),
        Some(other) => Err(StoreQueryError::UnrecognizedStatus(other.to_string())),
        None => Err(StoreQueryError::UnrecognizedStatus("<missing>".to_string())),
    }
}

fn decode_class_index(result: Option<&serde_json::Value>) -> Result<i64, StoreQueryError> {
    match result {
        Some(serde_json::Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| StoreQueryError::MalformedResult(number.to_string())),
        Some(serde_json::Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| StoreQueryError::MalformedResult(format!("{text:?}"))),
        Some(other) => Err(StoreQueryError::MalformedResult(other.to_string())),
        None => Err(StoreQueryError::MalformedResult("result is missing".to_string())),
    }
}

#[async_trait::async_trait]
pub trait StatusStore: Send + Sync {
    async fn query(&self, job_id: &JobId) -> Result<JobStatus, StoreQueryError>;
}

#[derive(Debug, Clone)]
pub struct HttpStatusStore {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpStatusStore {
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(settings)?,
            endpoint: parse_url("status_url", &settings.status_url)?,
        })
    }

    pub(crate) fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait::async_trait]
impl StatusStore for HttpStatusStore {
    async fn query(&self, job_id: &JobId) -> Result<JobStatus, StoreQueryError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("image_id", job_id.as_str());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| StoreQueryError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreQueryError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| StoreQueryError::Network(err.to_string()))?;
        decode_status(&body)
    }
}
