use foodvision_core::{JobId, UploadOutcome};
use foodvision_logging::{fv_info, fv_warn};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::encode::{encode_artifact, EncodedPayload, EncodingError};
use crate::http::build_client;
use crate::settings::{parse_url, ClientSettings, ConfigError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to serialize upload body: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("upload request failed: {0}")]
    Network(String),
}

#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    image_id: &'a str,
    image_data: &'a str,
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Send one upload request. A non-2xx answer is `Ok(Rejected)`.
    async fn upload(
        &self,
        job_id: &JobId,
        payload: &EncodedPayload,
    ) -> Result<UploadOutcome, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpUploader {
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(settings)?,
            endpoint: parse_url("upload_url", &settings.upload_url)?,
        })
    }

    pub(crate) fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait::async_trait]
impl Uploader for HttpUploader {
    async fn upload(
        &self,
        job_id: &JobId,
        payload: &EncodedPayload,
    ) -> Result<UploadOutcome, SubmitError> {
        let body = serde_json::to_vec(&UploadBody {
            image_id: job_id.as_str(),
            image_data: payload.as_str(),
        })?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| SubmitError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(UploadOutcome::Accepted)
        } else {
            Ok(UploadOutcome::Rejected {
                status: Some(status.as_u16()),
            })
        }
    }
}

/// Encode the artifact and make the single upload attempt for `job_id`.
///
/// Transport failures are folded into `Rejected { status: None }`; only an
/// unreadable artifact is returned as an error.
pub async fn submit_job(
    uploader: &dyn Uploader,
    job_id: &JobId,
    artifact: &[u8],
) -> Result<UploadOutcome, EncodingError> {
    let payload = encode_artifact(artifact)?;
    fv_info!(
        "Uploading job_id={} payload_len={}",
        job_id,
        payload.as_str().len()
    );

    match uploader.upload(job_id, &payload).await {
        Ok(UploadOutcome::Accepted) => {
            fv_info!("Upload accepted job_id={}", job_id);
            Ok(UploadOutcome::Accepted)
        }
        Ok(UploadOutcome::Rejected { status }) => {
            fv_warn!("Upload rejected job_id={} status={:?}", job_id, status);
            Ok(UploadOutcome::Rejected { status })
        }
        Err(err) => {
            fv_warn!("Upload failed job_id={}: {}", job_id, err);
            Ok(UploadOutcome::Rejected { status: None })
        }
    }
}
