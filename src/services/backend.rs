//! HTTP client for the inference backend.
//!
//! Thin, stateless request/response wrapper around the backend's job API.
//! Each operation is a single request: no retries, no caching, no job
//! state. Callers own the polling policy and are responsible for
//! validating wire values (for example unrecognized status strings).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::job::{InputReference, JobStatusPayload};
use crate::models::prediction::JobResultsPayload;
use crate::models::upload::{SkeletonUpload, SkeletonUploadRequest, VideoUpload};

/// Error type for backend client operations.
///
/// The distinction matters internally (a `Network` failure during a poll is
/// skipped, a `Backend` detail is shown to the operator verbatim) even
/// though consumers ultimately see strings.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (connect, timeout, interrupted body).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `detail` carries the backend's message verbatim
    /// when the body had one, else a generic message with the status code.
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    /// 2xx response whose body did not decode as the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Error body attached to non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Serialize)]
struct InferRequest<'a> {
    input_id: &'a str,
    input_type: &'a str,
    behavior_id: &'a str,
}

#[derive(Deserialize)]
struct InferResponse {
    job_id: String,
}

/// Response from `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    pub model_available: bool,
    pub dummy_mode: bool,
    #[serde(default)]
    pub behaviors_count: u64,
    #[serde(default)]
    pub behaviors: Vec<String>,
}

/// Response from `GET /api/behaviors`.
#[derive(Debug, Clone, Deserialize)]
pub struct BehaviorCatalog {
    pub behaviors: serde_json::Value,
    pub count: u64,
    pub ids: Vec<String>,
}

/// Client for the inference backend's HTTP API.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new client for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check backend availability and model status.
    pub async fn health(&self) -> Result<BackendHealth, BackendError> {
        let url = format!("{}/api/health", self.base_url);
        decode(self.http.get(&url).send().await?).await
    }

    /// Fetch the backend's behavior catalog.
    pub async fn behaviors(&self) -> Result<BehaviorCatalog, BackendError> {
        let url = format!("{}/api/behaviors", self.base_url);
        decode(self.http.get(&url).send().await?).await
    }

    /// Upload a video file as a multipart form. The backend assigns the id.
    pub async fn upload_video(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<VideoUpload, BackendError> {
        let url = format!("{}/api/videos", self.base_url);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(video_mime(filename))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        decode(self.http.post(&url).multipart(form).send().await?).await
    }

    /// Upload skeleton point data as JSON. The backend assigns the id.
    pub async fn upload_skeleton(
        &self,
        request: &SkeletonUploadRequest,
    ) -> Result<SkeletonUpload, BackendError> {
        let url = format!("{}/api/skeletons", self.base_url);
        decode(self.http.post(&url).json(request).send().await?).await
    }

    /// Create an inference job. Not idempotent: every call creates a new
    /// job server-side.
    pub async fn create_job(
        &self,
        input: &InputReference,
        behavior_id: &str,
    ) -> Result<String, BackendError> {
        let url = format!("{}/api/infer", self.base_url);
        let input_type = input.kind.to_string();
        let body = InferRequest {
            input_id: &input.id,
            input_type: &input_type,
            behavior_id,
        };
        let response: InferResponse = decode(self.http.post(&url).json(&body).send().await?).await?;
        Ok(response.job_id)
    }

    /// Fetch the current status snapshot for a job. Safe to call repeatedly.
    pub async fn get_status(&self, job_id: &str) -> Result<JobStatusPayload, BackendError> {
        let url = format!("{}/api/jobs/{}", self.base_url, job_id);
        decode(self.http.get(&url).send().await?).await
    }

    /// Fetch the results of a job. Only meaningful once the backend reports
    /// the job completed; calling earlier is the backend's to reject.
    pub async fn get_results(&self, job_id: &str) -> Result<JobResultsPayload, BackendError> {
        let url = format!("{}/api/jobs/{}/results", self.base_url, job_id);
        decode(self.http.get(&url).send().await?).await
    }
}

/// Decode a response, mapping non-2xx statuses to `BackendError::Backend`
/// with the `{detail}` body when present.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.detail)
            .filter(|detail| !detail.is_empty())
            .unwrap_or_else(|| format!("backend request failed (HTTP {})", status.as_u16()));
        return Err(BackendError::Backend {
            status: status.as_u16(),
            detail,
        });
    }
    response.json::<T>().await.map_err(BackendError::Decode)
}

/// MIME type for a video upload, from the filename extension.
fn video_mime(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_mime_by_extension() {
        assert_eq!(video_mime("clip.mp4"), "video/mp4");
        assert_eq!(video_mime("CLIP.MOV"), "video/quicktime");
        assert_eq!(video_mime("capture.webm"), "video/webm");
        assert_eq!(video_mime("unknown.bin"), "application/octet-stream");
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = BackendClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
