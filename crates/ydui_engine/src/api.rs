use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::types::SubmitResponse;
use crate::{
    ApiError, ApiFailureKind, CompletedFile, DownloadRequest, JobId, StatusReport,
    StatusSentinels, TaskReport,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay between two status requests of one poll loop.
    pub poll_interval: Duration,
    pub sentinels: StatusSentinels,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:2333".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(1000),
            sentinels: StatusSentinels::default(),
        }
    }
}

/// The backend's HTTP surface.
#[async_trait::async_trait]
pub trait DownloadApi: Send + Sync {
    async fn submit(&self, request: &DownloadRequest) -> Result<JobId, ApiError>;

    async fn status(&self, job_id: &JobId) -> Result<StatusReport, ApiError>;

    /// Completed files in the backend's download directory.
    async fn list_files(&self) -> Result<Vec<CompletedFile>, ApiError>;

    /// Tasks the backend is tracking, keyed by job id.
    async fn list_tasks(&self) -> Result<BTreeMap<String, TaskReport>, ApiError>;

    async fn restart(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: &EngineSettings) -> Result<Self, ApiError> {
        let base = parse_base(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailureKind::Network, err.to_string()))?;
        Ok(Self { base, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        join_segments(&self.base, segments)
    }
}

#[async_trait::async_trait]
impl DownloadApi for ReqwestApi {
    async fn submit(&self, request: &DownloadRequest) -> Result<JobId, ApiError> {
        let url = self.endpoint(&["api", "download"])?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: SubmitResponse = read_json(response).await?;
        JobId::new(body.id)
            .ok_or_else(|| ApiError::new(ApiFailureKind::InvalidResponse, "response has no job id"))
    }

    async fn status(&self, job_id: &JobId) -> Result<StatusReport, ApiError> {
        let url = self.endpoint(&["api", "status", job_id.as_str()])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn list_files(&self) -> Result<Vec<CompletedFile>, ApiError> {
        let url = self.endpoint(&["api", "list"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn list_tasks(&self) -> Result<BTreeMap<String, TaskReport>, ApiError> {
        let url = self.endpoint(&["api", "tasks"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn restart(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "restart"])?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(http_status_error(status))
        }
    }
}

/// Browser URL of a downloaded file: `{base}/downloads/{percent-encoded name}`.
pub fn download_url(base_url: &str, filename: &str) -> Result<Url, ApiError> {
    let base = parse_base(base_url)?;
    join_segments(&base, &["downloads", filename])
}

fn parse_base(base_url: &str) -> Result<Url, ApiError> {
    let base = Url::parse(base_url.trim())
        .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(ApiError::new(
            ApiFailureKind::InvalidUrl,
            format!("{base_url} cannot be used as a base url"),
        ));
    }
    Ok(base)
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::new(ApiFailureKind::InvalidUrl, "base url has no path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(http_status_error(status));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))
}

fn http_status_error(status: reqwest::StatusCode) -> ApiError {
    ApiError::new(
        ApiFailureKind::HttpStatus(status.as_u16()),
        status.canonical_reason().unwrap_or("unexpected status"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailureKind::Decode, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}
