use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-issued job identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    InProgress,
    Completed,
    Failed,
}

/// Status strings the backend uses for its terminal states.
///
/// The backend reports free-form, localized status text; these lists are the
/// agreed contract for which strings end a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSentinels {
    pub completed: Vec<String>,
    pub failed: Vec<String>,
    /// Failure statuses that carry a detail suffix, e.g. `启动失败: No such file`.
    pub failed_prefixes: Vec<String>,
}

impl Default for StatusSentinels {
    fn default() -> Self {
        Self {
            completed: vec!["下载完成".to_string()],
            failed: vec!["error".to_string(), "下载失败".to_string()],
            failed_prefixes: vec!["启动失败".to_string()],
        }
    }
}

impl StatusSentinels {
    pub fn classify(&self, status: &str) -> StatusKind {
        if self.completed.iter().any(|s| s == status) {
            StatusKind::Completed
        } else if self.failed.iter().any(|s| s == status)
            || self
                .failed_prefixes
                .iter()
                .any(|prefix| status.starts_with(prefix.as_str()))
        {
            StatusKind::Failed
        } else {
            StatusKind::InProgress
        }
    }
}

/// `POST /api/download` body. Optional fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub proxy: Option<String>,
    pub cookie_text: Option<String>,
    pub use_aria2: bool,
    pub quality: String,
    pub custom_args: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(default)]
    pub(crate) id: String,
}

/// `GET /api/status/{id}` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    pub status: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub filename: Option<String>,
    /// Cumulative job output joined by newlines; empty means none yet.
    #[serde(default)]
    pub log: Option<String>,
}

/// One entry of the `GET /api/tasks` mapping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub log: Vec<String>,
}

/// One entry of the `GET /api/list` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletedFile {
    pub filename: String,
    #[serde(rename = "created_time")]
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTask {
    pub job_id: JobId,
    pub kind: StatusKind,
    pub report: TaskReport,
}

/// Backend view used to rebuild the download list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DownloadsSnapshot {
    /// Tasks in ascending job-id order.
    pub tasks: Vec<ActiveTask>,
    pub files: Vec<CompletedFile>,
}

/// How a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Completed,
    Failed,
    /// The status request itself failed.
    FetchFailed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Submitted {
        job_id: JobId,
        source_url: String,
    },
    SubmitFailed {
        error: ApiError,
    },
    Status {
        job_id: JobId,
        kind: StatusKind,
        report: StatusReport,
    },
    StatusFailed {
        job_id: JobId,
        error: ApiError,
    },
    PollFinished {
        job_id: JobId,
        outcome: PollOutcome,
    },
    /// Result of the reload requested with the same `generation`.
    Reloaded {
        generation: u64,
        result: Result<DownloadsSnapshot, ApiError>,
    },
    RestartFailed {
        error: ApiError,
    },
    CookieFileRead {
        result: Result<String, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiFailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailureKind {
    InvalidUrl,
    InvalidJobId,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    InvalidResponse,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::InvalidUrl => write!(f, "invalid url"),
            ApiFailureKind::InvalidJobId => write!(f, "invalid job id"),
            ApiFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::Network => write!(f, "network error"),
            ApiFailureKind::Decode => write!(f, "malformed response"),
            ApiFailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}
