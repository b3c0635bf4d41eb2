use std::path::PathBuf;

use crate::{DownloadRequest, JobId, SettingsSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitDownload(DownloadRequest),
    StartPolling { job_id: JobId },
    CancelPolling { job_id: JobId },
    /// Re-fetch active tasks and completed files. The result comes back as
    /// `Msg::ListReloaded` with the same generation.
    ReloadAll { generation: u64 },
    SaveSettings(SettingsSnapshot),
    ReadCookieFile { path: PathBuf },
    OpenFile { filename: String },
    CopyToClipboard { text: String },
    RestartServer,
}
