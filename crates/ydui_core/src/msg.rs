use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Persisted settings loaded at startup.
    RestoreSettings(crate::SettingsSnapshot),
    /// User edited the video URL input.
    UrlChanged(String),
    QualityChanged(String),
    ProxyChanged(String),
    CookieTextChanged(String),
    CustomArgsChanged(String),
    Aria2Changed(bool),
    /// User picked a cookie file to import.
    CookieFileChosen(PathBuf),
    /// Cookie file contents, or the read error.
    CookieFileLoaded(Result<String, String>),
    /// User clicked the download button.
    DownloadClicked,
    /// Backend accepted a submission.
    SubmitSucceeded {
        job_id: crate::JobId,
        source_url: String,
    },
    SubmitFailed(String),
    /// One poll-loop iteration returned a status.
    StatusReceived(crate::StatusUpdate),
    /// A poll loop gave up after a failed status request.
    StatusFetchFailed { job_id: crate::JobId },
    /// A poll loop exited for any reason.
    PollingFinished { job_id: crate::JobId },
    /// Request a full list reload (startup).
    ReloadRequested,
    /// Result of the reload issued as `generation`.
    ListReloaded {
        generation: u64,
        result: Result<crate::ListSnapshot, String>,
    },
    LanguageToggled,
    LogsToggled,
    ClearLogs,
    CopyLogs,
    LogsCopied(Result<(), String>),
    RestartClicked,
    /// Answer to the pending confirmation prompt.
    PromptAnswered(bool),
    RestartFailed(String),
    /// User activated the row at this index of the view.
    RowActivated(usize),
    OpenFailed(String),
    /// Front end has shown the pending alert.
    AlertDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
