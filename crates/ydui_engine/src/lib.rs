//! ydui engine: download API client, progress polling and the background engine thread.
mod api;
mod cookies;
mod engine;
mod persist;
mod poller;
mod reload;
mod types;

pub use api::{download_url, DownloadApi, EngineSettings, ReqwestApi};
pub use cookies::read_cookie_file;
pub use engine::{EngineError, EngineHandle};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use poller::{ChannelEventSink, EventSink, PollRegistry, PollTicket, Poller};
pub use reload::reload_all;
pub use types::{
    ActiveTask, ApiError, ApiFailureKind, CompletedFile, DownloadRequest, DownloadsSnapshot,
    EngineEvent, JobId, PollOutcome, StatusKind, StatusReport, StatusSentinels, TaskReport,
};
