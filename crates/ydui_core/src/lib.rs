//! ydui core: pure panel state machine, label tables and view-model helpers.
mod command;
mod effect;
mod labels;
mod log_pane;
mod msg;
mod state;
mod update;
mod view_model;

pub use command::{build_request, command_preview, format_selector, DownloadRequest};
pub use effect::Effect;
pub use labels::{LabelKey, Labels, Language};
pub use log_pane::{LogPane, MAX_LOG_LINES};
pub use msg::Msg;
pub use state::{
    ActiveTask, AppState, CompletedFile, JobId, ListSnapshot, Settings, SettingsSnapshot,
    StatusKind, StatusUpdate,
};
pub use update::update;
pub use view_model::{AppViewModel, FileRowView, JobRowView, RowView};
