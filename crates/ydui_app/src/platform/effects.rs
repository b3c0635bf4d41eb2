use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Local;
use ydui_core::{
    ActiveTask, CompletedFile, Effect, JobId, ListSnapshot, Msg, StatusKind, StatusUpdate,
};
use ydui_engine::{download_url, DownloadsSnapshot, EngineError, EngineEvent, EngineHandle};
use ydui_logging::{short_id, ydui_info, ydui_warn};

use super::config::AppConfig;
use super::persistence;
use super::ui::constants::LOG_TIME_FORMAT;

/// Executes effects returned by `update` and feeds engine results back as
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    server: String,
    state_dir: PathBuf,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::spawn(config.engine_settings())?;
        spawn_event_loop(events, msg_tx.clone())?;
        Ok(Self {
            engine,
            server: config.server.clone(),
            state_dir: config.state_dir.clone(),
            msg_tx,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitDownload(request) => {
                    ydui_info!("SubmitDownload url_len={}", request.url.len());
                    self.engine.submit(engine_request(request));
                }
                Effect::StartPolling { job_id } => {
                    if let Some(job_id) = engine_job(&job_id) {
                        self.engine.start_polling(job_id);
                    }
                }
                Effect::CancelPolling { job_id } => {
                    if let Some(job_id) = engine_job(&job_id) {
                        self.engine.cancel_polling(job_id);
                    }
                }
                Effect::ReloadAll { generation } => self.engine.reload(generation),
                Effect::SaveSettings(snapshot) => {
                    persistence::save_settings(&self.state_dir, &snapshot);
                }
                Effect::ReadCookieFile { path } => self.engine.read_cookie_file(path),
                Effect::OpenFile { filename } => self.open_file(&filename),
                Effect::CopyToClipboard { text } => {
                    let _ = self.msg_tx.send(Msg::LogsCopied(copy_to_clipboard(text)));
                }
                Effect::RestartServer => {
                    ydui_info!("RestartServer");
                    self.engine.restart();
                }
            }
        }
    }

    fn open_file(&self, filename: &str) {
        if let Err(message) = open_download(&self.server, filename) {
            ydui_warn!("Failed to open {}: {}", filename, message);
            let _ = self.msg_tx.send(Msg::OpenFailed(message));
        }
    }
}

fn open_download(server: &str, filename: &str) -> Result<(), String> {
    let url = download_url(server, filename).map_err(|err| err.to_string())?;
    open::that(url.as_str()).map_err(|err| err.to_string())
}

fn copy_to_clipboard(text: String) -> Result<(), String> {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    result.map_err(|err| {
        ydui_warn!("Clipboard unavailable: {}", err);
        err.to_string()
    })
}

fn spawn_event_loop(
    events: mpsc::Receiver<EngineEvent>,
    msg_tx: mpsc::Sender<Msg>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("ydui-events".to_string())
        .spawn(move || {
            for event in events {
                let timestamp = Local::now().format(LOG_TIME_FORMAT).to_string();
                if let Some(msg) = event_to_msg(event, &timestamp) {
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

/// Maps an engine event onto the panel message it produces.
fn event_to_msg(event: EngineEvent, timestamp: &str) -> Option<Msg> {
    let msg = match event {
        EngineEvent::Submitted { job_id, source_url } => Msg::SubmitSucceeded {
            job_id: core_job(&job_id)?,
            source_url,
        },
        EngineEvent::SubmitFailed { error } => Msg::SubmitFailed(error.to_string()),
        EngineEvent::Status {
            job_id,
            kind,
            report,
        } => Msg::StatusReceived(StatusUpdate {
            job_id: core_job(&job_id)?,
            status: report.status,
            kind: core_kind(kind),
            progress: report.progress,
            filename: report.filename,
            log: report.log,
            timestamp: timestamp.to_string(),
        }),
        EngineEvent::StatusFailed { job_id, .. } => Msg::StatusFetchFailed {
            job_id: core_job(&job_id)?,
        },
        EngineEvent::PollFinished { job_id, outcome } => {
            ydui_info!("PollFinished job={} outcome={:?}", short_id(job_id.as_str()), outcome);
            Msg::PollingFinished {
                job_id: core_job(&job_id)?,
            }
        }
        EngineEvent::Reloaded { generation, result } => Msg::ListReloaded {
            generation,
            result: result.map(list_snapshot).map_err(|err| err.to_string()),
        },
        EngineEvent::RestartFailed { error } => Msg::RestartFailed(error.to_string()),
        EngineEvent::CookieFileRead { result } => Msg::CookieFileLoaded(result),
    };
    Some(msg)
}

fn list_snapshot(snapshot: DownloadsSnapshot) -> ListSnapshot {
    ListSnapshot {
        tasks: snapshot
            .tasks
            .into_iter()
            .filter_map(|task| {
                Some(ActiveTask {
                    job_id: core_job(&task.job_id)?,
                    status: task.report.status,
                    kind: core_kind(task.kind),
                    progress: task.report.progress,
                    url: task.report.url,
                    log: task.report.log,
                })
            })
            .collect(),
        files: snapshot
            .files
            .into_iter()
            .map(|file| CompletedFile {
                filename: file.filename,
                created_at: file.created_at,
            })
            .collect(),
    }
}

fn engine_request(request: ydui_core::DownloadRequest) -> ydui_engine::DownloadRequest {
    ydui_engine::DownloadRequest {
        url: request.url,
        proxy: request.proxy,
        cookie_text: request.cookie_text,
        use_aria2: request.use_aria2,
        quality: request.quality,
        custom_args: request.custom_args,
    }
}

fn engine_job(job_id: &JobId) -> Option<ydui_engine::JobId> {
    ydui_engine::JobId::new(job_id.as_str())
}

fn core_job(job_id: &ydui_engine::JobId) -> Option<JobId> {
    JobId::new(job_id.as_str())
}

fn core_kind(kind: ydui_engine::StatusKind) -> StatusKind {
    match kind {
        ydui_engine::StatusKind::InProgress => StatusKind::InProgress,
        ydui_engine::StatusKind::Completed => StatusKind::Completed,
        ydui_engine::StatusKind::Failed => StatusKind::Failed,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ydui_engine::{ApiError, ApiFailureKind, PollOutcome, StatusReport, TaskReport};

    use super::*;

    fn engine_id(id: &str) -> ydui_engine::JobId {
        ydui_engine::JobId::new(id).unwrap()
    }

    #[test]
    fn status_event_carries_timestamp() {
        let msg = event_to_msg(
            EngineEvent::Status {
                job_id: engine_id("4f1c"),
                kind: ydui_engine::StatusKind::Completed,
                report: StatusReport {
                    status: "下载完成".to_string(),
                    progress: 100.0,
                    filename: Some("clip.mp4".to_string()),
                    log: Some("done".to_string()),
                },
            },
            "08:15:00",
        );

        assert_eq!(
            msg,
            Some(Msg::StatusReceived(StatusUpdate {
                job_id: JobId::new("4f1c").unwrap(),
                status: "下载完成".to_string(),
                kind: StatusKind::Completed,
                progress: 100.0,
                filename: Some("clip.mp4".to_string()),
                log: Some("done".to_string()),
                timestamp: "08:15:00".to_string(),
            }))
        );
    }

    #[test]
    fn reload_failure_becomes_message_text() {
        let msg = event_to_msg(
            EngineEvent::Reloaded {
                generation: 3,
                result: Err(ApiError {
                    kind: ApiFailureKind::Network,
                    message: "connection refused".to_string(),
                }),
            },
            "00:00:00",
        );
        assert_eq!(
            msg,
            Some(Msg::ListReloaded {
                generation: 3,
                result: Err("network error: connection refused".to_string()),
            })
        );
    }

    #[test]
    fn snapshot_keeps_task_fields() {
        let snapshot = DownloadsSnapshot {
            tasks: vec![ydui_engine::ActiveTask {
                job_id: engine_id("a"),
                kind: ydui_engine::StatusKind::InProgress,
                report: TaskReport {
                    status: "12%".to_string(),
                    progress: Some(12.0),
                    url: Some("https://youtu.be/a".to_string()),
                    log: vec!["line".to_string()],
                },
            }],
            files: vec![ydui_engine::CompletedFile {
                filename: "b.mp4".to_string(),
                created_at: 7,
            }],
        };

        let converted = list_snapshot(snapshot);
        assert_eq!(converted.tasks[0].job_id.as_str(), "a");
        assert_eq!(converted.tasks[0].progress, Some(12.0));
        assert_eq!(converted.tasks[0].log, vec!["line".to_string()]);
        assert_eq!(converted.files[0].created_at, 7);
    }

    #[test]
    fn unusable_server_fails_open_before_launching_anything() {
        let message = open_download("not a url", "clip.mp4").unwrap_err();
        assert!(!message.is_empty());
    }

    #[test]
    fn poll_finished_maps_regardless_of_outcome() {
        let msg = event_to_msg(
            EngineEvent::PollFinished {
                job_id: engine_id("a"),
                outcome: PollOutcome::Cancelled,
            },
            "00:00:00",
        );
        assert_eq!(
            msg,
            Some(Msg::PollingFinished {
                job_id: JobId::new("a").unwrap()
            })
        );
    }
}
