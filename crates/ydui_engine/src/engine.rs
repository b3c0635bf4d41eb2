use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use thiserror::Error;
use tokio::runtime::Runtime;
use ydui_logging::{short_id, ydui_debug, ydui_info, ydui_warn};

use crate::poller::{ChannelEventSink, PollRegistry, Poller};
use crate::{
    reload_all, read_cookie_file, ApiError, DownloadApi, DownloadRequest, EngineEvent,
    EngineSettings, JobId, ReqwestApi, StatusSentinels,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("api client: {0}")]
    Api(#[from] ApiError),
    #[error("engine runtime: {0}")]
    Runtime(#[from] io::Error),
}

enum EngineCommand {
    Submit(DownloadRequest),
    StartPolling(JobId),
    CancelPolling(JobId),
    Reload(u64),
    Restart,
    ReadCookieFile(PathBuf),
}

/// Sends work to the engine thread. Results arrive on the receiver returned
/// by [`EngineHandle::spawn`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        settings: EngineSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let api = ReqwestApi::new(&settings)?;
        Self::with_api(Arc::new(api), settings)
    }

    /// Starts the engine over any [`DownloadApi`]; `settings.base_url` is
    /// not used here.
    pub fn with_api(
        api: Arc<dyn DownloadApi>,
        settings: EngineSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("ydui-engine-worker")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = Worker {
            poller: Arc::new(Poller::new(
                api.clone(),
                settings.poll_interval,
                settings.sentinels.clone(),
            )),
            api,
            sentinels: Arc::new(settings.sentinels),
            registry: PollRegistry::default(),
            events: event_tx,
        };

        thread::Builder::new()
            .name("ydui-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    worker.dispatch(&runtime, command);
                }
                worker.registry.cancel_all();
                ydui_debug!("engine command channel closed");
            })?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn submit(&self, request: DownloadRequest) {
        self.send(EngineCommand::Submit(request));
    }

    /// Starts a poll loop unless one is already running for `job_id`.
    pub fn start_polling(&self, job_id: JobId) {
        self.send(EngineCommand::StartPolling(job_id));
    }

    pub fn cancel_polling(&self, job_id: JobId) {
        self.send(EngineCommand::CancelPolling(job_id));
    }

    /// Reloads files and tasks; `generation` is echoed in the result event.
    pub fn reload(&self, generation: u64) {
        self.send(EngineCommand::Reload(generation));
    }

    pub fn restart(&self) {
        self.send(EngineCommand::Restart);
    }

    pub fn read_cookie_file(&self, path: PathBuf) {
        self.send(EngineCommand::ReadCookieFile(path));
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            ydui_warn!("engine thread is gone; command dropped");
        }
    }
}

struct Worker {
    api: Arc<dyn DownloadApi>,
    poller: Arc<Poller>,
    sentinels: Arc<StatusSentinels>,
    registry: PollRegistry,
    events: mpsc::Sender<EngineEvent>,
}

impl Worker {
    fn dispatch(&self, runtime: &Runtime, command: EngineCommand) {
        match command {
            EngineCommand::Submit(request) => {
                let api = self.api.clone();
                let events = self.events.clone();
                runtime.spawn(async move {
                    let event = match api.submit(&request).await {
                        Ok(job_id) => {
                            ydui_info!("submitted job={}", short_id(job_id.as_str()));
                            EngineEvent::Submitted {
                                job_id,
                                source_url: request.url,
                            }
                        }
                        Err(error) => {
                            ydui_warn!("submit failed: {}", error);
                            EngineEvent::SubmitFailed { error }
                        }
                    };
                    let _ = events.send(event);
                });
            }
            EngineCommand::StartPolling(job_id) => {
                let Some(ticket) = self.registry.register(&job_id) else {
                    ydui_debug!("already polling job={}", short_id(job_id.as_str()));
                    return;
                };
                let poller = self.poller.clone();
                let registry = self.registry.clone();
                let sink = ChannelEventSink::new(self.events.clone());
                runtime.spawn(async move {
                    poller.poll_job(&ticket.job_id, &sink, &ticket.token).await;
                    registry.finish(&ticket);
                });
            }
            EngineCommand::CancelPolling(job_id) => {
                if self.registry.cancel(&job_id) {
                    ydui_debug!("cancelled polling job={}", short_id(job_id.as_str()));
                }
            }
            EngineCommand::Reload(generation) => {
                let api = self.api.clone();
                let sentinels = self.sentinels.clone();
                let events = self.events.clone();
                runtime.spawn(async move {
                    let result = reload_all(api.as_ref(), &sentinels).await;
                    if let Err(err) = &result {
                        ydui_warn!("reload failed: {}", err);
                    }
                    let _ = events.send(EngineEvent::Reloaded { generation, result });
                });
            }
            EngineCommand::Restart => {
                let api = self.api.clone();
                let events = self.events.clone();
                runtime.spawn(async move {
                    match api.restart().await {
                        Ok(()) => ydui_info!("restart requested"),
                        Err(error) => {
                            ydui_warn!("restart failed: {}", error);
                            let _ = events.send(EngineEvent::RestartFailed { error });
                        }
                    }
                });
            }
            EngineCommand::ReadCookieFile(path) => {
                let events = self.events.clone();
                runtime.spawn(async move {
                    let result = read_cookie_file(&path).await.map_err(|err| {
                        ydui_warn!("cookie file {} unreadable: {}", path.display(), err);
                        err.to_string()
                    });
                    let _ = events.send(EngineEvent::CookieFileRead { result });
                });
            }
        }
    }
}
