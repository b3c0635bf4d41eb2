#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use tokio_util::sync::CancellationToken;
use ydui_engine::{
    ApiError, CompletedFile, DownloadApi, DownloadRequest, EngineEvent, EventSink, JobId,
    StatusReport, TaskReport,
};

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(ydui_logging::initialize_for_tests);
}

pub fn job(id: &str) -> JobId {
    JobId::new(id).expect("non-blank id")
}

pub fn report(status: &str, progress: f64) -> StatusReport {
    StatusReport {
        status: status.to_string(),
        progress,
        filename: None,
        log: None,
    }
}

/// In-memory backend. Status responses are served in order; the last one
/// repeats once the script runs out.
#[derive(Default)]
pub struct ScriptedApi {
    statuses: Mutex<VecDeque<Result<StatusReport, ApiError>>>,
    last_status: Mutex<Option<Result<StatusReport, ApiError>>>,
    files: Mutex<Option<Result<Vec<CompletedFile>, ApiError>>>,
    tasks: Mutex<Option<Result<BTreeMap<String, TaskReport>, ApiError>>>,
    submit_result: Mutex<Option<Result<JobId, ApiError>>>,
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
    pub status_calls: AtomicUsize,
    pub submits: Mutex<Vec<DownloadRequest>>,
    pub restarts: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_status(&self, result: Result<StatusReport, ApiError>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn set_files(&self, result: Result<Vec<CompletedFile>, ApiError>) {
        *self.files.lock().unwrap() = Some(result);
    }

    pub fn set_tasks(&self, result: Result<BTreeMap<String, TaskReport>, ApiError>) {
        *self.tasks.lock().unwrap() = Some(result);
    }

    pub fn set_submit(&self, result: Result<JobId, ApiError>) {
        *self.submit_result.lock().unwrap() = Some(result);
    }

    /// Cancels `token` while serving status request number `calls`.
    pub fn cancel_on_call(&self, calls: usize, token: CancellationToken) {
        *self.cancel_after.lock().unwrap() = Some((calls, token));
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DownloadApi for ScriptedApi {
    async fn submit(&self, request: &DownloadRequest) -> Result<JobId, ApiError> {
        self.submits.lock().unwrap().push(request.clone());
        self.submit_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(job("job-1")))
    }

    async fn status(&self, _job_id: &JobId) -> Result<StatusReport, ApiError> {
        let calls = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if *at == calls {
                token.cancel();
            }
        }
        let next = self.statuses.lock().unwrap().pop_front();
        let mut last = self.last_status.lock().unwrap();
        if let Some(next) = next {
            *last = Some(next);
        }
        last.clone().unwrap_or_else(|| Ok(report("准备下载", 0.0)))
    }

    async fn list_files(&self) -> Result<Vec<CompletedFile>, ApiError> {
        self.files.lock().unwrap().clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_tasks(&self) -> Result<BTreeMap<String, TaskReport>, ApiError> {
        self.tasks
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(BTreeMap::new()))
    }

    async fn restart(&self) -> Result<(), ApiError> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
