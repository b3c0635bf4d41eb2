use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use ydui_logging::{short_id, ydui_debug, ydui_info, ydui_warn};

use crate::{DownloadApi, EngineEvent, JobId, PollOutcome, StatusKind, StatusSentinels};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Drives one job from submission or discovery to a terminal status.
pub struct Poller {
    api: Arc<dyn DownloadApi>,
    interval: Duration,
    sentinels: StatusSentinels,
}

impl Poller {
    pub fn new(api: Arc<dyn DownloadApi>, interval: Duration, sentinels: StatusSentinels) -> Self {
        Self {
            api,
            interval,
            sentinels,
        }
    }

    /// Polls `job_id` until it reaches a terminal status, a status request
    /// fails, or `cancel` fires.
    ///
    /// Every response is emitted as [`EngineEvent::Status`]; a failed request
    /// is emitted as [`EngineEvent::StatusFailed`] and ends the loop. The last
    /// event is always [`EngineEvent::PollFinished`].
    pub async fn poll_job(
        &self,
        job_id: &JobId,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        ydui_debug!("poll start job={}", short_id(job_id.as_str()));

        let outcome = 'poll: loop {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'poll PollOutcome::Cancelled,
                response = self.api.status(job_id) => response,
            };

            let report = match response {
                Ok(report) => report,
                Err(error) => {
                    ydui_warn!(
                        "status fetch failed job={}: {}",
                        short_id(job_id.as_str()),
                        error
                    );
                    sink.emit(EngineEvent::StatusFailed {
                        job_id: job_id.clone(),
                        error,
                    });
                    break 'poll PollOutcome::FetchFailed;
                }
            };

            let kind = self.sentinels.classify(&report.status);
            sink.emit(EngineEvent::Status {
                job_id: job_id.clone(),
                kind,
                report,
            });
            match kind {
                StatusKind::Completed => break 'poll PollOutcome::Completed,
                StatusKind::Failed => break 'poll PollOutcome::Failed,
                StatusKind::InProgress => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'poll PollOutcome::Cancelled,
                _ = tokio::time::sleep(self.interval) => {}
            }
        };

        ydui_info!(
            "poll finished job={} outcome={:?}",
            short_id(job_id.as_str()),
            outcome
        );
        sink.emit(EngineEvent::PollFinished {
            job_id: job_id.clone(),
            outcome,
        });
        outcome
    }
}

/// Live poll loops, at most one per job id.
///
/// Each registration gets a generation number so a loop that was cancelled
/// and replaced cannot unregister its successor when it winds down.
#[derive(Debug, Clone, Default)]
pub struct PollRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_generation: u64,
    active: HashMap<JobId, (u64, CancellationToken)>,
}

/// Proof of registration handed to a running loop.
#[derive(Debug, Clone)]
pub struct PollTicket {
    pub job_id: JobId,
    pub token: CancellationToken,
    generation: u64,
}

impl PollRegistry {
    /// Registers a loop for `job_id`, or returns `None` if one is running.
    pub fn register(&self, job_id: &JobId) -> Option<PollTicket> {
        let mut inner = self.lock();
        if inner.active.contains_key(job_id) {
            return None;
        }
        inner.next_generation += 1;
        let generation = inner.next_generation;
        let token = CancellationToken::new();
        inner
            .active
            .insert(job_id.clone(), (generation, token.clone()));
        Some(PollTicket {
            job_id: job_id.clone(),
            token,
            generation,
        })
    }

    /// Cancels and unregisters the loop for `job_id`. Returns whether one
    /// was running.
    pub fn cancel(&self, job_id: &JobId) -> bool {
        match self.lock().active.remove(job_id) {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, (_, token)) in self.lock().active.drain() {
            token.cancel();
        }
    }

    /// Unregisters a loop that ended on its own.
    pub fn finish(&self, ticket: &PollTicket) {
        let mut inner = self.lock();
        let current = inner.active.get(&ticket.job_id).map(|(generation, _)| *generation);
        if current == Some(ticket.generation) {
            inner.active.remove(&ticket.job_id);
        }
    }

    pub fn is_active(&self, job_id: &JobId) -> bool {
        self.lock().active.contains_key(job_id)
    }

    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
