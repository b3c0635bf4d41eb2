use std::fmt;
use std::path::PathBuf;

use crate::effect::Effect;
use crate::labels::{LabelKey, Language};
use crate::log_pane::{unseen_log, LogPane};
use crate::view_model::AppViewModel;

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

/// Classification of a backend status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    InProgress,
    Completed,
    Failed,
}

impl StatusKind {
    pub fn is_terminal(self) -> bool {
        !matches!(self, StatusKind::InProgress)
    }
}

/// User download preferences, persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub quality: String,
    pub custom_args: String,
    pub proxy: String,
    pub cookie_text: String,
    pub use_aria2: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: "best".to_string(),
            custom_args: String::new(),
            proxy: String::new(),
            cookie_text: String::new(),
            use_aria2: false,
        }
    }
}

/// Everything the settings store keeps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsSnapshot {
    pub settings: Settings,
    pub language: Language,
    pub logs_collapsed: bool,
}

/// One status response for a polled job.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub job_id: JobId,
    pub status: String,
    pub kind: StatusKind,
    pub progress: f64,
    pub filename: Option<String>,
    pub log: Option<String>,
    /// Local wall-clock time the response arrived, used as log prefix.
    pub timestamp: String,
}

/// An unfinished task reported by the backend's task listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTask {
    pub job_id: JobId,
    pub status: String,
    pub kind: StatusKind,
    pub progress: Option<f64>,
    pub url: Option<String>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedFile {
    pub filename: String,
    pub created_at: u64,
}

/// Result of a full list reload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListSnapshot {
    pub tasks: Vec<ActiveTask>,
    pub files: Vec<CompletedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ProgressBar {
    pub(crate) percent: u8,
    pub(crate) indeterminate: bool,
}

impl ProgressBar {
    fn indeterminate() -> Self {
        Self {
            percent: 0,
            indeterminate: true,
        }
    }

    /// Applies a reported progress value. Non-positive values keep the bar
    /// indeterminate; the shown percentage never moves backwards.
    fn apply(&mut self, progress: f64) {
        if let Some(percent) = whole_percent(progress) {
            self.indeterminate = false;
            self.percent = self.percent.max(percent);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowTitle {
    Source(String),
    Label(LabelKey),
    /// Downloaded file; activating the row opens it.
    File(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowStatus {
    Label(LabelKey),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JobRow {
    pub(crate) job_id: JobId,
    pub(crate) title: RowTitle,
    pub(crate) bar: ProgressBar,
    pub(crate) status: RowStatus,
    /// Set once the poll loop for this row can no longer change it.
    pub(crate) finished: bool,
    pub(crate) last_log: Option<String>,
    /// Reloads issued before this job was submitted; `None` for rows
    /// recovered from a reload.
    pub(crate) submitted_after: Option<u64>,
}

impl JobRow {
    fn submitted(job_id: JobId, source_url: String, reloads_issued: u64) -> Self {
        Self {
            job_id,
            title: RowTitle::Source(source_url),
            bar: ProgressBar::indeterminate(),
            status: RowStatus::Label(LabelKey::Preparing),
            finished: false,
            last_log: None,
            submitted_after: Some(reloads_issued),
        }
    }

    /// Whether the backend could not have known this job when reload
    /// `generation` was issued.
    fn is_newer_than(&self, generation: u64) -> bool {
        !self.finished && matches!(self.submitted_after, Some(issued) if issued >= generation)
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.status == RowStatus::Label(LabelKey::DownloadCompleted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Row {
    Job(JobRow),
    File(CompletedFile),
    Placeholder(LabelKey),
    LoadError(String),
}

/// A pending alert: a label plus optional raw detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) key: LabelKey,
    pub(crate) detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prompt {
    RestartServer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) settings: Settings,
    pub(crate) language: Language,
    pub(crate) url_input: String,
    pub(crate) cookie_file: Option<PathBuf>,
    pub(crate) rows: Vec<Row>,
    pub(crate) log: LogPane,
    pub(crate) alert: Option<Notice>,
    pub(crate) prompt: Option<Prompt>,
    reloads_issued: u64,
    reload_applied: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            language: Language::default(),
            url_input: String::new(),
            cookie_file: None,
            rows: vec![Row::Placeholder(LabelKey::LoadingFiles)],
            log: LogPane::default(),
            alert: None,
            prompt: None,
            reloads_issued: 0,
            reload_applied: 0,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self, self.dirty)
    }

    pub fn settings_snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            settings: self.settings.clone(),
            language: self.language,
            logs_collapsed: self.log.is_collapsed(),
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore(&mut self, snapshot: SettingsSnapshot) {
        self.settings = snapshot.settings;
        self.language = snapshot.language;
        self.log.set_collapsed(snapshot.logs_collapsed);
        self.mark_dirty();
    }

    pub(crate) fn alert(&mut self, key: LabelKey, detail: Option<String>) {
        self.alert = Some(Notice { key, detail });
        self.mark_dirty();
    }

    fn job_index(&self, job_id: &JobId) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| matches!(row, Row::Job(job) if &job.job_id == job_id))
    }

    pub(crate) fn job_row(&self, job_id: &JobId) -> Option<&JobRow> {
        self.job_index(job_id).and_then(|idx| match &self.rows[idx] {
            Row::Job(job) => Some(job),
            _ => None,
        })
    }

    fn job_row_mut(&mut self, job_id: &JobId) -> Option<&mut JobRow> {
        let idx = self.job_index(job_id)?;
        match &mut self.rows[idx] {
            Row::Job(job) => Some(job),
            _ => None,
        }
    }

    /// Prepends a row for a freshly submitted job. Placeholders are dropped
    /// since the list is no longer empty.
    pub(crate) fn add_submitted_job(&mut self, job_id: JobId, source_url: String) {
        self.rows.retain(|row| !matches!(row, Row::Placeholder(_)));
        let row = JobRow::submitted(job_id, source_url, self.reloads_issued);
        self.rows.insert(0, Row::Job(row));
        self.mark_dirty();
    }

    /// Applies one status response to its row. Responses for unknown or
    /// finished rows are ignored. Returns whether the row changed.
    pub(crate) fn apply_status(&mut self, update: StatusUpdate) -> bool {
        let StatusUpdate {
            job_id,
            status,
            kind,
            progress,
            filename,
            log,
            timestamp,
        } = update;

        let Some(row) = self.job_row_mut(&job_id) else {
            return false;
        };
        if row.finished {
            return false;
        }

        row.bar.apply(progress);
        row.status = match kind {
            StatusKind::Completed => RowStatus::Label(LabelKey::DownloadCompleted),
            StatusKind::InProgress | StatusKind::Failed => RowStatus::Raw(status),
        };
        if let Some(filename) = filename.filter(|f| !f.is_empty()) {
            row.title = RowTitle::File(filename);
        }

        let mut pending_log = None;
        if let Some(log) = log.filter(|l| !l.trim().is_empty()) {
            pending_log = unseen_log(row.last_log.as_deref(), &log).map(str::to_owned);
            row.last_log = Some(log);
        }

        if kind.is_terminal() {
            row.bar.indeterminate = false;
            row.finished = true;
        }

        if let Some(text) = pending_log {
            self.log.append(&timestamp, &text);
        }
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_status_failure(&mut self, job_id: &JobId) -> bool {
        let Some(row) = self.job_row_mut(job_id) else {
            return false;
        };
        if row.finished {
            return false;
        }
        row.status = RowStatus::Label(LabelKey::StatusUpdateFailed);
        row.bar.indeterminate = false;
        row.finished = true;
        self.mark_dirty();
        true
    }

    /// Issues the next list reload.
    pub(crate) fn request_reload(&mut self) -> Effect {
        self.reloads_issued += 1;
        Effect::ReloadAll {
            generation: self.reloads_issued,
        }
    }

    /// Accepts the result of reload `generation` unless a later reload was
    /// already applied.
    fn accept_reload(&mut self, generation: u64) -> bool {
        if generation < self.reload_applied {
            return false;
        }
        self.reload_applied = generation;
        true
    }

    /// Replaces the list with a fresh backend view.
    ///
    /// Returns the polling effects: every unfinished task gets a loop (the
    /// engine ignores ids that already have one) and every unfinished row
    /// that disappeared has its loop cancelled. Jobs submitted after the
    /// reload was issued stay at the top even when the snapshot lacks them.
    pub(crate) fn apply_snapshot(
        &mut self,
        generation: u64,
        snapshot: ListSnapshot,
    ) -> Vec<Effect> {
        if !self.accept_reload(generation) {
            return Vec::new();
        }
        let previous = self.take_job_rows();
        let mut effects = Vec::new();

        self.rows.extend(
            previous
                .iter()
                .filter(|row| {
                    row.is_newer_than(generation)
                        && !snapshot.tasks.iter().any(|task| task.job_id == row.job_id)
                })
                .cloned()
                .map(Row::Job),
        );

        for task in snapshot.tasks {
            if task.kind == StatusKind::Completed {
                continue;
            }
            let prior = previous.iter().find(|row| row.job_id == task.job_id);
            let row = recovered_row(task, prior);
            effects.push(Effect::StartPolling {
                job_id: row.job_id.clone(),
            });
            self.rows.push(Row::Job(row));
        }

        effects.extend(self.cancellations_for(&previous));

        let mut files = snapshot.files;
        files.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        self.rows.extend(files.into_iter().map(Row::File));

        if self.rows.is_empty() {
            self.rows.push(Row::Placeholder(LabelKey::NoFiles));
        }
        self.mark_dirty();
        effects
    }

    /// Replaces the list with a single error row, after any jobs submitted
    /// since the reload was issued.
    pub(crate) fn apply_load_failure(
        &mut self,
        generation: u64,
        message: String,
    ) -> Vec<Effect> {
        if !self.accept_reload(generation) {
            return Vec::new();
        }
        let previous = self.take_job_rows();
        self.rows.extend(
            previous
                .iter()
                .filter(|row| row.is_newer_than(generation))
                .cloned()
                .map(Row::Job),
        );
        self.rows.push(Row::LoadError(message));
        self.mark_dirty();
        self.cancellations_for(&previous)
    }

    fn take_job_rows(&mut self) -> Vec<JobRow> {
        std::mem::take(&mut self.rows)
            .into_iter()
            .filter_map(|row| match row {
                Row::Job(job) => Some(job),
                _ => None,
            })
            .collect()
    }

    fn cancellations_for(&self, removed: &[JobRow]) -> Vec<Effect> {
        removed
            .iter()
            .filter(|row| !row.finished && self.job_index(&row.job_id).is_none())
            .map(|row| Effect::CancelPolling {
                job_id: row.job_id.clone(),
            })
            .collect()
    }

    /// Name of the file a row opens, if any.
    pub(crate) fn open_target(&self, index: usize) -> Option<&str> {
        match self.rows.get(index)? {
            Row::Job(JobRow {
                title: RowTitle::File(filename),
                ..
            }) => Some(filename),
            Row::File(file) => Some(&file.filename),
            _ => None,
        }
    }
}

fn recovered_row(task: ActiveTask, prior: Option<&JobRow>) -> JobRow {
    let ActiveTask {
        job_id,
        status,
        progress,
        url,
        log,
        ..
    } = task;

    let title = url
        .filter(|u| !u.trim().is_empty())
        .map(RowTitle::Source)
        .or_else(|| {
            log.iter()
                .find(|line| line.contains("https://"))
                .cloned()
                .map(RowTitle::Source)
        })
        .unwrap_or(RowTitle::Label(LabelKey::Downloading));

    let mut bar = match prior {
        Some(row) if !row.finished => row.bar,
        _ => ProgressBar::indeterminate(),
    };
    if let Some(progress) = progress {
        bar.apply(progress);
    }

    let status = if status.trim().is_empty() {
        RowStatus::Label(LabelKey::Preparing)
    } else {
        RowStatus::Raw(status)
    };

    // Only text already in the pane counts as seen.
    let last_log = prior.and_then(|row| row.last_log.clone());

    JobRow {
        job_id,
        title,
        bar,
        status,
        finished: false,
        last_log,
        submitted_after: prior.and_then(|row| row.submitted_after),
    }
}

/// Rounds a reported progress value to a whole percent in `0..=100`.
/// Returns `None` for non-positive or non-finite values.
fn whole_percent(progress: f64) -> Option<u8> {
    if progress.is_finite() && progress > 0.0 {
        Some(progress.round().min(100.0) as u8)
    } else {
        None
    }
}
