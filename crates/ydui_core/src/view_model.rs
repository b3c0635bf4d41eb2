use crate::command::command_preview;
use crate::labels::{LabelKey, Labels, Language};
use crate::state::{JobRow, Row, RowStatus, RowTitle};
use crate::{AppState, JobId, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub language: Language,
    pub labels: Labels,
    pub url_input: String,
    pub settings: Settings,
    pub cookie_file_selected: bool,
    pub command_preview: String,
    pub rows: Vec<RowView>,
    pub logs: Vec<String>,
    pub logs_collapsed: bool,
    pub alert: Option<String>,
    pub prompt: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowView {
    Job(JobRowView),
    File(FileRowView),
    Placeholder { text: String, is_error: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub title: String,
    /// Filename the title opens, once the backend reported one.
    pub open_target: Option<String>,
    pub percent: u8,
    pub indeterminate: bool,
    pub status: String,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub filename: String,
    pub status: String,
    pub created_at: u64,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState, dirty: bool) -> Self {
        let labels = Labels::new(state.language);
        let rows = state
            .rows
            .iter()
            .map(|row| row_view(row, &labels))
            .collect();
        let alert = state.alert.as_ref().map(|notice| match &notice.detail {
            Some(detail) => labels.with_detail(notice.key, detail),
            None => labels.get(notice.key).to_string(),
        });
        let prompt = state
            .prompt
            .map(|_| labels.get(LabelKey::RestartConfirm).to_string());

        Self {
            language: state.language,
            labels,
            url_input: state.url_input.clone(),
            settings: state.settings.clone(),
            cookie_file_selected: state.cookie_file.is_some(),
            command_preview: command_preview(
                &state.settings,
                &state.url_input,
                state.cookie_file.is_some(),
            ),
            rows,
            logs: state.log.lines().map(str::to_owned).collect(),
            logs_collapsed: state.log.is_collapsed(),
            alert,
            prompt,
            dirty,
        }
    }

    /// Text of a labelled control in the current language.
    pub fn label(&self, key: LabelKey) -> &'static str {
        self.labels.get(key)
    }

    pub fn job(&self, job_id: &JobId) -> Option<&JobRowView> {
        self.rows.iter().find_map(|row| match row {
            RowView::Job(job) if &job.job_id == job_id => Some(job),
            _ => None,
        })
    }
}

fn row_view(row: &Row, labels: &Labels) -> RowView {
    match row {
        Row::Job(job) => RowView::Job(job_row_view(job, labels)),
        Row::File(file) => RowView::File(FileRowView {
            filename: file.filename.clone(),
            status: labels.get(LabelKey::DownloadCompleted).to_string(),
            created_at: file.created_at,
        }),
        Row::Placeholder(key) => RowView::Placeholder {
            text: labels.get(*key).to_string(),
            is_error: false,
        },
        Row::LoadError(message) => RowView::Placeholder {
            text: labels.with_detail(LabelKey::LoadFailed, message),
            is_error: true,
        },
    }
}

fn job_row_view(job: &JobRow, labels: &Labels) -> JobRowView {
    let (title, open_target) = match &job.title {
        RowTitle::Source(url) => (url.clone(), None),
        RowTitle::Label(key) => (labels.get(*key).to_string(), None),
        RowTitle::File(filename) => (filename.clone(), Some(filename.clone())),
    };
    let status = match &job.status {
        RowStatus::Label(key) => labels.get(*key).to_string(),
        RowStatus::Raw(text) => text.clone(),
    };
    JobRowView {
        job_id: job.job_id.clone(),
        title,
        open_target,
        percent: job.bar.percent,
        indeterminate: job.bar.indeterminate,
        status,
        finished: job.finished,
    }
}
