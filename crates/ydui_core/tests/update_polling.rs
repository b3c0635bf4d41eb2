use std::sync::Once;

use pretty_assertions::assert_eq;
use ydui_core::{
    update, AppState, Effect, JobId, JobRowView, Msg, StatusKind, StatusUpdate,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ydui_logging::initialize_for_tests);
}

fn job(id: &str) -> JobId {
    JobId::new(id).expect("job id")
}

fn submitted(id: &str) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::SubmitSucceeded {
            job_id: job(id),
            source_url: "https://youtu.be/abc".to_string(),
        },
    );
    state
}

fn status(id: &str, text: &str, kind: StatusKind, progress: f64) -> StatusUpdate {
    StatusUpdate {
        job_id: job(id),
        status: text.to_string(),
        kind,
        progress,
        filename: None,
        log: None,
        timestamp: "10:00:00".to_string(),
    }
}

fn row(state: &AppState, id: &str) -> JobRowView {
    state.view().job(&job(id)).cloned().expect("job row")
}

#[test]
fn positive_progress_sets_width_and_clears_indeterminate() {
    init_logging();
    let state = submitted("j1");

    let (state, _) = update(
        state,
        Msg::StatusReceived(status("j1", "准备下载", StatusKind::InProgress, 0.0)),
    );
    let view = row(&state, "j1");
    assert!(view.indeterminate);
    assert_eq!(view.status, "准备下载");

    let (state, _) = update(
        state,
        Msg::StatusReceived(status("j1", "50%", StatusKind::InProgress, 50.0)),
    );
    let view = row(&state, "j1");
    assert!(!view.indeterminate);
    assert_eq!(view.percent, 50);
    assert_eq!(view.status, "50%");
    assert!(!view.finished);
}

#[test]
fn completed_status_is_translated_and_triggers_one_reload() {
    init_logging();
    let state = submitted("j1");
    let (state, _) = update(
        state,
        Msg::StatusReceived(status("j1", "50%", StatusKind::InProgress, 50.0)),
    );
    let (state, effects) = update(
        state,
        Msg::StatusReceived(status("j1", "下载完成", StatusKind::Completed, 100.0)),
    );
    assert!(effects.is_empty());

    let view = row(&state, "j1");
    assert_eq!(view.status, "下载完成");
    assert_eq!(view.percent, 100);
    assert!(!view.indeterminate);
    assert!(view.finished);

    let (state, effects) = update(state, Msg::PollingFinished { job_id: job("j1") });
    assert_eq!(effects, vec![Effect::ReloadAll { generation: 1 }]);

    // Late responses for a finished row are ignored.
    let (state, _) = update(
        state,
        Msg::StatusReceived(status("j1", "50%", StatusKind::InProgress, 50.0)),
    );
    assert_eq!(row(&state, "j1").status, "下载完成");
}

#[test]
fn error_status_ends_row_without_reload() {
    init_logging();
    let state = submitted("j1");
    let (state, _) = update(
        state,
        Msg::StatusReceived(status("j1", "下载失败", StatusKind::Failed, 0.0)),
    );
    let view = row(&state, "j1");
    assert_eq!(view.status, "下载失败");
    assert!(!view.indeterminate);
    assert!(view.finished);

    let (_state, effects) = update(state, Msg::PollingFinished { job_id: job("j1") });
    assert!(effects.is_empty());
}

#[test]
fn failed_fetch_shows_status_update_failed() {
    init_logging();
    let (state, _) = update(submitted("j1"), Msg::LanguageToggled);
    let (state, _) = update(state, Msg::StatusFetchFailed { job_id: job("j1") });

    let view = row(&state, "j1");
    assert_eq!(view.status, "Status Update Failed");
    assert!(!view.indeterminate);
    assert!(view.finished);

    let (_state, effects) = update(state, Msg::PollingFinished { job_id: job("j1") });
    assert!(effects.is_empty());
}

#[test]
fn filename_turns_title_into_open_action() {
    init_logging();
    let state = submitted("j1");
    let mut update_with_file = status("j1", "下载完成", StatusKind::Completed, 100.0);
    update_with_file.filename = Some("clip [abc].mp4".to_string());
    let (state, _) = update(state, Msg::StatusReceived(update_with_file));

    let view = row(&state, "j1");
    assert_eq!(view.title, "clip [abc].mp4");
    assert_eq!(view.open_target.as_deref(), Some("clip [abc].mp4"));

    let (_state, effects) = update(state, Msg::RowActivated(0));
    assert_eq!(
        effects,
        vec![Effect::OpenFile {
            filename: "clip [abc].mp4".to_string()
        }]
    );
}

#[test]
fn failed_open_raises_alert_with_reason() {
    init_logging();
    let (state, effects) = update(
        submitted("j1"),
        Msg::OpenFailed("no browser found".to_string()),
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().alert.as_deref(),
        Some("打开文件失败：no browser found")
    );
    assert_eq!(row(&state, "j1").status, "准备下载...");
}

#[test]
fn cumulative_log_is_appended_once_with_timestamp() {
    init_logging();
    let state = submitted("j1");
    let mut first = status("j1", "50%", StatusKind::InProgress, 50.0);
    first.log = Some("[youtube] abc: Downloading webpage".to_string());
    let (state, _) = update(state, Msg::StatusReceived(first));

    let mut second = status("j1", "60%", StatusKind::InProgress, 60.0);
    second.log = Some("[youtube] abc: Downloading webpage\n[download]  60.0%".to_string());
    second.timestamp = "10:00:01".to_string();
    let (state, _) = update(state, Msg::StatusReceived(second));

    let mut third = status("j1", "60%", StatusKind::InProgress, 60.0);
    third.log = Some("[youtube] abc: Downloading webpage\n[download]  60.0%".to_string());
    let (state, _) = update(state, Msg::StatusReceived(third));

    assert_eq!(
        state.view().logs,
        vec![
            "[10:00:00] [youtube] abc: Downloading webpage".to_string(),
            "[10:00:01] [download]  60.0%".to_string(),
        ]
    );

    let (state, effects) = update(state, Msg::CopyLogs);
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            text: "[10:00:00] [youtube] abc: Downloading webpage\n[10:00:01] [download]  60.0%\n"
                .to_string()
        }]
    );
    let (state, _) = update(state, Msg::LogsCopied(Ok(())));
    assert_eq!(state.view().alert.as_deref(), Some("日志已复制到剪贴板"));

    let (state, _) = update(state, Msg::ClearLogs);
    assert!(state.view().logs.is_empty());
}

#[test]
fn status_for_unknown_job_is_ignored() {
    init_logging();
    let state = submitted("j1");
    let before = state.view().rows;
    let (mut state, effects) = update(
        state,
        Msg::StatusReceived(status("ghost", "50%", StatusKind::InProgress, 50.0)),
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty()); // from the submission
    assert_eq!(state.view().rows, before);
}
