use std::sync::Once;

use pretty_assertions::assert_eq;
use ydui_core::{update, AppState, DownloadRequest, Effect, JobId, Msg, RowView};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ydui_logging::initialize_for_tests);
}

fn job(id: &str) -> JobId {
    JobId::new(id).expect("job id")
}

#[test]
fn empty_url_is_rejected_without_network() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::UrlChanged("   ".to_string()));
    let (mut state, effects) = update(state, Msg::DownloadClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.alert.as_deref(), Some("请输入YouTube视频链接"));
    assert!(state.consume_dirty());

    let (state, _) = update(state, Msg::AlertDismissed);
    assert_eq!(state.view().alert, None);
}

#[test]
fn submission_payload_normalizes_optional_fields() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::ProxyChanged(String::new()));
    let (state, _) = update(state, Msg::CustomArgsChanged("  --no-mtime  ".to_string()));
    let (state, _) = update(state, Msg::QualityChanged("720".to_string()));
    let (state, _) = update(state, Msg::Aria2Changed(true));
    let (state, _) = update(
        state,
        Msg::UrlChanged("https://youtu.be/abc".to_string()),
    );

    let (_state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects,
        vec![Effect::SubmitDownload(DownloadRequest {
            url: "https://youtu.be/abc".to_string(),
            proxy: None,
            cookie_text: None,
            use_aria2: true,
            quality: "720".to_string(),
            custom_args: Some("--no-mtime".to_string()),
        })]
    );
}

#[test]
fn accepted_submission_prepends_row_and_starts_polling() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::ListReloaded {
            generation: 1,
            result: Ok(Default::default()),
        },
    );
    let (state, _) = update(state, Msg::UrlChanged("https://youtu.be/abc".to_string()));
    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            job_id: job("j1"),
            source_url: "https://youtu.be/abc".to_string(),
        },
    );

    assert_eq!(effects, vec![Effect::StartPolling { job_id: job("j1") }]);
    let view = state.view();
    assert_eq!(view.url_input, "");
    // The "no files" placeholder gives way to the new row.
    assert_eq!(view.rows.len(), 1);
    match &view.rows[0] {
        RowView::Job(row) => {
            assert_eq!(row.title, "https://youtu.be/abc");
            assert!(row.indeterminate);
            assert_eq!(row.status, "准备下载...");
            assert_eq!(row.open_target, None);
        }
        other => panic!("unexpected row {other:?}"),
    }
}

#[test]
fn rejected_submission_shows_label_and_raw_error() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::LanguageToggled);
    let (state, effects) = update(state, Msg::SubmitFailed("http status 500".to_string()));

    assert!(effects.is_empty());
    assert_eq!(
        state.view().alert.as_deref(),
        Some("Download Failed: http status 500")
    );
}

#[test]
fn restart_requires_confirmation() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::RestartClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().prompt.as_deref(), Some("确定要重启服务器吗？"));

    let (state, effects) = update(state, Msg::PromptAnswered(false));
    assert!(effects.is_empty());
    assert_eq!(state.view().prompt, None);

    let (state, _) = update(state, Msg::RestartClicked);
    let (state, effects) = update(state, Msg::PromptAnswered(true));
    assert_eq!(effects, vec![Effect::RestartServer]);

    // A stray answer with no prompt pending does nothing.
    let (_state, effects) = update(state, Msg::PromptAnswered(true));
    assert!(effects.is_empty());
}

#[test]
fn command_preview_tracks_inputs() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ProxyChanged("socks5://127.0.0.1:1080".into()));
    let (state, _) = update(state, Msg::CookieTextChanged("# Netscape".into()));
    let (state, _) = update(state, Msg::UrlChanged("https://youtu.be/x".into()));

    assert_eq!(
        state.view().command_preview,
        "yt-dlp -f \"bestvideo+bestaudio/best\" --proxy \"socks5://127.0.0.1:1080\" \
         --cookies \"cookies.txt\" \"https://youtu.be/x\""
    );
}
