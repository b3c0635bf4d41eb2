use crate::command::build_request;
use crate::labels::LabelKey;
use crate::state::Prompt;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RestoreSettings(snapshot) => {
            state.restore(snapshot);
            Vec::new()
        }
        Msg::UrlChanged(url) => {
            state.url_input = url;
            state.mark_dirty();
            Vec::new()
        }
        Msg::QualityChanged(quality) => {
            state.settings.quality = quality;
            settings_changed(&mut state)
        }
        Msg::ProxyChanged(proxy) => {
            state.settings.proxy = proxy;
            settings_changed(&mut state)
        }
        Msg::CookieTextChanged(text) => {
            state.settings.cookie_text = text;
            settings_changed(&mut state)
        }
        Msg::CustomArgsChanged(args) => {
            state.settings.custom_args = args;
            settings_changed(&mut state)
        }
        Msg::Aria2Changed(enabled) => {
            state.settings.use_aria2 = enabled;
            settings_changed(&mut state)
        }
        Msg::CookieFileChosen(path) => {
            state.cookie_file = Some(path.clone());
            state.mark_dirty();
            vec![Effect::ReadCookieFile { path }]
        }
        Msg::CookieFileLoaded(Ok(text)) => {
            state.settings.cookie_text = text;
            settings_changed(&mut state)
        }
        Msg::CookieFileLoaded(Err(message)) => {
            state.cookie_file = None;
            state.alert(LabelKey::CookieFileFailed, Some(message));
            Vec::new()
        }
        Msg::DownloadClicked => {
            if state.url_input.trim().is_empty() {
                state.alert(LabelKey::VideoUrlPlaceholder, None);
                Vec::new()
            } else {
                vec![Effect::SubmitDownload(build_request(
                    &state.settings,
                    &state.url_input,
                ))]
            }
        }
        Msg::SubmitSucceeded { job_id, source_url } => {
            state.add_submitted_job(job_id.clone(), source_url);
            state.url_input.clear();
            vec![Effect::StartPolling { job_id }]
        }
        Msg::SubmitFailed(message) => {
            state.alert(LabelKey::DownloadFailed, Some(message));
            Vec::new()
        }
        Msg::StatusReceived(status) => {
            state.apply_status(status);
            Vec::new()
        }
        Msg::StatusFetchFailed { job_id } => {
            state.apply_status_failure(&job_id);
            Vec::new()
        }
        Msg::PollingFinished { job_id } => {
            // A completed download moves from the active rows to the file list.
            let completed = state.job_row(&job_id).is_some_and(|row| row.is_completed());
            if completed {
                vec![state.request_reload()]
            } else {
                Vec::new()
            }
        }
        Msg::ReloadRequested => vec![state.request_reload()],
        Msg::ListReloaded { generation, result } => match result {
            Ok(snapshot) => state.apply_snapshot(generation, snapshot),
            Err(message) => state.apply_load_failure(generation, message),
        },
        Msg::LanguageToggled => {
            state.language = state.language.toggled();
            state.mark_dirty();
            vec![
                Effect::SaveSettings(state.settings_snapshot()),
                state.request_reload(),
            ]
        }
        Msg::LogsToggled => {
            let collapsed = !state.log.is_collapsed();
            state.log.set_collapsed(collapsed);
            state.mark_dirty();
            vec![Effect::SaveSettings(state.settings_snapshot())]
        }
        Msg::ClearLogs => {
            if !state.log.is_empty() {
                state.log.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CopyLogs => vec![Effect::CopyToClipboard {
            text: state.log.text(),
        }],
        Msg::LogsCopied(Ok(())) => {
            state.alert(LabelKey::LogsCopied, None);
            Vec::new()
        }
        Msg::LogsCopied(Err(message)) => {
            state.alert(LabelKey::CopyFailed, Some(message));
            Vec::new()
        }
        Msg::RestartClicked => {
            state.prompt = Some(Prompt::RestartServer);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PromptAnswered(confirmed) => match state.prompt.take() {
            Some(Prompt::RestartServer) => {
                state.mark_dirty();
                if confirmed {
                    vec![Effect::RestartServer]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        },
        Msg::RestartFailed(message) => {
            state.alert(LabelKey::RestartFailed, Some(message));
            Vec::new()
        }
        Msg::OpenFailed(message) => {
            state.alert(LabelKey::OpenFailed, Some(message));
            Vec::new()
        }
        Msg::RowActivated(index) => match state.open_target(index) {
            Some(filename) => vec![Effect::OpenFile {
                filename: filename.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::AlertDismissed => {
            if state.alert.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn settings_changed(state: &mut AppState) -> Vec<Effect> {
    state.mark_dirty();
    vec![Effect::SaveSettings(state.settings_snapshot())]
}
