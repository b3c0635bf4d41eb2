use chrono::{Local, TimeZone};
use ydui_core::{AppViewModel, FileRowView, JobRowView, LabelKey, RowView};

use super::constants::*;

/// Renders the whole panel as plain text, one screen per call.
pub fn render(view: &AppViewModel) -> String {
    let mut out = Vec::new();

    out.push(format!(
        "ydui  [{}: lang]  [{}: restart]",
        view.language.switch_caption(),
        view.label(LabelKey::RestartServer)
    ));
    out.push(field(view, LabelKey::VideoUrl, &view.url_input, LabelKey::VideoUrlPlaceholder));
    out.push(format!(
        "{} {}",
        view.label(LabelKey::VideoQuality),
        quality_text(view)
    ));
    out.push(field(view, LabelKey::Proxy, &view.settings.proxy, LabelKey::ProxyPlaceholder));
    out.push(field(
        view,
        LabelKey::CustomArgs,
        &view.settings.custom_args,
        LabelKey::CustomArgsPlaceholder,
    ));
    out.push(cookie_line(view));
    out.push(format!(
        "[{}] {}",
        if view.settings.use_aria2 { "x" } else { " " },
        view.label(LabelKey::UseAria2)
    ));
    out.push(format!("{} {}", view.label(LabelKey::CommandPreview), view.command_preview));
    out.push(String::new());

    out.push(format!("== {} ==", view.label(LabelKey::DownloadsTitle)));
    for (index, row) in view.rows.iter().enumerate() {
        out.extend(row_lines(index + 1, row));
    }
    out.push(String::new());

    out.extend(log_lines(view));

    if let Some(alert) = &view.alert {
        out.push(format!("! {alert}"));
    }
    if let Some(prompt) = &view.prompt {
        out.push(format!("? {prompt} (yes/no)"));
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn field(view: &AppViewModel, label: LabelKey, value: &str, placeholder: LabelKey) -> String {
    if value.is_empty() {
        format!("{} ({})", view.label(label), view.label(placeholder))
    } else {
        format!("{} {}", view.label(label), value)
    }
}

fn quality_text(view: &AppViewModel) -> String {
    match view.settings.quality.as_str() {
        "best" | "" => view.label(LabelKey::QualityBest).to_string(),
        "none" => view.label(LabelKey::QualityNone).to_string(),
        height => format!("{height}p"),
    }
}

fn cookie_line(view: &AppViewModel) -> String {
    let lines = view.settings.cookie_text.lines().count();
    if view.cookie_file_selected {
        format!("{} {} lines (file)", view.label(LabelKey::CookieFile), lines)
    } else if lines > 0 {
        format!("{} {} lines", view.label(LabelKey::CookieText), lines)
    } else {
        format!(
            "{} ({})",
            view.label(LabelKey::CookieText),
            view.label(LabelKey::CookieTextPlaceholder)
        )
    }
}

fn row_lines(number: usize, row: &RowView) -> Vec<String> {
    match row {
        RowView::Job(job) => job_lines(number, job),
        RowView::File(file) => vec![file_line(number, file)],
        RowView::Placeholder { text, is_error } => {
            vec![format!("   {}{}", if *is_error { "! " } else { "" }, text)]
        }
    }
}

fn job_lines(number: usize, job: &JobRowView) -> Vec<String> {
    let marker = if job.open_target.is_some() { "*" } else { " " };
    vec![
        format!("{number:>2}.{marker}{}", job.title),
        format!("    {} {}", progress_bar(job.percent, job.indeterminate), job.status),
    ]
}

fn file_line(number: usize, file: &FileRowView) -> String {
    format!(
        "{number:>2}.*{}  {}  {}",
        file.filename,
        file.status,
        format_created(file.created_at)
    )
}

pub fn progress_bar(percent: u8, indeterminate: bool) -> String {
    if indeterminate {
        let mut cells = vec!['.'; BAR_WIDTH];
        for cell in cells.iter_mut().take(3) {
            *cell = '~';
        }
        return format!("[{}]  --%", cells.into_iter().collect::<String>());
    }
    let percent = percent.min(100);
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn format_created(created_at: u64) -> String {
    i64::try_from(created_at)
        .ok()
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|time| time.format(FILE_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn log_lines(view: &AppViewModel) -> Vec<String> {
    let title = view.label(LabelKey::LogsTitle);
    if view.logs_collapsed {
        return vec![format!("== {title} (+{}) ==", view.logs.len())];
    }
    let mut lines = vec![format!(
        "== {title} ==  [{}: clear] [{}: copy]",
        view.label(LabelKey::ClearLogs),
        view.label(LabelKey::CopyLogs)
    )];
    let skip = view.logs.len().saturating_sub(LOG_TAIL_LINES);
    lines.extend(view.logs.iter().skip(skip).map(|line| format!("  {line}")));
    lines
}
