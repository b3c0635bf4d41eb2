use crate::Settings;

/// Payload of a download submission, normalized from the panel inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub proxy: Option<String>,
    pub cookie_text: Option<String>,
    pub use_aria2: bool,
    pub quality: String,
    pub custom_args: Option<String>,
}

/// Builds the submission payload: empty proxy and cookie text become `None`,
/// custom arguments are trimmed first.
pub fn build_request(settings: &Settings, url: &str) -> DownloadRequest {
    DownloadRequest {
        url: url.trim().to_string(),
        proxy: non_empty(&settings.proxy),
        cookie_text: non_empty(&settings.cookie_text),
        use_aria2: settings.use_aria2,
        quality: settings.quality.clone(),
        custom_args: non_empty(settings.custom_args.trim()),
    }
}

/// yt-dlp format selector for a quality setting; `none` disables selection.
pub fn format_selector(quality: &str) -> Option<String> {
    match quality {
        "none" => None,
        "best" | "" => Some("bestvideo+bestaudio/best".to_string()),
        height => Some(format!("bestvideo[height<={height}]+bestaudio/best")),
    }
}

/// The yt-dlp command line the backend will run for the current inputs.
pub fn command_preview(settings: &Settings, url: &str, cookie_file_selected: bool) -> String {
    let mut parts = vec!["yt-dlp".to_string()];

    if let Some(selector) = format_selector(&settings.quality) {
        parts.push(format!("-f \"{selector}\""));
    }
    if !settings.proxy.is_empty() {
        parts.push(format!("--proxy \"{}\"", settings.proxy));
    }
    if settings.use_aria2 {
        parts.push("--external-downloader \"aria2c\"".to_string());
        parts.push("--external-downloader-args \"-x 16 -k 1m\"".to_string());
    }
    if !settings.cookie_text.is_empty() || cookie_file_selected {
        parts.push("--cookies \"cookies.txt\"".to_string());
    }
    let custom = settings.custom_args.trim();
    if !custom.is_empty() {
        parts.push(custom.to_string());
    }
    if !url.is_empty() {
        parts.push(format!("\"{url}\""));
    }

    parts.join(" ")
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
