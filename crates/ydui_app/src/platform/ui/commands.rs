//! Line commands typed into the panel.

use std::path::PathBuf;

use ydui_core::Msg;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  <url>                 submit a download for <url>
  url <text>            set the video url
  get [url]             submit the current (or given) url
  quality <best|none|N> set the quality (N = max height)
  proxy [text]          set or clear the proxy
  cookies [text]        set or clear the cookie text
  cookie-file <path>    import cookies from a file
  args [text]           set or clear custom yt-dlp arguments
  aria2 <on|off>        toggle the aria2 downloader
  open <n>              open row n in the browser
  reload                reload the download list
  lang                  switch language
  logs | clear | copy   toggle, clear or copy the log pane
  restart               restart the backend (asks first)
  yes | no              answer a pending question
  help | quit";

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Dispatch(Vec::new());
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msgs = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Command::Help,
        "quit" | "exit" | "q" => return Command::Quit,
        _ if looks_like_url(word) => submit(line),
        "url" => vec![Msg::UrlChanged(rest.to_string())],
        "get" | "download" if rest.is_empty() => vec![Msg::DownloadClicked],
        "get" | "download" => submit(rest),
        "quality" if !rest.is_empty() => vec![Msg::QualityChanged(rest.to_string())],
        "proxy" => vec![Msg::ProxyChanged(rest.to_string())],
        "cookies" => vec![Msg::CookieTextChanged(rest.to_string())],
        "cookie-file" if !rest.is_empty() => vec![Msg::CookieFileChosen(PathBuf::from(rest))],
        "args" => vec![Msg::CustomArgsChanged(rest.to_string())],
        "aria2" => match rest.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => vec![Msg::Aria2Changed(true)],
            "off" | "false" | "0" => vec![Msg::Aria2Changed(false)],
            _ => return Command::Unknown(line.to_string()),
        },
        "open" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => vec![Msg::RowActivated(n - 1)],
            _ => return Command::Unknown(line.to_string()),
        },
        "reload" => vec![Msg::ReloadRequested],
        "lang" | "language" => vec![Msg::LanguageToggled],
        "logs" => vec![Msg::LogsToggled],
        "clear" => vec![Msg::ClearLogs],
        "copy" => vec![Msg::CopyLogs],
        "restart" => vec![Msg::RestartClicked],
        "yes" | "y" => vec![Msg::PromptAnswered(true)],
        "no" | "n" => vec![Msg::PromptAnswered(false)],
        _ => return Command::Unknown(line.to_string()),
    };
    Command::Dispatch(msgs)
}

fn submit(url: &str) -> Vec<Msg> {
    vec![Msg::UrlChanged(url.to_string()), Msg::DownloadClicked]
}

fn looks_like_url(word: &str) -> bool {
    word.starts_with("http://") || word.starts_with("https://")
}
