/// Display language of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            c if c.eq_ignore_ascii_case("zh") => Some(Language::Zh),
            c if c.eq_ignore_ascii_case("en") => Some(Language::En),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::Zh => Language::En,
            Language::En => Language::Zh,
        }
    }

    /// Caption of the language switch: names the language it switches *to*.
    pub fn switch_caption(self) -> &'static str {
        match self {
            Language::Zh => "EN",
            Language::En => "中文",
        }
    }
}

/// Keys of every user-facing string. `attr()` is the stable identifier used
/// by labelled controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    VideoUrl,
    VideoUrlPlaceholder,
    VideoQuality,
    QualityBest,
    QualityNone,
    Proxy,
    ProxyPlaceholder,
    CookieText,
    CookieTextPlaceholder,
    CookieFile,
    CookieFileFailed,
    UseAria2,
    DownloadBtn,
    DownloadsTitle,
    Preparing,
    Downloading,
    DownloadFailed,
    StatusUpdateFailed,
    DownloadCompleted,
    CommandPreview,
    CustomArgs,
    CustomArgsPlaceholder,
    LogsTitle,
    ClearLogs,
    CopyLogs,
    LogsCopied,
    CopyFailed,
    LoadingFiles,
    NoFiles,
    LoadFailed,
    OpenFailed,
    RestartServer,
    RestartConfirm,
    RestartFailed,
}

impl LabelKey {
    pub const ALL: &'static [LabelKey] = &[
        LabelKey::VideoUrl,
        LabelKey::VideoUrlPlaceholder,
        LabelKey::VideoQuality,
        LabelKey::QualityBest,
        LabelKey::QualityNone,
        LabelKey::Proxy,
        LabelKey::ProxyPlaceholder,
        LabelKey::CookieText,
        LabelKey::CookieTextPlaceholder,
        LabelKey::CookieFile,
        LabelKey::CookieFileFailed,
        LabelKey::UseAria2,
        LabelKey::DownloadBtn,
        LabelKey::DownloadsTitle,
        LabelKey::Preparing,
        LabelKey::Downloading,
        LabelKey::DownloadFailed,
        LabelKey::StatusUpdateFailed,
        LabelKey::DownloadCompleted,
        LabelKey::CommandPreview,
        LabelKey::CustomArgs,
        LabelKey::CustomArgsPlaceholder,
        LabelKey::LogsTitle,
        LabelKey::ClearLogs,
        LabelKey::CopyLogs,
        LabelKey::LogsCopied,
        LabelKey::CopyFailed,
        LabelKey::LoadingFiles,
        LabelKey::NoFiles,
        LabelKey::LoadFailed,
        LabelKey::OpenFailed,
        LabelKey::RestartServer,
        LabelKey::RestartConfirm,
        LabelKey::RestartFailed,
    ];

    pub fn attr(self) -> &'static str {
        match self {
            LabelKey::VideoUrl => "video-url",
            LabelKey::VideoUrlPlaceholder => "video-url-placeholder",
            LabelKey::VideoQuality => "video-quality",
            LabelKey::QualityBest => "quality-best",
            LabelKey::QualityNone => "quality-none",
            LabelKey::Proxy => "proxy",
            LabelKey::ProxyPlaceholder => "proxy-placeholder",
            LabelKey::CookieText => "cookie-text",
            LabelKey::CookieTextPlaceholder => "cookie-text-placeholder",
            LabelKey::CookieFile => "cookie-file",
            LabelKey::CookieFileFailed => "cookie-file-failed",
            LabelKey::UseAria2 => "use-aria2",
            LabelKey::DownloadBtn => "download-btn",
            LabelKey::DownloadsTitle => "downloads-title",
            LabelKey::Preparing => "preparing",
            LabelKey::Downloading => "downloading",
            LabelKey::DownloadFailed => "download-failed",
            LabelKey::StatusUpdateFailed => "status-update-failed",
            LabelKey::DownloadCompleted => "download-completed",
            LabelKey::CommandPreview => "command-preview",
            LabelKey::CustomArgs => "custom-args",
            LabelKey::CustomArgsPlaceholder => "custom-args-placeholder",
            LabelKey::LogsTitle => "logs-title",
            LabelKey::ClearLogs => "clear-logs",
            LabelKey::CopyLogs => "copy-logs",
            LabelKey::LogsCopied => "logs-copied",
            LabelKey::CopyFailed => "copy-failed",
            LabelKey::LoadingFiles => "loading-files",
            LabelKey::NoFiles => "no-files",
            LabelKey::LoadFailed => "load-failed",
            LabelKey::OpenFailed => "open-failed",
            LabelKey::RestartServer => "restart-server",
            LabelKey::RestartConfirm => "restart-confirm",
            LabelKey::RestartFailed => "restart-failed",
        }
    }

    pub fn from_attr(attr: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.attr() == attr)
    }
}

/// Label provider bound to one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Labels {
    language: Language,
}

impl Labels {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn get(&self, key: LabelKey) -> &'static str {
        match self.language {
            Language::En => english(key),
            Language::Zh => chinese(key),
        }
    }

    /// Label text followed by a detail string, e.g. `"Download Failed: timeout"`.
    pub fn with_detail(&self, key: LabelKey, detail: &str) -> String {
        let label = self.get(key);
        if detail.is_empty() {
            label.to_string()
        } else if label.ends_with(':') {
            format!("{label} {detail}")
        } else {
            format!("{label}{detail}")
        }
    }
}

fn english(key: LabelKey) -> &'static str {
    match key {
        LabelKey::VideoUrl => "Video URL:",
        LabelKey::VideoUrlPlaceholder => "Enter YouTube video URL",
        LabelKey::VideoQuality => "Video Quality:",
        LabelKey::QualityBest => "Best Quality",
        LabelKey::QualityNone => "None",
        LabelKey::Proxy => "Proxy Settings:",
        LabelKey::ProxyPlaceholder => "e.g., socks5://127.0.0.1:1080",
        LabelKey::CookieText => "Cookie Content:",
        LabelKey::CookieTextPlaceholder => "Paste cookie content",
        LabelKey::CookieFile => "Or Upload Cookie File:",
        LabelKey::CookieFileFailed => "Failed to read cookie file:",
        LabelKey::UseAria2 => "Enable Aria2 Downloader (Multi-threaded)",
        LabelKey::DownloadBtn => "Start Download",
        LabelKey::DownloadsTitle => "Downloads",
        LabelKey::Preparing => "Preparing...",
        LabelKey::Downloading => "Downloading",
        LabelKey::DownloadFailed => "Download Failed:",
        LabelKey::StatusUpdateFailed => "Status Update Failed",
        LabelKey::DownloadCompleted => "Download completed",
        LabelKey::CommandPreview => "Command Preview:",
        LabelKey::CustomArgs => "Custom Arguments:",
        LabelKey::CustomArgsPlaceholder => "e.g., --extract-audio --audio-format mp3",
        LabelKey::LogsTitle => "Download Logs",
        LabelKey::ClearLogs => "Clear Logs",
        LabelKey::CopyLogs => "Copy Logs",
        LabelKey::LogsCopied => "Logs copied to clipboard",
        LabelKey::CopyFailed => "Failed to copy logs:",
        LabelKey::LoadingFiles => "Loading downloaded files...",
        LabelKey::NoFiles => "No downloaded files",
        LabelKey::LoadFailed => "Failed to load files:",
        LabelKey::OpenFailed => "Failed to open file:",
        LabelKey::RestartServer => "Restart Server",
        LabelKey::RestartConfirm => "Restart the server?",
        LabelKey::RestartFailed => "Restart failed:",
    }
}

fn chinese(key: LabelKey) -> &'static str {
    match key {
        LabelKey::VideoUrl => "视频链接：",
        LabelKey::VideoUrlPlaceholder => "请输入YouTube视频链接",
        LabelKey::VideoQuality => "视频画质：",
        LabelKey::QualityBest => "最佳画质",
        LabelKey::QualityNone => "无",
        LabelKey::Proxy => "代理设置：",
        LabelKey::ProxyPlaceholder => "例如: socks5://127.0.0.1:1080",
        LabelKey::CookieText => "Cookie 内容：",
        LabelKey::CookieTextPlaceholder => "粘贴 cookie 内容",
        LabelKey::CookieFile => "或上传 Cookie 文件：",
        LabelKey::CookieFileFailed => "读取 Cookie 文件失败：",
        LabelKey::UseAria2 => "启用 Aria2 下载器（多线程下载）",
        LabelKey::DownloadBtn => "开始下载",
        LabelKey::DownloadsTitle => "下载列表",
        LabelKey::Preparing => "准备下载...",
        LabelKey::Downloading => "正在下载",
        LabelKey::DownloadFailed => "下载失败：",
        LabelKey::StatusUpdateFailed => "更新状态失败",
        LabelKey::DownloadCompleted => "下载完成",
        LabelKey::CommandPreview => "命令预览：",
        LabelKey::CustomArgs => "自定义参数：",
        LabelKey::CustomArgsPlaceholder => "例如: --extract-audio --audio-format mp3",
        LabelKey::LogsTitle => "下载日志",
        LabelKey::ClearLogs => "清除日志",
        LabelKey::CopyLogs => "复制日志",
        LabelKey::LogsCopied => "日志已复制到剪贴板",
        LabelKey::CopyFailed => "复制日志失败：",
        LabelKey::LoadingFiles => "加载已下载文件列表...",
        LabelKey::NoFiles => "暂无已下载文件",
        LabelKey::LoadFailed => "加载失败:",
        LabelKey::OpenFailed => "打开文件失败：",
        LabelKey::RestartServer => "重启服务器",
        LabelKey::RestartConfirm => "确定要重启服务器吗？",
        LabelKey::RestartFailed => "重启失败：",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_round_trips_through_its_attribute() {
        for key in LabelKey::ALL {
            assert_eq!(LabelKey::from_attr(key.attr()), Some(*key));
        }
        assert_eq!(LabelKey::from_attr("no-such-key"), None);
    }

    #[test]
    fn both_tables_cover_every_key() {
        for key in LabelKey::ALL {
            assert!(!Labels::new(Language::En).get(*key).is_empty());
            assert!(!Labels::new(Language::Zh).get(*key).is_empty());
        }
    }

    #[test]
    fn detail_is_separated_after_ascii_colon() {
        let en = Labels::new(Language::En);
        assert_eq!(
            en.with_detail(LabelKey::LoadFailed, "http status 500"),
            "Failed to load files: http status 500"
        );
        let zh = Labels::new(Language::Zh);
        assert_eq!(
            zh.with_detail(LabelKey::DownloadFailed, "timeout"),
            "下载失败：timeout"
        );
    }

    #[test]
    fn language_codes_parse_case_insensitively() {
        assert_eq!(Language::from_code("EN"), Some(Language::En));
        assert_eq!(Language::from_code(" zh "), Some(Language::Zh));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::Zh.toggled(), Language::En);
    }
}
