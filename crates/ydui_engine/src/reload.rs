use futures_util::future::try_join;
use ydui_logging::{ydui_debug, ydui_warn};

use crate::{ActiveTask, ApiError, DownloadApi, DownloadsSnapshot, JobId, StatusSentinels};

/// Fetches the completed-file list and the active-task map concurrently.
///
/// Either request failing fails the whole reload; the list is never rebuilt
/// from half a snapshot.
pub async fn reload_all(
    api: &dyn DownloadApi,
    sentinels: &StatusSentinels,
) -> Result<DownloadsSnapshot, ApiError> {
    let (files, tasks) = try_join(api.list_files(), api.list_tasks()).await?;

    let tasks: Vec<ActiveTask> = tasks
        .into_iter()
        .filter_map(|(id, report)| match JobId::new(id) {
            Some(job_id) => Some(ActiveTask {
                job_id,
                kind: sentinels.classify(&report.status),
                report,
            }),
            None => {
                ydui_warn!("skipping task with blank id");
                None
            }
        })
        .collect();

    ydui_debug!("reloaded files={} tasks={}", files.len(), tasks.len());
    Ok(DownloadsSnapshot { tasks, files })
}
