mod common;

use std::collections::BTreeMap;

use common::{init_logging, job, ScriptedApi};
use pretty_assertions::assert_eq;
use ydui_engine::{
    reload_all, ApiError, ApiFailureKind, CompletedFile, StatusKind, StatusSentinels, TaskReport,
};

fn task(status: &str) -> TaskReport {
    TaskReport {
        status: status.to_string(),
        progress: None,
        url: Some("https://youtu.be/a".to_string()),
        log: Vec::new(),
    }
}

#[tokio::test]
async fn combines_files_and_classified_tasks() {
    init_logging();
    let api = ScriptedApi::new();
    api.set_files(Ok(vec![CompletedFile {
        filename: "a.mp4".to_string(),
        created_at: 1_700_000_000,
    }]));
    api.set_tasks(Ok(BTreeMap::from([
        ("b".to_string(), task("下载完成")),
        ("a".to_string(), task("12.5%")),
        ("  ".to_string(), task("12.5%")),
    ])));

    let snapshot = reload_all(api.as_ref(), &StatusSentinels::default())
        .await
        .expect("reload");

    assert_eq!(snapshot.files.len(), 1);
    let tasks: Vec<_> = snapshot
        .tasks
        .iter()
        .map(|task| (task.job_id.clone(), task.kind))
        .collect();
    assert_eq!(
        tasks,
        vec![
            (job("a"), StatusKind::InProgress),
            (job("b"), StatusKind::Completed),
        ]
    );
}

#[tokio::test]
async fn either_failure_fails_reload() {
    init_logging();
    let api = ScriptedApi::new();
    let error = ApiError {
        kind: ApiFailureKind::Network,
        message: "connection refused".to_string(),
    };
    api.set_tasks(Err(error.clone()));

    let result = reload_all(api.as_ref(), &StatusSentinels::default()).await;

    assert_eq!(result, Err(error));
}
