mod common;

use common::{ScriptedBackend, channel, model, status};
use std::sync::Arc;
use tgpost_application::{GenerateOutcome, WorkbenchUseCase};
use tgpost_core::activity::Severity;
use tgpost_core::backend::{
    AnalyzerJob, AnalyzerReport, BackendError, CollectorDetail, CollectorReport,
};
use tgpost_core::catalog::Catalog;
use tgpost_core::config::ClientConfig;
use tgpost_core::error::{Result as CoreResult, TgPostError};
use tgpost_core::result::ResultView;
use tgpost_core::storage::{KeyValueStore, MemoryStore};

fn config() -> ClientConfig {
    ClientConfig {
        default_model: "model-x".to_string(),
        message_limit: Some(120),
        ..ClientConfig::default()
    }
}

fn workbench() -> (Arc<ScriptedBackend>, Arc<MemoryStore>, WorkbenchUseCase) {
    let backend = Arc::new(ScriptedBackend::default());
    let store = Arc::new(MemoryStore::new());
    let workbench = WorkbenchUseCase::new(backend.clone(), store.clone(), config());
    (backend, store, workbench)
}

fn messages(entries: impl Iterator<Item = String>) -> Vec<String> {
    entries.collect()
}

#[tokio::test]
async fn test_initialize_loads_catalogs_and_status() {
    let (backend, _, mut workbench) = workbench();
    assert!(workbench.channels().is_loading());

    workbench.initialize().await;

    assert_eq!(workbench.channels().items().len(), 1);
    assert_eq!(workbench.models().items().len(), 1);
    assert_eq!(workbench.db_status().ready().map(|s| s.message_count), Some(10));
    assert_eq!(backend.status_calls(), 1);
    assert_eq!(workbench.model_label(), "Model X");
}

#[tokio::test]
async fn test_failed_fetches_degrade_to_placeholders() {
    let (backend, _, mut workbench) = workbench();
    backend.set_channels(Err(BackendError::transport("connection refused")));
    backend.set_models(Err(BackendError::status(500, None)));
    backend.set_db_status(Err(BackendError::transport("connection refused")));

    workbench.initialize().await;

    assert_eq!(
        workbench.channels(),
        &Catalog::Failed("Failed to load channels".to_string())
    );
    assert_eq!(
        workbench.models(),
        &Catalog::Failed("Failed to load models".to_string())
    );
    assert_eq!(
        workbench.db_status(),
        &Catalog::Failed("DB status unavailable".to_string())
    );
    assert_eq!(workbench.channel_summary(), "All channels (0)");
    // Unknown model falls back to the raw id
    assert_eq!(workbench.model_label(), "model-x");
}

#[tokio::test]
async fn test_catalog_placeholders_ignore_server_detail() {
    let (backend, _, mut workbench) = workbench();
    let locked = || BackendError::status(500, Some("database is locked".to_string()));
    backend.set_channels(Err(locked()));
    backend.set_models(Err(locked()));

    workbench.initialize().await;

    assert_eq!(
        workbench.channels(),
        &Catalog::Failed("Failed to load channels".to_string())
    );
    assert_eq!(
        workbench.models(),
        &Catalog::Failed("Failed to load models".to_string())
    );

    workbench.reload_channels().await;
    assert_eq!(
        workbench.channels(),
        &Catalog::Failed("Failed to load channels".to_string())
    );
}

#[tokio::test]
async fn test_model_reconciled_after_fetch() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.set_models(Ok(vec![
        model("gemini-1.5-pro", "Gemini 1.5 Pro"),
        model("gpt-4o", "GPT-4o"),
    ]));
    let mut workbench =
        WorkbenchUseCase::new(backend, Arc::new(MemoryStore::new()), ClientConfig::default());

    workbench.reload_models().await;
    assert_eq!(workbench.selection().model_id(), "gemini-1.5-pro");

    // Manual choice is kept as long as the catalog knows it
    workbench.select_model("gpt-4o");
    workbench.reload_models().await;
    assert_eq!(workbench.selection().model_id(), "gpt-4o");
}

#[tokio::test]
async fn test_toggle_channel_round_trip() {
    let (backend, _, mut workbench) = workbench();
    workbench.reload_channels().await;
    assert_eq!(workbench.channel_summary(), "All channels (1)");

    workbench.toggle_channel("chan_a").await.unwrap();
    assert_eq!(workbench.channel_summary(), "chan_a");

    workbench.toggle_channel("chan_a").await.unwrap();
    assert_eq!(workbench.channel_summary(), "All channels (1)");

    assert_eq!(
        backend.synced(),
        vec![vec!["chan_a".to_string()], Vec::<String>::new()]
    );
}

#[tokio::test]
async fn test_clear_channels_syncs_empty_selection() {
    let (backend, _, mut workbench) = workbench();
    backend.set_channels(Ok(vec![channel("chan_a", 5), channel("chan_b", 2)]));
    workbench.reload_channels().await;

    workbench.toggle_channel("chan_a").await.unwrap();
    workbench.toggle_channel("chan_b").await.unwrap();
    assert_eq!(workbench.channel_summary(), "2 channels");

    workbench.clear_channels().await.unwrap();
    assert!(workbench.selection().channels().is_empty());
    assert_eq!(backend.synced().last(), Some(&Vec::<String>::new()));
}

#[tokio::test]
async fn test_sync_failure_keeps_local_selection() {
    let (backend, _, mut workbench) = workbench();
    backend.fail_sync(BackendError::status(500, None));

    workbench.toggle_channel("chan_a").await.unwrap();

    assert_eq!(workbench.selection().channels(), ["chan_a"]);
    assert!(workbench.ops_log().is_empty());
    assert!(workbench.run_log().is_empty());
}

#[tokio::test]
async fn test_generate_success_records_active_result() {
    let (backend, _, mut workbench) = workbench();

    let result = match workbench.generate("hi").await {
        GenerateOutcome::Completed(result) => result,
        other => panic!("expected a completed generation, got {other:?}"),
    };

    assert_eq!(result.prompt, "hi");
    assert_eq!(result.response, "hello");
    assert_eq!(result.context_count, 3);
    assert!(result.sender_ids.is_empty());
    assert_eq!(result.model_id, "model-x");
    assert_eq!(workbench.active_result_id(), Some(result.id.as_str()));
    assert_eq!(workbench.results(), ResultView::Active(&result));
    assert!(!workbench.is_busy());

    let requests = backend.chat_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].message, "hi");
    assert_eq!(requests[0].message_limit, Some(120));

    let log = messages(workbench.run_log().entries().map(|e| e.message.clone()));
    assert_eq!(log, ["Response ready (3 context messages)", "Generating with model-x..."]);
    assert_eq!(workbench.run_log().latest().unwrap().severity, Severity::Success);
}

#[tokio::test]
async fn test_generate_failure_leaves_history_unchanged() {
    let (backend, _, mut workbench) = workbench();
    backend.set_chat(Err(BackendError::status(429, Some("rate limited".to_string()))));

    let outcome = workbench.generate("hi").await;

    assert_eq!(outcome, GenerateOutcome::Failed("rate limited".to_string()));
    assert!(workbench.history().is_empty());
    assert_eq!(workbench.active_result_id(), None);
    assert!(!workbench.is_busy());

    let latest = workbench.run_log().latest().unwrap();
    assert_eq!(latest.message, "rate limited");
    assert_eq!(latest.severity, Severity::Error);
}

#[tokio::test]
async fn test_generate_failure_without_detail_uses_fallback() {
    let (backend, _, mut workbench) = workbench();
    backend.set_chat(Err(BackendError::transport("connection reset")));

    let outcome = workbench.generate("hi").await;
    assert_eq!(
        outcome,
        GenerateOutcome::Failed("Failed to get response".to_string())
    );
}

#[tokio::test]
async fn test_blank_prompt_is_skipped() {
    let (backend, _, mut workbench) = workbench();

    assert!(!workbench.can_send("   "));
    assert_eq!(workbench.generate("  \n").await, GenerateOutcome::Skipped);
    assert!(backend.chat_requests.lock().unwrap().is_empty());
    assert!(workbench.run_log().is_empty());
}

#[tokio::test]
async fn test_generate_sends_selected_channels() {
    let (backend, _, mut workbench) = workbench();
    workbench.toggle_channel("chan_b").await.unwrap();
    workbench.toggle_channel("chan_a").await.unwrap();

    workbench.generate("summarize").await;

    let requests = backend.chat_requests.lock().unwrap().clone();
    assert_eq!(requests[0].sender_ids, ["chan_b", "chan_a"]);
}

#[tokio::test]
async fn test_history_survives_restart() {
    let (backend, store, mut workbench) = workbench();
    workbench.generate("first").await;
    workbench.generate("second").await;

    let restored = WorkbenchUseCase::new(backend, store, config());
    assert_eq!(restored.history(), workbench.history());
    assert_eq!(restored.active_result_id(), workbench.active_result_id());
    assert_eq!(restored.history()[0].prompt, "second");
}

#[tokio::test]
async fn test_new_session_and_select_result() {
    let (_, _, mut workbench) = workbench();
    let GenerateOutcome::Completed(first) = workbench.generate("first").await else {
        panic!("generation failed");
    };
    workbench.generate("second").await;

    workbench.new_session().unwrap();
    assert_eq!(workbench.results().header(), "Showing 2 sessions");

    workbench.select_result(&first.id).unwrap();
    assert_eq!(workbench.results(), ResultView::Active(&first));
    assert_eq!(workbench.results().header(), "Showing 1 session");

    assert!(workbench.select_result("missing").unwrap_err().is_not_found());
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> CoreResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> CoreResult<()> {
        Err(TgPostError::io("read-only file system"))
    }

    fn remove(&self, _key: &str) -> CoreResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_persistence_failure_is_reported() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut workbench = WorkbenchUseCase::new(backend, Arc::new(ReadOnlyStore), config());

    let outcome = workbench.generate("hi").await;

    assert!(matches!(outcome, GenerateOutcome::Completed(_)));
    assert_eq!(workbench.history().len(), 1);
    let latest = workbench.run_log().latest().unwrap();
    assert!(latest.message.starts_with("Failed to save session: "));
    assert_eq!(latest.severity, Severity::Error);
}

#[tokio::test]
async fn test_db_status_failure_logged_once_per_outage() {
    let (backend, _, mut workbench) = workbench();
    backend.set_db_status(Err(BackendError::transport("connection refused")));

    workbench.refresh_db_status().await;
    workbench.refresh_db_status().await;
    assert_eq!(workbench.ops_log().len(), 1);
    assert!(workbench.db_status().is_failed());

    workbench.apply_db_status(Ok(status(42)));
    assert_eq!(workbench.db_status().ready().map(|s| s.message_count), Some(42));

    workbench.apply_db_status(Err(BackendError::status(500, None)));
    assert_eq!(workbench.ops_log().len(), 2);
}

#[tokio::test]
async fn test_collector_rejects_blank_targets() {
    let (backend, _, mut workbench) = workbench();

    let report = workbench
        .run_collector(&[" ".to_string(), String::new()], None)
        .await;

    assert!(report.is_none());
    assert!(backend.collector_requests.lock().unwrap().is_empty());
    let latest = workbench.ops_log().latest().unwrap();
    assert_eq!(latest.message, "Enter at least one collector target");
    assert_eq!(latest.severity, Severity::Error);
}

#[tokio::test]
async fn test_collector_reports_per_target_errors() {
    let (backend, _, mut workbench) = workbench();
    backend.set_collector(Ok(CollectorReport {
        ok: true,
        processed: 42,
        details: vec![
            CollectorDetail {
                target: "@chan_a".to_string(),
                processed: 42,
                error: None,
            },
            CollectorDetail {
                target: "@missing".to_string(),
                processed: 0,
                error: Some("Failed to resolve target".to_string()),
            },
        ],
    }));

    let report = workbench
        .run_collector(&[" @chan_a ".to_string(), "@missing".to_string()], Some(0))
        .await
        .unwrap();

    assert_eq!(report.processed, 42);
    let requests = backend.collector_requests.lock().unwrap().clone();
    assert_eq!(requests[0].targets, ["@chan_a", "@missing"]);
    assert_eq!(requests[0].limit, 1);

    let log = messages(workbench.ops_log().entries().map(|e| e.message.clone()));
    assert_eq!(
        log,
        [
            "@missing: Failed to resolve target",
            "Collector processed 42 messages"
        ]
    );
    // Status refreshed after the run
    assert_eq!(backend.status_calls(), 1);
}

#[tokio::test]
async fn test_collector_failure_uses_detail_or_fallback() {
    let (backend, _, mut workbench) = workbench();
    backend.set_collector(Err(BackendError::status(
        400,
        Some("Telegram session is not authorized".to_string()),
    )));
    assert!(workbench.run_collector(&["@a".to_string()], None).await.is_none());
    assert_eq!(
        workbench.ops_log().latest().unwrap().message,
        "Telegram session is not authorized"
    );

    backend.set_collector(Err(BackendError::decode("bad json")));
    workbench.run_collector(&["@a".to_string()], None).await;
    assert_eq!(workbench.ops_log().latest().unwrap().message, "Collector run failed");
}

#[tokio::test]
async fn test_analyzer_uses_selection_and_keeps_report() {
    let (backend, _, mut workbench) = workbench();
    backend.set_analyzer(Ok(AnalyzerReport {
        ok: true,
        output: "{\"topics\": [\"ai\"]}".to_string(),
    }));
    workbench.toggle_channel("chan_a").await.unwrap();

    let report = workbench
        .run_analyzer(AnalyzerJob::Topics, None, Some(50))
        .await
        .unwrap();

    let requests = backend.analyzer_requests.lock().unwrap().clone();
    assert_eq!(requests[0].job, AnalyzerJob::Topics);
    assert_eq!(requests[0].days_back, 30);
    assert_eq!(requests[0].limit, 50);
    assert_eq!(requests[0].sender_ids, ["chan_a"]);

    let (job, kept) = workbench.last_analysis().unwrap();
    assert_eq!(*job, AnalyzerJob::Topics);
    assert_eq!(kept, &report);
    assert_eq!(workbench.ops_log().latest().unwrap().severity, Severity::Success);
}

#[tokio::test]
async fn test_analyzer_failure() {
    let (backend, _, mut workbench) = workbench();
    backend.set_analyzer(Err(BackendError::status(500, None)));

    assert!(workbench.run_analyzer(AnalyzerJob::Style, None, None).await.is_none());
    assert!(workbench.last_analysis().is_none());
    assert_eq!(workbench.ops_log().latest().unwrap().message, "Analyzer run failed");
}

#[tokio::test]
async fn test_clear_db() {
    let (backend, _, mut workbench) = workbench();

    assert!(workbench.clear_db().await);
    let latest = workbench.ops_log().latest().unwrap();
    assert_eq!(latest.message, "Messages table reset.");
    assert_eq!(latest.severity, Severity::Success);
    assert_eq!(backend.status_calls(), 1);

    backend.set_clear(Err(BackendError::status(500, None)));
    assert!(!workbench.clear_db().await);
    assert_eq!(
        workbench.ops_log().latest().unwrap().message,
        "Failed to clear database"
    );
}
