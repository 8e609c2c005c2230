//! Workbench use case implementation.
//!
//! This module provides the `WorkbenchUseCase`, the single owner of everything
//! the terminal client shows: catalogs, selection, result history, activity
//! logs and DB status. Front ends call into it and render its views.

use crate::status_poller::StatusUpdate;
use std::sync::Arc;
use tgpost_core::activity::LogBuffer;
use tgpost_core::backend::{
    AnalyzerJob, AnalyzerReport, AnalyzerRequest, Backend, BackendError, ChatRequest,
    CollectorReport, CollectorRequest, DbStatus,
};
use tgpost_core::catalog::{Catalog, Channel, Model};
use tgpost_core::config::ClientConfig;
use tgpost_core::error::Result;
use tgpost_core::result::{GenerationResult, ResultCache, ResultView};
use tgpost_core::selection::SelectionState;
use tgpost_core::storage::KeyValueStore;
use tokio::task::JoinHandle;

pub const CHANNELS_FALLBACK: &str = "Failed to load channels";
pub const MODELS_FALLBACK: &str = "Failed to load models";
pub const DB_STATUS_FALLBACK: &str = "DB status unavailable";
pub const CHAT_FALLBACK: &str = "Failed to get response";
pub const COLLECTOR_FALLBACK: &str = "Collector run failed";
pub const ANALYZER_FALLBACK: &str = "Analyzer run failed";
pub const CLEAR_DB_FALLBACK: &str = "Failed to clear database";

/// Result of a [`WorkbenchUseCase::generate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The backend answered; the result is stored and active.
    Completed(GenerationResult),
    /// The request failed; holds the reason shown to the user.
    Failed(String),
    /// Blank prompt or a generation already in flight; nothing was sent.
    Skipped,
}

/// Use case driving the post-generation workbench.
///
/// Methods take `&mut self`, so a single owner serializes all state changes.
/// Network round trips are the only suspension points; the channel selection
/// sync is the one operation that runs detached.
pub struct WorkbenchUseCase {
    backend: Arc<dyn Backend>,
    config: ClientConfig,
    channels: Catalog<Vec<Channel>>,
    models: Catalog<Vec<Model>>,
    db_status: Catalog<DbStatus>,
    selection: SelectionState,
    results: ResultCache,
    run_log: LogBuffer,
    ops_log: LogBuffer,
    busy: bool,
    last_analysis: Option<(AnalyzerJob, AnalyzerReport)>,
}

impl WorkbenchUseCase {
    /// Creates the workbench and restores the result history from `store`.
    ///
    /// Catalogs start out loading; call [`initialize`](Self::initialize) to
    /// fetch them.
    pub fn new(
        backend: Arc<dyn Backend>,
        store: Arc<dyn KeyValueStore>,
        config: ClientConfig,
    ) -> Self {
        let selection = SelectionState::new(config.default_model.clone());
        Self {
            backend,
            config,
            channels: Catalog::Loading,
            models: Catalog::Loading,
            db_status: Catalog::Loading,
            selection,
            results: ResultCache::load(store),
            run_log: LogBuffer::run_log(),
            ops_log: LogBuffer::ops_log(),
            busy: false,
            last_analysis: None,
        }
    }

    /// Fetches channels, models and DB status concurrently.
    pub async fn initialize(&mut self) {
        let backend = self.backend.clone();
        let (channels, models, status) = tokio::join!(
            backend.fetch_channels(),
            backend.fetch_models(),
            backend.fetch_db_status()
        );
        self.apply_channels(channels);
        self.apply_models(models);
        self.apply_db_status(status);
    }

    pub async fn reload_channels(&mut self) {
        let channels = self.backend.fetch_channels().await;
        self.apply_channels(channels);
    }

    pub async fn reload_models(&mut self) {
        let models = self.backend.fetch_models().await;
        self.apply_models(models);
    }

    pub async fn refresh_db_status(&mut self) {
        let status = self.backend.fetch_db_status().await;
        self.apply_db_status(status);
    }

    /// Applies a DB status fetch outcome, e.g. one delivered by the poller.
    ///
    /// A failure is written to the ops log only when the view was not already
    /// failed.
    pub fn apply_db_status(&mut self, update: StatusUpdate) {
        match update {
            Ok(status) => {
                self.db_status = Catalog::Ready(status);
            }
            Err(err) => {
                if !self.db_status.is_failed() {
                    self.ops_log
                        .error(format!("{}: {}", DB_STATUS_FALLBACK, err.reason("request failed")));
                }
                tracing::warn!("[Workbench] DB status fetch failed: {}", err);
                self.db_status = Catalog::Failed(err.reason(DB_STATUS_FALLBACK));
            }
        }
    }

    /// Catalog fetch failures show a fixed placeholder; the server detail only
    /// reaches the log.
    fn apply_channels(&mut self, channels: std::result::Result<Vec<Channel>, BackendError>) {
        self.channels = match channels {
            Ok(channels) => {
                tracing::debug!("[Workbench] Loaded {} channels", channels.len());
                Catalog::Ready(channels)
            }
            Err(err) => {
                tracing::warn!("[Workbench] Failed to load channels: {}", err);
                Catalog::Failed(CHANNELS_FALLBACK.to_string())
            }
        };
    }

    fn apply_models(&mut self, models: std::result::Result<Vec<Model>, BackendError>) {
        self.models = match models {
            Ok(models) => {
                tracing::debug!("[Workbench] Loaded {} models", models.len());
                if self.selection.reconcile_model(&models) {
                    tracing::info!(
                        "[Workbench] Model switched to {} (previous selection unavailable)",
                        self.selection.model_id()
                    );
                }
                Catalog::Ready(models)
            }
            Err(err) => {
                tracing::warn!("[Workbench] Failed to load models: {}", err);
                Catalog::Failed(MODELS_FALLBACK.to_string())
            }
        };
    }

    /// Flips the selection of `channel_id` and pushes the new selection to the
    /// backend in the background.
    pub fn toggle_channel(&mut self, channel_id: &str) -> JoinHandle<()> {
        let selected = self.selection.toggle_channel(channel_id);
        tracing::debug!(
            "[Workbench] Channel {} {}",
            channel_id,
            if selected { "selected" } else { "deselected" }
        );
        self.spawn_selection_sync()
    }

    /// Empties the selection ("all channels") and syncs it.
    pub fn clear_channels(&mut self) -> JoinHandle<()> {
        self.selection.clear_channels();
        self.spawn_selection_sync()
    }

    /// Best effort: the returned handle never yields an error and nothing
    /// retries a failed sync.
    fn spawn_selection_sync(&self) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let sender_ids = self.selection.channels().to_vec();
        tokio::spawn(async move {
            match backend.sync_selection(&sender_ids).await {
                Ok(()) => tracing::info!("[Workbench] selected_ids updated: {:?}", sender_ids),
                Err(err) => tracing::warn!("[Workbench] Failed to sync selected_ids: {}", err),
            }
        })
    }

    pub fn select_model(&mut self, model_id: impl Into<String>) {
        self.selection.select_model(model_id);
        tracing::debug!("[Workbench] Model set to {}", self.selection.model_id());
    }

    pub fn can_send(&self, input: &str) -> bool {
        !self.busy && !input.trim().is_empty()
    }

    /// Sends `prompt` with the current selection and model.
    ///
    /// On success the result is recorded at the head of the history and
    /// becomes active. On failure the history is untouched and the reason is
    /// written to the run log.
    pub async fn generate(&mut self, prompt: &str) -> GenerateOutcome {
        if !self.can_send(prompt) {
            return GenerateOutcome::Skipped;
        }

        let request = ChatRequest {
            message: prompt.to_string(),
            sender_ids: self.selection.channels().to_vec(),
            model_id: self.selection.model_id().to_string(),
            message_limit: self.config.message_limit,
        };

        self.busy = true;
        self.run_log
            .info(format!("Generating with {}...", self.model_label()));
        let reply = self.backend.generate(&request).await;
        self.busy = false;

        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!("[Workbench] Generation failed: {}", err);
                let reason = err.reason(CHAT_FALLBACK);
                self.run_log.error(reason.clone());
                return GenerateOutcome::Failed(reason);
            }
        };

        let context_count = reply.context_message_count;
        match self.results.add_result(
            request.message,
            reply.response,
            context_count,
            request.sender_ids,
            request.model_id,
        ) {
            Ok(result) => {
                self.run_log
                    .success(format!("Response ready ({} context messages)", context_count));
                GenerateOutcome::Completed(result)
            }
            Err(err) => {
                // The result is kept in memory even though it was not persisted
                tracing::error!("[Workbench] Failed to persist result: {}", err);
                self.run_log.error(format!("Failed to save session: {}", err));
                match self.results.active() {
                    Some(result) => GenerateOutcome::Completed(result.clone()),
                    None => GenerateOutcome::Failed(err.to_string()),
                }
            }
        }
    }

    /// Clears the active result so the whole history is shown.
    pub fn new_session(&mut self) -> Result<()> {
        self.results.set_active(None)
    }

    pub fn select_result(&mut self, result_id: &str) -> Result<()> {
        self.results.set_active(Some(result_id))
    }

    /// Runs the collector against `targets`.
    ///
    /// Blank targets are dropped; an empty list is rejected without a request.
    /// `limit` defaults to the configured collector limit.
    pub async fn run_collector(
        &mut self,
        targets: &[String],
        limit: Option<u32>,
    ) -> Option<CollectorReport> {
        let targets: Vec<String> = targets
            .iter()
            .map(|target| target.trim())
            .filter(|target| !target.is_empty())
            .map(str::to_string)
            .collect();
        if targets.is_empty() {
            self.ops_log.error("Enter at least one collector target");
            return None;
        }

        let request = CollectorRequest {
            targets,
            limit: limit.unwrap_or(self.config.collector_limit).max(1),
        };
        tracing::info!(
            "[Workbench] Running collector: {:?} (limit {})",
            request.targets,
            request.limit
        );

        match self.backend.run_collector(&request).await {
            Ok(report) => {
                self.ops_log
                    .success(format!("Collector processed {} messages", report.processed));
                for detail in &report.details {
                    if let Some(error) = &detail.error {
                        self.ops_log.error(format!("{}: {}", detail.target, error));
                    }
                }
                self.refresh_db_status().await;
                Some(report)
            }
            Err(err) => {
                tracing::error!("[Workbench] Collector failed: {}", err);
                self.ops_log.error(err.reason(COLLECTOR_FALLBACK));
                None
            }
        }
    }

    /// Runs an analyzer job over the currently selected channels.
    ///
    /// `days_back` and `limit` default to the configured values.
    pub async fn run_analyzer(
        &mut self,
        job: AnalyzerJob,
        days_back: Option<u32>,
        limit: Option<u32>,
    ) -> Option<AnalyzerReport> {
        let request = AnalyzerRequest {
            job,
            days_back: days_back.unwrap_or(self.config.analyzer_days_back).max(1),
            limit: limit.unwrap_or(self.config.analyzer_limit).max(1),
            sender_ids: self.selection.channels().to_vec(),
        };
        tracing::info!(
            "[Workbench] Running analyzer job {} ({} days, limit {})",
            job,
            request.days_back,
            request.limit
        );

        match self.backend.run_analyzer(&request).await {
            Ok(report) => {
                self.ops_log.success(format!("Analyzer '{}' finished", job));
                self.last_analysis = Some((job, report.clone()));
                Some(report)
            }
            Err(err) => {
                tracing::error!("[Workbench] Analyzer failed: {}", err);
                self.ops_log.error(err.reason(ANALYZER_FALLBACK));
                None
            }
        }
    }

    /// Wipes the message archive. The caller is responsible for confirmation.
    pub async fn clear_db(&mut self) -> bool {
        tracing::info!("[Workbench] Clearing message database");
        let cleared = match self.backend.clear_db().await {
            Ok(report) => {
                let message = if report.message.trim().is_empty() {
                    "Database cleared".to_string()
                } else {
                    report.message
                };
                self.ops_log.success(message);
                true
            }
            Err(err) => {
                tracing::error!("[Workbench] Clear DB failed: {}", err);
                self.ops_log.error(err.reason(CLEAR_DB_FALLBACK));
                false
            }
        };
        self.refresh_db_status().await;
        cleared
    }

    pub fn channel_summary(&self) -> String {
        self.selection.summary(self.channels.items().len())
    }

    /// Display name of the selected model, or its raw id when unknown.
    pub fn model_label(&self) -> String {
        let model_id = self.selection.model_id();
        self.models
            .find_model(model_id)
            .map(|model| model.name.clone())
            .unwrap_or_else(|| model_id.to_string())
    }

    pub fn results(&self) -> ResultView<'_> {
        self.results.projection()
    }

    pub fn history(&self) -> &[GenerationResult] {
        self.results.results()
    }

    pub fn active_result_id(&self) -> Option<&str> {
        self.results.active_id()
    }

    pub fn channels(&self) -> &Catalog<Vec<Channel>> {
        &self.channels
    }

    pub fn models(&self) -> &Catalog<Vec<Model>> {
        &self.models
    }

    pub fn db_status(&self) -> &Catalog<DbStatus> {
        &self.db_status
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn run_log(&self) -> &LogBuffer {
        &self.run_log
    }

    pub fn ops_log(&self) -> &LogBuffer {
        &self.ops_log
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_analysis(&self) -> Option<&(AnalyzerJob, AnalyzerReport)> {
        self.last_analysis.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
