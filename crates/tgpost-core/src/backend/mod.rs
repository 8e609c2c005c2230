//! Backend contract.
//!
//! The backend is an external REST service that owns the message archive.
//! This module defines the typed contract the client relies on; the HTTP
//! implementation lives in `tgpost-interaction`.

mod error;
mod types;

pub use error::{BackendError, detail_from_body};
pub use types::{
    AnalyzerJob, AnalyzerReport, AnalyzerRequest, ChatReply, ChatRequest, CollectorDetail,
    CollectorReport, CollectorRequest, DbClearReport, DbStatus, SelectedIdsRequest,
};

use crate::catalog::{Channel, Model};
use async_trait::async_trait;

/// Request/response operations against the message-archive backend.
///
/// Every call is one round trip. Implementations must not retry on their own;
/// retry policy (there is none) belongs to the caller.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/senders`
    async fn fetch_channels(&self) -> Result<Vec<Channel>, BackendError>;

    /// `GET /api/models`
    async fn fetch_models(&self) -> Result<Vec<Model>, BackendError>;

    /// `GET /api/db/status`
    async fn fetch_db_status(&self) -> Result<DbStatus, BackendError>;

    /// `PUT /api/selected-ids`. Best-effort; the response body is ignored.
    async fn sync_selection(&self, sender_ids: &[String]) -> Result<(), BackendError>;

    /// `POST /api/chat`
    async fn generate(&self, request: &ChatRequest) -> Result<ChatReply, BackendError>;

    /// `POST /api/db/clear`
    async fn clear_db(&self) -> Result<DbClearReport, BackendError>;

    /// `POST /api/collector/fetch`
    async fn run_collector(
        &self,
        request: &CollectorRequest,
    ) -> Result<CollectorReport, BackendError>;

    /// `POST /api/analyzer/run`
    async fn run_analyzer(&self, request: &AnalyzerRequest)
    -> Result<AnalyzerReport, BackendError>;
}
