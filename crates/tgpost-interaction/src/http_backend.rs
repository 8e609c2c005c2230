//! HttpBackend - REST implementation of the backend contract.
//!
//! Talks JSON to the archive backend under `{base_url}/api/...`. No request
//! timeout and no retries are applied.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tgpost_core::backend::{
    AnalyzerReport, AnalyzerRequest, Backend, BackendError, ChatReply, ChatRequest,
    CollectorReport, CollectorRequest, DbClearReport, DbStatus, SelectedIdsRequest,
    detail_from_body,
};
use tgpost_core::catalog::{Channel, Model};

/// Backend client over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for the backend rooted at `base_url`
    /// (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns non-success statuses into errors.
    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!("[HttpBackend] {} request failed: {}", path, err);
            BackendError::transport(format!("{path}: {err}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = detail_from_body(&body);
        tracing::warn!(
            "[HttpBackend] {} returned {} (detail: {:?})",
            path,
            status.as_u16(),
            detail
        );
        Err(BackendError::status(status.as_u16(), detail))
    }

    async fn read_json<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, BackendError> {
        response.json::<T>().await.map_err(|err| {
            tracing::warn!("[HttpBackend] Failed to decode {} response: {}", path, err);
            BackendError::decode(format!("{path}: {err}"))
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.execute(path, self.client.get(self.url(path))).await?;
        Self::read_json(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .execute(path, self.client.post(self.url(path)).json(body))
            .await?;
        Self::read_json(path, response).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_channels(&self) -> Result<Vec<Channel>, BackendError> {
        self.get_json("/api/senders").await
    }

    async fn fetch_models(&self) -> Result<Vec<Model>, BackendError> {
        self.get_json("/api/models").await
    }

    async fn fetch_db_status(&self) -> Result<DbStatus, BackendError> {
        self.get_json("/api/db/status").await
    }

    async fn sync_selection(&self, sender_ids: &[String]) -> Result<(), BackendError> {
        let path = "/api/selected-ids";
        let body = SelectedIdsRequest {
            sender_ids: sender_ids.to_vec(),
        };
        self.execute(path, self.client.put(self.url(path)).json(&body))
            .await?;
        Ok(())
    }

    async fn generate(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        tracing::debug!(
            "[HttpBackend] Chat request: model={}, senders={}, limit={:?}",
            request.model_id,
            request.sender_ids.len(),
            request.message_limit
        );
        self.post_json("/api/chat", request).await
    }

    async fn clear_db(&self) -> Result<DbClearReport, BackendError> {
        let path = "/api/db/clear";
        let response = self.execute(path, self.client.post(self.url(path))).await?;
        let body = response
            .text()
            .await
            .map_err(|err| BackendError::decode(format!("{path}: {err}")))?;

        if body.trim().is_empty() {
            return Ok(DbClearReport {
                ok: true,
                message: String::new(),
            });
        }
        serde_json::from_str(&body).map_err(|err| BackendError::decode(format!("{path}: {err}")))
    }

    async fn run_collector(
        &self,
        request: &CollectorRequest,
    ) -> Result<CollectorReport, BackendError> {
        self.post_json("/api/collector/fetch", request).await
    }

    async fn run_analyzer(
        &self,
        request: &AnalyzerRequest,
    ) -> Result<AnalyzerReport, BackendError> {
        self.post_json("/api/analyzer/run", request).await
    }
}
