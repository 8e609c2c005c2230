#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tgpost_core::backend::{
    AnalyzerReport, AnalyzerRequest, Backend, BackendError, ChatReply, ChatRequest,
    CollectorReport, CollectorRequest, DbClearReport, DbStatus,
};
use tgpost_core::catalog::{Channel, Model};

type Reply<T> = Mutex<Result<T, BackendError>>;

/// Backend double with canned replies that records every request.
pub struct ScriptedBackend {
    channels: Reply<Vec<Channel>>,
    models: Reply<Vec<Model>>,
    db_status: Reply<DbStatus>,
    chat: Reply<ChatReply>,
    clear: Reply<DbClearReport>,
    collector: Reply<CollectorReport>,
    analyzer: Reply<AnalyzerReport>,
    sync_error: Mutex<Option<BackendError>>,
    pub synced: Mutex<Vec<Vec<String>>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub collector_requests: Mutex<Vec<CollectorRequest>>,
    pub analyzer_requests: Mutex<Vec<AnalyzerRequest>>,
    status_calls: AtomicUsize,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            channels: Mutex::new(Ok(vec![channel("chan_a", 5)])),
            models: Mutex::new(Ok(vec![model("model-x", "Model X")])),
            db_status: Mutex::new(Ok(status(10))),
            chat: Mutex::new(Ok(ChatReply {
                response: "hello".to_string(),
                context_message_count: 3,
            })),
            clear: Mutex::new(Ok(DbClearReport {
                ok: true,
                message: "Messages table reset.".to_string(),
            })),
            collector: Mutex::new(Ok(CollectorReport {
                ok: true,
                processed: 0,
                details: vec![],
            })),
            analyzer: Mutex::new(Ok(AnalyzerReport {
                ok: true,
                output: "{}".to_string(),
            })),
            sync_error: Mutex::new(None),
            synced: Mutex::new(Vec::new()),
            chat_requests: Mutex::new(Vec::new()),
            collector_requests: Mutex::new(Vec::new()),
            analyzer_requests: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        }
    }
}

impl ScriptedBackend {
    pub fn set_channels(&self, reply: Result<Vec<Channel>, BackendError>) {
        *self.channels.lock().unwrap() = reply;
    }

    pub fn set_models(&self, reply: Result<Vec<Model>, BackendError>) {
        *self.models.lock().unwrap() = reply;
    }

    pub fn set_db_status(&self, reply: Result<DbStatus, BackendError>) {
        *self.db_status.lock().unwrap() = reply;
    }

    pub fn set_chat(&self, reply: Result<ChatReply, BackendError>) {
        *self.chat.lock().unwrap() = reply;
    }

    pub fn set_clear(&self, reply: Result<DbClearReport, BackendError>) {
        *self.clear.lock().unwrap() = reply;
    }

    pub fn set_collector(&self, reply: Result<CollectorReport, BackendError>) {
        *self.collector.lock().unwrap() = reply;
    }

    pub fn set_analyzer(&self, reply: Result<AnalyzerReport, BackendError>) {
        *self.analyzer.lock().unwrap() = reply;
    }

    pub fn fail_sync(&self, err: BackendError) {
        *self.sync_error.lock().unwrap() = Some(err);
    }

    pub fn synced(&self) -> Vec<Vec<String>> {
        self.synced.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn fetch_channels(&self) -> Result<Vec<Channel>, BackendError> {
        self.channels.lock().unwrap().clone()
    }

    async fn fetch_models(&self) -> Result<Vec<Model>, BackendError> {
        self.models.lock().unwrap().clone()
    }

    async fn fetch_db_status(&self) -> Result<DbStatus, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.db_status.lock().unwrap().clone()
    }

    async fn sync_selection(&self, sender_ids: &[String]) -> Result<(), BackendError> {
        self.synced.lock().unwrap().push(sender_ids.to_vec());
        match self.sync_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn generate(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        self.chat.lock().unwrap().clone()
    }

    async fn clear_db(&self) -> Result<DbClearReport, BackendError> {
        self.clear.lock().unwrap().clone()
    }

    async fn run_collector(
        &self,
        request: &CollectorRequest,
    ) -> Result<CollectorReport, BackendError> {
        self.collector_requests.lock().unwrap().push(request.clone());
        self.collector.lock().unwrap().clone()
    }

    async fn run_analyzer(
        &self,
        request: &AnalyzerRequest,
    ) -> Result<AnalyzerReport, BackendError> {
        self.analyzer_requests.lock().unwrap().push(request.clone());
        self.analyzer.lock().unwrap().clone()
    }
}

pub fn channel(sender_id: &str, message_count: u64) -> Channel {
    Channel {
        sender_id: sender_id.to_string(),
        message_count,
    }
}

pub fn model(id: &str, name: &str) -> Model {
    Model {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn status(message_count: u64) -> DbStatus {
    DbStatus {
        message_count,
        sender_count: 1,
        latest_message_at: None,
    }
}
