use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Client configuration (`config.toml`).
///
/// Every field has a default, so a partial or empty file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root URL, without the `/api` suffix
    pub base_url: String,
    /// Model selected before the model list arrives
    pub default_model: String,
    /// Maximum archive messages sent as generation context
    pub message_limit: Option<u32>,
    /// DB status refresh interval in seconds
    pub status_poll_secs: u64,
    /// Per-target message limit for collector runs
    pub collector_limit: u32,
    pub analyzer_days_back: u32,
    pub analyzer_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            message_limit: Some(100),
            status_poll_secs: 20,
            collector_limit: 100,
            analyzer_days_back: 30,
            analyzer_limit: 1000,
        }
    }
}
