//! Request and response bodies of the backend REST surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Body of `PUT /api/selected-ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedIdsRequest {
    pub sender_ids: Vec<String>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub sender_ids: Vec<String>,
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_limit: Option<u32>,
}

/// Successful `POST /api/chat` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub context_message_count: u64,
}

/// `GET /api/db/status` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStatus {
    pub message_count: u64,
    pub sender_count: u64,
    #[serde(default)]
    pub latest_message_at: Option<String>,
}

/// `POST /api/db/clear` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbClearReport {
    pub ok: bool,
    pub message: String,
}

/// Body of `POST /api/collector/fetch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorRequest {
    pub targets: Vec<String>,
    pub limit: u32,
}

/// Per-target outcome of a collector run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorDetail {
    pub target: String,
    pub processed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/collector/fetch` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorReport {
    #[serde(default)]
    pub ok: bool,
    pub processed: u64,
    #[serde(default)]
    pub details: Vec<CollectorDetail>,
}

/// Analyzer jobs the backend knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerJob {
    Topics,
    Sentiment,
    Style,
}

impl AnalyzerJob {
    pub const ALL: [AnalyzerJob; 3] = [Self::Topics, Self::Sentiment, Self::Style];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::Sentiment => "sentiment",
            Self::Style => "style",
        }
    }
}

impl fmt::Display for AnalyzerJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyzerJob {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "topics" => Ok(Self::Topics),
            "sentiment" => Ok(Self::Sentiment),
            "style" => Ok(Self::Style),
            other => Err(format!(
                "Unknown analyzer job '{other}' (expected topics, sentiment or style)"
            )),
        }
    }
}

/// Body of `POST /api/analyzer/run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerRequest {
    pub job: AnalyzerJob,
    pub days_back: u32,
    pub limit: u32,
    pub sender_ids: Vec<String>,
}

/// `POST /api/analyzer/run` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerReport {
    #[serde(default)]
    pub ok: bool,
    pub output: String,
}
