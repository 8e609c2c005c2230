//! Generation result record.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One generation session: the prompt, the backend's answer, and the
/// context it was produced from.
///
/// Results are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Unique result identifier (UUID format)
    pub id: String,
    pub prompt: String,
    pub response: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Number of archive messages the backend used as context
    pub context_count: u64,
    /// Channel selection at generation time; empty means all channels
    pub sender_ids: Vec<String>,
    pub model_id: String,
}

impl GenerationResult {
    pub fn new(
        prompt: impl Into<String>,
        response: impl Into<String>,
        context_count: u64,
        sender_ids: Vec<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            response: response.into(),
            created_at: Utc::now().to_rfc3339(),
            context_count,
            sender_ids,
            model_id: model_id.into(),
        }
    }
}
