//! Channel and model catalogs fetched from the backend.
//!
//! Both lists are replaced wholesale on every fetch; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// A message source (Telegram sender) in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub sender_id: String,
    pub message_count: u64,
}

/// A generation backend the user can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
}

/// Load state of a list or value fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Catalog<T> {
    /// No fetch has completed yet.
    Loading,
    /// Last fetch succeeded.
    Ready(T),
    /// Last fetch failed; holds the failure reason.
    Failed(String),
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Catalog<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl<T> Catalog<Vec<T>> {
    /// Items of the last successful fetch, empty otherwise.
    pub fn items(&self) -> &[T] {
        self.ready().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Catalog<Vec<Model>> {
    pub fn find_model(&self, model_id: &str) -> Option<&Model> {
        self.items().iter().find(|model| model.id == model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_empty_unless_ready() {
        let loading: Catalog<Vec<Channel>> = Catalog::default();
        assert!(loading.is_loading());
        assert!(loading.items().is_empty());

        let failed: Catalog<Vec<Channel>> = Catalog::Failed("boom".to_string());
        assert!(failed.is_failed());
        assert!(failed.items().is_empty());

        let ready = Catalog::Ready(vec![Channel {
            sender_id: "chan_a".to_string(),
            message_count: 5,
        }]);
        assert_eq!(ready.items().len(), 1);
    }

    #[test]
    fn test_find_model() {
        let models = Catalog::Ready(vec![Model {
            id: "gemini-2.0-flash".to_string(),
            name: "Gemini 2.0 Flash".to_string(),
        }]);
        assert_eq!(
            models.find_model("gemini-2.0-flash").map(|m| m.name.as_str()),
            Some("Gemini 2.0 Flash")
        );
        assert!(models.find_model("gpt-x").is_none());
    }
}
