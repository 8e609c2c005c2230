use super::model::GenerationResult;
use crate::error::{Result, TgPostError};
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Storage key holding the JSON array of results, newest first.
pub const RESULTS_KEY: &str = "tgpost.results";
/// Storage key holding the active result id. Absent when nothing is active.
pub const ACTIVE_RESULT_KEY: &str = "tgpost.activeResultId";

/// What the results pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    /// A result is focused; only it is shown.
    Active(&'a GenerationResult),
    /// Nothing is focused; the whole history is shown, newest first.
    All(&'a [GenerationResult]),
}

impl<'a> ResultView<'a> {
    /// Header line. Follows the branch, not the item count.
    pub fn header(&self) -> String {
        match self {
            Self::Active(_) => "Showing 1 session".to_string(),
            Self::All(results) => format!("Showing {} sessions", results.len()),
        }
    }

    pub fn results(&self) -> &'a [GenerationResult] {
        match *self {
            Self::Active(result) => std::slice::from_ref(result),
            Self::All(results) => results,
        }
    }
}

/// Ordered history of generation results mirrored into durable storage.
///
/// The in-memory sequence is the working copy; the store is the recovery
/// source across restarts. Every insert rewrites the whole sequence.
/// The history is unbounded.
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    results: Vec<GenerationResult>,
    active_id: Option<String>,
}

impl ResultCache {
    /// Creates a cache over `store` and loads whatever it holds.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut cache = Self {
            store,
            results: Vec::new(),
            active_id: None,
        };
        cache.load_from_storage();
        cache
    }

    /// Replaces the in-memory state with the stored one.
    ///
    /// Unreadable or corrupted data yields an empty history. An active id
    /// that names no stored result is dropped.
    pub fn load_from_storage(&mut self) {
        self.results = match self.store.get(RESULTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<GenerationResult>>(&raw) {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!("[ResultCache] Discarding unreadable result history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("[ResultCache] Failed to read result history: {}", e);
                Vec::new()
            }
        };

        self.active_id = match self.store.get(ACTIVE_RESULT_KEY) {
            Ok(Some(id)) if self.contains(&id) => Some(id),
            Ok(Some(id)) => {
                tracing::debug!("[ResultCache] Dropping stale active result id: {}", id);
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("[ResultCache] Failed to read active result id: {}", e);
                None
            }
        };

        tracing::debug!(
            "[ResultCache] Loaded {} results (active: {:?})",
            self.results.len(),
            self.active_id
        );
    }

    /// Records a new generation at the head of the history and focuses it.
    ///
    /// The full sequence and the active pointer are persisted. If persisting
    /// fails the result stays in memory and the storage error is returned.
    pub fn add_result(
        &mut self,
        prompt: impl Into<String>,
        response: impl Into<String>,
        context_count: u64,
        sender_ids: Vec<String>,
        model_id: impl Into<String>,
    ) -> Result<GenerationResult> {
        let result = GenerationResult::new(prompt, response, context_count, sender_ids, model_id);
        self.results.insert(0, result.clone());
        self.active_id = Some(result.id.clone());

        self.persist_results()?;
        self.persist_active()?;
        Ok(result)
    }

    /// Focuses the result with `id`, or clears the focus with `None`.
    ///
    /// Only the pointer is persisted.
    pub fn set_active(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) if !self.contains(id) => Err(TgPostError::not_found("result", id)),
            Some(id) => {
                self.active_id = Some(id.to_string());
                self.persist_active()
            }
            None => {
                self.active_id = None;
                self.persist_active()
            }
        }
    }

    pub fn projection(&self) -> ResultView<'_> {
        match self.active() {
            Some(result) => ResultView::Active(result),
            None => ResultView::All(&self.results),
        }
    }

    pub fn results(&self) -> &[GenerationResult] {
        &self.results
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&GenerationResult> {
        let id = self.active_id.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, id: &str) -> Option<&GenerationResult> {
        self.results.iter().find(|result| result.id == id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn contains(&self, id: &str) -> bool {
        self.results.iter().any(|result| result.id == id)
    }

    fn persist_results(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.results)?;
        self.store.set(RESULTS_KEY, &raw)
    }

    fn persist_active(&self) -> Result<()> {
        match &self.active_id {
            Some(id) => self.store.set(ACTIVE_RESULT_KEY, id),
            None => self.store.remove(ACTIVE_RESULT_KEY),
        }
    }
}
