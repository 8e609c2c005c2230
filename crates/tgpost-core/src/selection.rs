//! Channel and model selection.
//!
//! Selection lives only in memory. The selected channel ids keep the order in
//! which the user picked them; the backend treats them as a set.

use crate::catalog::Model;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    channels: Vec<String>,
    model_id: String,
}

impl SelectionState {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            channels: Vec::new(),
            model_id: model_id.into(),
        }
    }

    /// Selected channel ids in the order they were picked.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn is_selected(&self, channel_id: &str) -> bool {
        self.channels.iter().any(|id| id == channel_id)
    }

    /// Removes `channel_id` if it is selected, appends it otherwise.
    ///
    /// Returns `true` when the channel ended up selected.
    pub fn toggle_channel(&mut self, channel_id: &str) -> bool {
        match self.channels.iter().position(|id| id == channel_id) {
            Some(index) => {
                self.channels.remove(index);
                false
            }
            None => {
                self.channels.push(channel_id.to_string());
                true
            }
        }
    }

    pub fn clear_channels(&mut self) {
        self.channels.clear();
    }

    /// Replaces the active model id. Any id is accepted, known or not.
    pub fn select_model(&mut self, model_id: impl Into<String>) {
        self.model_id = model_id.into();
    }

    /// Keeps the model id pointing at a known model after a catalog refresh.
    ///
    /// When the current id is empty or missing from `models`, the first model
    /// is selected. Returns `true` if the selection changed.
    pub fn reconcile_model(&mut self, models: &[Model]) -> bool {
        if models.iter().any(|model| model.id == self.model_id) {
            return false;
        }
        match models.first() {
            Some(first) => {
                self.model_id = first.id.clone();
                true
            }
            None => false,
        }
    }

    /// Selector label: all channels, the single id, or the count.
    pub fn summary(&self, known_channels: usize) -> String {
        match self.channels.as_slice() {
            [] => format!("All channels ({known_channels})"),
            [only] => only.clone(),
            many => format!("{} channels", many.len()),
        }
    }
}
