//! Built-in prompt presets.

use serde::{Deserialize, Serialize};

/// A canned generation prompt.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PromptPreset {
    pub id: String,
    pub label: String,
    /// One-line description shown next to the label
    pub hint: String,
    /// Prompt text sent to the backend
    pub template: String,
}

fn preset(id: &str, label: &str, hint: &str, template: &str) -> PromptPreset {
    PromptPreset {
        id: id.to_string(),
        label: label.to_string(),
        hint: hint.to_string(),
        template: template.to_string(),
    }
}

/// Returns the presets shipped with the client.
pub fn get_default_presets() -> Vec<PromptPreset> {
    vec![
        preset(
            "trend-summary",
            "Summary of trends",
            "Scan channels for recurring topics and shifts.",
            "Write a concise trend summary based on the selected Telegram channels. Highlight 3-5 emerging themes and why they matter.",
        ),
        preset(
            "thought-provoking",
            "Thought provoking post",
            "Open with a bold perspective or contrarian take.",
            "Create a thought-provoking post that challenges a common assumption found in the recent Telegram discussion. End with a question.",
        ),
        preset(
            "industry-brief",
            "Industry brief",
            "Bullet points with a quick takeaway.",
            "Generate a short industry brief with 4 bullet points and a one-sentence takeaway at the end.",
        ),
        preset(
            "hooks",
            "Hook + value",
            "Start with a hook, then deliver practical insight.",
            "Start with a hook in one sentence, then deliver practical value in 4-6 sentences. Keep the tone confident and clear.",
        ),
        preset(
            "debunk",
            "Debunk a myth",
            "Address a misconception and replace it with truth.",
            "Debunk a common misconception reflected in the channels. Explain the reality with evidence-like reasoning and give a clear takeaway.",
        ),
        preset(
            "actionable-steps",
            "Actionable steps",
            "List steps with a friendly, direct tone.",
            "Write a post that gives 5 actionable steps based on the conversation patterns. Keep each step short and practical.",
        ),
    ]
}

pub fn find_preset(id: &str) -> Option<PromptPreset> {
    get_default_presets().into_iter().find(|preset| preset.id == id)
}
