//! Text projections of workbench state.
//!
//! Everything here is pure; coloring happens at print time in the REPL.

use chrono::{DateTime, Local};
use tgpost_core::activity::{LogBuffer, LogEntry};
use tgpost_core::backend::{AnalyzerJob, AnalyzerReport, DbStatus};
use tgpost_core::catalog::{Catalog, Channel, Model};
use tgpost_core::preset::PromptPreset;
use tgpost_core::result::{GenerationResult, ResultView};
use tgpost_core::selection::SelectionState;

pub const EMPTY_LOG: &str = "No activity yet";
const PREVIEW_CHARS: usize = 60;

pub fn channel_lines(channels: &Catalog<Vec<Channel>>, selection: &SelectionState) -> Vec<String> {
    match channels {
        Catalog::Loading => vec!["Loading channels...".to_string()],
        Catalog::Failed(reason) => vec![reason.clone()],
        Catalog::Ready(items) if items.is_empty() => {
            vec!["No channels in the archive yet. Run /collect first.".to_string()]
        }
        Catalog::Ready(items) => items
            .iter()
            .enumerate()
            .map(|(index, channel)| {
                let mark = if selection.is_selected(&channel.sender_id) {
                    "x"
                } else {
                    " "
                };
                format!(
                    "{:>3}. [{}] {} ({} messages)",
                    index + 1,
                    mark,
                    channel.sender_id,
                    channel.message_count
                )
            })
            .collect(),
    }
}

pub fn model_lines(models: &Catalog<Vec<Model>>, selected: &str) -> Vec<String> {
    match models {
        Catalog::Loading => vec!["Loading models...".to_string()],
        Catalog::Failed(reason) => vec![reason.clone()],
        Catalog::Ready(items) if items.is_empty() => vec!["No models available".to_string()],
        Catalog::Ready(items) => items
            .iter()
            .enumerate()
            .map(|(index, model)| {
                let mark = if model.id == selected { "*" } else { " " };
                format!("{:>3}. {} {} ({})", index + 1, mark, model.name, model.id)
            })
            .collect(),
    }
}

pub fn status_line(status: &Catalog<DbStatus>) -> String {
    match status {
        Catalog::Loading => "Loading DB status...".to_string(),
        Catalog::Failed(_) => "DB status unavailable".to_string(),
        Catalog::Ready(status) => format!(
            "{} messages from {} senders, latest {}",
            status.message_count,
            status.sender_count,
            status
                .latest_message_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string())
        ),
    }
}

/// Log entries paired with their rendered line, newest first; `None` when empty.
pub fn log_lines(log: &LogBuffer) -> Option<Vec<(&LogEntry, String)>> {
    if log.is_empty() {
        return None;
    }
    Some(log.entries().map(|entry| (entry, log_line(entry))).collect())
}

pub fn log_line(entry: &LogEntry) -> String {
    format!("[{}] {}", entry.time, entry.message)
}

/// Entries appended after the entry with `previous_id`, oldest first.
pub fn entries_since<'a>(log: &'a LogBuffer, previous_id: Option<&str>) -> Vec<&'a LogEntry> {
    let mut entries: Vec<&LogEntry> = log
        .entries()
        .take_while(|entry| Some(entry.id.as_str()) != previous_id)
        .collect();
    entries.reverse();
    entries
}

/// Result pane: header followed by each shown session.
pub fn result_lines(view: ResultView<'_>) -> Vec<String> {
    let mut lines = vec![view.header()];
    if view.results().is_empty() {
        lines.push("No sessions yet. Type a prompt to generate a post.".to_string());
        return lines;
    }
    for result in view.results() {
        lines.push(String::new());
        lines.push(format!(
            "-- {} | {} | {} | {} context messages",
            format_timestamp(&result.created_at),
            result.model_id,
            senders_label(&result.sender_ids),
            result.context_count
        ));
        lines.push(format!("> {}", result.prompt));
        lines.extend(result.response.lines().map(str::to_string));
    }
    lines
}

/// One line per stored session, newest first.
pub fn history_lines(results: &[GenerationResult], active_id: Option<&str>) -> Vec<String> {
    if results.is_empty() {
        return vec!["No sessions yet".to_string()];
    }
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let mark = if Some(result.id.as_str()) == active_id {
                "*"
            } else {
                " "
            };
            format!(
                "{:>3}. {} {} {}",
                index + 1,
                mark,
                format_timestamp(&result.created_at),
                preview(&result.prompt)
            )
        })
        .collect()
}

pub fn preset_lines(presets: &[PromptPreset]) -> Vec<String> {
    presets
        .iter()
        .enumerate()
        .map(|(index, preset)| {
            format!(
                "{:>3}. {} [{}] - {}",
                index + 1,
                preset.label,
                preset.id,
                preset.hint
            )
        })
        .collect()
}

/// Analyzer output, pretty-printed when it is JSON.
pub fn analysis_lines(job: AnalyzerJob, report: &AnalyzerReport) -> Vec<String> {
    let body = serde_json::from_str::<serde_json::Value>(&report.output)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| report.output.clone());

    let mut lines = vec![format!("Analyzer '{}' output:", job)];
    lines.extend(body.lines().map(str::to_string));
    lines
}

fn senders_label(sender_ids: &[String]) -> String {
    if sender_ids.is_empty() {
        "all channels".to_string()
    } else {
        sender_ids.join(", ")
    }
}

fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > PREVIEW_CHARS || text.lines().nth(1).is_some() {
        let cut: String = first_line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        first_line.to_string()
    }
}

/// Formats an RFC 3339 timestamp in local time; unparsable input is returned as is.
pub fn format_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| {
            parsed
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}
