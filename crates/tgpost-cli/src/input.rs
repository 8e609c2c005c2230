//! Line input on a dedicated thread.
//!
//! rustyline blocks, so the editor lives on its own OS thread. The REPL sends
//! the next prompt when it is ready for input and receives one event back per
//! prompt; the editor never reads while a command is still running.

use crate::helper::CliHelper;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum InputEvent {
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D
    Eof,
    Failed(String),
}

/// Starts the editor thread. It exits when `prompts` is closed.
pub fn spawn(
    helper: CliHelper,
    history_path: Option<PathBuf>,
    events: mpsc::UnboundedSender<InputEvent>,
    prompts: std_mpsc::Receiver<String>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut editor = match Editor::<CliHelper, DefaultHistory>::new() {
            Ok(editor) => editor,
            Err(err) => {
                let _ = events.send(InputEvent::Failed(err.to_string()));
                return;
            }
        };
        editor.set_helper(Some(helper));
        if let Some(path) = &history_path {
            // Missing on first run
            let _ = editor.load_history(path);
        }

        while let Ok(prompt) = prompts.recv() {
            let event = match editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(err) => InputEvent::Failed(err.to_string()),
            };
            if events.send(event).is_err() {
                break;
            }
        }

        if let Some(path) = &history_path {
            if let Err(err) = editor.save_history(path) {
                tracing::warn!("[Input] Failed to save history to {}: {}", path.display(), err);
            }
        }
    })
}
