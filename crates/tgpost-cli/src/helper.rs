//! rustyline helper: completion, highlighting and hints.

use crate::command::COMMANDS;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::{Arc, RwLock};

/// Argument candidates that change while the REPL runs.
#[derive(Debug, Default, Clone)]
pub struct Completions {
    pub channels: Vec<String>,
    pub models: Vec<String>,
    pub presets: Vec<String>,
    pub results: Vec<String>,
}

pub type SharedCompletions = Arc<RwLock<Completions>>;

#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
    completions: SharedCompletions,
}

impl CliHelper {
    pub fn new(completions: SharedCompletions) -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| name.to_string()).collect(),
            completions,
        }
    }

    fn argument_candidates(&self, command: &str) -> Vec<String> {
        let Ok(completions) = self.completions.read() else {
            return Vec::new();
        };
        match command {
            "/toggle" => completions.channels.clone(),
            "/model" => completions.models.clone(),
            "/preset" => completions.presets.clone(),
            "/show" => completions.results.clone(),
            "/analyze" => ["topics", "sentiment", "style"]
                .iter()
                .map(|job| job.to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        match line.split_once(' ') {
            None => {
                let candidates = self
                    .commands
                    .iter()
                    .filter(|cmd| cmd.starts_with(line))
                    .map(|cmd| Pair {
                        display: cmd.clone(),
                        replacement: cmd.clone(),
                    })
                    .collect();
                Ok((0, candidates))
            }
            Some((command, arg)) if !arg.contains(' ') => {
                let start = command.len() + 1;
                let candidates = self
                    .argument_candidates(command)
                    .into_iter()
                    .filter(|candidate| candidate.starts_with(arg))
                    .map(|candidate| Pair {
                        display: candidate.clone(),
                        replacement: candidate,
                    })
                    .collect();
                Ok((start, candidates))
            }
            Some(_) => Ok((pos, vec![])),
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}
