//! REPL command parsing.

use std::str::FromStr;
use tgpost_core::backend::AnalyzerJob;
use thiserror::Error;

/// Slash commands offered for completion and listed by `/help`.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show this help"),
    ("/channels", "List channels and the current selection"),
    ("/toggle", "<id|number>  Select or deselect a channel"),
    ("/all", "Use all channels (clear the selection)"),
    ("/models", "List available models"),
    ("/model", "<id|number>  Pick the model for generation"),
    ("/presets", "List prompt presets"),
    ("/preset", "<id|number>  Generate with a preset prompt"),
    ("/history", "List stored sessions"),
    ("/show", "<id|number>  Focus a stored session"),
    ("/new", "Start a new session (show the whole history)"),
    ("/status", "Show message database status"),
    ("/collect", "<target...> [--limit N]  Fetch messages from Telegram"),
    ("/analyze", "<topics|sentiment|style> [days] [limit]  Run an analyzer job"),
    ("/analysis", "Show the last analyzer output"),
    ("/cleardb", "Delete all archived messages (asks for confirmation)"),
    ("/logs", "Show the run and ops logs"),
    ("/reload", "Reload channels and models"),
    ("/quit", "Exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Channels,
    Toggle(String),
    AllChannels,
    Models,
    Model(String),
    Presets,
    Preset(String),
    History,
    Show(String),
    NewSession,
    Status,
    Collect {
        targets: Vec<String>,
        limit: Option<u32>,
    },
    Analyze {
        job: AnalyzerJob,
        days_back: Option<u32>,
        limit: Option<u32>,
    },
    Analysis,
    ClearDb,
    Logs,
    Reload,
    Quit,
    /// Free text sent as a generation prompt
    Prompt(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (type /help)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error("{0}")]
    InvalidJob(String),
}

/// Parses one input line. Returns `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Ok(Some(Command::Quit));
    }
    if !trimmed.starts_with('/') {
        return Ok(Some(Command::Prompt(trimmed.to_string())));
    }

    let mut parts = trimmed.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match name {
        "/help" | "/?" => Command::Help,
        "/channels" => Command::Channels,
        "/toggle" => Command::Toggle(single_arg(&args, "/toggle <id|number>")?),
        "/all" | "/clear" => Command::AllChannels,
        "/models" => Command::Models,
        "/model" => Command::Model(single_arg(&args, "/model <id|number>")?),
        "/presets" => Command::Presets,
        "/preset" => Command::Preset(single_arg(&args, "/preset <id|number>")?),
        "/history" => Command::History,
        "/show" => Command::Show(single_arg(&args, "/show <id|number>")?),
        "/new" => Command::NewSession,
        "/status" => Command::Status,
        "/collect" => parse_collect(&args)?,
        "/analyze" => parse_analyze(&args)?,
        "/analysis" => Command::Analysis,
        "/cleardb" => Command::ClearDb,
        "/logs" => Command::Logs,
        "/reload" => Command::Reload,
        "/quit" | "/exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn single_arg(args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    match args {
        [arg] => Ok(arg.to_string()),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_number(value: &str) -> Result<u32, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidNumber(value.to_string()))
}

fn parse_collect(args: &[&str]) -> Result<Command, CommandError> {
    const USAGE: &str = "/collect <target...> [--limit N]";

    let mut targets = Vec::new();
    let mut limit = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "--limit" {
            let value = iter.next().ok_or(CommandError::Usage(USAGE))?;
            limit = Some(parse_number(value)?);
        } else {
            // Allow comma separated lists as well
            targets.extend(
                arg.split(',')
                    .filter(|target| !target.is_empty())
                    .map(str::to_string),
            );
        }
    }
    Ok(Command::Collect { targets, limit })
}

fn parse_analyze(args: &[&str]) -> Result<Command, CommandError> {
    const USAGE: &str = "/analyze <topics|sentiment|style> [days] [limit]";

    let (job, rest) = args.split_first().ok_or(CommandError::Usage(USAGE))?;
    let job = AnalyzerJob::from_str(job).map_err(CommandError::InvalidJob)?;
    let (days_back, limit) = match rest {
        [] => (None, None),
        [days] => (Some(parse_number(days)?), None),
        [days, limit] => (Some(parse_number(days)?), Some(parse_number(limit)?)),
        _ => return Err(CommandError::Usage(USAGE)),
    };
    Ok(Command::Analyze {
        job,
        days_back,
        limit,
    })
}

/// Resolves a literal id or a 1-based list number against `ids`.
///
/// An exact id match wins over a list position; numbers outside the list are
/// treated as ids.
pub fn resolve_reference<'a>(reference: &'a str, ids: &'a [String]) -> &'a str {
    if ids.iter().any(|id| id == reference) {
        return reference;
    }
    reference
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| ids.get(index))
        .map(String::as_str)
        .unwrap_or(reference)
}
