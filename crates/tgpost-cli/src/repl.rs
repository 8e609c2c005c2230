//! Command dispatch and terminal output.

use crate::command::{self, COMMANDS, Command};
use crate::helper::{Completions, SharedCompletions};
use crate::view;
use colored::Colorize;
use tgpost_application::{GenerateOutcome, StatusUpdate, WorkbenchUseCase};
use tgpost_core::activity::{LogBuffer, LogEntry, Severity};
use tgpost_core::backend::AnalyzerJob;
use tgpost_core::catalog::Catalog;
use tgpost_core::preset::{PromptPreset, find_preset, get_default_presets};

const CLEAR_DB_PROMPT: &str = "Delete ALL archived messages? This cannot be undone. [y/N] ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive front end over a [`WorkbenchUseCase`].
pub struct Repl {
    workbench: WorkbenchUseCase,
    completions: SharedCompletions,
    presets: Vec<PromptPreset>,
    confirming_clear: bool,
}

impl Repl {
    pub fn new(workbench: WorkbenchUseCase, completions: SharedCompletions) -> Self {
        Self {
            workbench,
            completions,
            presets: get_default_presets(),
            confirming_clear: false,
        }
    }

    /// Loads catalogs and prints the banner.
    pub async fn start(&mut self) {
        self.workbench.initialize().await;
        self.refresh_completions();

        println!("{}", "=== tgpost ===".bright_magenta().bold());
        println!(
            "{}",
            format!("Backend: {}", self.workbench.config().base_url).bright_black()
        );
        println!("{}", view::status_line(self.workbench.db_status()).bright_black());
        if let Catalog::Failed(reason) = self.workbench.channels() {
            println!("{}", reason.red());
        }
        if let Catalog::Failed(reason) = self.workbench.models() {
            println!("{}", reason.red());
        }
        println!(
            "{}",
            "Type a prompt to generate a post, '/help' for commands, or 'quit' to exit."
                .bright_black()
        );
        println!();
    }

    pub fn prompt(&self) -> String {
        if self.confirming_clear {
            return CLEAR_DB_PROMPT.to_string();
        }
        format!(
            "[{} | {}] >> ",
            self.workbench.channel_summary(),
            self.workbench.model_label()
        )
    }

    /// Applies a poller delivery. Nothing is printed so the prompt stays intact.
    pub fn apply_status(&mut self, update: StatusUpdate) {
        self.workbench.apply_db_status(update);
    }

    /// Ctrl-C: cancels a pending confirmation, otherwise just hints.
    pub fn interrupt(&mut self) -> Flow {
        if self.confirming_clear {
            self.confirming_clear = false;
            println!("{}", "Cancelled.".yellow());
        } else {
            println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
        }
        Flow::Continue
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        if self.confirming_clear {
            self.confirming_clear = false;
            let answer = line.trim().to_ascii_lowercase();
            if answer == "y" || answer == "yes" {
                self.clear_db().await;
            } else {
                println!("{}", "Cancelled.".yellow());
            }
            return Flow::Continue;
        }

        match command::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Flow::Continue,
            Err(err) => {
                println!("{}", err.to_string().red());
                Flow::Continue
            }
        }
    }

    async fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => {
                println!("{}", "Goodbye!".bright_green());
                return Flow::Quit;
            }
            Command::Help => print_help(),
            Command::Channels => {
                println!("{}", self.workbench.channel_summary().bold());
                print_plain(view::channel_lines(
                    self.workbench.channels(),
                    self.workbench.selection(),
                ));
            }
            Command::Toggle(reference) => {
                let ids: Vec<String> = self
                    .workbench
                    .channels()
                    .items()
                    .iter()
                    .map(|channel| channel.sender_id.clone())
                    .collect();
                let channel_id = command::resolve_reference(&reference, &ids).to_string();
                // Detached; the sync is best effort
                drop(self.workbench.toggle_channel(&channel_id));
                println!(
                    "{}",
                    format!("Channels: {}", self.workbench.channel_summary()).green()
                );
            }
            Command::AllChannels => {
                drop(self.workbench.clear_channels());
                println!(
                    "{}",
                    format!("Channels: {}", self.workbench.channel_summary()).green()
                );
            }
            Command::Models => print_plain(view::model_lines(
                self.workbench.models(),
                self.workbench.selection().model_id(),
            )),
            Command::Model(reference) => self.select_model(&reference),
            Command::Presets => print_plain(view::preset_lines(&self.presets)),
            Command::Preset(reference) => {
                let ids: Vec<String> = self.presets.iter().map(|p| p.id.clone()).collect();
                match find_preset(command::resolve_reference(&reference, &ids)) {
                    Some(preset) => {
                        println!("{}", format!("> {}", preset.label).green());
                        self.generate(&preset.template).await;
                    }
                    None => println!("{}", format!("Unknown preset: {}", reference).red()),
                }
            }
            Command::History => print_plain(view::history_lines(
                self.workbench.history(),
                self.workbench.active_result_id(),
            )),
            Command::Show(reference) => {
                let ids: Vec<String> = self
                    .workbench
                    .history()
                    .iter()
                    .map(|result| result.id.clone())
                    .collect();
                let result_id = command::resolve_reference(&reference, &ids).to_string();
                match self.workbench.select_result(&result_id) {
                    Ok(()) => self.print_results(),
                    Err(err) => println!("{}", err.to_string().red()),
                }
            }
            Command::NewSession => match self.workbench.new_session() {
                Ok(()) => {
                    println!("{}", "New session started.".green());
                    println!("{}", self.workbench.results().header().bright_black());
                }
                Err(err) => println!("{}", format!("Failed to save session: {}", err).red()),
            },
            Command::Status => {
                self.workbench.refresh_db_status().await;
                println!("{}", view::status_line(self.workbench.db_status()));
            }
            Command::Collect { targets, limit } => {
                let previous = latest_id(self.workbench.ops_log());
                println!("{}", "Collecting...".bright_black());
                self.workbench.run_collector(&targets, limit).await;
                self.print_new_entries(previous, LogKind::Ops);
                self.refresh_completions();
            }
            Command::Analyze {
                job,
                days_back,
                limit,
            } => self.analyze(job, days_back, limit).await,
            Command::Analysis => match self.workbench.last_analysis() {
                Some((job, report)) => print_plain(view::analysis_lines(*job, report)),
                None => println!("{}", "No analyzer run yet".bright_black()),
            },
            Command::ClearDb => {
                self.confirming_clear = true;
            }
            Command::Logs => {
                println!("{}", "Run log".bold());
                print_log(self.workbench.run_log());
                println!("{}", "Ops log".bold());
                print_log(self.workbench.ops_log());
            }
            Command::Reload => {
                self.workbench.reload_channels().await;
                self.workbench.reload_models().await;
                self.refresh_completions();
                println!(
                    "{}",
                    format!(
                        "{} channels, {} models",
                        self.workbench.channels().items().len(),
                        self.workbench.models().items().len()
                    )
                    .green()
                );
            }
            Command::Prompt(prompt) => self.generate(&prompt).await,
        }
        Flow::Continue
    }

    fn select_model(&mut self, reference: &str) {
        let ids: Vec<String> = self
            .workbench
            .models()
            .items()
            .iter()
            .map(|model| model.id.clone())
            .collect();
        let model_id = command::resolve_reference(reference, &ids).to_string();
        if self.workbench.models().find_model(&model_id).is_none() {
            println!(
                "{}",
                format!("Model '{}' is not in the model list; using it anyway.", model_id)
                    .yellow()
            );
        }
        self.workbench.select_model(model_id);
        println!(
            "{}",
            format!("Model: {}", self.workbench.model_label()).green()
        );
    }

    async fn generate(&mut self, prompt: &str) {
        let previous = latest_id(self.workbench.run_log());
        println!(
            "{}",
            format!("Generating with {}...", self.workbench.model_label()).bright_black()
        );

        match self.workbench.generate(prompt).await {
            GenerateOutcome::Completed(_) => {
                self.print_results();
                self.print_new_entries(previous, LogKind::Run);
                self.refresh_completions();
            }
            GenerateOutcome::Failed(reason) => println!("{}", reason.red()),
            GenerateOutcome::Skipped => {
                println!("{}", "Nothing to send.".bright_black());
            }
        }
    }

    async fn analyze(&mut self, job: AnalyzerJob, days_back: Option<u32>, limit: Option<u32>) {
        let previous = latest_id(self.workbench.ops_log());
        println!("{}", format!("Running analyzer '{}'...", job).bright_black());
        let report = self.workbench.run_analyzer(job, days_back, limit).await;
        self.print_new_entries(previous, LogKind::Ops);
        if let Some(report) = report {
            print_plain(view::analysis_lines(job, &report));
        }
    }

    async fn clear_db(&mut self) {
        let previous = latest_id(self.workbench.ops_log());
        self.workbench.clear_db().await;
        self.print_new_entries(previous, LogKind::Ops);
        println!("{}", view::status_line(self.workbench.db_status()));
    }

    fn print_results(&self) {
        let lines = view::result_lines(self.workbench.results());
        let mut lines = lines.into_iter();
        if let Some(header) = lines.next() {
            println!("{}", header.bold());
        }
        for line in lines {
            if line.starts_with("-- ") {
                println!("{}", line.bright_black());
            } else if line.starts_with("> ") {
                println!("{}", line.green());
            } else {
                println!("{}", line.bright_blue());
            }
        }
        println!();
    }

    fn print_new_entries(&self, previous: Option<String>, kind: LogKind) {
        let log = match kind {
            LogKind::Run => self.workbench.run_log(),
            LogKind::Ops => self.workbench.ops_log(),
        };
        // Info entries were already echoed when the action started
        for entry in view::entries_since(log, previous.as_deref())
            .into_iter()
            .filter(|entry| entry.severity != Severity::Info)
        {
            print_entry(entry);
        }
    }

    fn refresh_completions(&self) {
        let completions = Completions {
            channels: self
                .workbench
                .channels()
                .items()
                .iter()
                .map(|channel| channel.sender_id.clone())
                .collect(),
            models: self
                .workbench
                .models()
                .items()
                .iter()
                .map(|model| model.id.clone())
                .collect(),
            presets: self.presets.iter().map(|preset| preset.id.clone()).collect(),
            results: self
                .workbench
                .history()
                .iter()
                .map(|result| result.id.clone())
                .collect(),
        };
        match self.completions.write() {
            Ok(mut shared) => *shared = completions,
            Err(err) => tracing::warn!("[Repl] Completion state poisoned: {}", err),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LogKind {
    Run,
    Ops,
}

fn latest_id(log: &LogBuffer) -> Option<String> {
    log.latest().map(|entry| entry.id.clone())
}

fn print_help() {
    println!("{}", "Commands".bold());
    for (name, description) in COMMANDS {
        println!("  {} {}", format!("{:<10}", name).bright_cyan(), description);
    }
    println!("  {} Exit (also 'exit' or Ctrl-D)", format!("{:<10}", "quit").bright_cyan());
    println!("Anything else is sent as a generation prompt.");
}

fn print_plain(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_log(log: &LogBuffer) {
    let Some(lines) = view::log_lines(log) else {
        println!("  {}", view::EMPTY_LOG.bright_black());
        return;
    };
    for (entry, line) in lines {
        print!("  ");
        print_line(entry.severity, line);
    }
}

fn print_entry(entry: &LogEntry) {
    print_line(entry.severity, view::log_line(entry));
}

fn print_line(severity: Severity, line: String) {
    match severity {
        Severity::Info => println!("{}", line.bright_black()),
        Severity::Success => println!("{}", line.green()),
        Severity::Error => println!("{}", line.red()),
    }
}
