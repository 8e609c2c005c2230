use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tgpost_application::{StatusPoller, WorkbenchUseCase};
use tgpost_core::backend::Backend;
use tgpost_core::config::ClientConfig;
use tgpost_core::storage::{KeyValueStore, MemoryStore};
use tgpost_infrastructure::{ConfigService, FileKeyValueStore, TgPostPaths};
use tgpost_interaction::HttpBackend;

mod command;
mod helper;
mod input;
mod repl;
mod view;

use helper::{CliHelper, SharedCompletions};
use input::InputEvent;
use repl::{Flow, Repl};

#[derive(Parser)]
#[command(name = "tgpost")]
#[command(about = "Generate posts from a Telegram message archive", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend root URL (overrides config.toml)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for session history and input history
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Model to select until the model list arrives
    #[arg(long)]
    model: Option<String>,

    /// Keep session history in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Mirror logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut paths = TgPostPaths::resolve()?;
    if let Some(data_dir) = &cli.data_dir {
        paths = paths.with_data_dir(data_dir);
    }

    let _log_guard = init_tracing(&paths.logs_dir(), cli.verbose)?;
    let config = load_config(&cli, &paths)?;
    tracing::info!("[Main] Starting tgpost (backend: {})", config.base_url);

    // ===== Wiring =====
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let store: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileKeyValueStore::new(paths.storage_dir()))
    };
    let poll_interval = Duration::from_secs(config.status_poll_secs);
    let workbench = WorkbenchUseCase::new(backend.clone(), store, config);

    let completions = SharedCompletions::default();
    let mut repl = Repl::new(workbench, completions.clone());
    repl.start().await;

    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    let poller = StatusPoller::start(backend, poll_interval, status_tx);

    let history_path = (!cli.ephemeral).then(|| paths.data_dir().join("history.txt"));
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let (prompt_tx, prompt_rx) = std::sync::mpsc::channel::<String>();
    let input_thread = input::spawn(
        CliHelper::new(completions),
        history_path,
        input_tx,
        prompt_rx,
    );
    prompt_tx
        .send(repl.prompt())
        .context("input thread exited before the first prompt")?;

    // ===== Main REPL Loop =====
    loop {
        tokio::select! {
            Some(update) = status_rx.recv() => repl.apply_status(update),
            event = input_rx.recv() => {
                let flow = match event {
                    Some(InputEvent::Line(line)) => repl.handle_line(&line).await,
                    Some(InputEvent::Interrupted) => repl.interrupt(),
                    Some(InputEvent::Eof) | None => {
                        println!("{}", "CTRL-D detected. Exiting...".bright_green());
                        Flow::Quit
                    }
                    Some(InputEvent::Failed(err)) => {
                        eprintln!("{}", format!("Error: {}", err).red());
                        Flow::Quit
                    }
                };
                if flow == Flow::Quit || prompt_tx.send(repl.prompt()).is_err() {
                    break;
                }
            }
        }
    }

    // Closing the prompt channel ends the input thread
    drop(prompt_tx);
    poller.stop().await?;
    if input_thread.join().is_err() {
        tracing::warn!("[Main] Input thread panicked");
    }
    tracing::info!("[Main] Shutdown complete");

    Ok(())
}

fn load_config(cli: &Cli, paths: &TgPostPaths) -> Result<ClientConfig> {
    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());
    let mut config = ConfigService::new(config_path).load()?;

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(model) = &cli.model {
        config.default_model = model.clone();
    }
    Ok(config)
}

/// Logs go to a daily file so the REPL output stays clean.
///
/// The returned guard flushes the file writer on drop.
fn init_tracing(logs_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create log directory '{}'", logs_dir.display()))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, "tgpost.log"));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer);
    let stderr_layer = verbose.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
