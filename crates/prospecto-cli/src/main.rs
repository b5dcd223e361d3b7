mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    backup, catalog, completions, import, leads, messages, pipeline, Context,
};
use crate::error::{exit_code_for, report_error};
use prospecto_config as config;
use prospecto_config::StorageBackend;
use prospecto_store::{paths, JsonStore, LeadStore, SqliteStore};

#[derive(Debug, Parser)]
#[command(name = "prospecto", version, about = "prospecto CLI")]
struct Cli {
    /// Override the database file of the selected backend
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    /// Storage backend (json or sqlite); overrides the config file
    #[arg(long, global = true)]
    backend: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "add-lead")]
    AddLead(leads::AddLeadArgs),
    #[command(name = "edit-lead")]
    EditLead(leads::EditLeadArgs),
    Show(leads::ShowArgs),
    List(leads::ListArgs),
    Delete(leads::DeleteArgs),
    Clean(leads::CleanArgs),
    Move(pipeline::MoveArgs),
    Board(pipeline::BoardArgs),
    Schedule(pipeline::ScheduleArgs),
    #[command(name = "clear-schedule")]
    ClearSchedule(pipeline::ClearScheduleArgs),
    #[command(subcommand)]
    Message(messages::MessageCommand),
    Import(import::ImportArgs),
    Backup(backup::BackupArgs),
    Sources(catalog::SourcesArgs),
    Units(catalog::UnitsArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        backend,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let app_config = config::load(config_path).with_context(|| "load config")?;
            let backend = match backend {
                Some(raw) => StorageBackend::parse(&raw).with_context(|| "parse --backend")?,
                None => app_config.storage.backend,
            };
            if verbose {
                debug!(backend = backend.as_str(), "storage backend selected");
            }

            // The one place the backend is decided; everything below sees
            // only the trait.
            let store = open_store(backend, db_path)?;

            let ctx = Context {
                store: store.as_ref(),
                json,
                config: &app_config,
                backend,
            };

            match command {
                Command::AddLead(args) => leads::add_lead(&ctx, args),
                Command::EditLead(args) => leads::edit_lead(&ctx, args),
                Command::Show(args) => leads::show_lead(&ctx, args),
                Command::List(args) => leads::list_leads(&ctx, args),
                Command::Delete(args) => leads::delete_lead(&ctx, args),
                Command::Clean(args) => leads::clean_leads(&ctx, args),
                Command::Move(args) => pipeline::move_lead(&ctx, args),
                Command::Board(args) => pipeline::board(&ctx, args),
                Command::Schedule(args) => pipeline::schedule_lead(&ctx, args),
                Command::ClearSchedule(args) => pipeline::clear_schedule(&ctx, args),
                Command::Message(cmd) => match cmd {
                    messages::MessageCommand::Log(args) => messages::log_message(&ctx, args),
                    messages::MessageCommand::Send(args) => messages::send_message(&ctx, args),
                    messages::MessageCommand::MarkRead(args) => messages::mark_read(&ctx, args),
                },
                Command::Import(args) => import::import(&ctx, args),
                Command::Backup(args) => backup::backup(&ctx, args),
                Command::Sources(args) => catalog::list_sources(&ctx, args),
                Command::Units(args) => catalog::list_units(&ctx, args),
                Command::Completions(_) => {
                    unreachable!("completions command handled before store initialization")
                }
            }
        }
    }
}

fn open_store(backend: StorageBackend, db_path: Option<PathBuf>) -> Result<Box<dyn LeadStore>> {
    match backend {
        StorageBackend::Json => {
            let path = match db_path {
                Some(path) => path,
                None => paths::json_db_path().with_context(|| "resolve json store path")?,
            };
            let store = JsonStore::open(path).with_context(|| "open json store")?;
            Ok(Box::new(store))
        }
        StorageBackend::Sqlite => {
            let path = match db_path {
                Some(path) => path,
                None => paths::sqlite_db_path().with_context(|| "resolve sqlite store path")?,
            };
            let store = SqliteStore::open(&path)
                .with_context(|| format!("open database {}", path.display()))?;
            store.migrate().with_context(|| "run migrations")?;
            Ok(Box::new(store))
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
