// crates/background-store-cli/src/main.rs
// ============================================================================
// Module: Background Store CLI Entry Point
// Description: Command dispatcher for inspecting a durable session store.
// Purpose: Show what a restricted background context would read at startup.
// Dependencies: clap, background-store-{core,config,sqlite}, serde, thiserror, tokio.
// ============================================================================

//! ## Overview
//! `background-store` opens the configured durable store through the hybrid
//! facade, exactly as a restricted background context would, and prints what
//! the facade reports as JSON. The durable store is never written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use background_store_config::BackgroundStoreConfig;
use background_store_core::FilterId;
use background_store_core::HybridStore;
use background_store_core::InMemoryStore;
use background_store_core::RoomAccountData;
use background_store_core::RoomId;
use background_store_core::RoomSummary;
use background_store_core::SessionIdentity;
use background_store_core::SessionStore;
use background_store_core::SessionUser;
use background_store_core::SyncCursor;
use background_store_core::UserId;
use background_store_sqlite::SqliteDurableStore;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "background-store", version, disable_help_subcommand = true)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the facade for a user and report session metadata.
    Inspect(InspectCommand),
    /// Report one room's durable records through the facade.
    Room(RoomCommand),
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
struct InspectCommand {
    /// Session user identifier.
    #[arg(long, value_name = "USER_ID")]
    user: String,
    /// Config file path (defaults to env or background-store.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `room`.
#[derive(Args, Debug)]
struct RoomCommand {
    /// Session user identifier.
    #[arg(long, value_name = "USER_ID")]
    user: String,
    /// Room identifier.
    #[arg(long, value_name = "ROOM_ID")]
    room: String,
    /// Config file path (defaults to env or background-store.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Output of `inspect`.
#[derive(Debug, Serialize)]
struct InspectReport {
    /// Session user identifier.
    user_id: UserId,
    /// Open phase label.
    phase: &'static str,
    /// Whether the facade reports itself as permanent.
    is_permanent: bool,
    /// Sync cursor the facade would resume from.
    sync_cursor: Option<SyncCursor>,
    /// Sync filter identifier.
    sync_filter_id: Option<FilterId>,
    /// Whether the session user came from the durable store.
    session_user_resolved: bool,
    /// Session user record (placeholder when unresolved).
    session_user: Option<SessionUser>,
    /// Event types present in the session account data.
    account_data_types: Vec<String>,
}

/// Output of `room`.
#[derive(Debug, Serialize)]
struct RoomReport {
    /// Room identifier.
    room_id: RoomId,
    /// Durable room summary.
    summary: Option<RoomSummary>,
    /// Durable room account data.
    account_data: Option<RoomAccountData>,
    /// Number of durable state events.
    state_event_count: usize,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a single-line message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect(command) => command_inspect(command).await,
        Commands::Room(command) => command_room(command).await,
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Opens the facade and prints the session report.
async fn command_inspect(command: InspectCommand) -> CliResult<ExitCode> {
    let store = open_facade(command.config.as_deref(), &command.user).await?;
    let user_id = UserId::new(command.user);
    let report = InspectReport {
        phase: store.phase().as_str(),
        is_permanent: store.is_permanent(),
        sync_cursor: store.sync_cursor(),
        sync_filter_id: store.sync_filter_id(),
        session_user_resolved: store.session_user().is_some(),
        session_user: store.user(&user_id),
        account_data_types: store
            .account_data()
            .map(|data| data.event_types().map(str::to_string).collect())
            .unwrap_or_default(),
        user_id,
    };
    write_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Opens the facade and prints one room's records.
async fn command_room(command: RoomCommand) -> CliResult<ExitCode> {
    let store = open_facade(command.config.as_deref(), &command.user).await?;
    let room_id = RoomId::new(command.room);
    let state = store
        .state(&room_id)
        .await
        .map_err(|err| CliError::new(format!("failed to read room state: {err}")))?;
    let (summary, account_data) = tokio::task::block_in_place(|| {
        (store.summary(&room_id), store.room_account_data(&room_id))
    });
    let report = RoomReport {
        summary,
        account_data,
        state_event_count: state.len(),
        room_id,
    };
    write_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds and opens the facade for `user` over the configured durable store.
///
/// Opening the database and loading metadata run on the blocking pool.
async fn open_facade(
    config_path: Option<&Path>,
    user: &str,
) -> CliResult<HybridStore<SqliteDurableStore>> {
    let config = BackgroundStoreConfig::load(config_path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let audit = config
        .audit
        .build_sink()
        .map_err(|err| CliError::new(format!("failed to open audit sink: {err}")))?;
    let identity = Arc::new(SessionIdentity::for_user(user));
    let store_config = config.durable.to_store_config();
    let facade_identity = Arc::clone(&identity);
    let mut store = tokio::task::spawn_blocking(move || {
        let durable = SqliteDurableStore::for_identity(store_config, &facade_identity)
            .map_err(|err| CliError::new(format!("failed to open durable store: {err}")))?;
        Ok::<_, CliError>(HybridStore::with_audit_sink(
            facade_identity,
            durable,
            InMemoryStore::new(),
            audit,
        ))
    })
    .await
    .map_err(|err| CliError::new(format!("failed to open durable store: {err}")))??;
    store
        .open(&identity)
        .await
        .map_err(|err| CliError::new(format!("failed to open session store: {err}")))?;
    Ok(store)
}

/// Writes a report as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to encode output: {err}")))?;
    write_stdout_line(&payload)
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
