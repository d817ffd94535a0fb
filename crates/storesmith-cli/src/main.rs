mod logging;
mod run;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use storesmith_core::ecommerce_keys;
use storesmith_export::{ExportEngine, ExportError, ExportOptions};
use storesmith_generate::{GenerateOptions, GenerationEngine, GenerationError};
use storesmith_load::{LoadEngine, LoadError, LoadOptions, LoadOutcome, open_read_only, read_csv_dir};
use storesmith_verify::{VerificationEngine, VerifyError, render_report};

use run::{RunConfig, RunPaths, start_run, write_json};
use settings::Settings;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("verify error: {0}")]
    Verify(#[from] VerifyError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings error: {0}")]
    SettingsParse(#[from] toml::de::Error),
    #[error("settings error: {0}")]
    SettingsEncode(#[from] toml::ser::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("verification failed")]
    VerificationFailed,
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Load(LoadError::Configuration(_)) => 2,
            CliError::Generation(GenerationError::InvalidOptions(_)) => 2,
            CliError::SettingsParse(_) | CliError::SettingsEncode(_) => 2,
            CliError::VerificationFailed => 3,
            _ => 1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "storesmith", version, about = "Synthetic e-commerce dataset pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full pipeline: generate, load, verify, export.
    Run(RunArgs),
    /// Generate the CSV dataset only.
    Generate(GenerateArgs),
    /// Load and verify an existing data directory.
    Load(LoadArgs),
    /// Export from an existing store.
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Settings file, created with defaults on first use.
    #[arg(long, default_value = "storesmith.toml")]
    config: PathBuf,
    /// Root directory for run artifacts.
    #[arg(long)]
    runs_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct RowArgs {
    /// Run seed override.
    #[arg(long)]
    seed: Option<u64>,
    /// Pinned customer row count.
    #[arg(long)]
    customers: Option<u64>,
    /// Pinned product row count.
    #[arg(long)]
    products: Option<u64>,
    /// Pinned order row count.
    #[arg(long)]
    orders: Option<u64>,
    /// Pinned order item row count.
    #[arg(long)]
    order_items: Option<u64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    rows: RowArgs,
    /// Directory for the generated CSV tables.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Path of the SQLite store.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Path of the flattened CSV export.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Reuse existing CSV files instead of generating.
    #[arg(long, default_value_t = false)]
    skip_generate: bool,
    /// Skip post-load verification.
    #[arg(long, default_value_t = false)]
    skip_verify: bool,
    /// Stop after load and verify.
    #[arg(long, default_value_t = false)]
    skip_export: bool,
    /// Export even when the load recorded violations.
    #[arg(long, default_value_t = false)]
    accept_partial: bool,
    /// Treat a failed verification as a hard failure.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    rows: RowArgs,
    /// Directory for the generated CSV tables.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Directory holding the CSV tables.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Path of the SQLite store.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Treat a failed verification as a hard failure.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Path of the SQLite store.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Path of the flattened CSV export.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run_pipeline(args),
        Command::Generate(args) => run_generate(args),
        Command::Load(args) => run_load(args),
        Command::Export(args) => run_export(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run_pipeline(args: RunArgs) -> Result<(), CliError> {
    let settings = settings::load_or_create(&args.common.config)?;
    let seed = args.rows.seed.unwrap_or(settings.seed);
    let data_dir = args.data_dir.unwrap_or_else(|| settings.data_dir.clone());
    let store_path = args.store.unwrap_or_else(|| settings.store_path.clone());
    let out_path = args.out.unwrap_or_else(|| settings.out_path.clone());
    let runs_dir = args
        .common
        .runs_dir
        .unwrap_or_else(|| settings.runs_dir.clone());

    let started_at = chrono::Utc::now();
    let config = RunConfig {
        run_id: Uuid::new_v4().to_string(),
        started_at: started_at.to_rfc3339(),
        command: "run".to_string(),
        seed,
        data_dir: data_dir.clone(),
        store_path: store_path.clone(),
        out_path: out_path.clone(),
        skip_generate: args.skip_generate,
        skip_verify: args.skip_verify,
        skip_export: args.skip_export,
        accept_partial: args.accept_partial,
        strict: args.strict,
    };
    let paths = start_run(&runs_dir, started_at, &config)?;
    logging::init_run_logging(&paths.log_path)?;

    let timer = Instant::now();
    info!(run_id = %config.run_id, seed, "pipeline started");

    if args.skip_generate {
        info!(data_dir = %data_dir.display(), "generation skipped, using existing files");
    } else {
        stage_generate(&args.rows, seed, &data_dir, &paths)?;
    }

    let outcome = stage_load(&data_dir, &store_path, &paths)?;

    if args.skip_verify {
        info!("verification skipped");
    } else {
        stage_verify(&store_path, &outcome, &paths, args.strict)?;
    }

    if args.skip_export {
        info!("export skipped");
    } else {
        let conn = open_read_only(&store_path, &outcome.report, args.accept_partial)?;
        stage_export(&conn, &out_path, &paths)?;
    }

    info!(
        duration_ms = timer.elapsed().as_millis() as u64,
        "pipeline completed"
    );
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let settings = settings::load_or_create(&args.common.config)?;
    let seed = args.rows.seed.unwrap_or(settings.seed);
    let data_dir = args.data_dir.unwrap_or_else(|| settings.data_dir.clone());
    let runs_dir = args
        .common
        .runs_dir
        .unwrap_or_else(|| settings.runs_dir.clone());

    let started_at = chrono::Utc::now();
    let config = RunConfig {
        run_id: Uuid::new_v4().to_string(),
        started_at: started_at.to_rfc3339(),
        command: "generate".to_string(),
        seed,
        data_dir: data_dir.clone(),
        store_path: settings.store_path.clone(),
        out_path: settings.out_path.clone(),
        skip_generate: false,
        skip_verify: true,
        skip_export: true,
        accept_partial: false,
        strict: false,
    };
    let paths = start_run(&runs_dir, started_at, &config)?;
    logging::init_run_logging(&paths.log_path)?;

    stage_generate(&args.rows, seed, &data_dir, &paths)?;
    Ok(())
}

fn run_load(args: LoadArgs) -> Result<(), CliError> {
    let settings = settings::load_or_create(&args.common.config)?;
    let data_dir = args.data_dir.unwrap_or_else(|| settings.data_dir.clone());
    let store_path = args.store.unwrap_or_else(|| settings.store_path.clone());
    let runs_dir = args
        .common
        .runs_dir
        .unwrap_or_else(|| settings.runs_dir.clone());

    let started_at = chrono::Utc::now();
    let config = RunConfig {
        run_id: Uuid::new_v4().to_string(),
        started_at: started_at.to_rfc3339(),
        command: "load".to_string(),
        seed: settings.seed,
        data_dir: data_dir.clone(),
        store_path: store_path.clone(),
        out_path: settings.out_path.clone(),
        skip_generate: true,
        skip_verify: false,
        skip_export: true,
        accept_partial: false,
        strict: args.strict,
    };
    let paths = start_run(&runs_dir, started_at, &config)?;
    logging::init_run_logging(&paths.log_path)?;

    let outcome = stage_load(&data_dir, &store_path, &paths)?;
    stage_verify(&store_path, &outcome, &paths, args.strict)?;
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), CliError> {
    let settings = settings::load_or_create(&args.common.config)?;
    let store_path = args.store.unwrap_or_else(|| settings.store_path.clone());
    let out_path = args.out.unwrap_or_else(|| settings.out_path.clone());
    let runs_dir = args
        .common
        .runs_dir
        .unwrap_or_else(|| settings.runs_dir.clone());

    let started_at = chrono::Utc::now();
    let config = RunConfig {
        run_id: Uuid::new_v4().to_string(),
        started_at: started_at.to_rfc3339(),
        command: "export".to_string(),
        seed: settings.seed,
        data_dir: settings.data_dir.clone(),
        store_path: store_path.clone(),
        out_path: out_path.clone(),
        skip_generate: true,
        skip_verify: true,
        skip_export: false,
        accept_partial: true,
        strict: false,
    };
    let paths = start_run(&runs_dir, started_at, &config)?;
    logging::init_run_logging(&paths.log_path)?;

    // Standalone export trusts an existing store; the violation gate only
    // applies inside a full run where the load report is at hand.
    let conn = Connection::open_with_flags(&store_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    stage_export(&conn, &out_path, &paths)?;
    Ok(())
}

fn stage_generate(
    rows: &RowArgs,
    seed: u64,
    data_dir: &PathBuf,
    paths: &RunPaths,
) -> Result<(), CliError> {
    let engine = GenerationEngine::new(GenerateOptions {
        data_dir: data_dir.clone(),
        seed,
        customers: rows.customers,
        products: rows.products,
        orders: rows.orders,
        order_items: rows.order_items,
    });
    let result = engine.run()?;
    write_json(&paths.root.join("generation_report.json"), &result.report)?;
    Ok(())
}

fn stage_load(
    data_dir: &PathBuf,
    store_path: &PathBuf,
    paths: &RunPaths,
) -> Result<LoadOutcome, CliError> {
    let sources = read_csv_dir(data_dir)?;
    let engine = LoadEngine::new(LoadOptions {
        store_path: store_path.clone(),
        report_dir: Some(paths.root.clone()),
    });
    let outcome = engine.run(&sources, &ecommerce_keys())?;
    Ok(outcome)
}

fn stage_verify(
    store_path: &PathBuf,
    outcome: &LoadOutcome,
    paths: &RunPaths,
    strict: bool,
) -> Result<(), CliError> {
    // Verification inspects whatever was committed, partial or not.
    let conn = open_read_only(store_path, &outcome.report, true)?;
    let report = VerificationEngine::new().run(&conn, &outcome.tables, &outcome.report)?;

    write_json(&paths.root.join("verify_report.json"), &report)?;
    std::fs::write(paths.root.join("verify_report.md"), render_report(&report))?;

    if !report.passed && strict {
        return Err(CliError::VerificationFailed);
    }
    Ok(())
}

fn stage_export(
    conn: &Connection,
    out_path: &PathBuf,
    paths: &RunPaths,
) -> Result<(), CliError> {
    let engine = ExportEngine::new(ExportOptions {
        out_path: out_path.clone(),
    });
    let report = engine.run(conn)?;
    write_json(&paths.root.join("export_report.json"), &report)?;
    Ok(())
}
