use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::CliError;

/// Resolved options for one pipeline run, written as `config.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub command: String,
    pub seed: u64,
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
    pub out_path: PathBuf,
    pub skip_generate: bool,
    pub skip_verify: bool,
    pub skip_export: bool,
    pub accept_partial: bool,
    pub strict: bool,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub log_path: PathBuf,
}

/// Create the timestamped run directory and write the resolved config.
pub fn start_run(
    runs_dir: &Path,
    started_at: DateTime<Utc>,
    config: &RunConfig,
) -> Result<RunPaths, CliError> {
    let timestamp = started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = runs_dir.join(format!("{timestamp}__run_{}", config.run_id));
    create_dir_all(&root)?;

    write_json(&root.join("config.json"), config)?;

    let log_path = root.join("run.log");
    OpenOptions::new().create(true).append(true).open(&log_path)?;

    Ok(RunPaths { root, log_path })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    std::fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}
