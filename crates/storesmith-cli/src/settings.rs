use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CliError;

/// Persistent defaults for the pipeline, kept in `storesmith.toml`.
///
/// Created with defaults on first use; CLI flags override file values and
/// are never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub seed: u64,
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
    pub out_path: PathBuf,
    pub runs_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 42,
            data_dir: PathBuf::from("data"),
            store_path: PathBuf::from("ecommerce.db"),
            out_path: PathBuf::from("output.csv"),
            runs_dir: PathBuf::from("runs"),
        }
    }
}

pub fn load_or_create(path: &Path) -> Result<Settings, CliError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = Settings::default();
    save(path, &settings)?;
    Ok(settings)
}

pub fn save(path: &Path, settings: &Settings) -> Result<(), CliError> {
    let encoded = toml::to_string_pretty(settings)?;
    std::fs::write(path, encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_creates_defaults_on_first_use() {
        let mut path = std::env::temp_dir();
        path.push(format!("storesmith_settings_{}.toml", uuid::Uuid::new_v4()));

        let settings = load_or_create(&path).expect("create settings");
        assert_eq!(settings.seed, 42);
        assert!(path.exists());

        let reloaded = load_or_create(&path).expect("reload settings");
        assert_eq!(reloaded.store_path, PathBuf::from("ecommerce.db"));

        let _ = std::fs::remove_file(&path);
    }
}
