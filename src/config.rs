//! Configuration for the loan manager

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub loans_path: PathBuf,
    pub returns_path: PathBuf,
    pub users_path: PathBuf,
    pub inventory_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LibraryConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

impl LibraryConfig {
    /// Load configuration from `config/` in the working directory and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("."), &run_mode)
    }

    /// Load configuration with `base_dir/config/` as the file location
    ///
    /// Sources, lowest precedence first: built-in defaults,
    /// `config/default`, `config/{run_mode}`, then `LIBRARY__*` variables.
    pub fn load_from(base_dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config_dir = base_dir.join("config");

        let config = Config::builder()
            .set_default("data.loans_path", path_value(&defaults.data.loans_path))?
            .set_default("data.returns_path", path_value(&defaults.data.returns_path))?
            .set_default("data.users_path", path_value(&defaults.data.users_path))?
            .set_default(
                "data.inventory_path",
                path_value(&defaults.data.inventory_path),
            )?
            .set_default("logging.level", defaults.logging.level)?
            .add_source(File::from(config_dir.join("default")).required(false))
            .add_source(File::from(config_dir.join(run_mode)).required(false))
            // e.g. LIBRARY__DATA__LOANS_PATH
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            loans_path: PathBuf::from("data/emprunts.csv"),
            returns_path: PathBuf::from("data/retours.csv"),
            users_path: PathBuf::from("data/utilisateurs.csv"),
            inventory_path: PathBuf::from("data/livres.csv"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
