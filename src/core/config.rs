use crate::core::extract::{DEFAULT_PLACEHOLDER, ExtractOptions};
use crate::core::table::Fields;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_SOURCE: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputsConfig {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        OutputsConfig {
            csv_path: PathBuf::from("./Largest_banks_data.csv"),
            db_path: PathBuf::from("Banks.db"),
            table_name: "Largest_banks".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// URL or local path of the page to scrape.
    pub source: String,
    pub fields: Fields,
    pub placeholder: String,
    pub rates_path: PathBuf,
    pub outputs: OutputsConfig,
    pub log_path: PathBuf,
    /// Currency whose converted column is averaged after the load.
    pub query_currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source: DEFAULT_SOURCE.to_string(),
            fields: Fields::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            rates_path: PathBuf::from("exchange_rate.csv"),
            outputs: OutputsConfig::default(),
            log_path: PathBuf::from("./etl_project_log.txt"),
            query_currency: "GBP".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when it is absent.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "bankcap", "bankcap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            fields: self.fields.clone(),
            placeholder: self.placeholder.clone(),
        }
    }

    /// Column averaged by the second canned query.
    pub fn query_column(&self) -> String {
        self.fields.converted(&self.query_currency)
    }
}
