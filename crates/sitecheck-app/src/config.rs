//! Configuration management for sitecheck
//!
//! Config stored at: ~/.config/sitecheck/config.json

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sitecheck_infra::persistence::DEFAULT_INSPECTIONS_KEY;
use sitecheck_infra::photo::{CompressOptions, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use sitecheck_types::{ConfigError, OutputFormat, Result};

const APP_DIR: &str = "sitecheck";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Key holding the inspection collection
    #[serde(default = "default_store_key")]
    pub store_key: String,

    /// Client roster TOML (built-in demo roster when unset)
    #[serde(default)]
    pub roster_path: Option<PathBuf>,

    /// Shared manager password
    #[serde(default = "default_manager_password")]
    pub manager_password: String,

    /// Photos wider than this are scaled down
    #[serde(default = "default_max_photo_width")]
    pub max_photo_width: u32,

    /// JPEG fidelity for stored photos, (0, 1]
    #[serde(default = "default_photo_quality")]
    pub photo_quality: f32,

    /// Parallel photo compression jobs (0 = CPU count)
    #[serde(default)]
    pub photo_jobs: usize,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_store_key() -> String {
    DEFAULT_INSPECTIONS_KEY.to_string()
}

fn default_manager_password() -> String {
    "bcs2026".to_string()
}

fn default_max_photo_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_photo_quality() -> f32 {
    DEFAULT_QUALITY
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            store_key: default_store_key(),
            roster_path: None,
            manager_password: default_manager_password(),
            max_photo_width: default_max_photo_width(),
            photo_quality: default_photo_quality(),
            photo_jobs: 0,
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the store directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(store_dir)
    }

    /// Photo compression settings
    pub fn compress_options(&self) -> CompressOptions {
        CompressOptions::new(self.max_photo_width, self.photo_quality)
    }

    /// Load config from the default location, or use defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or use defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sitecheck Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Store dir:        {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Store key:        {}", self.store_key)?;
        writeln!(
            f,
            "Client roster:    {}",
            self.roster_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in demo roster)".to_string())
        )?;
        writeln!(f, "Max photo width:  {} px", self.max_photo_width)?;
        writeln!(f, "Photo quality:    {:.2}", self.photo_quality)?;
        writeln!(
            f,
            "Photo jobs:       {}",
            if self.photo_jobs == 0 {
                "auto".to_string()
            } else {
                self.photo_jobs.to_string()
            }
        )?;
        writeln!(f, "Output format:    {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}
