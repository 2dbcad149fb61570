//! Standard paths used by pomo

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that relocates both data and config under one root
pub const HOME_ENV: &str = "POMO_HOME";

/// Standard pomo paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Data directory (~/.local/share/pomo)
    pub data: PathBuf,
    /// Config directory (~/.config/pomo)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        if let Some(root) = std::env::var_os(HOME_ENV) {
            return Self::with_root(Path::new(&root));
        }

        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("pomo");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pomo");

        Self { data, config }
    }

    /// Keep data and config side by side under a single directory
    pub fn with_root(root: &Path) -> Self {
        Self {
            data: root.to_path_buf(),
            config: root.to_path_buf(),
        }
    }

    /// Create the data and config directories if missing
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.data, &self.config] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Mode definitions (name -> timing profile)
    pub fn modes_file(&self) -> PathBuf {
        self.data.join("modes.json")
    }

    /// Completed work intervals per day
    pub fn stats_file(&self) -> PathBuf {
        self.data.join("stats.json")
    }

    /// User configuration
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }
}
