//! # Configuration Module
//!
//! Data locations and digging defaults.
//!
//! The SQLite library lives in the platform data directory:
//! - Linux: `~/.local/share/digger/library.db`
//! - macOS: `~/Library/Application Support/digger/library.db`
//! - Windows: `%APPDATA%\digger\library.db`
//!
//! Digging defaults are read from `config.json` in the platform config
//! directory. Every field is optional; command-line flags override them.
//!
//! ```json
//! {
//!   "depth": 2,
//!   "include_genre_and_grouping": true,
//!   "limit": 50,
//!   "weights": { "genre": 0.1 }
//! }
//! ```

use crate::algorithm::RelevanceWeights;
use crate::dig::DigOptions;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "digger";

/// Returns the digger data directory, creating it if needed.
///
/// # Errors
///
/// Returns an error if the system data directory cannot be determined or
/// the `digger` subdirectory cannot be created.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let digger_dir = data_dir.join(APP_DIR);
    fs::create_dir_all(&digger_dir).with_context(|| {
        format!(
            "Failed to create data directory at {}. Please check file permissions.",
            digger_dir.display()
        )
    })?;

    Ok(digger_dir)
}

/// Returns the default SQLite library path.
///
/// # Errors
///
/// Same as [`get_data_dir`].
///
/// # Examples
///
/// ```no_run
/// use digger::config::get_db_path;
///
/// let db_path = get_db_path()?;
/// println!("Library location: {}", db_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("library.db"))
}

/// Returns the config file path. The file itself may not exist.
///
/// # Errors
///
/// Returns an error if the system config directory cannot be determined.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine system config directory."))?;
    Ok(config_dir.join(APP_DIR).join("config.json"))
}

/// Digging defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigConfig {
    pub depth: usize,
    pub include_genre_and_grouping: bool,
    pub limit: Option<usize>,
    pub weights: RelevanceWeights,
}

impl Default for DigConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            include_genre_and_grouping: false,
            limit: None,
            weights: RelevanceWeights::default(),
        }
    }
}

impl DigConfig {
    /// Load the user's config file, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = get_config_path()?;
        if path.exists() {
            Self::from_path(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    #[must_use]
    pub fn dig_options(&self) -> DigOptions {
        DigOptions {
            include_genre_and_grouping: self.include_genre_and_grouping,
            depth: self.depth,
            limit: self.limit,
        }
    }
}
