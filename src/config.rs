use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::progress::FingerprintScope;

/// Address the server listens on when nothing else is configured
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Server the CLI talks to when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

const DATABASE_FILE: &str = "deckwise.db";

/// Shape of the log lines written by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-line events
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Configuration for the Deckwise server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    pub log_format: LogFormat,
    /// Directory for a daily rolling log file; stdout only when unset
    pub log_dir: Option<PathBuf>,
    /// How progress recorded under another deck fingerprint is treated
    pub fingerprint_scope: FingerprintScope,
    /// Server URL used by the CLI client
    pub server_url: Option<String>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub bind_address: Option<String>,
    #[serde(default)]
    pub log_format: Option<LogFormat>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub fingerprint_scope: Option<FingerprintScope>,
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "deckwise", about = "Spaced repetition progress server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to listen on, e.g. 0.0.0.0:3000
    #[clap(long, env = "DECKWISE_BIND")]
    pub bind_address: Option<String>,

    /// Log output format
    #[clap(long, value_enum, env = "DECKWISE_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Directory for rolling log files
    #[clap(long, env = "DECKWISE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// `strict` ignores progress from other deck fingerprints, `card` reuses it
    #[clap(long, env = "DECKWISE_FINGERPRINT_SCOPE")]
    pub fingerprint_scope: Option<FingerprintScope>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
            log_format: update.log_format.unwrap_or(self.log_format),
            log_dir: update.log_dir.or(self.log_dir),
            fingerprint_scope: update.fingerprint_scope.unwrap_or(self.fingerprint_scope),
            server_url: update.server_url.or(self.server_url),
        }
    }
}

/// Returns the base (default) configuration
///
/// The database lives in the config directory when there is one.
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or(DATABASE_FILE.to_string(), |path| {
        path.join(DATABASE_FILE).to_string_lossy().to_string()
    });

    Config {
        database_url,
        bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        log_format: LogFormat::default(),
        log_dir: None,
        fingerprint_scope: FingerprintScope::default(),
        server_url: None,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or file yields an empty update.
///
/// ### Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    let update = toml::from_str::<ConfigUpdate>(&content)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

    info!("Loaded configuration from {:?}", config_path);
    Ok(update)
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        bind_address: args.bind_address,
        log_format: args.log_format,
        log_dir: args.log_dir,
        fingerprint_scope: args.fingerprint_scope,
        server_url: None,
    }
}

/// Platform config directory, if one can be determined
pub fn get_config_dir_path() -> Option<PathBuf> {
    match ProjectDirs::from("com", "deckwise", "deckwise") {
        Some(proj_dirs) => Some(proj_dirs.config_dir().to_path_buf()),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    get_config_in(get_config_dir_path(), args)
}

/// Same as [`get_config`], reading `config.toml` from `config_dir`
pub fn get_config_in(config_dir: Option<PathBuf>, args: CliArgs) -> Config {
    let config_path = config_dir.filter(|path| {
        let exists = path.exists();
        if !exists {
            info!("Config path not found at {:?}, using defaults", path);
        }
        exists
    });

    let file_update = match config_from_file(config_path.as_ref().map(|dir| dir.join("config.toml"))) {
        Ok(update) => update,
        Err(e) => {
            warn!("Ignoring config file: {:#}", e);
            ConfigUpdate::default()
        }
    };

    let config = base_config(config_path)
        .apply_update(file_update)
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, bind_address={}, fingerprint_scope={:?}",
        config.database_url, config.bind_address, config.fingerprint_scope
    );

    config
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod prop_tests;
