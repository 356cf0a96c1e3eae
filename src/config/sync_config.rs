//! Sync Configuration - remote endpoint, retry policy, pool size and storage paths
//!
//! Each section implements `Default` with the values from [`super::defaults`],
//! so an absent or partial TOML file behaves exactly like the built-in setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;
use super::validation::validate_unknown_keys;

/// Environment variable pointing at a TOML config file.
pub const CONFIG_ENV: &str = "FRONTLINE_SYNC_CONFIG";

/// Environment variable overriding `remote.listing_url`.
pub const LISTING_URL_ENV: &str = "DATA_REPO_API_URL";

/// Environment variable overriding `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "FRONTLINE_DATA_DIR";

/// Config file looked up in the working directory.
const LOCAL_CONFIG_FILE: &str = "frontline_sync.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a synchronization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote listing endpoint and archive naming
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Archive fetch retry policy
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Worker pool sizing
    #[serde(default)]
    pub sync: PoolConfig,

    /// Persisted state locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Dev server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl SyncConfig {
    /// Load configuration using the standard search order, then apply
    /// environment overrides.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }

        let mut config = Self::load_file_or_default();
        config.apply_env_overrides();
        config
    }

    fn load_file_or_default() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded sync config from {}", CONFIG_ENV);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV);
            }
        }

        // 2. Check ./frontline_sync.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded sync config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for warning in validate_unknown_keys(contents) {
            warn!(field = %warning.field, "{}", warning);
        }
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DATA_REPO_API_URL` and `FRONTLINE_DATA_DIR` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(LISTING_URL_ENV) {
            if !url.trim().is_empty() {
                self.remote.listing_url = url;
            }
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.storage.data_dir = PathBuf::from(dir);
            }
        }
    }

    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.fetch.max_attempts == 0 {
            errors.push("fetch.max_attempts must be at least 1".to_string());
        }
        if self.fetch.attempt_timeout_secs == 0 {
            errors.push("fetch.attempt_timeout_secs must be at least 1".to_string());
        }
        if self.sync.workers == 0 {
            errors.push("sync.workers must be at least 1".to_string());
        }
        if self.remote.archive_extension.is_empty() {
            errors.push("remote.archive_extension must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// The listing URL is only required by the modes that talk to the remote.
    pub fn require_listing_url(&self) -> Result<&str, ConfigError> {
        let url = self.remote.listing_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation(vec![format!(
                "remote.listing_url is empty; set it in the config file or via {}",
                LISTING_URL_ENV
            )]));
        }
        Ok(url)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Remote
// ============================================================================

/// Where the archive listing lives and how archives are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// JSON directory listing endpoint. Usually provided via `DATA_REPO_API_URL`.
    #[serde(default)]
    pub listing_url: String,

    /// Entries whose path contains this extension are snapshots
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Rolling alias file excluded from the listing
    #[serde(default = "default_latest_alias")]
    pub latest_alias: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_archive_extension() -> String {
    defaults::ARCHIVE_EXTENSION.to_string()
}

fn default_latest_alias() -> String {
    defaults::LATEST_ALIAS.to_string()
}

fn default_user_agent() -> String {
    defaults::USER_AGENT.to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            listing_url: String::new(),
            archive_extension: default_archive_extension(),
            latest_alias: default_latest_alias(),
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Fetch
// ============================================================================

/// Bounded retry policy shared by the listing client and archive fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    defaults::FETCH_MAX_ATTEMPTS
}

fn default_attempt_timeout_secs() -> u64 {
    defaults::FETCH_ATTEMPT_TIMEOUT_SECS
}

fn default_retry_delay_ms() -> u64 {
    defaults::FETCH_RETRY_DELAY_MS
}

impl FetchConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

// ============================================================================
// Pool
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Concurrent fetch + extract tasks
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    defaults::SYNC_WORKERS
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Persisted state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `base.json` and one `<YYYYMMDD>.json` per date
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Path of the derived unit count report
    #[serde(default = "default_unit_count_csv")]
    pub unit_count_csv: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(defaults::DATA_DIR)
}

fn default_unit_count_csv() -> PathBuf {
    PathBuf::from(defaults::UNIT_COUNT_CSV)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            unit_count_csv: default_unit_count_csv(),
        }
    }
}

// ============================================================================
// Server Config
// ============================================================================

/// Dev server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, overridden by the positional `[host] [port]` arguments.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    format!("{}:{}", defaults::SERVER_HOST, defaults::SERVER_PORT)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
