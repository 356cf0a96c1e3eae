//! Sync Configuration Module
//!
//! Provides the run configuration loaded from TOML files, with environment
//! overrides for the values that differ between deployments.
//!
//! ## Loading Order
//!
//! 1. `FRONTLINE_SYNC_CONFIG` environment variable (path to TOML file)
//! 2. `frontline_sync.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! Unknown keys in the file are logged with a suggested correction.
//! After the file is resolved, `DATA_REPO_API_URL` and `FRONTLINE_DATA_DIR`
//! override the listing URL and data directory. A `.env` file is read first.
//!
//! ## Usage
//!
//! ```ignore
//! let config = SyncConfig::load();
//! let orchestrator = Orchestrator::from_config(&config)?;
//! ```

mod sync_config;
pub mod defaults;
pub mod validation;

pub use sync_config::*;
