//! Local persisted state
//!
//! - [`StateDir`]: day files, `base.json` and the unit count report
//! - [`ProcessLock`]: keeps concurrent runs off the same directory

pub mod lockfile;
pub mod state_dir;

pub use lockfile::ProcessLock;
pub use state_dir::{write_atomic, write_unit_count_csv, StateDir};
