//! Synchronization engine
//!
//! - [`diff`]: date range, diff against persisted dates, latest selection
//! - [`pool`]: bounded concurrent fetch + extract
//! - [`orchestrator`]: the generate / update / classification protocols

pub mod diff;
pub mod orchestrator;
pub mod pool;

pub use diff::{compute_diff, full_date_range, mark_latest, mark_latest_from};
pub use orchestrator::{
    check_classification, force_classification, Orchestrator, RunSummary, SyncOutcome,
};
pub use pool::{run_pool, TaskOutcome};
