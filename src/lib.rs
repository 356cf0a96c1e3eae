//! Frontline Sync: day-by-day timeline builder for published map archives
//!
//! Incrementally synchronizes a local directory of per-day JSON records with
//! a remote listing of dated KMZ snapshots.
//!
//! ## Architecture
//!
//! - **Source**: remote listing + archive fetch with bounded retries
//! - **Extract**: KMZ -> KML feature tree -> per-snapshot fact layers
//! - **Registry**: stable unit identities across snapshots and runs
//! - **Timeline**: per-date records with idempotent merge
//! - **Sync**: diff, bounded worker pool, single-threaded merge, persistence

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod kml;
pub mod registry;
pub mod server;
pub mod source;
pub mod storage;
pub mod sync;
pub mod timeline;
pub mod types;

pub use config::SyncConfig;
pub use error::{ExtractError, SyncError};
pub use registry::UnitRegistry;
pub use source::{ArchiveSource, HttpArchiveSource, MemorySource};
pub use storage::{ProcessLock, StateDir};
pub use sync::{Orchestrator, RunSummary, SyncOutcome};
pub use timeline::TimelineStore;
pub use types::{BaseState, DateKey, DayFacts, PerSide, Side, SnapshotDescriptor};
