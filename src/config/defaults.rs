//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Remote Listing
// ============================================================================

/// File extension identifying snapshot archives in the remote listing.
pub const ARCHIVE_EXTENSION: &str = ".kmz";

/// Rolling alias published next to the dated archives. Never date-addressable.
pub const LATEST_ALIAS: &str = "latest.kmz";

/// Format of the leading date token in archive names (`240107_...kmz`).
pub const ARCHIVE_DATE_FORMAT: &str = "%y%m%d";

/// User agent sent with listing and archive requests.
pub const USER_AGENT: &str = concat!("frontline-sync/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Archive Fetcher
// ============================================================================

/// Attempts per request before giving up.
pub const FETCH_MAX_ATTEMPTS: u32 = 5;

/// Per-attempt timeout (seconds).
pub const FETCH_ATTEMPT_TIMEOUT_SECS: u64 = 20;

/// Pause between failed attempts (milliseconds). 0 = retry immediately.
pub const FETCH_RETRY_DELAY_MS: u64 = 0;

// ============================================================================
// Snapshot Extraction
// ============================================================================

/// The single document member read from every archive.
pub const DOCUMENT_MEMBER: &str = "doc.kml";

// ============================================================================
// Synchronization
// ============================================================================

/// Number of concurrent fetch + extract tasks.
pub const SYNC_WORKERS: usize = 5;

// ============================================================================
// Storage
// ============================================================================

/// Directory holding `base.json` and the per-day files.
pub const DATA_DIR: &str = "./data";

/// Stem of the Base State file inside the data directory.
pub const BASE_STATE_STEM: &str = "base";

/// Derived unit count report.
pub const UNIT_COUNT_CSV: &str = "./unit_count.csv";

// ============================================================================
// Dev Server
// ============================================================================

/// Default bind host for the dev server.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default bind port for the dev server.
pub const SERVER_PORT: u16 = 8000;
