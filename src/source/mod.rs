//! Remote snapshot access
//!
//! The [`ArchiveSource`] trait is the seam between the orchestrator and the
//! network. [`HttpArchiveSource`] talks to the real listing endpoint;
//! [`MemorySource`] serves archives from memory for tests and offline runs.

mod http;
mod listing;
mod memory;
mod retry;

pub use http::HttpArchiveSource;
pub use listing::{descriptor_from_entry, list_snapshots, ListingEntry};
pub use memory::MemorySource;
pub use retry::{retry_bounded, RetryPolicy};

use async_trait::async_trait;

use crate::error::SyncError;

/// Where listings and archive payloads come from.
///
/// Implementations own their retry policy: `list_entries` fails only after
/// retries are exhausted, and `fetch_archive` degrades to `None`.
#[async_trait]
pub trait ArchiveSource: Send + Sync + 'static {
    /// Fetch the raw directory listing.
    async fn list_entries(&self) -> Result<Vec<ListingEntry>, SyncError>;

    /// Fetch one archive. `None` means "no data available for this snapshot".
    async fn fetch_archive(&self, url: &str) -> Option<Vec<u8>>;

    /// Human-readable name for logging (e.g. "HTTP", "memory").
    fn source_name(&self) -> &str;
}
