//! In-memory archive source

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{ArchiveSource, ListingEntry};
use crate::error::SyncError;

const URL_SCHEME: &str = "memory://";

/// Serves a fixed listing and archive payloads held in memory.
///
/// Entries registered with [`MemorySource::with_unavailable`] appear in the
/// listing but their fetch yields `None`, mirroring a download that failed
/// on every attempt.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    entries: Vec<ListingEntry>,
    archives: HashMap<String, Vec<u8>>,
    listing_fails: bool,
    fetches: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    fn listing_entry(name: &str) -> ListingEntry {
        ListingEntry {
            kind: "file".to_string(),
            path: format!("archive/{name}"),
            name: name.to_string(),
            download_url: Some(format!("{URL_SCHEME}{name}")),
        }
    }

    /// Add a downloadable archive under `name`.
    #[must_use]
    pub fn with_archive(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.entries.push(Self::listing_entry(name));
        self.archives.insert(format!("{URL_SCHEME}{name}"), bytes);
        self
    }

    /// Add a listed archive whose download never succeeds.
    #[must_use]
    pub fn with_unavailable(mut self, name: &str) -> Self {
        self.entries.push(Self::listing_entry(name));
        self
    }

    /// Add an arbitrary listing entry (directories, aliases, ...).
    #[must_use]
    pub fn with_entry(mut self, entry: ListingEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Make `list_entries` fail as if the endpoint were unreachable.
    #[must_use]
    pub fn with_failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// Number of archive fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArchiveSource for MemorySource {
    async fn list_entries(&self) -> Result<Vec<ListingEntry>, SyncError> {
        if self.listing_fails {
            return Err(SyncError::Transport("memory listing disabled".to_string()));
        }
        Ok(self.entries.clone())
    }

    async fn fetch_archive(&self, url: &str) -> Option<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.archives.get(url).cloned()
    }

    fn source_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_listed_archives() {
        let source = MemorySource::new()
            .with_archive("240102_a.kmz", vec![1, 2, 3])
            .with_unavailable("240103_b.kmz");

        let entries = source.list_entries().await.unwrap();
        assert_eq!(entries.len(), 2);

        let url = entries[0].download_url.clone().unwrap();
        assert_eq!(source.fetch_archive(&url).await, Some(vec![1, 2, 3]));

        let missing = entries[1].download_url.clone().unwrap();
        assert_eq!(source.fetch_archive(&missing).await, None);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_listing() {
        let source = MemorySource::new().with_failing_listing();
        assert!(matches!(
            source.list_entries().await,
            Err(SyncError::Transport(_))
        ));
    }
}
