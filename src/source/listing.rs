//! Remote Listing Client

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ArchiveSource;
use crate::config::{defaults, RemoteConfig};
use crate::error::SyncError;
use crate::types::{DateKey, SnapshotDescriptor};

/// One entry of the remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ListingEntry {
    fn is_dated_archive(&self, remote: &RemoteConfig) -> bool {
        self.kind == "file"
            && self.path.contains(&remote.archive_extension)
            && !self.path.contains(&remote.latest_alias)
    }
}

/// Normalize one listing entry into a descriptor.
///
/// Returns `None` for non-archive entries, the rolling alias, entries
/// without a download URL, and names whose leading `YYMMDD_` token does not
/// parse as a date.
pub fn descriptor_from_entry(
    entry: &ListingEntry,
    remote: &RemoteConfig,
) -> Option<SnapshotDescriptor> {
    if !entry.is_dated_archive(remote) {
        return None;
    }

    let Some(download_url) = entry.download_url.clone() else {
        debug!(name = %entry.name, "Listing entry has no download URL, skipping");
        return None;
    };

    let file_date = entry.name.split('_').next().unwrap_or_default();
    // Archives carry the date of the following day
    let real_data_date = DateKey::parse_with_format(file_date, defaults::ARCHIVE_DATE_FORMAT)
        .and_then(DateKey::pred);
    let Some(real_data_date) = real_data_date else {
        warn!(name = %entry.name, "Archive name has no parsable date token, skipping");
        return None;
    };

    Some(SnapshotDescriptor {
        file_date: file_date.to_string(),
        real_data_date,
        remote_name: entry.name.clone(),
        download_url,
        is_latest: false,
    })
}

/// List every dated snapshot, in listing order.
///
/// Fails with [`SyncError::Transport`] when the listing cannot be fetched.
pub async fn list_snapshots(
    source: &dyn ArchiveSource,
    remote: &RemoteConfig,
) -> Result<Vec<SnapshotDescriptor>, SyncError> {
    let entries = source.list_entries().await?;
    let total = entries.len();

    let descriptors: Vec<SnapshotDescriptor> = entries
        .iter()
        .filter_map(|entry| descriptor_from_entry(entry, remote))
        .collect();

    info!(
        source = source.source_name(),
        entries = total,
        snapshots = descriptors.len(),
        "Remote listing loaded"
    );
    Ok(descriptors)
}
