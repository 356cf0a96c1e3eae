//! Snapshot descriptors produced from the remote listing

use serde::{Deserialize, Serialize};

use super::DateKey;

/// One dated archive publication.
///
/// Archives are named for the day *after* the data they contain, so
/// `real_data_date` is the archive's nominal date minus one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    /// Leading date token of the archive name, as published (`YYMMDD`)
    pub file_date: String,
    /// Calendar day the archive's content describes
    pub real_data_date: DateKey,
    /// Archive file name in the remote listing
    pub remote_name: String,
    pub download_url: String,
    /// Whether this snapshot supplies the static layers and geolocations
    #[serde(default)]
    pub is_latest: bool,
}
