//! Persisted state directory
//!
//! Layout:
//! - `base.json`: [`BaseState`], the commit point of a run
//! - `<YYYYMMDD>.json`: one [`DayFacts`] record per date
//!
//! Every write goes to a hidden sibling temp file first and is renamed into
//! place, so a reader never sees a half-written record.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::defaults::BASE_STATE_STEM;
use crate::error::SyncError;
use crate::types::{BaseState, DateKey, DayFacts, PerSide};

const JSON_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_path(&self) -> PathBuf {
        self.root.join(format!("{BASE_STATE_STEM}.{JSON_EXTENSION}"))
    }

    pub fn day_path(&self, date: DateKey) -> PathBuf {
        self.root.join(format!("{date}.{JSON_EXTENSION}"))
    }

    pub fn ensure_exists(&self) -> Result<(), SyncError> {
        fs::create_dir_all(&self.root).map_err(|e| SyncError::io(&self.root, e))
    }

    /// Load `base.json`.
    ///
    /// A missing file is [`SyncError::MissingBaseState`]; an unreadable or
    /// unparsable one is [`SyncError::PersistedStateCorrupt`].
    pub fn load_base(&self) -> Result<BaseState, SyncError> {
        let path = self.base_path();
        match read_json(&path)? {
            Some(base) => Ok(base),
            None => Err(SyncError::MissingBaseState(path)),
        }
    }

    /// Load one persisted day, `None` if it was never written.
    pub fn load_day(&self, date: DateKey) -> Result<Option<DayFacts>, SyncError> {
        read_json(&self.day_path(date))
    }

    /// Dates that already have a day file. The base record is not a date.
    pub fn persisted_dates(&self) -> Result<BTreeSet<DateKey>, SyncError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(SyncError::io(&self.root, e)),
        };

        let mut dates = BTreeSet::new();
        for entry in entries {
            let path = entry.map_err(|e| SyncError::io(&self.root, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem == BASE_STATE_STEM {
                continue;
            }
            if let Ok(date) = stem.parse::<DateKey>() {
                dates.insert(date);
            }
        }

        debug!(dir = %self.root.display(), count = dates.len(), "Scanned persisted dates");
        Ok(dates)
    }

    pub fn write_day(&self, date: DateKey, facts: &DayFacts) -> Result<(), SyncError> {
        write_json_atomic(&self.day_path(date), facts)
    }

    pub fn write_base(&self, base: &BaseState) -> Result<(), SyncError> {
        write_json_atomic(&self.base_path(), base)?;
        info!(
            path = %self.base_path().display(),
            units = base.unit_map.len(),
            dates = base.dates.len(),
            "Base state written"
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SyncError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SyncError::PersistedStateCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| SyncError::PersistedStateCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `bytes` to `path` through a temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, bytes).map_err(|e| SyncError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        SyncError::io(path, e)
    })
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), SyncError> {
    let bytes = serde_json::to_vec(value)?;
    write_atomic(path, &bytes)
}

/// Write the `date,ru,ua` unit count report.
pub fn write_unit_count_csv<I>(path: &Path, rows: I) -> Result<usize, SyncError>
where
    I: IntoIterator<Item = (DateKey, PerSide<u32>)>,
{
    let mut csv = String::from("date,ru,ua\n");
    let mut written = 0;
    for (date, count) in rows {
        // Writing to a String cannot fail
        let _ = writeln!(csv, "{date},{},{}", count.ru, count.ua);
        written += 1;
    }
    write_atomic(path, csv.as_bytes())?;
    info!(path = %path.display(), rows = written, "Unit count report written");
    Ok(written)
}
