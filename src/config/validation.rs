//! Unknown-key detection for sync config files.
//!
//! The raw TOML is walked as a `toml::Value` tree before serde sees it and
//! every dotted key path is compared against the fields `SyncConfig`
//! understands. Unknown keys only produce warnings, with the closest known
//! key suggested when one is near enough.

use std::collections::HashSet;

/// A non-fatal config warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub field: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown config key '{}'", self.field)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

/// Largest edit distance still worth suggesting.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Every dotted key path `SyncConfig` deserializes. Keep in sync with
/// `sync_config.rs`.
const KNOWN_KEYS: &[&str] = &[
    "remote",
    "remote.listing_url",
    "remote.archive_extension",
    "remote.latest_alias",
    "remote.user_agent",
    "fetch",
    "fetch.max_attempts",
    "fetch.attempt_timeout_secs",
    "fetch.retry_delay_ms",
    "sync",
    "sync.workers",
    "storage",
    "storage.data_dir",
    "storage.unit_count_csv",
    "server",
    "server.addr",
];

pub fn known_config_keys() -> HashSet<&'static str> {
    KNOWN_KEYS.iter().copied().collect()
}

/// Collect the dotted path of every key in a TOML table tree.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };
    let mut keys = Vec::new();
    for (k, v) in table {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        if v.is_table() {
            keys.extend(walk_toml_keys(v, &path));
        }
        keys.push(path);
    }
    keys
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest known key within [`MAX_SUGGESTION_DISTANCE`] edits. Ties go to
/// the alphabetically first key so the output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= MAX_SUGGESTION_DISTANCE)
        .min()
        .map(|(_, k)| k.to_string())
}

/// Warnings for every key in `raw_toml` that `SyncConfig` would ignore.
///
/// Unparsable input yields no warnings; serde reports the parse error.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|field| ValidationWarning {
            suggestion: suggest_correction(&field, &known),
            field,
        })
        .collect()
}
