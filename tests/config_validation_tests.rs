//! Config Validation Tests
//!
//! Exercise config loading from the outside: typo detection, range
//! validation and the file/env layering, independently from any sync run.

use frontline_sync::config::validation::{known_config_keys, suggest_correction, validate_unknown_keys};
use frontline_sync::config::{ConfigError, SyncConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_fetch_section_warns_with_suggestion() {
    let toml_str = r#"
[fetch]
max_atempts = 3
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "fetch.max_atempts");
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("fetch.max_attempts"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn misspelled_section_is_reported_per_key() {
    let toml_str = r#"
[storag]
data_dir = "./data"
"#;
    let warnings = validate_unknown_keys(toml_str);
    let fields: Vec<&str> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert!(fields.contains(&"storag"));
    assert!(fields.contains(&"storag.data_dir"));
    let section = warnings.iter().find(|w| w.field == "storag").unwrap();
    assert_eq!(section.suggestion.as_deref(), Some("storage"));
}

#[test]
fn unknown_keys_do_not_break_loading() {
    let config = SyncConfig::from_toml_str(
        r#"
[sync]
workers = 3
parallelism = 9
"#,
    )
    .unwrap();
    assert_eq!(config.sync.workers, 3);
}

#[test]
fn every_known_key_is_a_section_or_under_one() {
    let known = known_config_keys();
    for key in &known {
        if let Some((section, _)) = key.split_once('.') {
            assert!(known.contains(section), "missing section for {key}");
        }
    }
    assert!(suggest_correction("completely_unrelated_key", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn zero_workers_rejected() {
    let err = SyncConfig::from_toml_str("[sync]\nworkers = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
    assert!(err.to_string().contains("sync.workers"));
}

#[test]
fn empty_archive_extension_rejected() {
    let err = SyncConfig::from_toml_str("[remote]\narchive_extension = \"\"\n").unwrap_err();
    assert!(err.to_string().contains("remote.archive_extension"));
}

#[test]
fn wrong_value_type_is_a_parse_error() {
    let err = SyncConfig::from_toml_str("[sync]\nworkers = \"five\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)));
}

// ============================================================================
// Layering
// ============================================================================

#[test]
fn empty_file_equals_defaults() {
    let from_file = SyncConfig::from_toml_str("").unwrap();
    let defaults = SyncConfig::default();
    assert_eq!(from_file.sync.workers, defaults.sync.workers);
    assert_eq!(from_file.fetch.max_attempts, defaults.fetch.max_attempts);
    assert_eq!(from_file.storage.data_dir, defaults.storage.data_dir);
    assert_eq!(from_file.server.addr, defaults.server.addr);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SyncConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}
