//! Base State: the shared, rarely-changing record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DateKey, Polyline, Side};

/// One unit registry entry as persisted in `base.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    /// Raw, unnormalized unit name
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "s")]
    pub side: Side,
    /// Military symbol code, absent until classification has run
    #[serde(rename = "sidc", default, skip_serializing_if = "Option::is_none")]
    pub symbol_code: Option<String>,
}

/// Registry plus non-timeline layers.
///
/// `unit_map` keys are integer ids in memory and strings on disk; serde_json
/// performs that conversion for integer map keys in both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseState {
    /// Date of the snapshot that last supplied the static layers
    #[serde(default)]
    pub date: Option<DateKey>,
    #[serde(default)]
    pub unit_map: BTreeMap<u32, UnitEntry>,
    /// Full contiguous date range known at persist time
    #[serde(default)]
    pub dates: Vec<DateKey>,
    #[serde(default)]
    pub fortifications: Vec<Polyline>,
    #[serde(default)]
    pub dragon_teeth: Vec<Polyline>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_map_keys_are_strings_on_disk() {
        let mut base = BaseState::default();
        base.unit_map.insert(
            12,
            UnitEntry {
                name: "1st Tank Brigade".to_string(),
                side: Side::Ua,
                symbol_code: None,
            },
        );
        let json = serde_json::to_string(&base).unwrap();
        assert!(json.contains(r#""unit_map":{"12":{"n":"1st Tank Brigade","s":"ua"}}"#));

        let back: BaseState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unit_map[&12].name, "1st Tank Brigade");
    }

    #[test]
    fn test_date_round_trip() {
        let json = r#"{"date":"20240107","unit_map":{},"dates":["20240106","20240107"],"fortifications":[],"dragon_teeth":[]}"#;
        let base: BaseState = serde_json::from_str(json).unwrap();
        assert_eq!(base.date, DateKey::from_ymd(2024, 1, 7));
        assert_eq!(base.dates.len(), 2);
    }
}
