//! Per-day timeline records

use serde::{Deserialize, Serialize};

use super::{LatLon, LonLat, PerSide, Polyline};

/// A positioned unit: `[unit_id, [lon, lat]]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPosition(pub u32, pub LonLat);

impl UnitPosition {
    pub const fn unit_id(&self) -> u32 {
        self.0
    }

    pub const fn coords(&self) -> LonLat {
        self.1
    }
}

/// A dated geolocation annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoAnnotation {
    /// `[lon, lat]`
    #[serde(rename = "c")]
    pub coords: LonLat,
    #[serde(rename = "d")]
    pub description: String,
}

/// Geolocation annotations for one date, partitioned by side.
pub type GeoBuckets = PerSide<Vec<GeoAnnotation>>;

/// Everything known about one calendar date.
///
/// A default (all-empty) record means either "not processed yet" or
/// "the snapshot for this date could not be fetched or parsed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayFacts {
    pub unit_count: PerSide<u32>,
    pub units: PerSide<Vec<UnitPosition>>,
    /// `[lat, lon]` vertices in geometry order
    pub frontline: Vec<LatLon>,
    /// Side-A occupied area outlines
    pub areas: Vec<Polyline>,
    /// Side-B occupied area outlines
    pub areas_ua: Vec<Polyline>,
    pub geos: GeoBuckets,
}

impl DayFacts {
    /// True when nothing was extracted for this date.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let mut facts = DayFacts::default();
        facts.unit_count.ru = 1;
        facts.units.ru.push(UnitPosition(7, [30.5, 50.4]));
        facts.frontline.push([50.4, 30.5]);
        facts.geos.ua.push(GeoAnnotation {
            coords: [30.5, 50.4],
            description: "-".to_string(),
        });

        let value = serde_json::to_value(&facts).unwrap();
        assert_eq!(value["unit_count"]["ru"], 1);
        assert_eq!(value["units"]["ru"][0], serde_json::json!([7, [30.5, 50.4]]));
        assert_eq!(value["frontline"][0], serde_json::json!([50.4, 30.5]));
        assert_eq!(value["geos"]["ua"][0]["c"], serde_json::json!([30.5, 50.4]));
        assert_eq!(value["geos"]["ua"][0]["d"], "-");
    }

    #[test]
    fn test_missing_fields_default() {
        let facts: DayFacts = serde_json::from_str(r#"{"unit_count":{"ru":2,"ua":1}}"#).unwrap();
        assert_eq!(facts.unit_count.ru, 2);
        assert!(facts.units.ru.is_empty());
        assert!(facts.areas_ua.is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(DayFacts::default().is_empty());
    }
}
