//! Dated geolocation annotations

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::kml::{Document, Placemark};
use crate::types::{DateKey, GeoAnnotation, GeoBuckets, Side};

pub const GEOLOCATION_FOLDERS: &[&str] = &[
    "Russian Federation & Pro-Russian Areas Geolocations",
    "Ukraine Geolocations (~30 Days)",
    "Russian Geolocations (~30 Days)",
    "Archive Geos (1-2 Months)",
    "Archive Geos (Older than 3 Months)",
    "Archived Older Geolocations (2022)",
    "Archived Older Geolocations (2023)",
    "Archive Older Geos (2022)",
    "Archived Older Geos (2023)",
    "Archive Geos (Jan 2024 - Jul 2024)",
    "Archive Geos (Jan 2024 Onwards)",
    "Archive Geos (Jul 2024 Onwards)",
];

/// `[YY/MM/DD] Ru` or `[YY/MM/DD] Ua`, anywhere in the name. Case-sensitive,
/// two digits per date part.
const NAME_PATTERN: &str = r"\[(\d{2})/(\d{2})/(\d{2})\]\s*(Ru|Ua)";

const DESCRIPTION_KEY: &str = "Description";
const SIDE_KEY: &str = "code";
const NO_DESCRIPTION: &str = "-";

fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NAME_PATTERN).ok()).as_ref()
}

/// Parse the embedded annotation date out of a placemark name.
pub fn annotation_date(name: &str) -> Option<DateKey> {
    let caps = name_pattern()?.captures(name)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    DateKey::from_ymd(2000 + year, month, day)
}

fn annotation(placemark: &Placemark) -> Option<(DateKey, Side, GeoAnnotation)> {
    let date = annotation_date(&placemark.name)?;
    let coords = placemark.geometry.as_ref()?.as_point()?;
    let side = Side::from_code(placemark.data(SIDE_KEY)?)?;
    let description = placemark
        .data(DESCRIPTION_KEY)
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    Some((date, side, GeoAnnotation { coords, description }))
}

/// Bucket every valid annotation by its own date and side.
///
/// Placemarks failing the name pattern, lacking a point, or carrying an
/// unknown side code are skipped.
pub fn extract_geolocations(root: &Document) -> BTreeMap<DateKey, GeoBuckets> {
    let mut buckets: BTreeMap<DateKey, GeoBuckets> = BTreeMap::new();
    let mut skipped = 0usize;

    for folder in root.folders_named(GEOLOCATION_FOLDERS) {
        for placemark in folder.placemarks() {
            match annotation(placemark) {
                Some((date, side, annotation)) => {
                    buckets.entry(date).or_default().get_mut(side).push(annotation);
                }
                None => skipped += 1,
            }
        }
    }

    debug!(dates = buckets.len(), skipped, "Geolocations extracted");
    buckets
}
