//! Snapshot Extractor
//!
//! Turns one archive payload into the fact layers of a single snapshot:
//!
//! - unit positions and per-side counts ([`units`])
//! - the frontline polyline ([`frontline`])
//! - occupied area outlines ([`areas`])
//! - for the latest snapshot only: dated geolocation annotations
//!   ([`geolocations`]) and static fortification lines ([`fortifications`])
//!
//! Extraction is a pure function of `(descriptor, payload)`. Unit names are
//! returned raw; identity assignment happens later on the merge thread.

mod archive;
pub mod areas;
pub mod fortifications;
pub mod frontline;
pub mod geolocations;
pub mod units;

pub use archive::read_document;

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::ExtractError;
use crate::kml::{self, Document};
use crate::types::{DateKey, GeoBuckets, LatLon, LonLat, PerSide, Polyline, SnapshotDescriptor};

/// A unit placemark as found in the document, before identity resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawUnit {
    pub name: String,
    pub coords: LonLat,
}

/// Layers taken only from the latest snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestLayers {
    /// Keyed by each annotation's own embedded date
    pub geolocations: BTreeMap<DateKey, GeoBuckets>,
    pub fortifications: Vec<Polyline>,
    pub dragon_teeth: Vec<Polyline>,
}

/// Everything extracted from one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub unit_count: PerSide<u32>,
    pub units: PerSide<Vec<RawUnit>>,
    pub frontline: Vec<LatLon>,
    pub areas: Vec<Polyline>,
    pub areas_ua: Vec<Polyline>,
    /// Present iff the descriptor was marked latest
    pub latest: Option<LatestLayers>,
}

/// Open `payload`, parse its document and extract every layer.
///
/// Only archive-open and document-parse failures are errors. Missing
/// folders, non-point placemarks and malformed annotations are skipped.
pub fn extract(descriptor: &SnapshotDescriptor, payload: &[u8]) -> Result<Extraction, ExtractError> {
    let xml = read_document(payload)?;
    let root = kml::parse_document(&xml).map_err(|e| ExtractError::BadArchive(e.to_string()))?;
    let extraction = extract_from_document(&root, descriptor.is_latest);

    debug!(
        date = %descriptor.real_data_date,
        ru_units = extraction.units.ru.len(),
        ua_units = extraction.units.ua.len(),
        frontline_vertices = extraction.frontline.len(),
        latest = descriptor.is_latest,
        "Snapshot extracted"
    );
    Ok(extraction)
}

/// Extract every layer from an already parsed document.
pub fn extract_from_document(root: &Document, is_latest: bool) -> Extraction {
    let (unit_count, units) = units::extract_units(root);
    let (areas, areas_ua) = areas::extract_areas(root);

    let latest = is_latest.then(|| {
        let (fortifications, dragon_teeth) = fortifications::extract_fortifications(root);
        LatestLayers {
            geolocations: geolocations::extract_geolocations(root),
            fortifications,
            dragon_teeth,
        }
    });

    Extraction {
        unit_count,
        units,
        frontline: frontline::extract_frontline(root),
        areas,
        areas_ua,
        latest,
    }
}

/// Swap every `[lon, lat]` vertex of a line into `[lat, lon]` order.
pub(crate) fn swap_line(line: &[LonLat]) -> Polyline {
    line.iter().copied().map(crate::types::swap_to_lat_lon).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;

    /// Pack `doc` into an in-memory KMZ under the standard member name.
    pub fn kmz(doc: &str) -> Vec<u8> {
        kmz_with_member(crate::config::defaults::DOCUMENT_MEMBER, doc)
    }

    pub fn kmz_with_member(member: &str, doc: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file(member, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(doc.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    pub fn placemark_point(name: &str, lon: f64, lat: f64) -> String {
        format!(
            "<Placemark><name>{name}</name><Point><coordinates>{lon},{lat},0</coordinates></Point></Placemark>"
        )
    }

    pub fn folder(name: &str, body: &str) -> String {
        format!("<Folder><name>{name}</name>{body}</Folder>")
    }

    pub fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><kml xmlns="http://www.opengis.net/kml/2.2"><Document><name>map</name>{body}</Document></kml>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn descriptor(is_latest: bool) -> SnapshotDescriptor {
        SnapshotDescriptor {
            file_date: "240108".to_string(),
            real_data_date: "20240107".parse().unwrap(),
            remote_name: "240108_map.kmz".to_string(),
            download_url: "memory://240108_map.kmz".to_string(),
            is_latest,
        }
    }

    fn sample() -> String {
        document(&format!(
            "{}{}{}",
            folder(
                "Russian Unit Positions",
                &placemark_point("1st Tank Army", 37.1, 48.2)
            ),
            folder(
                "Frontline",
                "<Placemark><name>Frontline</name><LineString><coordinates>30.5,50.4 31.0,50.9</coordinates></LineString></Placemark>"
            ),
            folder(
                "Ukraine Geolocations (~30 Days)",
                "<Placemark><name>[24/01/03] Ua Position</name><ExtendedData><Data name=\"code\"><value>ua</value></Data></ExtendedData><Point><coordinates>36.0,48.0</coordinates></Point></Placemark>"
            )
        ))
    }

    #[test]
    fn test_extract_non_latest_skips_latest_layers() {
        let payload = kmz(&sample());
        let extraction = extract(&descriptor(false), &payload).unwrap();

        assert_eq!(extraction.unit_count.ru, 1);
        assert_eq!(extraction.units.ru[0].name, "1st Tank Army");
        assert_eq!(extraction.units.ru[0].coords, [37.1, 48.2]);
        assert_eq!(extraction.frontline, vec![[50.4, 30.5], [50.9, 31.0]]);
        assert!(extraction.latest.is_none());
    }

    #[test]
    fn test_extract_latest_collects_geolocations() {
        let payload = kmz(&sample());
        let extraction = extract(&descriptor(true), &payload).unwrap();

        let latest = extraction.latest.unwrap();
        let key: DateKey = "20240103".parse().unwrap();
        assert_eq!(latest.geolocations[&key].ua.len(), 1);
    }

    #[test]
    fn test_not_a_zip_is_bad_archive() {
        let result = extract(&descriptor(false), b"definitely not a zip");
        assert!(matches!(result, Err(ExtractError::BadArchive(_))));
    }

    #[test]
    fn test_unparsable_document_is_bad_archive() {
        let payload = kmz("<kml><Document><Folder></Document></kml>");
        let result = extract(&descriptor(false), &payload);
        assert!(matches!(result, Err(ExtractError::BadArchive(_))));
    }

    #[test]
    fn test_empty_document_extracts_nothing() {
        let payload = kmz(&document(""));
        let extraction = extract(&descriptor(true), &payload).unwrap();
        assert_eq!(extraction.unit_count, PerSide::default());
        assert!(extraction.frontline.is_empty());
        assert_eq!(extraction.latest, Some(LatestLayers::default()));
    }
}
