//! Occupied area outlines

use super::swap_line;
use crate::kml::{Document, Placemark};
use crate::types::{Polyline, Side};

pub const AREAS_FOLDER: &str = "Important Areas";

pub const RU_AREAS: &[&str] = &[
    "Luhansk Axis",
    "Crimea",
    "Zaporizhia and Kherson Axis [Z]",
    "Donetsk Axis",
    "Pre-War Crimea",
    "Luhansk Axis  [Z]",
    "Donetsk Axis  [Z]",
    "Crimean Axis [Z]",
];

/// Any area whose name starts with this (ignoring case) is side A.
pub const RU_AREA_PREFIX: &str = "russian";

pub const UA_AREAS: &[&str] = &["Ukrainian Kursk Incursion"];

/// Decide which side an area placemark belongs to, if any.
pub fn area_side(name: &str) -> Option<Side> {
    let name = name.replace('\u{a0}', " ");
    let trimmed = name.trim();

    if RU_AREAS.contains(&trimmed) || name.to_lowercase().starts_with(RU_AREA_PREFIX) {
        Some(Side::Ru)
    } else if UA_AREAS.contains(&trimmed) {
        Some(Side::Ua)
    } else {
        None
    }
}

fn outlines(placemark: &Placemark) -> impl Iterator<Item = Polyline> + '_ {
    placemark
        .geometry
        .iter()
        .flat_map(|g| g.polygons())
        .map(|polygon| swap_line(&polygon.exterior))
}

/// Extract `(side A, side B)` polygon exteriors as `[lat, lon]` rings.
pub fn extract_areas(root: &Document) -> (Vec<Polyline>, Vec<Polyline>) {
    let mut ru = Vec::new();
    let mut ua = Vec::new();

    let Some(folder) = root.folder_named(AREAS_FOLDER) else {
        return (ru, ua);
    };

    for placemark in folder.placemarks() {
        match area_side(&placemark.name) {
            Some(Side::Ru) => ru.extend(outlines(placemark)),
            Some(Side::Ua) => ua.extend(outlines(placemark)),
            None => {}
        }
    }

    (ru, ua)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{document, folder};
    use crate::kml::parse_document;

    fn polygon(name: &str, ring: &str) -> String {
        format!("<Placemark><name>{name}</name><Polygon><outerBoundaryIs><LinearRing><coordinates>{ring}</coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark>")
    }

    #[test]
    fn test_area_side() {
        assert_eq!(area_side("Crimea"), Some(Side::Ru));
        assert_eq!(area_side("Donetsk\u{a0}Axis\u{a0}\u{a0}[Z]"), Some(Side::Ru));
        assert_eq!(area_side(" Pre-War Crimea "), Some(Side::Ru));
        assert_eq!(area_side("RUSSIAN Advances"), Some(Side::Ru));
        assert_eq!(area_side("Ukrainian Kursk Incursion"), Some(Side::Ua));
        assert_eq!(area_side("Contested Area"), None);
        assert_eq!(area_side("Trenches East"), None);
    }

    #[test]
    fn test_extracts_swapped_exteriors() {
        let body = folder(
            "Important Areas",
            &format!(
                "{}{}{}",
                polygon("Crimea", "33.0,45.0 34.0,45.0 33.5,46.0 33.0,45.0"),
                polygon("Ukrainian Kursk Incursion", "35.0,51.0 35.5,51.0 35.0,51.0"),
                polygon("Grey Zone", "1,1 2,2 1,1"),
            ),
        );
        let root = parse_document(document(&body).as_bytes()).unwrap();
        let (ru, ua) = extract_areas(&root);

        assert_eq!(ru.len(), 1);
        assert_eq!(ru[0][0], [45.0, 33.0]);
        assert_eq!(ru[0].len(), 4);
        assert_eq!(ua, vec![vec![[51.0, 35.0], [51.0, 35.5], [51.0, 35.0]]]);
    }

    #[test]
    fn test_multipolygon_contributes_each_exterior() {
        let body = folder(
            "Important Areas",
            "<Placemark><name>Russian Controlled</name><MultiGeometry>\
             <Polygon><outerBoundaryIs><LinearRing><coordinates>1,2 3,4 1,2</coordinates></LinearRing></outerBoundaryIs></Polygon>\
             <Polygon><outerBoundaryIs><LinearRing><coordinates>5,6 7,8 5,6</coordinates></LinearRing></outerBoundaryIs></Polygon>\
             </MultiGeometry></Placemark>",
        );
        let root = parse_document(document(&body).as_bytes()).unwrap();
        let (ru, ua) = extract_areas(&root);
        assert_eq!(ru.len(), 2);
        assert_eq!(ru[1][0], [6.0, 5.0]);
        assert!(ua.is_empty());
    }
}
