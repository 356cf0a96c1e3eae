//! Unit positions and counts

use super::RawUnit;
use crate::kml::Document;
use crate::types::{PerSide, Side};

/// Top-level folders holding each side's unit placemarks.
pub const RU_UNIT_FOLDERS: &[&str] = &["Russian Unit Positions"];
pub const UA_UNIT_FOLDERS: &[&str] = &["Ukrainian Unit Positions"];

const fn unit_folders(side: Side) -> &'static [&'static str] {
    match side {
        Side::Ru => RU_UNIT_FOLDERS,
        Side::Ua => UA_UNIT_FOLDERS,
    }
}

/// Collect per-side unit counts and point-placemark positions.
///
/// The count covers every child feature of the unit folders; only
/// placemarks with a point geometry yield a position.
pub fn extract_units(root: &Document) -> (PerSide<u32>, PerSide<Vec<RawUnit>>) {
    let mut counts = PerSide::<u32>::default();
    let mut units = PerSide::<Vec<RawUnit>>::default();

    for side in Side::ALL {
        for folder in root.folders_named(unit_folders(side)) {
            let count = u32::try_from(folder.features.len()).unwrap_or(u32::MAX);
            let total = counts.get_mut(side);
            *total = total.saturating_add(count);

            let positioned = folder.placemarks().filter_map(|placemark| {
                let coords = placemark.geometry.as_ref()?.as_point()?;
                Some(RawUnit {
                    name: placemark.name.clone(),
                    coords,
                })
            });
            units.get_mut(side).extend(positioned);
        }
    }

    (counts, units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{document, folder, placemark_point};
    use crate::kml::parse_document;

    #[test]
    fn test_counts_all_children_positions_only_points() {
        let body = format!(
            "{}{}",
            folder(
                "Russian Unit Positions",
                &format!(
                    "{}{}<Placemark><name>Area</name><Polygon><outerBoundaryIs><LinearRing><coordinates>1,1 2,2 1,1</coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark><Folder><name>nested</name></Folder>",
                    placemark_point("1st Guards Tank Army", 37.0, 48.0),
                    placemark_point("8th Combined Arms Army", 38.0, 47.5),
                )
            ),
            folder(
                "Ukrainian Unit Positions",
                &placemark_point("47th Mechanized Brigade", 36.0, 48.5)
            )
        );
        let root = parse_document(document(&body).as_bytes()).unwrap();
        let (counts, units) = extract_units(&root);

        assert_eq!(counts.ru, 4);
        assert_eq!(counts.ua, 1);
        assert_eq!(units.ru.len(), 2);
        assert_eq!(units.ru[1].name, "8th Combined Arms Army");
        assert_eq!(units.ua[0].coords, [36.0, 48.5]);
    }

    #[test]
    fn test_missing_folders_yield_zero() {
        let root = parse_document(document("").as_bytes()).unwrap();
        let (counts, units) = extract_units(&root);
        assert_eq!(counts, PerSide::new(0, 0));
        assert!(units.ru.is_empty() && units.ua.is_empty());
    }

    #[test]
    fn test_duplicate_names_are_kept_raw() {
        let body = folder(
            "Russian Unit Positions",
            &format!(
                "{}{}",
                placemark_point("VDV", 37.0, 48.0),
                placemark_point("VDV", 37.5, 48.5)
            ),
        );
        let root = parse_document(document(&body).as_bytes()).unwrap();
        let (_, units) = extract_units(&root);
        assert_eq!(units.ru.len(), 2);
    }
}
