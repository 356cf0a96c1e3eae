//! Static fortification layers

use super::{areas::AREAS_FOLDER, swap_line};
use crate::kml::{Document, Placemark};
use crate::types::Polyline;

pub const TRENCHES: &[&str] = &["Trenches Russia", "Trenches East", "Trenches South"];
pub const TANK_DITCHES: &[&str] = &["Tankditches Russia", "Tankditches East", "Tankditches South"];
pub const DRAGON_TEETH: &[&str] = &["Dragonteeth Russia", "Dragonteeth East", "Dragonteeth South"];

fn polylines(placemark: &Placemark) -> impl Iterator<Item = Polyline> + '_ {
    placemark
        .geometry
        .iter()
        .flat_map(|g| g.lines())
        .map(swap_line)
}

/// Extract `(fortifications, dragon_teeth)` as `[lat, lon]` polylines.
///
/// Fortifications are trench and tank-ditch lines; each line of a
/// multi-line geometry becomes its own polyline.
pub fn extract_fortifications(root: &Document) -> (Vec<Polyline>, Vec<Polyline>) {
    let mut fortifications = Vec::new();
    let mut dragon_teeth = Vec::new();

    let Some(folder) = root.folder_named(AREAS_FOLDER) else {
        return (fortifications, dragon_teeth);
    };

    for placemark in folder.placemarks() {
        let name = placemark.name.as_str();
        if TRENCHES.contains(&name) || TANK_DITCHES.contains(&name) {
            fortifications.extend(polylines(placemark));
        } else if DRAGON_TEETH.contains(&name) {
            dragon_teeth.extend(polylines(placemark));
        }
    }

    (fortifications, dragon_teeth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{document, folder};
    use crate::kml::parse_document;

    #[test]
    fn test_collects_both_layers() {
        let body = folder(
            "Important Areas",
            "<Placemark><name>Trenches East</name><MultiGeometry>\
             <LineString><coordinates>30.5,50.4 30.6,50.5</coordinates></LineString>\
             <LineString><coordinates>31.0,49.0 31.1,49.1</coordinates></LineString>\
             </MultiGeometry></Placemark>\
             <Placemark><name>Tankditches South</name><LineString><coordinates>33,47 34,47</coordinates></LineString></Placemark>\
             <Placemark><name>Dragonteeth Russia</name><LineString><coordinates>36,51 36.2,51.1</coordinates></LineString></Placemark>\
             <Placemark><name>Crimea</name><LineString><coordinates>1,1 2,2</coordinates></LineString></Placemark>",
        );
        let root = parse_document(document(&body).as_bytes()).unwrap();
        let (fortifications, dragon_teeth) = extract_fortifications(&root);

        assert_eq!(fortifications.len(), 3);
        assert_eq!(fortifications[0], vec![[50.4, 30.5], [50.5, 30.6]]);
        assert_eq!(fortifications[2], vec![[47.0, 33.0], [47.0, 34.0]]);
        assert_eq!(dragon_teeth, vec![vec![[51.0, 36.0], [51.1, 36.2]]]);
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let root = parse_document(document("").as_bytes()).unwrap();
        let (fortifications, dragon_teeth) = extract_fortifications(&root);
        assert!(fortifications.is_empty());
        assert!(dragon_teeth.is_empty());
    }
}
