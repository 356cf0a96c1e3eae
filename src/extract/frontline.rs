//! Frontline polyline

use super::swap_line;
use crate::kml::{Document, Placemark};
use crate::types::LatLon;

pub const FRONTLINE_FOLDER: &str = "Frontline";
pub const FRONTLINE_PLACEMARK: &str = "Frontline";

fn has_lines(placemark: &Placemark) -> bool {
    placemark
        .geometry
        .as_ref()
        .is_some_and(|g| !g.lines().is_empty())
}

/// Extract the frontline as `[lat, lon]` vertices in geometry order.
///
/// Prefers the placemark named `Frontline`; otherwise the first placemark of
/// the folder that carries a line. Multi-line geometries are concatenated.
pub fn extract_frontline(root: &Document) -> Vec<LatLon> {
    let Some(folder) = root.folder_named(FRONTLINE_FOLDER) else {
        return Vec::new();
    };

    let placemark = folder
        .placemarks()
        .find(|p| p.name == FRONTLINE_PLACEMARK && has_lines(p))
        .or_else(|| folder.placemarks().find(|p| has_lines(p)));

    placemark
        .and_then(|p| p.geometry.as_ref())
        .map(|g| g.lines().into_iter().flat_map(swap_line).collect())
        .unwrap_or_default()
}
