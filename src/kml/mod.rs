//! KML document model
//!
//! A typed, read-only feature tree covering the subset of KML the snapshot
//! archives use: nested `Document`/`Folder` containers, `Placemark`s with
//! point, line and polygon geometries (optionally wrapped in
//! `MultiGeometry`), and `ExtendedData` key/value pairs. Everything else in
//! the document is ignored.

mod parser;

pub use parser::{parse_document, KmlError};

use crate::types::LonLat;

/// A node in the feature tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Folder(Folder),
    Placemark(Placemark),
}

impl Feature {
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Feature::Folder(folder) => Some(folder),
            Feature::Placemark(_) => None,
        }
    }

    pub fn as_placemark(&self) -> Option<&Placemark> {
        match self {
            Feature::Placemark(placemark) => Some(placemark),
            Feature::Folder(_) => None,
        }
    }
}

/// A named container (`Document` or `Folder`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folder {
    pub name: Option<String>,
    pub features: Vec<Feature>,
}

impl Folder {
    /// Direct child folders.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.features.iter().filter_map(Feature::as_folder)
    }

    /// Direct child placemarks.
    pub fn placemarks(&self) -> impl Iterator<Item = &Placemark> {
        self.features.iter().filter_map(Feature::as_placemark)
    }

    /// Direct child folders whose name is one of `names`.
    pub fn folders_named<'a>(&'a self, names: &'a [&str]) -> impl Iterator<Item = &'a Folder> {
        self.folders()
            .filter(move |f| f.name.as_deref().is_some_and(|n| names.contains(&n)))
    }

    /// First direct child folder called `name`.
    pub fn folder_named(&self, name: &str) -> Option<&Folder> {
        self.folders().find(|f| f.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub geometry: Option<Geometry>,
    /// `(name, value)` pairs from `Data` and `SimpleData` elements
    pub extended_data: Vec<(String, String)>,
}

impl Placemark {
    /// Value of the first extended data field called `key`.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.extended_data
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Outer ring of a polygon. Holes are not needed by any layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub exterior: Vec<LonLat>,
}

/// Geometries in source `[lon, lat]` order.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LonLat),
    LineString(Vec<LonLat>),
    Polygon(Polygon),
    MultiLineString(Vec<Vec<LonLat>>),
    MultiPolygon(Vec<Polygon>),
    /// A `MultiGeometry` mixing kinds
    Collection(Vec<Geometry>),
}

impl Geometry {
    pub const fn as_point(&self) -> Option<LonLat> {
        match self {
            Geometry::Point(coord) => Some(*coord),
            _ => None,
        }
    }

    /// Every line carried by a LineString or MultiLineString.
    pub fn lines(&self) -> Vec<&[LonLat]> {
        match self {
            Geometry::LineString(line) => vec![line.as_slice()],
            Geometry::MultiLineString(lines) => lines.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    /// Every polygon carried by a Polygon or MultiPolygon.
    pub fn polygons(&self) -> Vec<&Polygon> {
        match self {
            Geometry::Polygon(polygon) => vec![polygon],
            Geometry::MultiPolygon(polygons) => polygons.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// The parsed document root: the top-level `Document` (or the `kml` element
/// itself when the file has no `Document`).
pub type Document = Folder;
