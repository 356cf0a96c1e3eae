//! Streaming KML parser built on `quick-xml`.
//!
//! Elements are matched by local name, so namespace prefixes (`kml:Folder`)
//! are accepted. Unknown elements are skipped without error.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::mem;

use super::{Document, Feature, Folder, Geometry, Placemark, Polygon};
use crate::types::LonLat;

#[derive(Debug, thiserror::Error)]
pub enum KmlError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("unbalanced closing tag </{0}>")]
    Unbalanced(String),
    #[error("document contains no kml root element")]
    MissingRoot,
}

/// Parse a KML document into its feature tree.
pub fn parse_document(xml: &[u8]) -> Result<Document, KmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|source| KmlError::Xml {
            position: reader.buffer_position(),
            source,
        })?;

        match event {
            Event::Start(e) => builder.open(&e),
            Event::Empty(e) => {
                let name = e.local_name().as_ref().to_vec();
                builder.open(&e);
                builder.close(&name)?;
            }
            Event::End(e) => builder.close(e.local_name().as_ref())?,
            Event::Text(t) => {
                let text = t.unescape().map_err(|source| KmlError::Xml {
                    position: reader.buffer_position(),
                    source,
                })?;
                builder.text(&text);
            }
            Event::CData(c) => builder.text(&String::from_utf8_lossy(&c.into_inner())),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Kml,
    Document,
    Folder,
}

#[derive(Debug, Default)]
struct GeometryState {
    coords: Vec<LonLat>,
    in_outer_boundary: bool,
    exterior: Option<Vec<LonLat>>,
    /// One entry per open `MultiGeometry`
    multi: Vec<Vec<Geometry>>,
}

#[derive(Debug, Default)]
struct TreeBuilder {
    path: Vec<Vec<u8>>,
    containers: Vec<(ContainerKind, Folder)>,
    placemark: Option<Placemark>,
    geometry: GeometryState,
    data_key: Option<String>,
    text: String,
    document: Option<Folder>,
    kml_root: Option<Folder>,
}

impl TreeBuilder {
    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name().as_ref().to_vec();
        self.text.clear();

        match name.as_slice() {
            b"kml" => self.containers.push((ContainerKind::Kml, Folder::default())),
            b"Document" => self
                .containers
                .push((ContainerKind::Document, Folder::default())),
            b"Folder" => self.containers.push((ContainerKind::Folder, Folder::default())),
            b"Placemark" => {
                self.placemark = Some(Placemark::default());
                self.geometry = GeometryState::default();
            }
            b"Data" | b"SimpleData" => self.data_key = name_attribute(e),
            b"MultiGeometry" => self.geometry.multi.push(Vec::new()),
            b"Polygon" => self.geometry.exterior = None,
            b"outerBoundaryIs" => self.geometry.in_outer_boundary = true,
            _ => {}
        }

        self.path.push(name);
    }

    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn close(&mut self, name: &[u8]) -> Result<(), KmlError> {
        match self.path.pop() {
            Some(open) if open == name => {}
            _ => return Err(KmlError::Unbalanced(String::from_utf8_lossy(name).into_owned())),
        }
        let text = mem::take(&mut self.text);
        let parent = self.path.last().map(Vec::as_slice);

        match name {
            b"name" => {
                let value = text.trim().to_string();
                match parent {
                    Some(b"Placemark") => {
                        if let Some(placemark) = self.placemark.as_mut() {
                            placemark.name = value;
                        }
                    }
                    Some(b"Document" | b"Folder") => {
                        if let Some((_, folder)) = self.containers.last_mut() {
                            folder.name = Some(value);
                        }
                    }
                    _ => {}
                }
            }
            b"value" if parent == Some(b"Data".as_slice()) => {
                let key = self.data_key.clone();
                self.push_data(key, text);
            }
            b"SimpleData" => {
                let key = self.data_key.take();
                self.push_data(key, text);
            }
            b"Data" => self.data_key = None,
            b"coordinates" => self.geometry.coords = parse_coordinates(&text),
            b"Point" => {
                if let Some(first) = self.geometry.coords.first().copied() {
                    self.emit(Geometry::Point(first));
                }
                self.geometry.coords.clear();
            }
            b"LineString" => {
                let coords = mem::take(&mut self.geometry.coords);
                self.emit(Geometry::LineString(coords));
            }
            b"LinearRing" => {
                let coords = mem::take(&mut self.geometry.coords);
                if self.geometry.in_outer_boundary {
                    self.geometry.exterior = Some(coords);
                }
            }
            b"outerBoundaryIs" => self.geometry.in_outer_boundary = false,
            b"Polygon" => {
                let exterior = self.geometry.exterior.take().unwrap_or_default();
                self.emit(Geometry::Polygon(Polygon { exterior }));
            }
            b"MultiGeometry" => {
                let parts = self.geometry.multi.pop().unwrap_or_default();
                self.emit(collapse_multi(parts));
            }
            b"Placemark" => {
                if let Some(placemark) = self.placemark.take() {
                    if let Some((_, folder)) = self.containers.last_mut() {
                        folder.features.push(Feature::Placemark(placemark));
                    }
                }
            }
            b"kml" | b"Document" | b"Folder" => self.close_container(),
            _ => {}
        }

        Ok(())
    }

    fn close_container(&mut self) {
        let Some((kind, folder)) = self.containers.pop() else {
            return;
        };
        let parent_kind = self.containers.last().map(|(k, _)| *k);

        match (kind, parent_kind) {
            (ContainerKind::Kml, _) => self.kml_root = Some(folder),
            (ContainerKind::Document, Some(ContainerKind::Kml) | None)
                if self.document.is_none() =>
            {
                self.document = Some(folder);
            }
            (_, Some(_)) => {
                if let Some((_, parent)) = self.containers.last_mut() {
                    parent.features.push(Feature::Folder(folder));
                }
            }
            (_, None) => {}
        }
    }

    fn push_data(&mut self, key: Option<String>, value: String) {
        if let (Some(key), Some(placemark)) = (key, self.placemark.as_mut()) {
            placemark.extended_data.push((key, value.trim().to_string()));
        }
    }

    fn emit(&mut self, geometry: Geometry) {
        if let Some(parts) = self.geometry.multi.last_mut() {
            parts.push(geometry);
        } else if let Some(placemark) = self.placemark.as_mut() {
            placemark.geometry = Some(geometry);
        }
    }

    fn finish(self) -> Result<Document, KmlError> {
        match (self.document, self.kml_root) {
            (Some(document), _) => Ok(document),
            (None, Some(root)) => Ok(root),
            (None, None) => Err(KmlError::MissingRoot),
        }
    }
}

fn name_attribute(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"name")
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn collapse_multi(parts: Vec<Geometry>) -> Geometry {
    if !parts.is_empty() && parts.iter().all(|g| matches!(g, Geometry::LineString(_))) {
        return Geometry::MultiLineString(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::LineString(line) => Some(line),
                    _ => None,
                })
                .collect(),
        );
    }
    if !parts.is_empty() && parts.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
        return Geometry::MultiPolygon(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(polygon) => Some(polygon),
                    _ => None,
                })
                .collect(),
        );
    }
    Geometry::Collection(parts)
}

/// Parse a KML `coordinates` body: whitespace-separated `lon,lat[,alt]`
/// tuples. Tuples that fail to parse are dropped.
fn parse_coordinates(text: &str) -> Vec<LonLat> {
    text.split_whitespace()
        .filter_map(|tuple| {
            let mut parts = tuple.split(',');
            let lon = parts.next()?.trim().parse::<f64>().ok()?;
            let lat = parts.next()?.trim().parse::<f64>().ok()?;
            Some([lon, lat])
        })
        .collect()
}
