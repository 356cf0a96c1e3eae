//! Shared data structures for the snapshot timeline
//!
//! - `DateKey`: calendar date keyed as `YYYYMMDD`
//! - `Side`, `PerSide`: the two factions every layer is partitioned by
//! - `SnapshotDescriptor`: one dated archive from the remote listing
//! - `DayFacts`: the persisted per-day record
//! - `BaseState`: the shared registry + static geometry record

mod base;
mod date_key;
mod day_facts;
mod side;
mod snapshot;

pub use base::*;
pub use date_key::*;
pub use day_facts::*;
pub use side::*;
pub use snapshot::*;

/// Source coordinate order as published in the documents.
pub type LonLat = [f64; 2];

/// Output coordinate order used by frontline, area and fortification layers.
pub type LatLon = [f64; 2];

/// An open or closed sequence of `[lat, lon]` vertices.
pub type Polyline = Vec<LatLon>;

/// Swap a source `[lon, lat]` vertex into `[lat, lon]` order.
#[inline]
pub fn swap_to_lat_lon(coord: LonLat) -> LatLon {
    [coord[1], coord[0]]
}
