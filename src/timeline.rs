//! Timeline Store: `date -> DayFacts` for the dates touched by a run.

use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{DateKey, DayFacts, GeoBuckets};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineStore {
    days: BTreeMap<DateKey, DayFacts>,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an (empty) record exists for every date in `dates`.
    pub fn init_dates(&mut self, dates: &[DateKey]) {
        for &date in dates {
            self.days.entry(date).or_default();
        }
    }

    /// Store the snapshot layers of `facts` for `date`.
    ///
    /// Snapshot layers are replaced wholesale, so merging the same record
    /// twice is the same as merging it once. Geolocations are left alone;
    /// they come from [`TimelineStore::apply_geolocations`].
    pub fn merge(&mut self, date: DateKey, facts: DayFacts) {
        let day = self.days.entry(date).or_default();
        day.unit_count = facts.unit_count;
        day.units = facts.units;
        day.frontline = facts.frontline;
        day.areas = facts.areas;
        day.areas_ua = facts.areas_ua;
    }

    /// Fold dated geolocation buckets into matching days.
    ///
    /// Buckets for dates outside the store are dropped. Returns how many
    /// dates received annotations.
    pub fn apply_geolocations(&mut self, buckets: BTreeMap<DateKey, GeoBuckets>) -> usize {
        let mut applied = 0;
        let mut dropped = 0;
        for (date, geos) in buckets {
            match self.days.get_mut(&date) {
                Some(day) => {
                    day.geos = geos;
                    applied += 1;
                }
                None => dropped += 1,
            }
        }
        debug!(applied, dropped, "Geolocations folded into timeline");
        applied
    }

    pub fn get(&self, date: DateKey) -> Option<&DayFacts> {
        self.days.get(&date)
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.days.contains_key(&date)
    }

    /// Days in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (DateKey, &DayFacts)> {
        self.days.iter().map(|(&date, facts)| (date, facts))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoAnnotation, PerSide, UnitPosition};

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn facts(ru_count: u32) -> DayFacts {
        DayFacts {
            unit_count: PerSide::new(ru_count, 1),
            units: PerSide::new(vec![UnitPosition(1, [37.0, 48.0])], Vec::new()),
            frontline: vec![[48.0, 37.0], [48.5, 37.5]],
            ..DayFacts::default()
        }
    }

    #[test]
    fn test_init_covers_every_date() {
        let mut store = TimelineStore::new();
        let dates = DateKey::range_inclusive(key("20240228"), key("20240301"));
        store.init_dates(&dates);
        assert_eq!(store.len(), 3);
        assert!(store.get(key("20240229")).unwrap().is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut once = TimelineStore::new();
        once.init_dates(&[key("20240105")]);
        once.merge(key("20240105"), facts(4));

        let mut twice = once.clone();
        twice.merge(key("20240105"), facts(4));

        assert_eq!(once, twice);
        assert_eq!(once.get(key("20240105")).unwrap().unit_count.ru, 4);
    }

    #[test]
    fn test_merge_order_across_dates_commutes() {
        let mut a = TimelineStore::new();
        a.merge(key("20240101"), facts(1));
        a.merge(key("20240102"), facts(2));

        let mut b = TimelineStore::new();
        b.merge(key("20240102"), facts(2));
        b.merge(key("20240101"), facts(1));

        assert_eq!(a, b);
    }

    #[test]
    fn test_merge_keeps_geolocations() {
        let mut store = TimelineStore::new();
        store.init_dates(&[key("20240103")]);

        let mut buckets = BTreeMap::new();
        let mut geos = GeoBuckets::default();
        geos.ua.push(GeoAnnotation {
            coords: [36.0, 48.0],
            description: "-".to_string(),
        });
        buckets.insert(key("20240103"), geos.clone());
        buckets.insert(key("20231201"), geos.clone());

        assert_eq!(store.apply_geolocations(buckets), 1);
        store.merge(key("20240103"), facts(2));

        assert_eq!(store.get(key("20240103")).unwrap().geos, geos);
        assert!(!store.contains(key("20231201")));
    }
}
