//! Unit Registry
//!
//! Stable `(side, raw name) -> unit_id` identities shared by every snapshot
//! and every run. Ids are issued as `max + 1` and never reused, so a name
//! keeps its id for the lifetime of the persisted registry.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::types::{Side, UnitEntry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitRegistry {
    entries: BTreeMap<u32, UnitEntry>,
    by_name: HashMap<(Side, String), u32>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from its persisted id map.
    ///
    /// If two ids carry the same `(side, name)`, the lower id wins lookups;
    /// both entries are kept so no id disappears.
    pub fn load(entries: BTreeMap<u32, UnitEntry>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        for (&id, entry) in &entries {
            let key = (entry.side, entry.name.clone());
            if let Some(existing) = by_name.get(&key) {
                warn!(unit_id = id, kept = existing, name = %entry.name, "Duplicate unit name in registry");
                continue;
            }
            by_name.insert(key, id);
        }
        Self { entries, by_name }
    }

    /// The persisted form: every id ever issued, in id order.
    pub fn dump(&self) -> BTreeMap<u32, UnitEntry> {
        self.entries.clone()
    }

    pub fn into_entries(self) -> BTreeMap<u32, UnitEntry> {
        self.entries
    }

    /// Id for `name` on `side`, issuing a new one if the name is unseen.
    ///
    /// Matching is exact and case-sensitive on the raw name. Returns `None`
    /// for an unseen name once `u32::MAX` has been issued; existing ids are
    /// never handed out again.
    pub fn resolve(&mut self, side: Side, name: &str) -> Option<u32> {
        if let Some(&id) = self.by_name.get(&(side, name.to_string())) {
            return Some(id);
        }

        let Some(id) = self.next_id() else {
            warn!(side = %side, name, "Unit id space exhausted, unit not registered");
            return None;
        };
        self.entries.insert(
            id,
            UnitEntry {
                name: name.to_string(),
                side,
                symbol_code: None,
            },
        );
        self.by_name.insert((side, name.to_string()), id);
        debug!(unit_id = id, side = %side, name, "Registered new unit");
        Some(id)
    }

    /// Look up without registering.
    pub fn lookup(&self, side: Side, name: &str) -> Option<u32> {
        self.by_name.get(&(side, name.to_string())).copied()
    }

    fn next_id(&self) -> Option<u32> {
        match self.entries.last_key_value() {
            Some((&max, _)) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Recompute the symbol code of every entry.
    pub fn classify_all(&mut self, classifier: &dyn Classifier) {
        for entry in self.entries.values_mut() {
            entry.symbol_code = Some(classifier.classify(&entry.name, entry.side));
        }
    }

    pub fn get(&self, id: u32) -> Option<&UnitEntry> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &UnitEntry)> {
        self.entries.iter().map(|(&id, entry)| (id, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SidcClassifier;

    #[test]
    fn test_resolve_is_stable() {
        let mut registry = UnitRegistry::new();
        let a = registry.resolve(Side::Ru, "1st Guards Tank Army");
        let b = registry.resolve(Side::Ua, "47th Mechanized Brigade");
        let a_again = registry.resolve(Side::Ru, "1st Guards Tank Army");

        assert_eq!(a, Some(1));
        assert_eq!(b, Some(2));
        assert_eq!(a, a_again);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_identity_is_case_and_side_sensitive() {
        let mut registry = UnitRegistry::new();
        let upper = registry.resolve(Side::Ru, "VDV");
        let lower = registry.resolve(Side::Ru, "vdv");
        let other_side = registry.resolve(Side::Ua, "VDV");
        assert_ne!(upper, lower);
        assert_ne!(upper, other_side);
        assert_ne!(lower, other_side);
    }

    #[test]
    fn test_round_trip_keeps_ids_and_continues_from_max() {
        let mut persisted = BTreeMap::new();
        persisted.insert(
            3,
            UnitEntry {
                name: "Unused Unit".to_string(),
                side: Side::Ua,
                symbol_code: Some("30031000000000000000".to_string()),
            },
        );
        persisted.insert(
            7,
            UnitEntry {
                name: "Storm-Z".to_string(),
                side: Side::Ru,
                symbol_code: None,
            },
        );

        let mut registry = UnitRegistry::load(persisted.clone());
        assert_eq!(registry.dump(), persisted);
        assert_eq!(registry.resolve(Side::Ru, "Storm-Z"), Some(7));
        assert_eq!(registry.resolve(Side::Ru, "New Unit"), Some(8));

        let json = serde_json::to_string(&registry.dump()).unwrap();
        let reloaded = UnitRegistry::load(serde_json::from_str(&json).unwrap());
        assert_eq!(reloaded, registry);
        assert_eq!(reloaded.lookup(Side::Ua, "Unused Unit"), Some(3));
    }

    #[test]
    fn test_classify_all_fills_codes() {
        let mut registry = UnitRegistry::new();
        let id = registry.resolve(Side::Ua, "47th Mechanized Brigade").unwrap();
        assert!(registry.get(id).unwrap().symbol_code.is_none());

        registry.classify_all(&SidcClassifier);
        let code = registry.get(id).unwrap().symbol_code.clone().unwrap();
        assert_eq!(code.len(), 20);
        assert!(code.starts_with("3003"));
    }

    #[test]
    fn test_exhausted_id_space_never_reuses_an_id() {
        let mut persisted = BTreeMap::new();
        persisted.insert(
            u32::MAX,
            UnitEntry {
                name: "Last Unit".to_string(),
                side: Side::Ru,
                symbol_code: None,
            },
        );
        let mut registry = UnitRegistry::load(persisted.clone());

        assert_eq!(registry.resolve(Side::Ru, "Last Unit"), Some(u32::MAX));
        assert_eq!(registry.resolve(Side::Ru, "Newcomer"), None);
        assert_eq!(registry.lookup(Side::Ru, "Newcomer"), None);
        assert_eq!(registry.get(u32::MAX).unwrap().name, "Last Unit");
        assert_eq!(registry.dump(), persisted);
    }
}
