//! Unit name classification
//!
//! A [`Classifier`] maps a raw unit name and its side to a military symbol
//! code. [`SidcClassifier`] is the keyword-table implementation used for
//! every persisted registry.

mod entity;
mod sidc;

pub use sidc::{prepare_unit_name, SidcClassifier, SymbolCode, SymbolSet};

use tracing::info;

use crate::registry::UnitRegistry;
use crate::types::Side;

/// Stateless name to symbol code mapping.
pub trait Classifier: Send + Sync {
    fn classify(&self, name: &str, side: Side) -> String;
}

/// Compute and log the code of every registry entry without storing it.
///
/// Returns the number of entries whose code differs from the stored one.
pub fn check(registry: &UnitRegistry, classifier: &dyn Classifier) -> usize {
    let mut changed = 0;

    for side in Side::ALL {
        for (id, entry) in registry.iter().filter(|(_, e)| e.side == side) {
            let code = classifier.classify(&entry.name, entry.side);
            let stale = entry.symbol_code.as_deref() != Some(code.as_str());
            if stale {
                changed += 1;
            }
            info!(
                unit_id = id,
                side = %entry.side,
                name = %entry.name,
                sidc = %code,
                stale,
                "Classified unit"
            );
        }
    }

    info!(
        units = registry.len(),
        changed, "Classification check complete (nothing written)"
    );
    changed
}
