//! Faction partitioning

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two factions. Serialized as its lowercase two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Ru,
    Ua,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Ru, Side::Ua];

    pub const fn code(self) -> &'static str {
        match self {
            Side::Ru => "ru",
            Side::Ua => "ua",
        }
    }

    /// Parse a side code, ignoring ASCII case.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Some(Side::Ru),
            "ua" => Some(Side::Ua),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A value held once per side, serialized as `{"ru": .., "ua": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSide<T> {
    #[serde(default)]
    pub ru: T,
    #[serde(default)]
    pub ua: T,
}

impl<T> PerSide<T> {
    pub const fn new(ru: T, ua: T) -> Self {
        Self { ru, ua }
    }

    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Ru => &self.ru,
            Side::Ua => &self.ua,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Ru => &mut self.ru,
            Side::Ua => &mut self.ua,
        }
    }

    /// Iterate `(side, value)` pairs in `Side::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_codes() {
        assert_eq!(Side::from_code("UA"), Some(Side::Ua));
        assert_eq!(Side::from_code(" ru "), Some(Side::Ru));
        assert_eq!(Side::from_code("by"), None);
        assert_eq!(serde_json::to_string(&Side::Ua).unwrap(), "\"ua\"");
    }

    #[test]
    fn test_per_side_shape() {
        let mut counts: PerSide<u32> = PerSide::default();
        *counts.get_mut(Side::Ua) += 3;
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"ru":0,"ua":3}"#);
    }
}
