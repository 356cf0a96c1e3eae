//! Calendar date keys

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const KEY_FORMAT: &str = "%Y%m%d";

/// A calendar day rendered as an 8-digit `YYYYMMDD` key.
///
/// Ordering follows the calendar, which for this fixed-width format is also
/// the lexicographic order of the rendered keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a date token in an arbitrary `chrono` format.
    pub fn parse_with_format(token: &str, format: &str) -> Option<Self> {
        NaiveDate::parse_from_str(token, format).ok().map(Self)
    }

    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day.
    pub fn pred(self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(1)).map(Self)
    }

    /// The next calendar day.
    pub fn succ(self) -> Option<Self> {
        self.0.checked_add_days(Days::new(1)).map(Self)
    }

    /// Every calendar day from `start` to `end`, both inclusive.
    ///
    /// Returns an empty vector when `start > end`.
    pub fn range_inclusive(start: Self, end: Self) -> Vec<Self> {
        start
            .0
            .iter_days()
            .take_while(|d| *d <= end.0)
            .map(Self)
            .collect()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

/// Error for strings that are not 8-digit calendar keys
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date key: {0:?}")]
pub struct InvalidDateKey(pub String);

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDateKey(s.to_string()));
        }
        NaiveDate::parse_from_str(s, KEY_FORMAT)
            .map(Self)
            .map_err(|_| InvalidDateKey(s.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_round_trips() {
        let k = DateKey::from_ymd(2024, 1, 7).unwrap();
        assert_eq!(k.to_string(), "20240107");
        assert_eq!(key("20240107"), k);
    }

    #[test]
    fn test_rejects_malformed_keys() {
        assert!("2024017".parse::<DateKey>().is_err());
        assert!("2024-01-07".parse::<DateKey>().is_err());
        assert!("20240230".parse::<DateKey>().is_err());
        assert!("base".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_range_spans_leap_day() {
        let range = DateKey::range_inclusive(key("20240228"), key("20240301"));
        let rendered: Vec<String> = range.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["20240228", "20240229", "20240301"]);
    }

    #[test]
    fn test_range_without_leap_day() {
        let range = DateKey::range_inclusive(key("20230228"), key("20230301"));
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_range_single_and_inverted() {
        assert_eq!(DateKey::range_inclusive(key("20240105"), key("20240105")).len(), 1);
        assert!(DateKey::range_inclusive(key("20240106"), key("20240105")).is_empty());
    }

    #[test]
    fn test_pred_crosses_year_boundary() {
        assert_eq!(key("20240101").pred(), Some(key("20231231")));
        assert_eq!(key("20231231").succ(), Some(key("20240101")));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&key("20240107")).unwrap();
        assert_eq!(json, "\"20240107\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key("20240107"));
    }
}
