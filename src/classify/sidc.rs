//! Symbol identification codes
//!
//! Codes are 20 digits: version, identity, symbol set, status, headquarters
//! and echelon amplifiers (set A), followed by entity, entity type, entity
//! subtype and two sector modifiers (set B).

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::{entity, Classifier};
use crate::types::Side;

const VERSION: &str = "30";
const STATUS_PRESENT: &str = "0";
const HQ_UNKNOWN: &str = "0";

/// Broad symbol families a unit name can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolSet {
    Unknown,
    Air,
    LandUnit,
    LandInstallation,
    SeaSurface,
    SeaSubsurface,
}

impl SymbolSet {
    pub const fn code(self) -> &'static str {
        match self {
            SymbolSet::Unknown => "00",
            SymbolSet::Air => "01",
            SymbolSet::LandUnit => "10",
            SymbolSet::LandInstallation => "20",
            SymbolSet::SeaSurface => "30",
            SymbolSet::SeaSubsurface => "35",
        }
    }

    /// Pick the symbol set from a prepared (lowercased) unit name.
    ///
    /// Rules are checked in priority order; the first hit wins and anything
    /// unmatched is a land unit.
    pub fn detect(name: &str) -> Self {
        const RULES: &[(&[&str], SymbolSet)] = &[
            (&["[uav]"], SymbolSet::LandUnit),
            (
                &[
                    "air base",
                    "airbase",
                    "air field",
                    "airfield",
                    "military base",
                    "command post",
                    "testing centre",
                    "aviation center",
                    "training center",
                ],
                SymbolSet::LandInstallation,
            ),
            (&["anti-aircraft"], SymbolSet::LandUnit),
            (
                &["anti-submarine helicopter", "anti-submarine aviation"],
                SymbolSet::Air,
            ),
            (&["submarine"], SymbolSet::SeaSubsurface),
            // Air before sea surface: "aviation tanker" is a plane
            (
                &["aviation", "helicopter", "aircraft", "a-50", "su-25"],
                SymbolSet::Air,
            ),
            (
                &[
                    "minesweeper",
                    "ship",
                    "corvette",
                    "tanker",
                    "frigate",
                    "boat",
                    "cruiser",
                    "flotilla",
                    "oiler",
                    "buyan-m",
                ],
                SymbolSet::SeaSurface,
            ),
        ];

        RULES
            .iter()
            .find(|(words, _)| contains_any(name, words))
            .map_or(SymbolSet::LandUnit, |(_, set)| *set)
    }
}

/// Set B of a symbol code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityCode {
    pub entity: &'static str,
    pub entity_type: &'static str,
    pub entity_subtype: &'static str,
    pub modifier1: &'static str,
    pub modifier2: &'static str,
}

impl EntityCode {
    pub const fn new(entity: &'static str) -> Self {
        Self {
            entity,
            entity_type: "00",
            entity_subtype: "00",
            modifier1: "00",
            modifier2: "00",
        }
    }
}

impl Default for EntityCode {
    fn default() -> Self {
        Self::new("00")
    }
}

/// A fully assembled symbol code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolCode {
    pub identity: &'static str,
    pub symbol_set: SymbolSet,
    pub amplifiers: [char; 2],
    pub entity: EntityCode,
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.entity;
        write!(
            f,
            "{VERSION}{}{}{STATUS_PRESENT}{HQ_UNKNOWN}{}{}{}{}{}{}{}",
            self.identity,
            self.symbol_set.code(),
            self.amplifiers[0],
            self.amplifiers[1],
            e.entity,
            e.entity_type,
            e.entity_subtype,
            e.modifier1,
            e.modifier2,
        )
    }
}

pub(super) fn contains_any(name: &str, words: &[&str]) -> bool {
    words.iter().any(|w| name.contains(w))
}

const NAME_FIXES: &[(&str, &str)] = &[
    ("birds of magyar", "[uav] birds of magyar"),
    ("hornets of dovbush", "[uav] hornets of dovbush"),
    ("sons of thunder", "[uav] sons of thunder"),
    ("wasp unit", "[uav] wasp unit"),
];

/// Names containing " of " that are not "unit of parent".
const UNSPLIT_NAMES: &[&str] = &[
    "[uav] birds of magyar",
    "legion of russia battalion",
    "[uav] sons of thunder",
    "[uav] hornets of dovbush",
    "freedom of russia legion",
    "legion of russia legion",
];

fn bracketed() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(.+?\)").ok()).as_ref()
}

/// Lowercase, apply known renames, drop parenthesised text and split
/// `"<unit> of <parent>"` at the first ` of `.
pub fn prepare_unit_name(raw: &str) -> (String, Option<String>) {
    let mut name = raw.to_lowercase();
    if let Some((_, fixed)) = NAME_FIXES.iter().find(|(from, _)| *from == name) {
        name = (*fixed).to_string();
    }
    if let Some(re) = bracketed() {
        name = re.replace_all(&name, "").into_owned();
    }

    if UNSPLIT_NAMES.contains(&name.as_str()) {
        return (name, None);
    }
    match name.split_once(" of ") {
        Some((unit, parent)) => (unit.to_string(), Some(parent.to_string())),
        None => (name, None),
    }
}

const fn identity(side: Side) -> &'static str {
    match side {
        Side::Ua => "03",
        Side::Ru => "06",
    }
}

const SMALL_ECHELONS: &[(&str, char)] = &[
    ("brigade", '8'),
    ("regiment", '7'),
    ("battalion", '6'),
    ("squadron", '6'),
    ("company", '5'),
    ("detachment", '4'),
];

const LARGE_ECHELONS: &[(&str, char)] = &[
    ("army group", '4'),
    ("army corps", '2'),
    ("army", '3'),
    ("corps", '2'),
    ("division", '1'),
];

const BATTALION_LIKE: &[&str] = &["bars", "[omon]", "[pmc]", "pmc"];

fn echelon(name: &str, table: &[(&str, char)]) -> Option<char> {
    table
        .iter()
        .find(|(word, _)| name.contains(word))
        .map(|(_, code)| *code)
}

/// Echelon amplifier pair: `1x` at brigade and below, `2x` above.
pub fn amplifiers(name: &str, parent: Option<&str>) -> [char; 2] {
    let mut amp = if let Some(size) = echelon(name, SMALL_ECHELONS) {
        ['1', size]
    } else if let Some(size) = echelon(name, LARGE_ECHELONS) {
        ['2', size]
    } else if contains_any(name, &["bars", "[omon]", "[pmc]", "pmc", "wagner group"]) {
        ['1', '0']
    } else {
        ['0', '0']
    };

    if contains_any(name, BATTALION_LIKE) {
        amp[1] = '6';
    }
    if name.contains("wagner group") {
        amp[1] = '8';
    }
    // "artillery division of <brigade>" is a battalion-sized divizion
    if parent.is_some_and(|p| p.contains("brigade")) && amp[1] == '1' {
        amp = ['1', '6'];
    }
    amp
}

/// Keyword-table classifier producing 20-digit symbol codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidcClassifier;

impl SidcClassifier {
    pub fn symbol_code(name: &str, side: Side) -> SymbolCode {
        let (unit, parent) = prepare_unit_name(name);
        let symbol_set = SymbolSet::detect(&unit);

        SymbolCode {
            identity: identity(side),
            symbol_set,
            amplifiers: amplifiers(&unit, parent.as_deref()),
            entity: entity::entity_code(&unit, symbol_set),
        }
    }
}

impl Classifier for SidcClassifier {
    fn classify(&self, name: &str, side: Side) -> String {
        Self::symbol_code(name, side).to_string()
    }
}
