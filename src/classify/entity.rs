//! Set B tables per symbol set

use super::sidc::{contains_any, EntityCode, SymbolSet};

/// `(keywords, entity, entity_type)`; first match wins.
type TypeRule = (&'static [&'static str], &'static str, &'static str);

/// `(keyword, subtype)` within one entity type.
type SubtypeRule = (&'static str, &'static str);

const LAND_UNIT_RULES: &[TypeRule] = &[
    (&["infantry"], "12", "11"),
    (&["[uav]", "drone", "uav"], "12", "19"),
    (&["air assault"], "12", "11"),
    (&["tank"], "12", "05"),
    (&["air defense", "air defence"], "13", "01"),
    (&["missile", "rocket"], "13", "07"),
    (&["sof", "sbu", "sso"], "12", "18"),
    (&["mechanized", "mechanised"], "12", "11"),
    (&["engineering", "engineer"], "14", "07"),
    (&["artillery"], "13", "03"),
    (&["combined arms"], "12", "10"),
    (&["[np]"], "20", "07"),
    (&["border guard"], "20", "02"),
    (&["rifle"], "12", "11"),
    (&["anti-aircraft"], "13", "01"),
    (&["[ng]", "omon"], "14", "17"),
    (
        &["bars", "territorial defense brigade", "tdf", "airborne", "motorized"],
        "12",
        "11",
    ),
    (&["cbrn", "nbc"], "14", "01"),
    (
        &["[territorial]", "[pmc]", "pmc", "[vol]", "volunteer"],
        "12",
        "11",
    ),
    (&["signal"], "11", "10"),
    (&["railway"], "16", "36"),
    (&["logistics", "logistic"], "16", "02"),
    (&["reconnaissance", "reconnaisse", "recon"], "12", "13"),
    (&["electronic warfare"], "15", "05"),
    (&["communications"], "11", "10"),
    (&["spetsnaz", "marine"], "12", "11"),
    (&["combined"], "12", "10"),
    (&["[dpr]", "[lpr]"], "12", "11"),
    (&["wagner group"], "12", "10"),
    (&["special purpose"], "12", "17"),
    // Catch-alls, keep last
    (&["regiment", "battalion"], "12", "11"),
];

fn land_unit(name: &str) -> EntityCode {
    let mut code = EntityCode::new("12");
    if let Some((_, entity, entity_type)) = LAND_UNIT_RULES
        .iter()
        .find(|(words, _, _)| contains_any(name, words))
    {
        code.entity = *entity;
        code.entity_type = *entity_type;
    }

    if code.entity == "12" && code.entity_type == "11" {
        if name.contains("motorized") {
            code.entity_subtype = "04";
        } else if name.contains("mechanized") {
            code.entity_subtype = "02";
        }
    }

    if contains_any(name, &["marine", "naval"]) {
        code.modifier1 = "46";
    }
    code
}

/// Apply `(entity_type, table)` groups in order; a later hit overrides an
/// earlier one.
fn layered(
    mut code: EntityCode,
    name: &str,
    groups: &[(&'static str, &'static str, &[SubtypeRule])],
) -> EntityCode {
    for &(entity, entity_type, table) in groups {
        if let Some(&(_, subtype)) = table.iter().find(|(word, _)| name.contains(word)) {
            code.entity = entity;
            code.entity_type = entity_type;
            code.entity_subtype = subtype;
        }
    }
    code
}

fn land_installation(name: &str) -> EntityCode {
    const MILITARY: &[SubtypeRule] = &[
        ("training center", "02"),
        ("military base", "02"),
        ("aviation center", "02"),
        ("testing centre", "02"),
        ("command post", "02"),
    ];
    const TRANSPORTATION: &[SubtypeRule] = &[
        ("airbase", "01"),
        ("air base", "01"),
        ("airfield", "01"),
        ("air field", "01"),
    ];

    layered(
        EntityCode::new("12"),
        name,
        &[("12", "08", MILITARY), ("12", "13", TRANSPORTATION)],
    )
}

fn air(name: &str) -> EntityCode {
    const FIXED_WING: &[SubtypeRule] = &[
        ("mixed", "05"),
        ("bomber", "03"),
        ("fighter", "04"),
        ("tanker", "09"),
        ("transport", "07"),
        ("assault", "02"),
        ("reconnaissance", "11"),
        ("training", "12"),
        ("combat control", "15"),
        ("a-50", "16"),
        ("su-25", "04"),
        ("army aviation", "00"),
        ("tactical aviation", "00"),
        ("naval attack", "18"),
        ("early warning", "16"),
        ("anti-submarine", "18"),
    ];
    const ROTARY_WING: &[SubtypeRule] = &[("helicopter", "00")];

    layered(
        EntityCode::new("11"),
        name,
        &[("11", "01", FIXED_WING), ("11", "02", ROTARY_WING)],
    )
}

fn sea_surface(name: &str) -> EntityCode {
    const SURFACE: &[SubtypeRule] = &[
        ("corvette", "05"),
        ("frigate", "04"),
        ("destroyer", "03"),
        ("cruiser", "02"),
        ("buyan-m", "05"),
    ];
    const AMPHIBIOUS: &[SubtypeRule] = &[("landing ship", "07"), ("ropucha", "07")];
    const MINE_WARFARE: &[SubtypeRule] = &[("minesweeper", "02")];
    const PATROL: &[SubtypeRule] = &[("patrol", "02")];
    const AUXILIARY: &[SubtypeRule] = &[("oiler", "10"), ("tanker", "10"), ("intelligence", "04")];

    const GUIDED_MISSILE: &str = "15";
    const OTHER_GUIDED_MISSILE: &str = "16";
    const ANTISUBMARINE: &str = "03";
    const MINE_COUNTERMEASURES: &str = "07";
    const ISR: &str = "06";

    let mut code = layered(
        EntityCode::new("12"),
        name,
        &[
            ("12", "02", SURFACE),
            ("12", "03", AMPHIBIOUS),
            ("12", "04", MINE_WARFARE),
            ("12", "05", PATROL),
            ("13", "01", AUXILIARY),
        ],
    );

    if name.contains("dnieper river flotilla") {
        code.entity = "12";
        code.entity_type = "05";
        code.entity_subtype = "02";
    }

    code.modifier1 = if contains_any(name, &["guided missile", "karakurt", "askold", "tsiklon"]) {
        GUIDED_MISSILE
    } else if name.contains("tarantul") {
        OTHER_GUIDED_MISSILE
    } else if contains_any(name, &["steregushchiy", "orekhovo-zuyevo"]) {
        GUIDED_MISSILE
    } else if name.contains("asw") {
        ANTISUBMARINE
    } else if name.contains("minesweeper") {
        MINE_COUNTERMEASURES
    } else if contains_any(name, &["intelligence", "tanker"]) {
        ISR
    } else {
        "00"
    };
    code
}

fn sea_subsurface(name: &str) -> EntityCode {
    let mut code = EntityCode::new("11");
    if name.contains("submarine") {
        code.entity_type = "01";
    }
    if name.contains("kilo class") {
        // attack, diesel electric
        code.modifier1 = "08";
        code.modifier2 = "02";
    }
    code
}

/// Set B for a prepared unit name within its symbol set.
pub fn entity_code(name: &str, symbol_set: SymbolSet) -> EntityCode {
    match symbol_set {
        SymbolSet::Air => air(name),
        SymbolSet::LandUnit => land_unit(name),
        SymbolSet::LandInstallation => land_installation(name),
        SymbolSet::SeaSurface => sea_surface(name),
        SymbolSet::SeaSubsurface => sea_subsurface(name),
        SymbolSet::Unknown => EntityCode::default(),
    }
}
