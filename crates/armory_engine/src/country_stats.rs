use std::collections::BTreeMap;

use once_cell::sync::Lazy;

/// One headline figure in a country's stat sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatLine {
    pub label: &'static str,
    pub value: &'static str,
}

const fn line(label: &'static str, value: &'static str) -> StatLine {
    StatLine { label, value }
}

static COUNTRY_STATS: Lazy<BTreeMap<&'static str, Vec<StatLine>>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "India",
            vec![
                line("Active Personnel", "1,455,550"),
                line("Reserve Personnel", "1,155,000"),
                line("Military Budget", "$72.9B (2023)"),
                line("Nuclear Warheads", "160"),
                line("Tanks", "4,614"),
                line("Aircraft", "2,082"),
                line("Naval Vessels", "295"),
                line("Global Rank", "4th"),
            ],
        ),
        (
            "United States of America",
            vec![
                line("Active Personnel", "1,390,000"),
                line("Reserve Personnel", "850,000"),
                line("Military Budget", "$877B (2023)"),
                line("Nuclear Warheads", "5,244"),
                line("Tanks", "6,209"),
                line("Aircraft", "13,300"),
                line("Naval Vessels", "484"),
                line("Global Rank", "1st"),
            ],
        ),
    ])
});

/// Looks up the stat sheet for a country, ignoring case and surrounding
/// whitespace. Returns `None` for countries without curated figures.
pub fn stats_for_country(name: &str) -> Option<&'static [StatLine]> {
    let wanted = name.trim();
    COUNTRY_STATS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
        .map(|(_, lines)| lines.as_slice())
}
