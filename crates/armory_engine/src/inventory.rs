use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Kind of unit dataset, one JSON file per country each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Aircraft,
    Drone,
    Land,
    Naval,
}

impl DatasetKind {
    pub const ALL_KINDS: [DatasetKind; 4] = [
        DatasetKind::Aircraft,
        DatasetKind::Drone,
        DatasetKind::Land,
        DatasetKind::Naval,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            DatasetKind::Aircraft => "aircraft",
            DatasetKind::Drone => "drone",
            DatasetKind::Land => "land",
            DatasetKind::Naval => "naval",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dataset kind: {0}")]
pub struct ParseDatasetError(String);

impl FromStr for DatasetKind {
    type Err = ParseDatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "aircraft" => Ok(DatasetKind::Aircraft),
            "drone" => Ok(DatasetKind::Drone),
            "land" => Ok(DatasetKind::Land),
            "naval" => Ok(DatasetKind::Naval),
            other => Err(ParseDatasetError(other.to_string())),
        }
    }
}

/// One unit row in a country dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub role: String,
    /// Country of origin, not the operator.
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub units: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads `{kind}_data_{country}.json` from the data directory.
pub fn load_dataset(
    dir: &Path,
    kind: DatasetKind,
    country: &str,
) -> Result<Vec<UnitRecord>, InventoryError> {
    let file = format!(
        "{}_data_{}.json",
        kind.file_stem(),
        country.trim().to_lowercase()
    );
    let path = dir.join(file);
    let text = fs::read_to_string(&path).map_err(|source| InventoryError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InventoryError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Grid filters: each field is either a concrete value or "all".
/// `search` matches case-insensitively over name, model, and description.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub service: Option<String>,
    pub role: Option<String>,
    pub country: Option<String>,
    pub search: Option<String>,
}

impl InventoryFilter {
    pub fn matches(&self, unit: &UnitRecord) -> bool {
        let matches_search = match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                unit.name.to_lowercase().contains(&term)
                    || unit.model.to_lowercase().contains(&term)
                    || unit.description.to_lowercase().contains(&term)
            }
        };

        matches_search
            && self.service.as_deref().is_none_or(|s| unit.service == s)
            && self.role.as_deref().is_none_or(|r| unit.role == r)
            && self.country.as_deref().is_none_or(|c| unit.country == c)
    }

    pub fn apply<'a>(&self, units: &'a [UnitRecord]) -> Vec<&'a UnitRecord> {
        units.iter().filter(|unit| self.matches(unit)).collect()
    }
}

/// Unit totals grouped the way the grid header reports them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InventoryStats {
    pub total_units: u64,
    pub by_service: BTreeMap<String, u64>,
    pub by_role: BTreeMap<String, u64>,
    pub by_country: BTreeMap<String, u64>,
}

impl InventoryStats {
    pub fn collect<'a, I>(units: I) -> Self
    where
        I: IntoIterator<Item = &'a UnitRecord>,
    {
        let mut stats = InventoryStats::default();
        for unit in units {
            stats.total_units += unit.units;
            *stats.by_service.entry(unit.service.clone()).or_default() += unit.units;
            *stats.by_role.entry(unit.role.clone()).or_default() += unit.units;
            *stats.by_country.entry(unit.country.clone()).or_default() += unit.units;
        }
        stats
    }
}
