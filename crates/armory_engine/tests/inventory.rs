use std::fs;

use armory_engine::{load_dataset, DatasetKind, InventoryError, InventoryFilter, InventoryStats};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const AIRCRAFT_JSON: &str = r#"[
    {
        "name": "Su-30MKI",
        "model": "Flanker-H",
        "service": "Air Force",
        "role": "Multirole",
        "country": "Russia",
        "units": 260,
        "description": "Twin-seat air superiority fighter."
    },
    {
        "name": "Rafale",
        "model": "Rafale EH/DH",
        "service": "Air Force",
        "role": "Multirole",
        "country": "France",
        "units": 36,
        "description": "Omnirole fighter."
    },
    {
        "name": "MiG-29K",
        "model": "Fulcrum-D",
        "service": "Navy",
        "role": "Carrier fighter",
        "country": "Russia",
        "units": 40,
        "description": "Carrier-based multirole fighter."
    }
]"#;

fn dataset_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("aircraft_data_india.json"), AIRCRAFT_JSON).unwrap();
    temp
}

#[test]
fn loads_dataset_by_kind_and_country() {
    let dir = dataset_dir();

    // Country casing follows the lowercase file naming convention.
    let units = load_dataset(dir.path(), DatasetKind::Aircraft, "India").unwrap();

    assert_eq!(units.len(), 3);
    assert_eq!(units[0].name, "Su-30MKI");
    assert_eq!(units[0].units, 260);
}

#[test]
fn missing_dataset_reports_the_path() {
    let dir = dataset_dir();

    let err = load_dataset(dir.path(), DatasetKind::Naval, "india").unwrap_err();

    match err {
        InventoryError::Read { path, .. } => assert!(path.ends_with("naval_data_india.json")),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn invalid_json_reports_a_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("drone_data_india.json"), "not json").unwrap();

    let err = load_dataset(dir.path(), DatasetKind::Drone, "india").unwrap_err();
    assert!(matches!(err, InventoryError::Parse { .. }));
}

#[test]
fn filters_compose_over_service_and_search() {
    let dir = dataset_dir();
    let units = load_dataset(dir.path(), DatasetKind::Aircraft, "india").unwrap();

    let filter = InventoryFilter {
        service: Some("Air Force".to_string()),
        ..InventoryFilter::default()
    };
    let rows = filter.apply(&units);
    assert_eq!(rows.len(), 2);

    let filter = InventoryFilter {
        service: Some("Air Force".to_string()),
        search: Some("flanker".to_string()),
        ..InventoryFilter::default()
    };
    let rows = filter.apply(&units);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Su-30MKI");

    let filter = InventoryFilter {
        country: Some("Russia".to_string()),
        ..InventoryFilter::default()
    };
    assert_eq!(filter.apply(&units).len(), 2);
}

#[test]
fn stats_sum_units_per_grouping() {
    let dir = dataset_dir();
    let units = load_dataset(dir.path(), DatasetKind::Aircraft, "india").unwrap();

    let stats = InventoryStats::collect(&units);

    assert_eq!(stats.total_units, 336);
    assert_eq!(stats.by_service["Air Force"], 296);
    assert_eq!(stats.by_service["Navy"], 40);
    assert_eq!(stats.by_role["Multirole"], 296);
    assert_eq!(stats.by_country["Russia"], 300);
    assert_eq!(stats.by_country["France"], 36);
}
