//! Failed reloads keep the last good generation.

use crate::common::*;

#[test]
fn malformed_table_keeps_stale_data() {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    tables.write("Skill", &["10,1,fire"]);
    let coordinator = ReloadCoordinator::new(tables.config(), catalog());
    assert!(coordinator.initialize().report().unwrap().is_clean());

    tables.write("Item", &["1,3,sword", "oops"]);
    let report = coordinator.reload_all();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].type_name, "Item");
    assert!(report.failed[0].error.contains("expected 3 fields"));
    assert_eq!(report.loaded.len(), 1);
    assert_eq!(report.loaded[0].type_name, "Skill");

    let registry = coordinator.registry();
    assert_eq!(registry.list_all::<Item>().len(), 3);
    assert_eq!(registry.list_id_by_index::<Item>("lvl", &[3.into()]), vec![1, 2]);

    let stats = registry.store::<Item>().unwrap().stats();
    assert_eq!(stats.generation, 1);
    assert_eq!(stats.failed_reloads, 1);
}

#[test]
fn missing_source_is_reported() {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    let coordinator = ReloadCoordinator::new(tables.config(), catalog());

    let outcome = coordinator.initialize();
    let report = outcome.report().unwrap();
    assert!(report.has_failed("Skill"));
    assert!(report.failed[0].error.contains("No source"));

    // The store exists but stays empty until its table appears
    let registry = coordinator.registry();
    assert!(registry.contains::<Skill>());
    assert!(registry.list_all::<Skill>().is_empty());

    tables.write("Skill", &["10,1,fire", "11,2,ice"]);
    let report = coordinator.reload_all();
    assert!(report.is_clean());
    assert_eq!(registry.list_all::<Skill>().len(), 2);
}

#[test]
fn duplicate_ids_reject_the_whole_load() {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    tables.write("Skill", &[]);
    let coordinator = ReloadCoordinator::new(tables.config(), catalog());
    coordinator.initialize();

    tables.write("Item", &["1,3,sword", "1,4,axe"]);
    let report = coordinator.reload_all();

    assert!(report.has_failed("Item"));
    assert!(report.failed[0].error.contains("Duplicate id 1"));
    assert_eq!(coordinator.registry().get::<Item>(&1).unwrap().kind, "sword");
    assert_eq!(coordinator.registry().list_all::<Item>().len(), 3);
}
