//! Initialization latch and listener behavior.

use crate::common::*;
use parking_lot::Mutex;
use std::sync::Arc;

struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    registry: Option<Arc<StoreRegistry>>,
}

impl ReloadListener for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn on_reload(&self) -> Result<()> {
        // Listeners observe the freshly loaded data
        let entry = match &self.registry {
            Some(registry) => format!("{}:{}", self.name, registry.list_all::<Item>().len()),
            None => self.name.to_string(),
        };
        self.log.lock().push(entry);
        Ok(())
    }
}

struct Exploding;

impl ReloadListener for Exploding {
    fn name(&self) -> &str {
        "exploding"
    }

    fn on_reload(&self) -> Result<()> {
        panic!("derived cache corrupt");
    }
}

fn setup() -> (TableDir, ReloadCoordinator, Arc<Mutex<Vec<String>>>) {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    tables.write("Skill", &[]);
    let coordinator = ReloadCoordinator::new(tables.config(), catalog());
    (tables, coordinator, Arc::new(Mutex::new(Vec::new())))
}

#[test]
fn second_initialize_is_a_no_op() {
    let (tables, coordinator, log) = setup();
    coordinator.add_listener(Arc::new(Recorder {
        name: "shop",
        log: Arc::clone(&log),
        registry: Some(Arc::clone(coordinator.registry())),
    }));

    assert!(!coordinator.initialize().is_skipped());
    tables.write("Item", &["9,1,bow"]);
    assert!(coordinator.initialize().is_skipped());

    assert_eq!(*log.lock(), vec!["shop:3"]);
    assert_eq!(coordinator.registry().list_all::<Item>().len(), 3);

    let report = coordinator.reload_all();
    assert!(report.is_clean());
    assert_eq!(*log.lock(), vec!["shop:3", "shop:1"]);
}

#[test]
fn listeners_run_in_order_despite_failures() {
    let (_tables, coordinator, log) = setup();
    for name in ["first", "second"] {
        coordinator.add_listener(Arc::new(Recorder {
            name,
            log: Arc::clone(&log),
            registry: None,
        }));
    }
    coordinator.add_listener(Arc::new(Exploding));
    let third: Arc<dyn ReloadListener> = Arc::new(Recorder {
        name: "third",
        log: Arc::clone(&log),
        registry: None,
    });
    coordinator.add_listener(Arc::clone(&third));
    // The same instance again: ignored
    coordinator.add_listener(third);
    // Another instance sharing a name: still notified
    coordinator.add_listener(Arc::new(Recorder {
        name: "first",
        log: Arc::clone(&log),
        registry: None,
    }));

    let report = coordinator.initialize().report().cloned().unwrap();
    assert_eq!(*log.lock(), vec!["first", "second", "third", "first"]);
    assert_eq!(report.listener_failures.len(), 1);
    assert_eq!(report.listener_failures[0].name, "exploding");
    assert!(report.listener_failures[0].reason.contains("derived cache corrupt"));
    assert_eq!(
        coordinator.listeners().names(),
        vec!["first", "second", "exploding", "third", "first"]
    );
}

#[test]
fn late_listener_joins_next_cycle() {
    let (_tables, coordinator, log) = setup();
    coordinator.initialize();

    coordinator.add_listener(Arc::new(Recorder {
        name: "late",
        log: Arc::clone(&log),
        registry: None,
    }));
    assert!(log.lock().is_empty());

    coordinator.reload_all();
    assert_eq!(*log.lock(), vec!["late"]);
    assert_eq!(coordinator.cycles(), 2);
}

#[test]
fn unmarked_bindings_are_not_loaded() {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    tables.write("Skill", &["10,1,fire"]);
    let catalog = StaticCatalog::new()
        .with(RecordBinding::new::<Item, _>(csv_loader::<Item>))
        .with(RecordBinding::new::<Skill, _>(csv_loader::<Skill>).unmarked());

    let coordinator = ReloadCoordinator::new(tables.config(), catalog);
    let report = coordinator.initialize().report().cloned().unwrap();

    assert_eq!(report.loaded.len(), 1);
    assert!(!coordinator.registry().contains::<Skill>());
    assert!(coordinator.registry().list_all::<Skill>().is_empty());
}

#[test]
fn reload_on_refresh_allows_repeat_initialize() {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    tables.write("Skill", &[]);
    let config = RegistryConfig {
        reload_on_refresh: true,
        ..tables.config()
    };
    let coordinator = ReloadCoordinator::new(config, catalog());

    coordinator.initialize();
    tables.write("Item", &["9,1,bow"]);
    let outcome = coordinator.initialize();

    assert!(!outcome.is_skipped());
    assert_eq!(coordinator.registry().list_all::<Item>().len(), 1);
    assert_eq!(coordinator.registry().len(), 2);
}
