//! Multi-threaded registry access.

use crate::common::*;
use parking_lot::{Condvar, Mutex};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn ensure_store_race_installs_one_store() {
    const THREADS: usize = 16;
    let registry = Arc::new(StoreRegistry::new("res_db"));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.ensure_store::<Item>(csv_loader::<Item>).unwrap()
            })
        })
        .collect();

    let stores: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(stores.iter().all(|s| Arc::ptr_eq(s, &stores[0])));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.registered_types().len(), 1);
}

/// Gate that holds a loader until the test opens it
#[derive(Default)]
struct Gate {
    /// (loader entered, gate opened)
    state: Mutex<(bool, bool)>,
    cond: Condvar,
}

impl Gate {
    fn enter_and_wait(&self) {
        let mut state = self.state.lock();
        state.0 = true;
        self.cond.notify_all();
        while !state.1 {
            self.cond.wait(&mut state);
        }
    }

    fn wait_entered(&self) {
        let mut state = self.state.lock();
        while !state.0 {
            self.cond.wait(&mut state);
        }
    }

    fn release(&self) {
        self.state.lock().1 = true;
        self.cond.notify_all();
    }
}

#[test]
fn slow_reload_does_not_block_other_types() {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    tables.write("Skill", &["10,1,fire"]);

    let registry = Arc::new(StoreRegistry::new(tables.path()));
    let gate = Arc::new(Gate::default());
    let slow_loads = Arc::new(AtomicUsize::new(0));
    {
        let gate = Arc::clone(&gate);
        let slow_loads = Arc::clone(&slow_loads);
        registry
            .ensure_store::<Item>(move |ty: &RecordType, loc: &Path| {
                if slow_loads.fetch_add(1, Ordering::SeqCst) > 0 {
                    gate.enter_and_wait();
                }
                csv_loader::<Item>(ty, loc)
            })
            .unwrap();
    }
    registry.ensure_store::<Skill>(csv_loader::<Skill>).unwrap();
    assert!(registry.reload_all().is_clean());

    // Second Item reload blocks inside its loader
    tables.write("Item", &["7,9,bow"]);
    let reloader = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || registry.reload_all())
    };
    gate.wait_entered();

    // Both types stay readable, and Item still serves its old generation
    assert_eq!(registry.list_all::<Skill>().len(), 1);
    assert_eq!(registry.get::<Skill>(&10).unwrap().kind, "fire");
    assert_eq!(registry.list_all::<Item>().len(), 3);
    assert!(registry.ensure_store::<Skill>(csv_loader::<Skill>).is_ok());

    gate.release();
    let report = reloader.join().unwrap();
    assert!(report.is_clean());
    assert_eq!(registry.list_all::<Item>().len(), 1);
    assert_eq!(registry.get::<Item>(&7).unwrap().lvl, 9);
}

#[test]
fn readers_during_repeated_reloads_see_whole_tables() {
    let tables = TableDir::new();
    tables.write("Item", ITEM_ROWS);
    tables.write("Skill", &[]);
    let coordinator = Arc::new(ReloadCoordinator::new(tables.config(), catalog()));
    coordinator.initialize();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            thread::spawn(move || {
                for _ in 0..200 {
                    let registry = coordinator.registry();
                    assert_eq!(registry.list_all::<Item>().len(), 3);
                    let level_three = registry.list_id_by_index::<Item>("lvl", &[3.into()]);
                    assert_eq!(level_three, vec![1, 2]);
                }
            })
        })
        .collect();

    for _ in 0..20 {
        assert!(coordinator.reload_all().is_clean());
    }
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(coordinator.cycles(), 21);
}
