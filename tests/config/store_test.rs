//! Rule store load, reload and swap tests.

use std::sync::{Arc, Weak};
use std::time::Duration;

use oneseat::config::{save_config, Config, CONFIG_FILE_NAME, CURRENT_SCHEMA_VERSION};
use oneseat::policy::{RuleTable, VehicleRule};
use oneseat::store::RuleStore;

fn single_rule(name: &str) -> Config {
    Config {
        version: CURRENT_SCHEMA_VERSION,
        vehicles: vec![VehicleRule::crew_only(name)],
    }
}

#[test]
fn open_loads_file_rules() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    save_config(&path, &single_rule("rhib")).expect("should save");

    let store = RuleStore::open(&path).expect("should open");
    let table = store.snapshot();
    assert_eq!(table.len(), 1);
    assert!(table.find("rhib").is_some());
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn reload_swaps_whole_table() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    let store = RuleStore::open(&path).expect("should open");
    let before = store.snapshot();
    assert_eq!(*before, RuleTable::defaults());

    save_config(&path, &single_rule("tugboat")).expect("should save");
    store.reload().expect("should reload");

    let after = store.snapshot();
    assert_eq!(after.len(), 1);
    assert!(after.find("tugboat").is_some());
    // A snapshot taken before the reload is unaffected.
    assert_eq!(*before, RuleTable::defaults());
}

#[test]
fn failed_reload_keeps_current_table() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    save_config(&path, &single_rule("rhib")).expect("should save");
    let store = RuleStore::open(&path).expect("should open");

    std::fs::write(&path, "not = [valid").expect("should write");
    assert!(store.reload().is_err());
    assert!(store.snapshot().find("rhib").is_some());
}

#[test]
fn reload_persists_migrated_config() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    save_config(&path, &single_rule("rhib")).expect("should save");
    let store = RuleStore::open(&path).expect("should open");

    std::fs::write(&path, "[[vehicles]]\nvehicle_type_match = \"tugboat\"\n").expect("should write");
    store.reload().expect("should reload");

    assert_eq!(*store.snapshot(), RuleTable::defaults());
    let rewritten = std::fs::read_to_string(&path).expect("should read");
    assert!(rewritten.contains("version = 1"), "got: {rewritten}");
}

#[test]
fn in_memory_reload_is_noop() {
    let store = RuleStore::in_memory(RuleTable::defaults());
    assert!(store.reload().is_ok());
    assert_eq!(store.snapshot().len(), 3);
    assert!(store.path().is_none());
}

#[test]
fn concurrent_readers_see_whole_tables() {
    let small = RuleTable::new(vec![VehicleRule::crew_only("rhib")]);
    let store = Arc::new(RuleStore::in_memory(RuleTable::defaults()));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let len = store.snapshot().len();
                    assert!(len == 1 || len == 3, "saw partial table of {len}");
                }
            })
        })
        .collect();

    for use_small in [true, false].into_iter().cycle().take(200) {
        if use_small {
            store.replace(small.clone());
        } else {
            store.replace(RuleTable::defaults());
        }
    }

    for reader in readers {
        reader.join().expect("reader should not panic");
    }
}

#[test]
fn watcher_picks_up_changes() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    let store = RuleStore::watch(&path).expect("should watch");
    assert_eq!(store.snapshot().len(), 3);

    save_config(&path, &single_rule("tugboat")).expect("should save");

    for _ in 0..200 {
        if store.snapshot().find("tugboat").is_some() {
            return;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    panic!("watcher did not reload the rule table");
}

#[test]
fn dropping_watched_store_releases_it() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    let store = RuleStore::watch(&path).expect("should watch");
    assert_eq!(Arc::strong_count(&store), 1);

    let weak: Weak<RuleStore> = Arc::downgrade(&store);
    drop(store);
    assert!(weak.upgrade().is_none(), "watcher thread should not keep the store alive");
}
