//! Round-trips of the reminder store through its file-backed storage

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

use datebook::storage::FileStorage;
use datebook::store::STORAGE_KEY;
use datebook::{DateKey, Reminder, ReminderDraft, ReminderStore};

fn open_store(path: &Path) -> ReminderStore {
    ReminderStore::open(Box::new(FileStorage::new(path)))
}

fn reminder(id: &str, date: &str, time: &str) -> Reminder {
    ReminderDraft {
        title: "New Event".to_string(),
        date: date.to_string(),
        time: time.to_string(),
        city: "Recife".to_string(),
        color: "#938274".to_string(),
        id: Some(id.to_string()),
    }
    .build()
    .unwrap()
}

fn key(s: &str) -> DateKey {
    s.parse().unwrap()
}

#[test]
fn reopening_the_same_file_restores_the_index() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.json");

    {
        let mut store = open_store(&path);
        store.add(reminder("guid-id", "2021-03-26", "15:00"));
        store.add(reminder("guid-id2", "2021-03-26", "09:00"));
        store.add(reminder("guid-id3", "2021-03-27", "10:00"));
    }

    let store = open_store(&path);
    let friday: Vec<&str> = store.get_by_key(&key("26032021")).iter().map(|r| r.id()).collect();
    assert_eq!(friday, vec!["guid-id2", "guid-id"]);
    assert_eq!(store.get_by_key(&key("27032021")).len(), 1);
}

#[test]
fn a_missing_backing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir.path().join("reminders.json"));
    assert!(store.get_all().is_empty());
}

#[test]
fn a_corrupt_backing_file_starts_empty_and_keeps_working() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.json");
    std::fs::write(&path, "[[[ definitely not the storage map").unwrap();

    let mut store = open_store(&path);
    assert!(store.get_all().is_empty());

    // the session carries on, and so does persistence: the broken file is
    // replaced on the next write
    store.add(reminder("guid-id", "2021-03-26", "15:00"));
    drop(store);

    let store = open_store(&path);
    assert_eq!(store.get_by_key(&key("26032021")).len(), 1);
}

#[test]
fn every_mutation_reaches_the_file_before_returning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.json");

    let mut store = open_store(&path);
    store.add(reminder("guid-id", "2021-03-26", "15:00"));
    assert_eq!(open_store(&path).get_by_key(&key("26032021")).len(), 1);

    store.delete_by_id("guid-id", NaiveDate::from_ymd_opt(2021, 3, 26).unwrap()).unwrap();
    assert!(!open_store(&path).get_all().contains_key(&key("26032021")));
}

#[test]
fn the_on_disk_layout_is_a_single_namespaced_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.json");

    let mut store = open_store(&path);
    store.add(reminder("guid-id", "2021-03-26", "15:00"));
    drop(store);

    // one file-level map, one entry under the fixed namespace key
    let text = std::fs::read_to_string(&path).unwrap();
    let entries: HashMap<String, String> = serde_json::from_str(&text).unwrap();
    assert_eq!(entries.len(), 1);

    // the value is the JSON index: date-key strings to reminder arrays
    let index: serde_json::Value = serde_json::from_str(&entries[STORAGE_KEY]).unwrap();
    let list = &index["26032021"];
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], "guid-id");
    assert_eq!(list[0]["title"], "New Event");
    assert_eq!(list[0]["date"], "2021-03-26");
    assert_eq!(list[0]["time"], "15:00");
    assert_eq!(list[0]["city"], "Recife");
    assert_eq!(list[0]["color"], "#938274");
}
