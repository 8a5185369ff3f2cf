//! The reminder store: an in-memory index of reminders per calendar day,
//! persisted to a durable backend after every mutation

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::date_key::DateKey;
use crate::errors::{Error, Result};
use crate::reminder::Reminder;
use crate::storage::{MemoryStorage, Storage};

/// The fixed key the serialized index is persisted under
pub const STORAGE_KEY: &str = "@Calendar-Reminders";

/// The full mapping from date-key to the reminders on that day.
///
/// Invariants, maintained by every [`ReminderStore`] operation:
/// * a reminder always sits under the key derived from its own `date`
/// * each list is sorted ascending by time (stable, so equal times keep
///   their insertion order)
/// * a key whose list would become empty is removed entirely
/// * an id appears under at most one key
pub type ReminderIndex = HashMap<DateKey, Vec<Reminder>>;

/// Owns the [`ReminderIndex`] and the storage backend it persists to.
///
/// All mutations are synchronous; the persistence write happens before the
/// mutating call returns. A failing write is logged and swallowed: the
/// in-memory index stays the source of truth for the session, durability is
/// simply degraded.
pub struct ReminderStore {
    storage: Box<dyn Storage>,
    index: ReminderIndex,
}

impl ReminderStore {
    /// Open a store over the given backend, hydrating the index from
    /// whatever it holds. Absent or corrupt data yields an empty index
    /// rather than a startup failure.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let index = match storage.read(STORAGE_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<ReminderIndex>(&text) {
                Ok(raw) => normalized(raw),
                Err(err) => {
                    log::warn!("Discarding corrupt reminder index: {}", err);
                    ReminderIndex::new()
                }
            },
            Ok(None) => ReminderIndex::new(),
            Err(err) => {
                log::warn!("Unable to load persisted reminders, starting empty: {}", err);
                ReminderIndex::new()
            }
        };

        Self { storage, index }
    }

    /// A store with no durable backend at all
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::new()))
    }

    /// Insert a reminder under its own date-key. A reminder with the same id
    /// already present under that key is replaced, not duplicated.
    pub fn add(&mut self, reminder: Reminder) {
        let list = self.index.entry(reminder.date_key()).or_insert_with(Vec::new);
        upsert(list, reminder);
        self.persist();
    }

    /// Apply an edit, given the reminder's previous state.
    ///
    /// The key is derived from `date`, so an edit that changes the date is a
    /// cross-key move: the stale entry under the old key must go away, or the
    /// reminder would show up on two days at once. Both target lists are
    /// computed in full before either is committed, and a single persistence
    /// write follows.
    pub fn edit(&mut self, updated: Reminder, previous: &Reminder) {
        let old_key = previous.date_key();
        let new_key = updated.date_key();

        if old_key == new_key {
            let list = self.index.entry(new_key).or_insert_with(Vec::new);
            upsert(list, updated);
        } else {
            let mut old_list = self.index.get(&old_key).cloned().unwrap_or_default();
            old_list.retain(|r| r.id() != previous.id());

            let mut new_list = self.index.get(&new_key).cloned().unwrap_or_default();
            upsert(&mut new_list, updated);

            if old_list.is_empty() {
                self.index.remove(&old_key);
            } else {
                self.index.insert(old_key, old_list);
            }
            self.index.insert(new_key, new_list);
        }

        self.persist();
    }

    /// Remove the reminder with this id from the given day.
    ///
    /// An id that is not in the day's list is tolerated silently (the removal
    /// is a filter), but a day that was never populated fails with
    /// [`Error::NotFound`]: there is nothing there to filter.
    pub fn delete_by_id(&mut self, id: &str, date: NaiveDate) -> Result<()> {
        let key = DateKey::from(date);
        let list = match self.index.get_mut(&key) {
            None => return Err(Error::NotFound { key }),
            Some(list) => list,
        };

        list.retain(|r| r.id() != id);
        if list.is_empty() {
            self.index.remove(&key);
        }

        self.persist();
        Ok(())
    }

    /// Drop the whole day, reminders and key alike. No-op for a day that has
    /// no reminders.
    pub fn delete_all_by_date(&mut self, date: NaiveDate) {
        if self.index.remove(&DateKey::from(date)).is_some() {
            self.persist();
        }
    }

    /// The reminders on the given day, in time order. Read-only; an
    /// unpopulated day is an empty slice.
    pub fn get_by_key(&self, key: &DateKey) -> &[Reminder] {
        self.index.get(key).map(|list| list.as_slice()).unwrap_or(&[])
    }

    /// A read-only view of the whole index
    pub fn get_all(&self) -> &ReminderIndex {
        &self.index
    }

    fn persist(&mut self) {
        let text = match serde_json::to_string(&self.index) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Unable to serialize the reminder index: {}", err);
                return;
            }
        };
        if let Err(err) = self.storage.write(STORAGE_KEY, &text) {
            log::warn!("Unable to persist reminders (the session keeps running in memory): {}", err);
        }
    }
}

/// Replace-or-append by id, then restore the time ordering. The sort is
/// stable: reminders at the same time keep their insertion order.
fn upsert(list: &mut Vec<Reminder>, reminder: Reminder) {
    match list.iter_mut().find(|r| r.id() == reminder.id()) {
        Some(existing) => *existing = reminder,
        None => list.push(reminder),
    }
    list.sort_by(|a, b| a.time().cmp(&b.time()));
}

/// Re-impose the index invariants on hydrated data: every reminder goes
/// under the key its own date derives, lists come back time-sorted, and no
/// empty list survives. Hand-edited or stale persisted blobs thus cannot
/// poison the session.
fn normalized(raw: ReminderIndex) -> ReminderIndex {
    let mut index = ReminderIndex::new();
    for (_, reminders) in raw {
        for reminder in reminders {
            index.entry(reminder.date_key()).or_insert_with(Vec::new).push(reminder);
        }
    }
    for list in index.values_mut() {
        list.sort_by(|a, b| a.time().cmp(&b.time()));
    }
    index
}
