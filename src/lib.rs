//! This crate provides the data core of a calendar/reminder application.
//!
//! It keeps reminders in a [`ReminderStore`]: a mapping from a calendar day (a [`DateKey`]) to the time-ordered reminders on that day, kept consistent across create/edit/delete/move operations.
//!
//! Because users expect their reminders to survive a restart, the store persists its whole index to a durable key-value backend (see the [`storage`] module) after every mutation, and hydrates from it at startup. \
//! A corrupt or missing backend never prevents startup: the store falls back to an empty index and keeps working in memory.
//!
//! The [`grid`] module turns a reference month plus the store into the sequence of day-cells a calendar view renders (complete weeks, including spill-over days from the adjacent months).
//!
//! The [`weather`] module covers the one asynchronous concern: a debounced forecast lookup for a reminder's city and time, with stale responses discarded.

pub mod errors;
pub use errors::{Error, Result};

mod date_key;
pub use date_key::DateKey;
mod reminder;
pub use reminder::{Reminder, ReminderDraft};

pub mod storage;
pub mod store;
pub use store::ReminderStore;

pub mod grid;
pub mod weather;
