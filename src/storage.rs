//! Durable key-value backends the reminder store persists to

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// A durable string-to-string store, the shape browsers expose as local
/// storage. The reminder store writes its whole serialized index under a
/// single fixed key.
pub trait Storage {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<String>>;
    /// Store `value` under `key`, replacing any previous value
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// A [`Storage`] backed by a single JSON file holding the key-value map.
#[derive(Debug)]
pub struct FileStorage {
    backing_file: PathBuf,
}

impl FileStorage {
    /// Point at a backing file. The file is only created on the first write.
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
        }
    }

    fn load_entries(&self) -> Result<HashMap<String, String>> {
        if !self.backing_file.exists() {
            return Ok(HashMap::new());
        }
        let file = std::fs::File::open(&self.backing_file)?;
        Ok(serde_json::from_reader(file)?)
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.load_entries()?;
        Ok(entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        // Other keys in the file must survive a write, so read-modify-write
        // the whole map. A file that no longer parses is started over: we are
        // about to overwrite it anyway.
        let mut entries = match self.load_entries() {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Unable to re-read {:?}, starting it over: {}", self.backing_file, err);
                HashMap::new()
            }
        };
        entries.insert(key.to_string(), value.to_string());

        let file = std::fs::File::create(&self.backing_file)?;
        serde_json::to_writer(file, &entries)?;
        Ok(())
    }
}

/// A [`Storage`] that lives and dies with the process.
///
/// This is what tests use, and what the store degrades to when no durable
/// backend is available.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
