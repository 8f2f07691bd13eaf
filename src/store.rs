//! Persistent key/value storage for the high score
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A narrow persistent key/value store.
///
/// The session reads the high score through this once, when it is created,
/// and writes it back whenever a new high score is set.
pub trait KeyValueStore: fmt::Debug {
    /// Fetch the value stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns `Err` if the underlying storage could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `Err` if the underlying storage could not be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// A store that only lives as long as the process
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> MemoryStore {
        MemoryStore(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let _ = self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A store kept as a JSON object in a file on disk.  The file is read on
/// every `get()` and rewritten on every `set()`; a missing file is treated as
/// an empty store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }

    /// Return the default store file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("levelsnake").join("highscore.json"))
    }

    fn load(&self) -> Result<Entries, StoreError> {
        let src = match fs_err::read(&self.path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::default()),
            Err(e) => return Err(StoreError::read(e)),
        };
        serde_json::from_slice(&src).map_err(StoreError::deserialize)
    }

    fn save(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(StoreError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(entries).map_err(StoreError::serialize)?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(StoreError::write)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.0.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        let _ = entries.0.insert(key.to_owned(), value.to_owned());
        self.save(&entries)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
struct Entries(BTreeMap<String, String>);

#[derive(Debug, Error)]
#[error("high score storage failed")]
pub struct StoreError(#[source] StoreErrorSource);

impl StoreError {
    fn read(e: std::io::Error) -> Self {
        StoreError(StoreErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        StoreError(StoreErrorSource::Deserialize(e))
    }

    fn mkdir(e: std::io::Error) -> Self {
        StoreError(StoreErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        StoreError(StoreErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        StoreError(StoreErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum StoreErrorSource {
    #[error("failed to read store file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize store file")]
    Deserialize(#[source] serde_json::Error),
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize store contents")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write store file")]
    Write(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(tmpdir.path().join("nope.json"));
        assert_eq!(store.get("snakeHighScore").unwrap(), None);
    }

    #[test]
    fn file_store_round_trip() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("data").join("highscore.json");
        let mut store = JsonFileStore::new(&path);
        store.set("snakeHighScore", "120").unwrap();
        store.set("other", "x").unwrap();
        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("snakeHighScore").unwrap().as_deref(),
            Some("120")
        );
        let src = fs_err::read_to_string(&path).unwrap();
        pretty_assertions::assert_eq!(
            src,
            "{\n  \"other\": \"x\",\n  \"snakeHighScore\": \"120\"\n}\n"
        );
    }

    #[test]
    fn file_store_bad_json() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("highscore.json");
        fs_err::write(&path, "[1, 2, 3]").unwrap();
        let store = JsonFileStore::new(&path);
        let e = store.get("snakeHighScore").unwrap_err();
        assert_eq!(e.to_string(), "high score storage failed");
        assert_eq!(
            e.source().map(ToString::to_string).as_deref(),
            Some("failed to deserialize store file")
        );
    }
}
