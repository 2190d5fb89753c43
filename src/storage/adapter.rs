use super::kv::KeyValueStore;
use crate::core::{Result, StoreError};
use crate::model::Entry;
use crate::notify::{Level, NotificationSink};
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

/// Decode a stored payload into entries.
///
/// The payload must be a JSON array and every element must be a valid entry;
/// a single bad element rejects the whole payload.
pub fn decode_entries(raw: &str) -> Result<Vec<Entry>> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(elements) = value else {
        return Err(StoreError::ParseError(
            "stored value is not an array".to_string(),
        ));
    };
    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            Entry::from_value(element).map_err(|err| {
                StoreError::InvalidEntry(format!("element {}: {}", index, err))
            })
        })
        .collect()
}

pub fn encode_entries(entries: &[Entry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

/// JSON view over a [`KeyValueStore`] holding entry arrays.
///
/// Reads and writes never fail from the caller's point of view: corrupt
/// payloads are cleared and write failures are reported to the sink.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KeyValueStore>,
    sink: Arc<dyn NotificationSink>,
}

impl PersistentStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { backend, sink }
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    pub fn sink(&self) -> &Arc<dyn NotificationSink> {
        &self.sink
    }

    /// Read and validate `key`.
    ///
    /// `Ok(None)` when the key is absent; `Err` for a read fault or a payload
    /// that does not decode. Nothing is cleared.
    pub fn try_load(&self, key: &str) -> Result<Option<Vec<Entry>>> {
        match self.backend.get(key)? {
            None => Ok(None),
            Some(raw) => decode_entries(&raw).map(Some),
        }
    }

    /// Read `key`, discarding the stored value if it is unusable.
    pub fn load(&self, key: &str) -> Vec<Entry> {
        match self.try_load(key) {
            Ok(Some(entries)) => {
                debug!("loaded {} entries from '{}'", entries.len(), key);
                entries
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("discarding stored value for '{}': {}", key, err);
                self.clear(key);
                self.sink.notify(
                    Level::Error,
                    &format!("Saved data for '{}' was unreadable and has been reset", key),
                );
                Vec::new()
            }
        }
    }

    /// Overwrite `key` with `entries`. Returns false if the write failed.
    pub fn save(&self, key: &str, entries: &[Entry]) -> bool {
        let outcome = encode_entries(entries).and_then(|raw| self.backend.set(key, &raw));
        match outcome {
            Ok(()) => {
                debug!("saved {} entries to '{}'", entries.len(), key);
                true
            }
            Err(err) => {
                warn!("failed to save '{}': {}", key, err);
                self.sink
                    .notify(Level::Error, &format!("Could not save changes: {}", err));
                false
            }
        }
    }

    pub fn clear(&self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            warn!("failed to clear '{}': {}", key, err);
        }
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
