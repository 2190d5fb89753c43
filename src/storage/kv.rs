use crate::core::{Result, StoreError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

/// Raw text key-value storage, the moral equivalent of browser local storage.
///
/// All methods take `&self` so one store can back both the cart and the
/// wishlist; implementations use interior mutability.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns `Ok(())` even if the key did not exist.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store with an optional byte quota over keys and values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would take the store past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.values
            .read()
            .map(|v| v.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read()?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write()?;
        if let Some(quota) = self.quota {
            let used: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(used);
            if needed > available {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write()?;
        values.remove(key);
        Ok(())
    }
}
