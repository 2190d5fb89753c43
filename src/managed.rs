//! A collection bound to one storage key.
//!
//! Both managers are thin layers over [`ManagedCollection`]: it owns the
//! in-memory entries, persists every accepted transition before adopting it,
//! and renders outcomes into notifications.

use crate::model::{CollectionKind, Entry, ItemCollection, Outcome, Transition};
use crate::storage::PersistentStore;
use log::{debug, warn};

#[derive(Debug)]
pub struct ManagedCollection {
    kind: CollectionKind,
    key: String,
    store: PersistentStore,
    items: ItemCollection,
    initialized: bool,
}

impl ManagedCollection {
    pub fn new(kind: CollectionKind, key: impl Into<String>, store: PersistentStore) -> Self {
        Self {
            kind,
            key: key.into(),
            store,
            items: ItemCollection::new(),
            initialized: false,
        }
    }

    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Load the stored entries once.
    ///
    /// `adopt` turns the loaded entries into the collection to keep and
    /// reports how many it dropped; if any were dropped the cleaned
    /// collection is written back.
    pub fn hydrate<F>(&mut self, adopt: F)
    where
        F: FnOnce(Vec<Entry>) -> (ItemCollection, usize),
    {
        if self.initialized {
            debug!("{} already hydrated from '{}'", self.kind, self.key);
            return;
        }

        let loaded = self.store.load(&self.key);
        let (items, dropped) = adopt(loaded);
        self.items = items;
        self.initialized = true;

        if dropped > 0 {
            warn!(
                "dropped {} stored {} entries from '{}' while hydrating",
                dropped, self.kind, self.key
            );
            self.store.save(&self.key, self.items.entries());
        }
        debug!(
            "{} hydrated from '{}' with {} entries",
            self.kind,
            self.key,
            self.items.len()
        );
    }

    /// Persist and adopt an accepted transition, then report it.
    pub fn apply(&mut self, transition: Transition) -> Outcome {
        let outcome = match transition {
            Transition::Reject(outcome) => outcome,
            Transition::Replace(next, outcome) => {
                if self.replace(next) {
                    outcome
                } else {
                    Outcome::SaveFailed { kind: self.kind }
                }
            }
        };
        self.emit(&outcome);
        outcome
    }

    /// Persist and adopt `next` without reporting anything.
    ///
    /// Writes are skipped until the collection has been hydrated so that an
    /// empty in-memory collection never overwrites stored data.
    pub fn replace(&mut self, next: ItemCollection) -> bool {
        if !self.initialized {
            debug!(
                "{} not hydrated yet, keeping change in memory only",
                self.kind
            );
        } else if !self.store.save(&self.key, next.entries()) {
            return false;
        }
        self.items = next;
        true
    }

    /// Adopt `next` in memory only, leaving storage as it was.
    pub fn adopt_unsaved(&mut self, next: ItemCollection) {
        warn!(
            "{} '{}' changed in memory only, storage is out of date",
            self.kind, self.key
        );
        self.items = next;
    }

    pub fn emit(&self, outcome: &Outcome) {
        if let Some(notification) = outcome.notification() {
            self.store.sink().emit(&notification);
        }
    }
}
