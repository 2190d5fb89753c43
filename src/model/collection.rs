use super::entry::Entry;
use crate::core::{Price, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("low to high"),
            SortDirection::Desc => f.write_str("high to low"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(StoreError::ParseError(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

/// Ordered entries with unique product ids.
///
/// Every method that changes the content returns a new collection and leaves
/// `self` untouched; managers commit the new value only once it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCollection {
    entries: Vec<Entry>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary entries, keeping the first entry seen for each id.
    /// Returns the collection and the number of entries that were dropped.
    pub fn from_entries<I>(entries: I) -> (Self, usize)
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut dropped = 0;
        for entry in entries {
            if seen.insert(entry.product_id) {
                kept.push(entry);
            } else {
                dropped += 1;
            }
        }
        (Self { entries: kept }, dropped)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.get(product_id).is_some()
    }

    pub fn get(&self, product_id: i64) -> Option<&Entry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    /// Sum of all prices, `None` on overflow.
    pub fn total(&self) -> Option<Price> {
        Price::checked_sum(self.entries.iter().map(|e| e.price))
    }

    /// A copy with `entry` appended. Callers check uniqueness first.
    pub fn with_appended(&self, entry: Entry) -> Self {
        debug_assert!(!self.contains(entry.product_id));
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    /// A copy without `product_id`, together with the removed entry.
    pub fn without(&self, product_id: i64) -> Option<(Self, Entry)> {
        let index = self
            .entries
            .iter()
            .position(|e| e.product_id == product_id)?;
        let mut entries = self.entries.clone();
        let removed = entries.remove(index);
        Some((Self { entries }, removed))
    }

    /// A copy ordered by price. Equal prices keep their relative order.
    pub fn sorted_by_price(&self, direction: SortDirection) -> Self {
        let mut entries = self.entries.clone();
        match direction {
            SortDirection::Asc => entries.sort_by(|a, b| a.price.cmp(&b.price)),
            SortDirection::Desc => entries.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
