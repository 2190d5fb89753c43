//! The shopping cart.

mod receipt;

pub use receipt::Receipt;

use crate::config::StorefrontConfig;
use crate::core::Price;
use crate::managed::ManagedCollection;
use crate::model::outcome::{plan_add, plan_clear, plan_remove, plan_sort};
use crate::model::{
    Candidate, CollectionKind, Entry, ItemCollection, Outcome, SortDirection, Transition,
};
use crate::storage::PersistentStore;
use log::{debug, warn};

/// Owns the cart and keeps its total at or below the spend cap.
#[derive(Debug)]
pub struct CartManager {
    inner: ManagedCollection,
    spend_cap: Price,
    last_sort: Option<SortDirection>,
}

impl CartManager {
    /// Create an empty, not yet hydrated cart.
    pub fn new(store: PersistentStore, config: &StorefrontConfig) -> Self {
        Self {
            inner: ManagedCollection::new(CollectionKind::Cart, config.cart_key.clone(), store),
            spend_cap: config.spend_cap,
            last_sort: None,
        }
    }

    /// Load the stored cart once. Duplicates and entries past the spend cap
    /// are dropped.
    pub fn hydrate(&mut self) {
        let cap = self.spend_cap;
        self.inner.hydrate(|loaded| {
            let (unique, duplicates) = ItemCollection::from_entries(loaded);
            let mut total = Price::ZERO;
            let mut kept = Vec::with_capacity(unique.len());
            let mut over_cap = 0;
            for entry in unique.iter() {
                match total.checked_add(entry.price) {
                    Some(next) if next <= cap => {
                        total = next;
                        kept.push(entry.clone());
                    }
                    _ => over_cap += 1,
                }
            }
            if over_cap > 0 {
                warn!("{} stored cart entries exceed the spend cap of {}", over_cap, cap);
            }
            let (items, _) = ItemCollection::from_entries(kept);
            (items, duplicates + over_cap)
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    pub fn items(&self) -> &ItemCollection {
        self.inner.items()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.items().contains(product_id)
    }

    pub fn spend_cap(&self) -> Price {
        self.spend_cap
    }

    /// Sum of all entry prices, `None` if it cannot be computed.
    pub fn total(&self) -> Option<Price> {
        self.items().total()
    }

    /// The total with two decimals, `"0.00"` if it cannot be computed.
    pub fn total_price(&self) -> String {
        match self.total() {
            Some(total) => total.to_string(),
            None => {
                warn!("cart total overflowed, reporting 0.00");
                Price::ZERO.to_string()
            }
        }
    }

    /// Add a candidate if it is valid, new, and fits under the spend cap.
    pub fn add_to_cart(&mut self, candidate: &Candidate) -> bool {
        self.add(candidate).is_success()
    }

    /// Like [`add_to_cart`](Self::add_to_cart) but returns the full outcome.
    pub fn add(&mut self, candidate: &Candidate) -> Outcome {
        let transition = plan_add(
            self.items(),
            candidate,
            CollectionKind::Cart,
            Some(self.spend_cap),
        );
        self.inner.apply(transition)
    }

    pub fn remove_from_cart(&mut self, product_id: i64) -> Outcome {
        let transition = plan_remove(self.items(), product_id, CollectionKind::Cart);
        self.inner.apply(transition)
    }

    pub fn clear_cart(&mut self) -> Outcome {
        self.inner.apply(plan_clear(CollectionKind::Cart))
    }

    pub fn sort_cart_by_price(&mut self, direction: SortDirection) -> Outcome {
        let transition = plan_sort(self.items(), direction);
        let outcome = self.inner.apply(transition);
        if outcome.is_success() {
            self.last_sort = Some(direction);
        }
        outcome
    }

    /// Sort high to low first, then flip the direction on every call.
    pub fn toggle_sort_by_price(&mut self) -> Outcome {
        let direction = self
            .last_sort
            .map(SortDirection::toggled)
            .unwrap_or_default();
        self.sort_cart_by_price(direction)
    }

    /// Simulate paying for the cart. The cart is emptied on success.
    pub fn checkout(&mut self) -> Option<Receipt> {
        if self.is_empty() {
            self.inner.apply(Transition::Reject(Outcome::EmptyPurchase));
            return None;
        }

        let Some(total) = self.total() else {
            warn!("refusing checkout, cart total cannot be computed");
            return None;
        };

        let receipt = Receipt::new(self.items().entries().to_vec(), total);
        let outcome = self.inner.apply(Transition::Replace(
            ItemCollection::new(),
            Outcome::Purchased {
                order_id: receipt.order_id,
                total,
                items: receipt.item_count(),
            },
        ));

        match outcome {
            Outcome::Purchased { .. } => {
                debug!("order {} placed for {}", receipt.order_id, receipt.total);
                self.last_sort = None;
                Some(receipt)
            }
            _ => None,
        }
    }

    /// Drop an entry without telling the user. Used to undo a move whose
    /// wishlist half could not be saved.
    ///
    /// The entry leaves the in-memory cart even when the store refuses the
    /// write. Returns `None` only if the cart did not hold it.
    pub(crate) fn discard(&mut self, product_id: i64) -> Option<Entry> {
        let (next, entry) = self.items().without(product_id)?;
        if !self.inner.replace(next.clone()) {
            self.inner.adopt_unsaved(next);
        }
        Some(entry)
    }
}
