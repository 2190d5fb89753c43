//! The wishlist, and moving items from it into the cart.

use crate::cart::CartManager;
use crate::config::StorefrontConfig;
use crate::managed::ManagedCollection;
use crate::model::outcome::{plan_add, plan_clear, plan_remove};
use crate::model::{Candidate, CollectionKind, ItemCollection, Outcome, Transition};
use crate::storage::PersistentStore;
use log::warn;

#[derive(Debug)]
pub struct WishlistManager {
    inner: ManagedCollection,
}

impl WishlistManager {
    /// Create an empty, not yet hydrated wishlist.
    pub fn new(store: PersistentStore, config: &StorefrontConfig) -> Self {
        Self {
            inner: ManagedCollection::new(
                CollectionKind::Wishlist,
                config.wishlist_key.clone(),
                store,
            ),
        }
    }

    pub fn hydrate(&mut self) {
        self.inner.hydrate(ItemCollection::from_entries);
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

    pub fn add_to_wishlist(&mut self, candidate: &Candidate) -> bool {
        self.add(candidate).is_success()
    }

    pub fn add(&mut self, candidate: &Candidate) -> Outcome {
        let transition = plan_add(self.items(), candidate, CollectionKind::Wishlist, None);
        self.inner.apply(transition)
    }

    pub fn remove_from_wishlist(&mut self, product_id: i64) -> Outcome {
        let transition = plan_remove(self.items(), product_id, CollectionKind::Wishlist);
        self.inner.apply(transition)
    }

    pub fn clear_wishlist(&mut self) -> Outcome {
        self.inner.apply(plan_clear(CollectionKind::Wishlist))
    }

    /// Hand an entry to the cart and drop it from the wishlist if the cart
    /// took it.
    ///
    /// When the cart refuses, the entry stays here and the cart's own
    /// notification is the only one emitted. When the wishlist cannot be
    /// saved, the cart add is undone and the entry stays here.
    pub fn move_to_cart(&mut self, product_id: i64, cart: &mut CartManager) -> Outcome {
        let Some(entry) = self.items().get(product_id).cloned() else {
            return self.inner.apply(Transition::Reject(Outcome::NotFound {
                kind: CollectionKind::Wishlist,
                product_id,
            }));
        };

        if !cart.add_to_cart(&Candidate::from(&entry)) {
            return Outcome::MoveRejected { product_id };
        }

        let Some((next, _)) = self.items().without(product_id) else {
            return Outcome::MoveRejected { product_id };
        };

        if self.inner.replace(next) {
            let outcome = Outcome::MovedToCart(entry);
            self.inner.emit(&outcome);
            return outcome;
        }

        warn!(
            "wishlist save failed while moving product {}, undoing cart add",
            product_id
        );
        if cart.discard(product_id).is_none() {
            warn!("product {} was already gone from the cart", product_id);
        }
        let outcome = Outcome::MoveFailed(entry);
        self.inner.emit(&outcome);
        outcome
    }
}
