//! Pure state transitions and the outcomes they report.
//!
//! Planning an operation never touches storage or the sink. A manager takes
//! the returned [`Transition`], persists the next collection if there is one,
//! and only then renders the [`Outcome`] into a notification.

use super::collection::{ItemCollection, SortDirection};
use super::entry::{Candidate, Entry};
use crate::core::Price;
use crate::notify::Notification;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Cart,
    Wishlist,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Cart => f.write_str("cart"),
            CollectionKind::Wishlist => f.write_str("wishlist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added {
        kind: CollectionKind,
        entry: Entry,
    },
    Invalid {
        kind: CollectionKind,
        reason: String,
    },
    Duplicate {
        kind: CollectionKind,
        title: String,
    },
    CapExceeded {
        cap: Price,
        current: Price,
        attempted: Price,
    },
    Removed {
        kind: CollectionKind,
        entry: Entry,
    },
    NotFound {
        kind: CollectionKind,
        product_id: i64,
    },
    Cleared {
        kind: CollectionKind,
    },
    Sorted(SortDirection),
    NothingToSort,
    MovedToCart(Entry),
    /// The cart took the item but the wishlist could not be saved, so the
    /// cart add was undone.
    MoveFailed(Entry),
    /// The cart refused the item and already said why.
    MoveRejected {
        product_id: i64,
    },
    Purchased {
        order_id: Uuid,
        total: Price,
        items: usize,
    },
    EmptyPurchase,
    UnknownProduct {
        product_id: i64,
    },
    Unavailable {
        title: String,
    },
    /// The store already reported the write failure.
    SaveFailed {
        kind: CollectionKind,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::Added { .. }
                | Outcome::Removed { .. }
                | Outcome::Cleared { .. }
                | Outcome::Sorted(_)
                | Outcome::MovedToCart(_)
                | Outcome::Purchased { .. }
        )
    }

    /// What the user should be told, if anything.
    pub fn notification(&self) -> Option<Notification> {
        let notification = match self {
            Outcome::Added { kind, entry } => {
                Notification::success(format!("{} added to {}!", entry.product_title, kind))
            }
            Outcome::Invalid { kind, reason } => {
                Notification::error(format!("Cannot add item to {}: {}", kind, reason))
            }
            Outcome::Duplicate { kind, title } => {
                Notification::info(format!("{} is already in your {}!", title, kind))
            }
            Outcome::CapExceeded { cap, .. } => Notification::error(format!(
                "Cannot add item. Cart total would exceed ${}!",
                cap
            )),
            Outcome::Removed { kind, entry } => {
                Notification::info(format!("{} removed from {}", entry.product_title, kind))
            }
            Outcome::NotFound { kind, product_id } => {
                Notification::error(format!("Product {} is not in your {}", product_id, kind))
            }
            Outcome::Cleared { kind } => {
                Notification::info(format!("Your {} has been cleared", kind))
            }
            Outcome::Sorted(direction) => {
                Notification::info(format!("Cart sorted by price: {}", direction))
            }
            Outcome::NothingToSort => {
                Notification::info("Add at least two items to sort your cart")
            }
            Outcome::MovedToCart(entry) => {
                Notification::success(format!("{} moved to cart!", entry.product_title))
            }
            Outcome::MoveFailed(entry) => Notification::error(format!(
                "{} could not be moved to cart and is still in your wishlist",
                entry.product_title
            )),
            Outcome::Purchased {
                order_id, total, ..
            } => Notification::success(format!(
                "Payment successful! Order {} total ${}",
                order_id, total
            )),
            Outcome::EmptyPurchase => Notification::error("Your cart is empty"),
            Outcome::UnknownProduct { product_id } => {
                Notification::error(format!("Product {} not found", product_id))
            }
            Outcome::Unavailable { title } => {
                Notification::error(format!("{} is out of stock", title))
            }
            Outcome::MoveRejected { .. } | Outcome::SaveFailed { .. } => return None,
        };
        Some(notification)
    }
}

/// The result of planning an operation against a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Leave the collection alone and report.
    Reject(Outcome),
    /// Persist `next`, adopt it, then report.
    Replace(ItemCollection, Outcome),
}

/// Plan an add. `cap` bounds the collection total when present.
pub fn plan_add(
    items: &ItemCollection,
    candidate: &Candidate,
    kind: CollectionKind,
    cap: Option<Price>,
) -> Transition {
    if candidate.is_absent() {
        return Transition::Reject(Outcome::Invalid {
            kind,
            reason: "no product selected".to_string(),
        });
    }

    let entry = match candidate.normalize() {
        Ok(entry) => entry,
        Err(err) => {
            return Transition::Reject(Outcome::Invalid {
                kind,
                reason: err.to_string(),
            });
        }
    };

    if items.contains(entry.product_id) {
        return Transition::Reject(Outcome::Duplicate {
            kind,
            title: entry.product_title,
        });
    }

    if let Some(cap) = cap {
        let current = items.total().unwrap_or(Price::from_cents(i64::MAX));
        let within_cap = current
            .checked_add(entry.price)
            .is_some_and(|next| next <= cap);
        if !within_cap {
            return Transition::Reject(Outcome::CapExceeded {
                cap,
                current,
                attempted: entry.price,
            });
        }
    }

    Transition::Replace(items.with_appended(entry.clone()), Outcome::Added { kind, entry })
}

pub fn plan_remove(items: &ItemCollection, product_id: i64, kind: CollectionKind) -> Transition {
    match items.without(product_id) {
        Some((next, entry)) => Transition::Replace(next, Outcome::Removed { kind, entry }),
        None => Transition::Reject(Outcome::NotFound { kind, product_id }),
    }
}

pub fn plan_clear(kind: CollectionKind) -> Transition {
    Transition::Replace(ItemCollection::new(), Outcome::Cleared { kind })
}

pub fn plan_sort(items: &ItemCollection, direction: SortDirection) -> Transition {
    if items.len() < 2 {
        return Transition::Reject(Outcome::NothingToSort);
    }
    Transition::Replace(items.sorted_by_price(direction), Outcome::Sorted(direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;

    fn candidate(id: i64, price: f64) -> Candidate {
        let price = Price::from_decimal(price).unwrap();
        let entry = Entry::new(id, "Phone", "phone.png", price, "phones");
        Candidate::from(&entry)
    }

    #[test]
    fn test_cap_is_inclusive() {
        let items = ItemCollection::new();
        let cap = Some(Price::from_cents(100_000));

        let Transition::Replace(items, _) =
            plan_add(&items, &candidate(1, 600.0), CollectionKind::Cart, cap)
        else {
            panic!("first add should be accepted");
        };
        assert!(matches!(
            plan_add(&items, &candidate(2, 400.0), CollectionKind::Cart, cap),
            Transition::Replace(..)
        ));
        assert!(matches!(
            plan_add(&items, &candidate(3, 400.01), CollectionKind::Cart, cap),
            Transition::Reject(Outcome::CapExceeded { .. })
        ));
    }

    #[test]
    fn test_duplicate_is_info_level() {
        let (items, _) =
            ItemCollection::from_entries(vec![candidate(1, 5.0).normalize().unwrap()]);
        let Transition::Reject(outcome) =
            plan_add(&items, &candidate(1, 5.0), CollectionKind::Wishlist, None)
        else {
            panic!("duplicate should be rejected");
        };
        assert_eq!(outcome.notification().unwrap().level, Level::Info);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_absent_candidate_is_error_level() {
        let Transition::Reject(outcome) =
            plan_add(&ItemCollection::new(), &Candidate::default(), CollectionKind::Cart, None)
        else {
            panic!("absent candidate should be rejected");
        };
        assert_eq!(outcome.notification().unwrap().level, Level::Error);
    }

    #[test]
    fn test_silent_outcomes() {
        assert!(Outcome::MoveRejected { product_id: 1 }.notification().is_none());
        let save_failed = Outcome::SaveFailed {
            kind: CollectionKind::Cart,
        };
        assert!(save_failed.notification().is_none());
    }

    #[test]
    fn test_sort_needs_two_entries() {
        let (items, _) =
            ItemCollection::from_entries(vec![candidate(1, 5.0).normalize().unwrap()]);
        assert_eq!(
            plan_sort(&items, SortDirection::Asc),
            Transition::Reject(Outcome::NothingToSort)
        );
    }
}
