// ============================================================================
// Storefront Library
// ============================================================================

pub mod core;
pub mod catalog;
pub mod model;
pub mod notify;
pub mod storage;
pub mod cart;
pub mod wishlist;
pub mod config;
pub mod facade;
mod managed;

// Re-export main types for convenience
pub use crate::core::{Price, Result, StoreError};
pub use catalog::{Catalog, CatalogItem, CatalogSummary, CategoryFilter, ChartPoint};
pub use model::{Candidate, CollectionKind, Entry, ItemCollection, Outcome, SortDirection};
pub use notify::{Level, LogSink, Notification, NotificationSink, NullSink, RecordingSink};
pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistentStore};
pub use cart::{CartManager, Receipt};
pub use wishlist::WishlistManager;
pub use config::StorefrontConfig;

// ============================================================================
// Service entry point
// ============================================================================

/// A shopper's cart and wishlist
///
/// This is the recommended way to use the crate in applications: build one
/// `Storefront`, hand it to whatever renders the pages, and route every user
/// action through it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use storefront::{Catalog, CatalogItem, Price, RecordingSink, Storefront};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let sink = Arc::new(RecordingSink::new());
/// let catalog = Catalog::from_items(vec![
///     CatalogItem::new(1, "Phone", "phone.png", Price::from_cents(60_000), "phones"),
///     CatalogItem::new(2, "Laptop", "laptop.png", Price::from_cents(50_000), "computers"),
/// ])?;
///
/// let mut shop = Storefront::in_memory(sink.clone())?.with_catalog(catalog);
/// shop.add_product_to_cart(1);
/// shop.add_product_to_cart(2); // 600 + 500 is over the cap
///
/// assert_eq!(shop.cart().len(), 1);
/// assert_eq!(shop.cart().total_price(), "600.00");
/// # Ok(())
/// # }
/// ```
pub use facade::Storefront;
