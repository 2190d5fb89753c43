use crate::cart::{CartManager, Receipt};
use crate::catalog::{Catalog, CatalogItem, CategoryFilter};
use crate::config::StorefrontConfig;
use crate::core::{Result, StoreError};
use crate::model::{Candidate, Outcome};
use crate::notify::NotificationSink;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, PersistentStore};
use crate::wishlist::WishlistManager;
use log::info;
use std::sync::Arc;

/// One shopper's cart and wishlist over one store.
///
/// Construct it once and pass it to whatever needs it; there is no global
/// instance.
pub struct Storefront {
    config: StorefrontConfig,
    store: PersistentStore,
    catalog: Catalog,
    cart: CartManager,
    wishlist: WishlistManager,
}

impl Storefront {
    /// Build both managers over `backend` and hydrate them.
    pub fn open(
        config: StorefrontConfig,
        backend: Arc<dyn KeyValueStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        config.validate().map_err(StoreError::InvalidConfig)?;

        let store = PersistentStore::new(backend, sink);
        let mut cart = CartManager::new(store.clone(), &config);
        let mut wishlist = WishlistManager::new(store.clone(), &config);
        cart.hydrate();
        wishlist.hydrate();
        info!(
            "storefront opened: {} cart entries, {} wishlist entries",
            cart.len(),
            wishlist.len()
        );

        Ok(Self {
            config,
            store,
            catalog: Catalog::default(),
            cart,
            wishlist,
        })
    }

    /// Open against an in-memory store.
    pub fn in_memory(sink: Arc<dyn NotificationSink>) -> Result<Self> {
        Self::open(StorefrontConfig::default(), Arc::new(MemoryStore::new()), sink)
    }

    /// Open against the configured data directory, loading the configured
    /// catalog if there is one.
    pub fn from_config(config: StorefrontConfig, sink: Arc<dyn NotificationSink>) -> Result<Self> {
        let dir = config.data_dir.clone().ok_or_else(|| {
            StoreError::InvalidConfig("data_dir is required for a file-backed store".to_string())
        })?;
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::default(),
        };
        let storefront = Self::open(config, Arc::new(FileStore::new(dir)), sink)?;
        Ok(storefront.with_catalog(catalog))
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartManager {
        &mut self.cart
    }

    pub fn wishlist(&self) -> &WishlistManager {
        &self.wishlist
    }

    pub fn wishlist_mut(&mut self) -> &mut WishlistManager {
        &mut self.wishlist
    }

    pub fn products(&self, filter: &CategoryFilter) -> Vec<&CatalogItem> {
        self.catalog.filter(filter)
    }

    pub fn add_product_to_cart(&mut self, product_id: i64) -> Outcome {
        let candidate = match self.lookup(product_id) {
            Ok(item) if !item.availability => {
                return self.report(Outcome::Unavailable {
                    title: item.product_title.clone(),
                });
            }
            Ok(item) => Candidate::from(item),
            Err(outcome) => return self.report(outcome),
        };
        self.cart.add(&candidate)
    }

    pub fn add_product_to_wishlist(&mut self, product_id: i64) -> Outcome {
        let candidate = match self.lookup(product_id) {
            Ok(item) => Candidate::from(item),
            Err(outcome) => return self.report(outcome),
        };
        self.wishlist.add(&candidate)
    }

    pub fn move_to_cart(&mut self, product_id: i64) -> Outcome {
        self.wishlist.move_to_cart(product_id, &mut self.cart)
    }

    pub fn purchase(&mut self) -> Option<Receipt> {
        self.cart.checkout()
    }

    fn lookup(&self, product_id: i64) -> std::result::Result<&CatalogItem, Outcome> {
        self.catalog
            .find(product_id)
            .ok_or(Outcome::UnknownProduct { product_id })
    }

    fn report(&self, outcome: Outcome) -> Outcome {
        if let Some(notification) = outcome.notification() {
            self.store.sink().emit(&notification);
        }
        outcome
    }
}
