use crate::core::Price;
use std::path::PathBuf;

pub const DEFAULT_CART_KEY: &str = "cartItems";
pub const DEFAULT_WISHLIST_KEY: &str = "wishlistItems";
pub const DEFAULT_SPEND_CAP: Price = Price::from_cents(100_000);

/// Storefront configuration
///
/// Storage keys, spend cap and where the CLI keeps its files.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Storage key of the cart array
    pub cart_key: String,

    /// Storage key of the wishlist array
    pub wishlist_key: String,

    /// Upper bound on the cart total
    pub spend_cap: Price,

    /// Directory for a file-backed store
    pub data_dir: Option<PathBuf>,

    /// Catalog document
    pub catalog_path: Option<PathBuf>,
}

impl StorefrontConfig {
    pub fn new() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            wishlist_key: DEFAULT_WISHLIST_KEY.to_string(),
            spend_cap: DEFAULT_SPEND_CAP,
            data_dir: None,
            catalog_path: None,
        }
    }

    /// Set the cart storage key
    pub fn cart_key(mut self, key: &str) -> Self {
        self.cart_key = key.to_string();
        self
    }

    /// Set the wishlist storage key
    pub fn wishlist_key(mut self, key: &str) -> Self {
        self.wishlist_key = key.to_string();
        self
    }

    /// Set the spend cap
    pub fn spend_cap(mut self, cap: Price) -> Self {
        self.spend_cap = cap;
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Use `path` as the catalog if the file exists, otherwise run without
    /// one. Replaces any catalog picked up earlier.
    pub fn catalog_path_if_exists(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.catalog_path = path.exists().then_some(path);
        self
    }

    /// Build from `STOREFRONT_*` variables, falling back to defaults.
    ///
    /// Recognised: `STOREFRONT_DATA_DIR`, `STOREFRONT_CATALOG`,
    /// `STOREFRONT_SPEND_CAP`, `STOREFRONT_CART_KEY`, `STOREFRONT_WISHLIST_KEY`.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::new();
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "STOREFRONT_DATA_DIR" => config = config.data_dir(value),
                "STOREFRONT_CATALOG" => config = config.catalog_path(value),
                "STOREFRONT_CART_KEY" => config = config.cart_key(value),
                "STOREFRONT_WISHLIST_KEY" => config = config.wishlist_key(value),
                "STOREFRONT_SPEND_CAP" => {
                    let cap = value
                        .parse::<Price>()
                        .map_err(|e| format!("Invalid STOREFRONT_SPEND_CAP: {}", e))?;
                    config = config.spend_cap(cap);
                }
                _ => {}
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(std::env::vars())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cart_key.is_empty() {
            return Err("cart_key cannot be empty".to_string());
        }

        if self.wishlist_key.is_empty() {
            return Err("wishlist_key cannot be empty".to_string());
        }

        if self.cart_key == self.wishlist_key {
            return Err("cart_key and wishlist_key must differ".to_string());
        }

        Ok(())
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self::new()
    }
}
