use crate::core::{Price, Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A product as published in the catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub product_id: i64,
    pub product_title: String,
    pub product_image: String,
    pub price: Price,
    pub category: String,
    #[serde(default = "default_available")]
    pub availability: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specifications: Vec<String>,
}

fn default_available() -> bool {
    true
}

impl CatalogItem {
    pub fn new(
        product_id: i64,
        title: impl Into<String>,
        image: impl Into<String>,
        price: Price,
        category: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            product_title: title.into(),
            product_image: image.into(),
            price,
            category: category.into(),
            availability: true,
            rating: 0.0,
            description: None,
            specifications: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.availability = available;
        self
    }
}

/// Which products a listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All Products"),
            CategoryFilter::Category(name) => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str()),
                    None => Ok(()),
                }
            }
        }
    }
}

/// The read-only product list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.product_id) {
                return Err(StoreError::DuplicateProduct(item.product_id));
            }
            if !(0.0..=5.0).contains(&item.rating) {
                return Err(StoreError::ParseError(format!(
                    "rating {} of product {} is outside 0..=5",
                    item.rating, item.product_id
                )));
            }
        }
        Ok(Self { items })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let items: Vec<CatalogItem> = serde_json::from_str(raw)?;
        Self::from_items(items)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            StoreError::IoError(format!("Failed to read catalog '{}': {}", path.display(), err))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, product_id: i64) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&CatalogItem> {
        match filter {
            CategoryFilter::All => self.items.iter().collect(),
            CategoryFilter::Category(name) => self
                .items
                .iter()
                .filter(|item| &item.category == name)
                .collect(),
        }
    }
}
