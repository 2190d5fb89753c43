use crate::catalog::CatalogItem;
use crate::core::{Price, Result, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized catalog item retained inside the cart or the wishlist.
///
/// Field names match the persisted layout, so a stored array of entries is
/// also a valid array of catalog-shaped records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub product_id: i64,
    pub product_title: String,
    pub product_image: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
}

impl Entry {
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
        }
    }

    /// Validate one element of a stored array.
    pub fn from_value(value: Value) -> Result<Self> {
        let candidate: Candidate = serde_json::from_value(value)
            .map_err(|err| StoreError::InvalidEntry(format!("not an entry object: {}", err)))?;
        candidate.normalize()
    }
}

/// An unvalidated record offered to an add operation.
///
/// Anything that looks like a catalog item can be turned into a candidate;
/// [`Candidate::normalize`] is the only way to get an [`Entry`] out of it.
/// A candidate with every field missing stands for "nothing selected".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub product_title: Option<String>,
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Candidate {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn is_absent(&self) -> bool {
        self.product_id.as_ref().is_none_or(Value::is_null)
    }

    /// Best-effort title for messages about a candidate that may not be valid.
    pub fn display_title(&self) -> &str {
        self.product_title.as_deref().unwrap_or("Item")
    }

    /// Coerce the candidate into an entry or explain why it cannot be one.
    pub fn normalize(&self) -> Result<Entry> {
        let product_id = match &self.product_id {
            None | Some(Value::Null) => {
                return Err(StoreError::InvalidEntry("missing product_id".to_string()));
            }
            Some(raw) => normalize_product_id(raw)?,
        };

        let product_title = required_text(self.product_title.as_deref(), "product_title")?;
        let product_image = required_text(self.product_image.as_deref(), "product_image")?;

        let price = match &self.price {
            None | Some(Value::Null) => {
                return Err(StoreError::InvalidEntry(format!(
                    "missing price for product {}",
                    product_id
                )));
            }
            Some(raw) => serde_json::from_value::<Price>(raw.clone()).map_err(|err| {
                StoreError::InvalidEntry(format!("bad price for product {}: {}", product_id, err))
            })?,
        };

        Ok(Entry {
            product_id,
            product_title,
            product_image,
            price,
            category: self.category.clone().unwrap_or_default(),
        })
    }
}

fn normalize_product_id(raw: &Value) -> Result<i64> {
    let parsed = match raw {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        StoreError::InvalidEntry(format!("product_id {} is not an integer", raw))
    })
}

fn required_text(value: Option<&str>, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(StoreError::InvalidEntry(format!("missing {}", field))),
    }
}

impl From<&CatalogItem> for Candidate {
    fn from(item: &CatalogItem) -> Self {
        Self {
            product_id: Some(Value::from(item.product_id)),
            product_title: Some(item.product_title.clone()),
            product_image: Some(item.product_image.clone()),
            price: serde_json::to_value(item.price).ok(),
            category: Some(item.category.clone()),
        }
    }
}

impl From<&Entry> for Candidate {
    fn from(entry: &Entry) -> Self {
        Self {
            product_id: Some(Value::from(entry.product_id)),
            product_title: Some(entry.product_title.clone()),
            product_image: Some(entry.product_image.clone()),
            price: serde_json::to_value(entry.price).ok(),
            category: Some(entry.category.clone()),
        }
    }
}
