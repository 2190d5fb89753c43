use crate::core::Price;
use crate::model::Entry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Confirmation of a simulated purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub order_id: Uuid,
    pub items: Vec<Entry>,
    pub total: Price,
    pub purchased_at: DateTime<Utc>,
}

impl Receipt {
    pub fn new(items: Vec<Entry>, total: Price) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            items,
            total,
            purchased_at: Utc::now(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
