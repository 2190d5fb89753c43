//! The product catalog and the analytics derived from it.

mod item;
mod stats;

pub use item::{Catalog, CatalogItem, CategoryFilter};
pub use stats::{CatalogSummary, CategoryCount, ChartPoint};
