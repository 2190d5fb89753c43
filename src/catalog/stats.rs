use super::item::Catalog;
use crate::core::Price;
use serde::Serialize;

const CHART_NAME_LIMIT: usize = 10;
const RATING_SCALE: f64 = 20.0;

/// One product on the price/rating chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub price: f64,
    /// Rating scaled onto the price axis (0..=100).
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub products: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub product_count: usize,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub average_price: Option<Price>,
    pub categories: Vec<CategoryCount>,
}

fn chart_name(title: &str) -> String {
    if title.chars().count() > CHART_NAME_LIMIT {
        let head: String = title.chars().take(CHART_NAME_LIMIT).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

impl Catalog {
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.items()
            .iter()
            .map(|item| ChartPoint {
                name: chart_name(&item.product_title),
                price: item.price.as_f64(),
                rating: item.rating * RATING_SCALE,
            })
            .collect()
    }

    pub fn summary(&self) -> CatalogSummary {
        let prices: Vec<Price> = self.items().iter().map(|item| item.price).collect();
        let count = prices.len() as i64;
        let average_price = if count == 0 {
            None
        } else {
            Price::checked_sum(prices.iter().copied())
                .map(|total| Price::from_cents((total.cents() + count / 2) / count))
        };

        let categories = self
            .categories()
            .into_iter()
            .map(|category| CategoryCount {
                category: category.to_string(),
                products: self
                    .items()
                    .iter()
                    .filter(|item| item.category == category)
                    .count(),
            })
            .collect();

        CatalogSummary {
            product_count: prices.len(),
            min_price: prices.iter().min().copied(),
            max_price: prices.iter().max().copied(),
            average_price,
            categories,
        }
    }
}
