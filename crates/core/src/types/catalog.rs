//! Catalog entities and the product filter set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};
use crate::types::price::Price;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Category image URL.
    pub image: String,
}

/// A product as listed by the remote catalog.
///
/// The price is non-negative by convention of the catalog; nothing here
/// enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    /// Image URLs in display order.
    pub images: Vec<String>,
    /// Category reference. Always set when the catalog reported one.
    pub category_id: Option<CategoryId>,
    /// The resolved category, when the catalog embedded it.
    pub category: Option<Category>,
}

impl Product {
    /// Unit price in the storefront currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// First image, used for thumbnails.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Filters for a product listing. Every field is optional.
///
/// Values are forwarded to the remote catalog unmodified; the catalog is
/// responsible for applying them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Title substring.
    pub title: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<Decimal>,
    /// Inclusive upper price bound.
    pub price_max: Option<Decimal>,
    pub category_id: Option<CategoryId>,
}

impl ProductFilter {
    /// Returns true if no filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Query parameters understood by the catalog's product listing.
    ///
    /// Absent filters and an empty title are omitted. Order is stable:
    /// `title`, `price_min`, `price_max`, `categoryId`.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("title", title.to_owned()));
        }
        if let Some(min) = self.price_min {
            pairs.push(("price_min", min.to_string()));
        }
        if let Some(max) = self.price_max {
            pairs.push(("price_max", max.to_string()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId", category_id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, images: Vec<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            title: "Classic Tee".to_string(),
            price: Decimal::new(20, 0),
            description: String::new(),
            images: images.into_iter().map(String::from).collect(),
            category_id: None,
            category: None,
        }
    }

    #[test]
    fn test_empty_filter_has_no_pairs() {
        let filter = ProductFilter::default();
        assert!(filter.is_empty());
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn test_empty_title_is_omitted() {
        let filter = ProductFilter {
            title: Some(String::new()),
            ..ProductFilter::default()
        };
        assert!(filter.is_empty());
    }

    #[test]
    fn test_query_pairs_order_and_values() {
        let filter = ProductFilter {
            title: Some("Shirt ".to_string()),
            price_min: Some(Decimal::new(50, 0)),
            price_max: Some(Decimal::new(100, 0)),
            category_id: Some(CategoryId::new(3)),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("title", "Shirt ".to_string()),
                ("price_min", "50".to_string()),
                ("price_max", "100".to_string()),
                ("categoryId", "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_price_bound_is_kept() {
        let filter = ProductFilter {
            price_min: Some(Decimal::ZERO),
            ..ProductFilter::default()
        };
        assert_eq!(filter.query_pairs(), vec![("price_min", "0".to_string())]);
    }

    #[test]
    fn test_thumbnail_uses_first_image() {
        assert_eq!(
            product(1, vec!["https://i.imgur.com/a.jpeg", "https://i.imgur.com/b.jpeg"])
                .thumbnail(),
            Some("https://i.imgur.com/a.jpeg")
        );
        assert_eq!(product(2, vec![]).thumbnail(), None);
    }

    #[test]
    fn test_unit_price_display() {
        assert_eq!(product(1, vec![]).unit_price().display(), "$20.00");
    }
}
