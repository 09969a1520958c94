//! Conversions from store API wire types to domain types.

use shopsmart_core::{Category, Product};

use super::types::{ApiCategory, ApiProduct};

pub fn convert_category(category: ApiCategory) -> Category {
    Category {
        id: category.id,
        name: category.name,
        image: clean_image_url(&category.image).unwrap_or_default(),
    }
}

pub fn convert_product(product: ApiProduct) -> Product {
    let category = product.category.map(convert_category);
    Product {
        id: product.id,
        title: product.title,
        price: product.price,
        description: product.description,
        images: product
            .images
            .iter()
            .filter_map(|image| clean_image_url(image))
            .collect(),
        category_id: product.category_id.or_else(|| category.as_ref().map(|c| c.id)),
        category,
    }
}

/// Some catalog entries carry image URLs wrapped in JSON-array debris,
/// e.g. `["https://i.imgur.com/QkIa5tT.jpeg"`. Strip it; drop blanks.
fn clean_image_url(raw: &str) -> Option<String> {
    let cleaned = raw
        .trim()
        .trim_start_matches(['[', '"'])
        .trim_end_matches([']', '"'])
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopsmart_core::{CategoryId, ProductId};

    use super::*;

    fn api_product(images: Vec<&str>, category: Option<ApiCategory>) -> ApiProduct {
        ApiProduct {
            id: ProductId::new(7),
            title: "Classic Red Pullover Hoodie".to_string(),
            price: Decimal::new(10, 0),
            description: "Soft fleece".to_string(),
            images: images.into_iter().map(String::from).collect(),
            category_id: None,
            category,
        }
    }

    #[test]
    fn test_clean_image_url() {
        assert_eq!(
            clean_image_url(r#"["https://i.imgur.com/QkIa5tT.jpeg""#).as_deref(),
            Some("https://i.imgur.com/QkIa5tT.jpeg")
        );
        assert_eq!(
            clean_image_url(r#""https://i.imgur.com/jb5Yu0h.jpeg"]"#).as_deref(),
            Some("https://i.imgur.com/jb5Yu0h.jpeg")
        );
        assert_eq!(
            clean_image_url("https://placehold.co/600x400").as_deref(),
            Some("https://placehold.co/600x400")
        );
        assert_eq!(clean_image_url(r#"[""]"#), None);
        assert_eq!(clean_image_url("  "), None);
    }

    #[test]
    fn test_convert_product_takes_category_id_from_embedded_category() {
        let product = convert_product(api_product(
            vec!["https://placehold.co/600x400", ""],
            Some(ApiCategory {
                id: CategoryId::new(1),
                name: "Clothes".to_string(),
                image: "https://i.imgur.com/QkIa5tT.jpeg".to_string(),
            }),
        ));
        assert_eq!(product.category_id, Some(CategoryId::new(1)));
        assert_eq!(product.images, vec!["https://placehold.co/600x400"]);
        assert_eq!(product.category.map(|c| c.name).as_deref(), Some("Clothes"));
    }

    #[test]
    fn test_convert_product_without_category() {
        let product = convert_product(api_product(vec![], None));
        assert!(product.category_id.is_none());
        assert!(product.images.is_empty());
        assert_eq!(product.thumbnail(), None);
    }
}
