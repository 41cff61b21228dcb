use serde::{Deserialize, Deserializer, Serialize};

/// A catalog product, sourced wholesale from the static `products.json`
/// document. Never created or mutated by the UI.
///
/// The source document is not validated: a missing field degrades the
/// individual render (empty string, NaN price) instead of failing the load.
/// Ids may arrive as JSON numbers or strings and normalize to `String` so
/// they compare against cart storage tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "price_missing")]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

fn price_missing() -> f64 {
    f64::NAN
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Int(n) => n.to_string(),
        IdRepr::Float(n) => n.to_string(),
    })
}

impl Product {
    /// Line total for `quantity` units of this product.
    /// NaN prices propagate, matching the unvalidated input contract.
    pub fn line_total(&self, quantity: u32) -> f64 {
        self.price * f64::from(quantity)
    }

    /// Look a product up by its normalized id.
    pub fn find_by_id<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
        products.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let doc = r#"[
            {"id": 1, "name": "Чай", "price": 100, "category": "drinks", "image": "tea.png"},
            {"id": "2", "name": "Кофе", "price": 50.5, "category": "drinks", "image": "coffee.png"}
        ]"#;
        let products: Vec<Product> = serde_json::from_str(doc).unwrap();
        assert_eq!(products[0].id, "1");
        assert_eq!(products[1].id, "2");
        assert_eq!(products[1].price, 50.5);
    }

    #[test]
    fn missing_fields_degrade_instead_of_failing() {
        let doc = r#"[{"id": 3}]"#;
        let products: Vec<Product> = serde_json::from_str(doc).unwrap();
        assert_eq!(products[0].name, "");
        assert_eq!(products[0].category, "");
        assert!(products[0].price.is_nan());
        // NaN propagates through arithmetic rather than erroring
        assert!(products[0].line_total(2).is_nan());
    }

    #[test]
    fn find_by_id_matches_normalized_tokens() {
        let products = vec![
            Product {
                id: "10".into(),
                name: "Сок".into(),
                price: 80.0,
                category: "drinks".into(),
                image: String::new(),
            },
        ];
        assert!(Product::find_by_id(&products, "10").is_some());
        assert!(Product::find_by_id(&products, "11").is_none());
    }
}
