use serde::{Deserialize, Serialize};

use super::lenient::or_default;
use super::Price;

pub type ProductId = u64;

/// Category reference as embedded in product payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Supplier reference as embedded in product payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub username: String,
}

/// A catalog product as returned by the backend.
///
/// Fields the backend is known to omit are optional so a single malformed
/// record never fails the whole catalog response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "or_default")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "or_default")]
    pub stock: u32,
    #[serde(default, deserialize_with = "or_default")]
    pub category: Option<CategoryRef>,
    #[serde(default, deserialize_with = "or_default")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub supplier: Option<SupplierRef>,
    #[serde(default, deserialize_with = "or_default")]
    pub supplier_name: Option<String>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: Price, stock: u32) -> Self {
        Self {
            id: Some(id),
            title: Some(title.into()),
            price: Some(price),
            stock,
            ..Self::default()
        }
    }

    /// Owning supplier's username, from either the nested `supplier` object or
    /// the flat `supplier_name` field.
    pub fn owner(&self) -> Option<&str> {
        self.supplier
            .as_ref()
            .map(|supplier| supplier.username.as_str())
            .or(self.supplier_name.as_deref())
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled product")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_product_with_nested_refs() {
        let json = r#"{
            "id": 7,
            "title": "Bond paper",
            "price": "$4.50",
            "stock": 12,
            "category": {"id": 2, "name": "Office"},
            "image": null,
            "supplier": {"username": "acme"}
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, Some(7));
        assert_eq!(product.price, Some("4.50".parse().unwrap()));
        assert_eq!(product.category.as_ref().map(|c| c.name.as_str()), Some("Office"));
        assert_eq!(product.owner(), Some("acme"));
    }

    #[test]
    fn malformed_fields_do_not_reject_the_list() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"id": 1, "price": ""},
                {"id": 2, "price": "5", "stock": null},
                {"id": 3, "price": "abc", "stock": -4, "category": 9, "title": 17}
            ]"#,
        )
        .unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(products[0].price, None);
        assert_eq!(products[1].price, Some("5".parse().unwrap()));
        assert_eq!(products[1].stock, 0);
        assert_eq!(products[2].price, None);
        assert_eq!(products[2].stock, 0);
        assert_eq!(products[2].category, None);
        assert_eq!(products[2].display_title(), "Untitled product");
    }

    #[test]
    fn tolerates_missing_fields_and_flat_supplier_name() {
        let product: Product = serde_json::from_str(r#"{"supplier_name": "bulk-co"}"#).unwrap();

        assert_eq!(product.id, None);
        assert_eq!(product.stock, 0);
        assert_eq!(product.owner(), Some("bulk-co"));
        assert_eq!(product.display_title(), "Untitled product");
    }
}
