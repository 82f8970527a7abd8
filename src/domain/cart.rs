use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::lenient::or_default;
use super::{Price, Product, ProductId};

/// One product + requested quantity entry in the local cart.
///
/// Carries a snapshot of the product's displayable fields taken when the line
/// was first added; later catalog changes are not reflected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "or_default")]
    pub stock: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_quantity", deserialize_with = "at_least_one")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Persisted lines with a missing, null or zero quantity count as one.
fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let quantity = Option::<u32>::deserialize(deserializer)?;
    Ok(quantity.filter(|q| *q > 0).unwrap_or(1))
}

impl CartLine {
    /// Snapshot `product` into a new line. Returns `None` if the product has no id.
    pub fn from_product(product: &Product, quantity: u32) -> Option<Self> {
        Some(Self {
            product_id: product.id?,
            title: product.title.clone(),
            price: product.price,
            stock: product.stock,
            image: product.image.clone(),
            quantity,
        })
    }

    /// Unit price × quantity; a missing price counts as zero.
    pub fn line_total(&self) -> Decimal {
        self.price.unwrap_or(Price::ZERO).times(self.quantity)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled product")
    }
}

/// Aggregate price of every line in the cart.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}
