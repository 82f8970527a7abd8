use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Currency markers the backend has been seen to prepend to prices.
const CURRENCY_PREFIXES: [&str; 3] = ["PHP", "₱", "$"];

/// A unit price, normalized to a decimal at the data-model boundary.
///
/// The backend and older screens disagree on the wire shape: some send bare
/// numbers (`10.5`), others currency-formatted strings (`"$10.00"`,
/// `"₱1,250.00"`). Both decode into the same value; encoding always produces a
/// plain decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("Price is empty")]
    Empty,
    #[error("Price is not a number: {0}")]
    NotANumber(String),
    #[error("Price cannot be negative: {0}")]
    Negative(String),
}

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount.to_string()));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity.
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut text = raw.trim();
        for prefix in CURRENCY_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest.trim_start();
                break;
            }
        }

        let cleaned: String = text.chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(&cleaned)
            .map_err(|_| PriceError::NotANumber(raw.to_string()))?;
        Price::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Wire shapes a price arrives in.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Text(String),
    Whole(u64),
    Fractional(f64),
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = match PriceRepr::deserialize(deserializer)? {
            PriceRepr::Text(text) => return text.parse().map_err(de::Error::custom),
            PriceRepr::Whole(whole) => Decimal::from(whole),
            PriceRepr::Fractional(fractional) => Decimal::from_f64(fractional).ok_or_else(|| {
                <D::Error as de::Error>::custom(format!("price out of range: {fractional}"))
            })?,
        };
        Price::new(amount).map_err(de::Error::custom)
    }
}
