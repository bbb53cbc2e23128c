//! Money engine: invoice totals from line items and a tax rate.
//!
//! All amounts are `i64` minor currency units. Tax is computed on basis
//! points with integer arithmetic so identical inputs always produce
//! identical totals.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::ValidationError;

const BASIS_POINTS_PER_PERCENT: u32 = 100;
const MAX_BASIS_POINTS: u32 = 100 * BASIS_POINTS_PER_PERCENT;

/// Tax rate between 0 and 100 percent with at most two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TaxRate(u32);

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(0);

    /// Creates a rate from basis points (1 bp = 0.01 %).
    pub fn from_basis_points(bp: u32) -> Result<Self, MoneyError> {
        if bp > MAX_BASIS_POINTS {
            return Err(MoneyError::TaxRateOutOfRange { basis_points: bp as i64 });
        }
        Ok(Self(bp))
    }

    /// Parses a percentage such as `"11"`, `"7.5"` or `"12.25"`.
    pub fn from_percent_str(raw: &str) -> Result<Self, MoneyError> {
        let raw = raw.trim();
        let malformed = || MoneyError::MalformedTaxRate { raw: raw.to_string() };

        let (whole, fraction) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let whole: u32 = whole.parse().map_err(|_| malformed())?;
        let mut hundredths: u32 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| malformed())?
        };
        if fraction.len() == 1 {
            hundredths *= 10;
        }

        let bp = whole
            .checked_mul(BASIS_POINTS_PER_PERCENT)
            .and_then(|v| v.checked_add(hundredths))
            .ok_or(MoneyError::TaxRateOutOfRange { basis_points: i64::MAX })?;
        Self::from_basis_points(bp)
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BASIS_POINTS_PER_PERCENT;
        let hundredths = self.0 % BASIS_POINTS_PER_PERCENT;
        match hundredths {
            0 => write!(f, "{}", whole),
            h if h % 10 == 0 => write!(f, "{}.{}", whole, h / 10),
            h => write!(f, "{}.{:02}", whole, h),
        }
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Accepts either a JSON number (`11.5`) or a string (`"11.5"`).
impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        TaxRate::from_percent_str(&text).map_err(serde::de::Error::custom)
    }
}

/// The two numbers of a line item that matter to the money engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItemAmounts {
    pub quantity: i64,
    pub unit_price: i64,
}

/// Computed monetary state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub sub_total: i64,
    pub tax_rate: TaxRate,
    pub tax_amount: i64,
    pub total_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("An invoice needs at least one line item")]
    NoLineItems,

    #[error("Item {index}: quantity must be at least 1, got {quantity}")]
    InvalidQuantity { index: usize, quantity: i64 },

    #[error("Item {index}: unit price cannot be negative, got {unit_price}")]
    NegativeUnitPrice { index: usize, unit_price: i64 },

    #[error("Invoice amounts exceed the supported range")]
    Overflow,

    #[error("Tax rate must be between 0 and 100 percent")]
    TaxRateOutOfRange { basis_points: i64 },

    #[error("Tax rate '{raw}' is not a percentage with at most two decimals")]
    MalformedTaxRate { raw: String },
}

impl MoneyError {
    /// Form field the error belongs to.
    pub fn field(&self) -> String {
        match self {
            MoneyError::NoLineItems | MoneyError::Overflow => "items".to_string(),
            MoneyError::InvalidQuantity { index, .. } => format!("items[{}].quantity", index),
            MoneyError::NegativeUnitPrice { index, .. } => format!("items[{}].unit_price", index),
            MoneyError::TaxRateOutOfRange { .. } | MoneyError::MalformedTaxRate { .. } => {
                "tax_rate".to_string()
            }
        }
    }
}

impl From<MoneyError> for ValidationError {
    fn from(err: MoneyError) -> Self {
        match &err {
            MoneyError::InvalidQuantity { quantity, .. } => {
                ValidationError::out_of_range(err.field(), 1, i64::MAX, *quantity)
            }
            MoneyError::NegativeUnitPrice { unit_price, .. } => {
                ValidationError::out_of_range(err.field(), 0, i64::MAX, *unit_price)
            }
            MoneyError::TaxRateOutOfRange { basis_points } => {
                ValidationError::out_of_range(err.field(), 0, MAX_BASIS_POINTS as i64, *basis_points)
            }
            _ => ValidationError::invalid_format(err.field(), err.to_string()),
        }
    }
}

/// Computes sub total, tax and total for a set of line items.
pub fn compute_totals(
    items: &[LineItemAmounts],
    tax_rate: TaxRate,
) -> Result<InvoiceTotals, MoneyError> {
    if items.is_empty() {
        return Err(MoneyError::NoLineItems);
    }

    let mut sub_total: i64 = 0;
    for (index, item) in items.iter().enumerate() {
        if item.quantity < 1 {
            return Err(MoneyError::InvalidQuantity {
                index,
                quantity: item.quantity,
            });
        }
        if item.unit_price < 0 {
            return Err(MoneyError::NegativeUnitPrice {
                index,
                unit_price: item.unit_price,
            });
        }
        let line = item
            .quantity
            .checked_mul(item.unit_price)
            .ok_or(MoneyError::Overflow)?;
        sub_total = sub_total.checked_add(line).ok_or(MoneyError::Overflow)?;
    }

    let tax_amount = tax_on(sub_total, tax_rate)?;
    let total_amount = sub_total
        .checked_add(tax_amount)
        .ok_or(MoneyError::Overflow)?;

    Ok(InvoiceTotals {
        sub_total,
        tax_rate,
        tax_amount,
        total_amount,
    })
}

/// Half-up rounding of `sub_total * rate / 100`; `sub_total` is never negative.
fn tax_on(sub_total: i64, tax_rate: TaxRate) -> Result<i64, MoneyError> {
    let scaled = i128::from(sub_total) * i128::from(tax_rate.basis_points());
    let rounded = (scaled + i128::from(MAX_BASIS_POINTS / 2)) / i128::from(MAX_BASIS_POINTS);
    i64::try_from(rounded).map_err(|_| MoneyError::Overflow)
}
