//! Price decorations shown on tiles, search hits and cart lines.

use serde::{Deserialize, Serialize};

use storefront_core::lenient;

use crate::discount;

/// Whole-percent savings between a list price and a sale price.
///
/// `floor((price - sale) * 100 / price)`, 0 when `price <= 0`, clamped to `[0, 100]`.
pub fn savings_percent(price: f64, sale: f64) -> u32 {
    if !(price.is_finite() && sale.is_finite()) || price <= 0.0 {
        return 0;
    }
    let pct = (((price - sale) * 100.0) / price).floor();
    pct.clamp(0.0, 100.0) as u32
}

/// Format a number the way the storefront prints percentages: up to two
/// decimals, trailing zeros dropped (`25.50` → `25.5`, `25.00` → `25`).
pub fn format_trimmed(value: f64) -> String {
    let s = format!("{:.2}", discount::round_cents(value));
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Pricing row for a search hit or autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPricing {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    pub display_price: f64,
    pub show_strikethrough: bool,
    pub savings_percent: u32,
}

impl HitPricing {
    /// A sale is shown only when the sale price is positive.
    pub fn new(price: Option<f64>, sale_price: Option<f64>) -> Self {
        let price = discount::sanitize_price(price.unwrap_or(0.0));
        let sale_price = sale_price.filter(|s| s.is_finite() && *s > 0.0);
        match sale_price {
            Some(sale) => Self {
                price,
                sale_price: Some(sale),
                display_price: sale,
                show_strikethrough: true,
                savings_percent: savings_percent(price, sale),
            },
            None => Self {
                price,
                sale_price: None,
                display_price: price,
                show_strikethrough: false,
                savings_percent: 0,
            },
        }
    }
}

/// A cart line as the cart page receives it (`extendedSalePrice`, ...).
///
/// Snake-case names are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(default, alias = "line_id")]
    pub line_id: Option<String>,
    #[serde(default = "one")]
    pub quantity: u32,
    /// Unit price before any discount.
    #[serde(default, alias = "original_price", deserialize_with = "lenient::option_f64")]
    pub original_price: Option<f64>,
    /// Unit list price.
    #[serde(default, alias = "list_price", deserialize_with = "lenient::option_f64")]
    pub list_price: Option<f64>,
    /// Sale price multiplied by quantity.
    #[serde(default, alias = "extended_sale_price", deserialize_with = "lenient::option_f64")]
    pub extended_sale_price: Option<f64>,
}

fn one() -> u32 {
    1
}

/// Decorations computed for a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinePricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    /// `"25.5% Off"`, when the line is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_off_label: Option<String>,
    /// Original extended price to strike through, when it differs from list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough_total: Option<f64>,
}

impl CartLine {
    /// Quantity used for extended prices; a zero quantity counts as one.
    fn effective_quantity(&self) -> f64 {
        f64::from(self.quantity.max(1))
    }

    /// Percent off the original extended price, rounded to two decimals.
    ///
    /// Both sides are compared at the extended (quantity-multiplied) level.
    pub fn percent_off(&self) -> Option<f64> {
        let original = self.original_price.filter(|v| *v > 0.0)?;
        let sale = self.extended_sale_price?;
        let quantity = self.effective_quantity();
        let pct = discount::round_cents(100.0 - (sale * 100.0) / (original * quantity));
        (pct > 0.0).then_some(pct)
    }

    pub fn pricing(&self) -> CartLinePricing {
        let strikethrough_total = match (self.original_price, self.list_price) {
            (Some(original), list) if original > 0.0 && Some(original) != list => {
                Some(discount::round_cents(original * self.effective_quantity()))
            }
            _ => None,
        };
        CartLinePricing {
            line_id: self.line_id.clone(),
            percent_off_label: self.percent_off().map(|p| format!("{}% Off", format_trimmed(p))),
            strikethrough_total,
        }
    }
}
