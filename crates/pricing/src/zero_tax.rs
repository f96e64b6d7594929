//! Zero-tax coupon apportionment.
//!
//! Tax-exempt customers get a coupon whose code contains `ZEROTAX`. The coupon
//! marks each exempt line with a nominal 0.10 discount per unit; the checkout
//! tax total is then apportioned across marked lines by their share of the
//! subtotal, which is the amount to back out of the order's tax.

use serde::{Deserialize, Serialize};

use storefront_core::lenient;

/// Substring identifying a zero-tax coupon code.
pub const ZERO_TAX_MARKER: &str = "ZEROTAX";

/// Per-unit coupon amount marking a line as tax exempt.
pub const EXEMPT_LINE_UNIT_DISCOUNT: f64 = 0.1;

const MARKER_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    #[serde(default)]
    pub coupons: Vec<Coupon>,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub subtotal: Option<f64>,
    #[serde(default, alias = "tax_total", deserialize_with = "lenient::option_f64")]
    pub tax_total: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxableLine {
    #[serde(alias = "line_id")]
    pub line_id: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, alias = "coupon_amount", deserialize_with = "lenient::option_f64")]
    pub coupon_amount: Option<f64>,
    #[serde(default, alias = "extended_sale_price", deserialize_with = "lenient::option_f64")]
    pub extended_sale_price: Option<f64>,
}

impl TaxableLine {
    fn is_marked_exempt(&self) -> bool {
        if self.quantity == 0 {
            return false;
        }
        let Some(coupon) = self.coupon_amount else {
            return false;
        };
        let per_unit = coupon / f64::from(self.quantity);
        (per_unit - EXEMPT_LINE_UNIT_DISCOUNT).abs() < MARKER_TOLERANCE
    }
}

/// Tax attributable to one exempt line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTaxShare {
    pub line_id: String,
    /// Fraction of the subtotal this line represents.
    pub subtotal_share: f64,
    /// `tax_total * subtotal_share`.
    pub tax_amount: f64,
}

pub fn has_zero_tax_coupon(coupons: &[Coupon]) -> bool {
    coupons.iter().any(|c| c.code.contains(ZERO_TAX_MARKER))
}

/// Apportion the checkout tax across lines the zero-tax coupon marked.
///
/// Empty when no zero-tax coupon is applied or the subtotal is not positive.
pub fn apportion(checkout: &CheckoutTotals, lines: &[TaxableLine]) -> Vec<LineTaxShare> {
    if !has_zero_tax_coupon(&checkout.coupons) {
        return Vec::new();
    }
    let subtotal = checkout.subtotal.unwrap_or(0.0);
    let tax_total = checkout.tax_total.unwrap_or(0.0);
    if subtotal <= 0.0 {
        tracing::warn!(subtotal, "zero-tax coupon applied to a checkout without a subtotal");
        return Vec::new();
    }

    lines
        .iter()
        .filter(|line| line.is_marked_exempt())
        .map(|line| {
            let amount = line.extended_sale_price.unwrap_or(0.0);
            let subtotal_share = amount / subtotal;
            LineTaxShare {
                line_id: line.line_id.clone(),
                subtotal_share,
                tax_amount: tax_total * subtotal_share,
            }
        })
        .collect()
}

/// Total tax to back out for exempt lines.
pub fn exempt_tax_total(shares: &[LineTaxShare]) -> f64 {
    shares.iter().map(|s| s.tax_amount).sum()
}
