//! Discount arithmetic shared by every pricing path.
//!
//! Activation-code tiers, customer-group rules and the listing annotator all
//! compute through these functions so they agree on precedence and clamping.
//! Values stay unrounded `f64`; rounding happens only for display.

/// Clamp a discount percentage into `[0, 100]`. Non-finite input is 0.
pub fn clamp_percent(percent: f64) -> f64 {
    if !percent.is_finite() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Treat non-finite and negative prices as missing (0).
pub fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 { price } else { 0.0 }
}

/// `price - (percent * price) / 100`, on sanitized inputs.
pub fn apply_percent(price: f64, percent: f64) -> f64 {
    let price = sanitize_price(price);
    let percent = clamp_percent(percent);
    let discounted = price - (percent * price) / 100.0;
    discounted.max(0.0)
}

/// Subtract a fixed amount, never going below zero.
pub fn apply_fixed(price: f64, amount: f64) -> f64 {
    let price = sanitize_price(price);
    let amount = sanitize_price(amount);
    (price - amount).max(0.0)
}

/// Replace the price with `target`, never raising it above the original.
pub fn apply_price_override(price: f64, target: f64) -> f64 {
    let price = sanitize_price(price);
    let target = sanitize_price(target);
    target.min(price)
}

/// Round half away from zero to two decimals.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}
