//! Storefront pricing.
//!
//! Pure, deterministic price computation over upstream API payloads (no IO, no
//! HTTP, no storage). Every entry point tolerates missing or malformed prices
//! and falls back to 0 or the base price instead of failing.

pub mod activation;
pub mod adjuster;
pub mod customer_group;
pub mod discount;
pub mod display;
pub mod product;
pub mod zero_tax;

pub use activation::{
    ACTIVATION_COOKIE, ActivationCode, DiscountRule, DiscountRuleSource, ListingItem, PriceQuote,
    RuleBook, annotate_listing, quote_for_product,
};
pub use adjuster::{AdjusterSummary, AdjustmentError, AgentRole, validate_adjustment};
pub use customer_group::{CategoryNode, CustomerGroupRule, GroupPriceQuote, deepest_category_path};
pub use display::{CartLine, CartLinePricing, HitPricing, savings_percent};
pub use product::{BrandRef, PriceField, PricedProduct, ProductPrices};
pub use zero_tax::{CheckoutTotals, Coupon, LineTaxShare, TaxableLine};
