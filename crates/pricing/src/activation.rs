//! Activation-code discounts.
//!
//! An activation code (arriving as a query parameter, then remembered in a
//! cookie) unlocks brand-specific discount tiers for a session. Each tier is a
//! [`DiscountRule`]: a list of brand ids and a percentage. A product is
//! discounted by the first rule whose brand list contains the product's brand.

use serde::{Deserialize, Serialize};

use storefront_core::{BrandId, CurrencyCode, ProductId, lenient};

use crate::discount;
use crate::product::{BrandRef, PriceField, PricedProduct, ProductPrices};

/// Cookie (and query parameter) carrying the activation code.
pub const ACTIVATION_COOKIE: &str = "activation_code";

/// A non-empty, trimmed activation code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActivationCode(String);

impl ActivationCode {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActivationCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "activation code cannot be blank".to_string())
    }
}

impl From<ActivationCode> for String {
    fn from(value: ActivationCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for ActivationCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A discount tier unlocked by an activation code.
///
/// Field names follow the settings backend (`bc_brand_ids`, `discount`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRule {
    pub activation_code: ActivationCode,
    /// Unparseable ids are dropped with a warning; the rest of the rule stands.
    #[serde(default, deserialize_with = "lenient::vec_skip_invalid")]
    pub bc_brand_ids: Vec<BrandId>,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub discount: Option<f64>,
}

impl DiscountRule {
    pub fn covers(&self, brand_id: BrandId) -> bool {
        self.bc_brand_ids.contains(&brand_id)
    }

    /// Discount percentage; a missing or malformed value counts as 0.
    pub fn percent(&self) -> f64 {
        discount::clamp_percent(self.discount.unwrap_or(0.0))
    }
}

/// Where activation-code rules come from.
pub trait DiscountRuleSource: Send + Sync {
    /// All rules unlocked by `code`, in priority order.
    fn rules_for_code(&self, code: &ActivationCode) -> Vec<DiscountRule>;
}

/// In-memory rule list, usually loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    rules: Vec<DiscountRule>,
}

impl RuleBook {
    pub fn new(rules: Vec<DiscountRule>) -> Self {
        Self { rules }
    }

    /// Decode a JSON array of rules.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl DiscountRuleSource for RuleBook {
    fn rules_for_code(&self, code: &ActivationCode) -> Vec<DiscountRule> {
        self.rules
            .iter()
            .filter(|r| &r.activation_code == code)
            .cloned()
            .collect()
    }
}

/// A discounted price for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub original_price: f64,
    pub value: f64,
    pub currency_code: CurrencyCode,
    pub discount_percent: f64,
}

/// First rule covering `brand_id`, if any.
pub fn matching_rule(rules: &[DiscountRule], brand_id: BrandId) -> Option<&DiscountRule> {
    rules.iter().find(|r| r.covers(brand_id))
}

fn quote_from(original: Option<f64>, currency: CurrencyCode, rule: &DiscountRule) -> PriceQuote {
    let original_price = discount::sanitize_price(original.unwrap_or(0.0));
    let percent = rule.percent();
    PriceQuote {
        original_price,
        value: discount::apply_percent(original_price, percent),
        currency_code: currency,
        discount_percent: percent,
    }
}

/// Quote a product-detail price under an activation code.
///
/// Returns `None` when there is no code, no rule covers the brand, or the
/// product carries no `prices` block at all. Missing individual prices count
/// as 0.
pub fn quote_for_product(
    product: &PricedProduct,
    code: Option<&ActivationCode>,
    brand_id: BrandId,
    rules: &[DiscountRule],
) -> Option<PriceQuote> {
    code?;
    let rule = matching_rule(rules, brand_id)?;
    let prices = product.prices.as_ref()?;
    let original = prices.effective_value();
    if original.is_none() {
        tracing::debug!(brand_id = %brand_id, "product has no usable price; quoting from 0");
    }
    Some(quote_from(original, prices.currency(), rule))
}

/// A product tile on a listing, search or cart page.
///
/// Fields the pricing logic does not read are preserved untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingItem {
    #[serde(
        default,
        deserialize_with = "lenient::option_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub entity_id: Option<ProductId>,
    #[serde(
        default,
        deserialize_with = "lenient::option_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub brand: Option<BrandRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<PriceField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<ProductPrices>,
    #[serde(
        default,
        rename = "activation_sale_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub activation_sale_price: Option<PriceQuote>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Attach an `activation_sale_price` to every item a rule covers.
///
/// Items without a brand, without an `originalPrice`, or not covered by any
/// rule come back unchanged. Without a code nothing is touched.
pub fn annotate_listing(
    items: Vec<ListingItem>,
    code: Option<&ActivationCode>,
    rules: &[DiscountRule],
) -> Vec<ListingItem> {
    if code.is_none() || rules.is_empty() {
        return items;
    }

    items
        .into_iter()
        .map(|mut item| {
            let rule = item
                .brand
                .and_then(|b| b.entity_id)
                .and_then(|brand_id| matching_rule(rules, brand_id));
            if let (Some(rule), Some(original)) = (rule, item.original_price.as_ref()) {
                let currency = item
                    .prices
                    .as_ref()
                    .map(ProductPrices::currency)
                    .unwrap_or_default();
                item.activation_sale_price = Some(quote_from(original.value, currency, rule));
            }
            item
        })
        .collect()
}
