//! Customer-group discounts (trade accounts, wholesale tiers).
//!
//! Rules use the commerce backend's customer-group schema:
//!
//! ```json
//! { "type": "category", "category_id": 23, "method": "percent", "amount": "10.0000" }
//! ```
//!
//! Which rule applies depends on the product id and the category path the
//! product sits under. Product rules beat category rules, the deepest matching
//! category beats shallower ones, and an `all` rule is the fallback.

use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, CurrencyCode, ProductId, lenient};

use crate::discount;
use crate::product::PricedProduct;

/// What a rule is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Product,
    Category,
    All,
    PriceList,
    #[serde(other)]
    Unsupported,
}

/// How the amount modifies the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    Percent,
    Fixed,
    Price,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerGroupRule {
    #[serde(rename = "type")]
    pub scope: RuleScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub method: DiscountMethod,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub amount: Option<f64>,
}

impl CustomerGroupRule {
    fn amount(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Apply this rule to `price`. Unsupported methods leave it unchanged.
    pub fn apply(&self, price: f64) -> f64 {
        match self.method {
            DiscountMethod::Percent => discount::apply_percent(price, self.amount()),
            DiscountMethod::Fixed => discount::apply_fixed(price, self.amount()),
            DiscountMethod::Price => discount::apply_price_override(price, self.amount()),
            DiscountMethod::Unsupported => discount::sanitize_price(price),
        }
    }
}

/// A category as listed on a product, with its breadcrumb trail (root first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub entity_id: CategoryId,
    #[serde(default)]
    pub breadcrumbs: Vec<CategoryId>,
}

/// Breadcrumb ids of the category with the longest trail.
///
/// Ties keep the first category listed. No categories → empty path.
pub fn deepest_category_path(categories: &[CategoryNode]) -> Vec<CategoryId> {
    let Some(first) = categories.first() else {
        return Vec::new();
    };
    categories
        .iter()
        .skip(1)
        .fold(first, |longest, current| {
            if current.breadcrumbs.len() > longest.breadcrumbs.len() {
                current
            } else {
                longest
            }
        })
        .breadcrumbs
        .clone()
}

/// Pick the rule that applies to a product.
pub fn select_rule<'a>(
    product_id: Option<ProductId>,
    category_path: &[CategoryId],
    rules: &'a [CustomerGroupRule],
) -> Option<&'a CustomerGroupRule> {
    let usable = |r: &&CustomerGroupRule| r.method != DiscountMethod::Unsupported;

    if let Some(pid) = product_id {
        let product_rule = rules
            .iter()
            .filter(usable)
            .find(|r| r.scope == RuleScope::Product && r.product_id == Some(pid));
        if product_rule.is_some() {
            return product_rule;
        }
    }

    let category_rule = category_path.iter().rev().find_map(|cid| {
        rules
            .iter()
            .filter(usable)
            .find(|r| r.scope == RuleScope::Category && r.category_id == Some(*cid))
    });
    if category_rule.is_some() {
        return category_rule;
    }

    rules.iter().filter(usable).find(|r| r.scope == RuleScope::All)
}

/// Customer-group price for display next to the list price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPriceQuote {
    pub original_price: f64,
    pub updated_price: f64,
    pub has_discount: bool,
    pub currency_code: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied: Option<CustomerGroupRule>,
}

/// Price a product for a customer group.
///
/// Without an applicable rule the updated price equals the original.
pub fn quote(
    product: &PricedProduct,
    category_path: &[CategoryId],
    rules: &[CustomerGroupRule],
) -> GroupPriceQuote {
    let (original, currency) = match product.prices.as_ref() {
        Some(p) => (p.effective_value().unwrap_or(0.0), p.currency()),
        None => (0.0, CurrencyCode::default()),
    };
    let original_price = discount::sanitize_price(original);

    match select_rule(product.entity_id, category_path, rules) {
        Some(rule) => {
            let updated_price = rule.apply(original_price);
            tracing::debug!(
                scope = ?rule.scope,
                method = ?rule.method,
                original_price,
                updated_price,
                "customer group rule applied"
            );
            GroupPriceQuote {
                original_price,
                updated_price,
                has_discount: updated_price < original_price,
                currency_code: currency,
                applied: Some(rule.clone()),
            }
        }
        None => GroupPriceQuote {
            original_price,
            updated_price: original_price,
            has_discount: false,
            currency_code: currency,
            applied: None,
        },
    }
}
