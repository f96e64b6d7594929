//! Product pricing inputs, shaped like the storefront API's product payload.
//!
//! Every price field may be missing or `null`; nothing here fails to decode
//! because of absent prices.

use serde::{Deserialize, Serialize};

use storefront_core::{BrandId, CurrencyCode, Entity, ProductId, lenient};

/// One price node: `{ "value": 129.99, "currencyCode": "USD" }`, both optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceField {
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub value: Option<f64>,
    /// Blank or non-ISO codes read as absent.
    #[serde(default, deserialize_with = "lenient::option_or_none")]
    pub currency_code: Option<CurrencyCode>,
}

impl PriceField {
    pub fn new(value: f64) -> Self {
        Self {
            value: Some(value),
            currency_code: None,
        }
    }
}

/// The `prices` block of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrices {
    #[serde(default)]
    pub price: Option<PriceField>,
    #[serde(default)]
    pub base_price: Option<PriceField>,
    #[serde(default)]
    pub sale_price: Option<PriceField>,
    #[serde(default)]
    pub retail_price: Option<PriceField>,
}

impl ProductPrices {
    /// Price a discount is computed from: sale, then base, then list price.
    ///
    /// Each step falls through only when the field (or its value) is absent.
    pub fn effective_value(&self) -> Option<f64> {
        [&self.sale_price, &self.base_price, &self.price]
            .into_iter()
            .find_map(|field| field.as_ref().and_then(|f| f.value))
    }

    /// Currency of the list price, defaulting to USD.
    pub fn currency(&self) -> CurrencyCode {
        self.price
            .as_ref()
            .and_then(|p| p.currency_code.clone())
            .unwrap_or_default()
    }
}

/// `{ "entityId": 47 }` reference to a brand. A null or malformed id means no brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandRef {
    #[serde(default, deserialize_with = "lenient::option_or_none")]
    pub entity_id: Option<BrandId>,
}

impl BrandRef {
    pub fn new(entity_id: BrandId) -> Self {
        Self {
            entity_id: Some(entity_id),
        }
    }
}

/// The subset of a product needed to price it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    #[serde(default, deserialize_with = "lenient::option_or_none")]
    pub entity_id: Option<ProductId>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_or_none")]
    pub brand: Option<BrandRef>,
    #[serde(default)]
    pub prices: Option<ProductPrices>,
}

impl PricedProduct {
    pub fn brand_id(&self) -> Option<BrandId> {
        self.brand.and_then(|b| b.entity_id)
    }
}

impl Entity for PricedProduct {
    type Id = ProductId;

    fn id(&self) -> Option<&Self::Id> {
        self.entity_id.as_ref()
    }
}
