use serde::{Deserialize, Serialize};

use storefront_catalog::{CatalogProduct, DetailGroup, IncludedItems, MetaField, MetaFieldResolution, Variant};
use storefront_core::{lenient, BrandId, CustomerGroupId, VariantId};
use storefront_pricing::{
    CartLine, CartLinePricing, CategoryNode, CheckoutTotals, CustomerGroupRule, GroupPriceQuote,
    HitPricing, LineTaxShare, ListingItem, PriceQuote, PricedProduct, TaxableLine,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ActivationQuoteRequest {
    pub product: PricedProduct,
    /// Overrides the product's own brand.
    #[serde(default)]
    pub brand_id: Option<BrandId>,
}

#[derive(Debug, Deserialize)]
pub struct ListingRequest {
    #[serde(default)]
    pub items: Vec<ListingItem>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerGroupQuoteRequest {
    #[serde(default)]
    pub customer_group_id: Option<CustomerGroupId>,
    pub product: PricedProduct,
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
    #[serde(default)]
    pub rules: Vec<CustomerGroupRule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPriceInput {
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub price: Option<f64>,
    #[serde(default, alias = "sale_price", deserialize_with = "lenient::option_f64")]
    pub sale_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HitsRequest {
    #[serde(default)]
    pub hits: Vec<HitPriceInput>,
}

#[derive(Debug, Deserialize)]
pub struct CartLinePricingRequest {
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Deserialize)]
pub struct ZeroTaxRequest {
    pub checkout: CheckoutTotals,
    #[serde(default)]
    pub lines: Vec<TaxableLine>,
}

#[derive(Debug, Deserialize)]
pub struct PriceAdjustmentRequest {
    pub price: String,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub floor_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct VariantDetailsRequest {
    pub product: CatalogProduct,
    #[serde(default)]
    pub product_meta_fields: Vec<MetaField>,
    #[serde(default)]
    pub variant_meta_fields: Vec<MetaField>,
    /// Line-item variant for the MPN; defaults to the SKU-matched variant.
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    /// Extra metafield keys to resolve individually.
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteResolveQuery {
    pub domain: Option<String>,
    pub locale: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ActivationResponse {
    pub activation_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivationQuoteResponse {
    pub quote: Option<PriceQuote>,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub items: Vec<ListingItem>,
}

#[derive(Debug, Serialize)]
pub struct CustomerGroupQuoteResponse {
    pub quote: GroupPriceQuote,
}

#[derive(Debug, Serialize)]
pub struct HitsResponse {
    pub hits: Vec<HitPricing>,
}

#[derive(Debug, Serialize)]
pub struct CartLinePricingResponse {
    pub lines: Vec<CartLinePricing>,
}

#[derive(Debug, Serialize)]
pub struct ZeroTaxResponse {
    pub applies: bool,
    pub lines: Vec<LineTaxShare>,
    pub exempt_tax_total: f64,
}

#[derive(Debug, Serialize)]
pub struct PriceAdjustmentResponse {
    pub price: f64,
    pub floor_price: Option<f64>,
    pub role: &'static str,
    pub floor_restricted: bool,
}

#[derive(Debug, Serialize)]
pub struct ResolvedField {
    pub key: String,
    pub value: Option<String>,
    pub message: &'static str,
    #[serde(flatten)]
    pub resolution: MetaFieldResolution,
}

#[derive(Debug, Serialize)]
pub struct VariantDetailsResponse {
    pub variant: Option<Variant>,
    pub mpn: String,
    pub has_variant_options: bool,
    pub details: Vec<DetailGroup>,
    pub included: IncludedItems,
    pub fields: Vec<ResolvedField>,
}
