//! Variant resolution.
//!
//! A product page is addressed by SKU; the purchasable variant is the one whose
//! SKU matches the product's current SKU.

use serde::{Deserialize, Serialize};

use storefront_core::{Entity, ProductId, VariantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub entity_id: VariantId,
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    #[serde(default)]
    pub entity_id: Option<u64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_variant_option: bool,
}

/// Product with its variants and options, edges/nodes already flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    #[serde(default)]
    pub entity_id: Option<ProductId>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub product_options: Vec<ProductOption>,
}

impl Entity for CatalogProduct {
    type Id = ProductId;

    fn id(&self) -> Option<&Self::Id> {
        self.entity_id.as_ref()
    }
}

impl CatalogProduct {
    /// Variant matching the product's current SKU.
    pub fn current_variant(&self) -> Option<&Variant> {
        resolve_by_sku(&self.variants, &self.sku)
    }

    pub fn has_variant_options(&self) -> bool {
        has_variant_options(&self.product_options)
    }
}

/// First variant carrying `sku`.
pub fn resolve_by_sku<'a>(variants: &'a [Variant], sku: &str) -> Option<&'a Variant> {
    variants.iter().find(|v| v.sku == sku)
}

/// MPN to show for a line item: the variant's MPN, else the product SKU.
pub fn resolve_mpn(product_sku: &str, variants: &[Variant], variant_id: Option<VariantId>) -> String {
    variant_id
        .and_then(|id| variants.iter().find(|v| v.entity_id == id))
        .and_then(|v| v.mpn.as_deref())
        .filter(|mpn| !mpn.trim().is_empty())
        .unwrap_or(product_sku)
        .to_string()
}

pub fn has_variant_options(options: &[ProductOption]) -> bool {
    options.iter().any(|o| o.is_variant_option)
}
