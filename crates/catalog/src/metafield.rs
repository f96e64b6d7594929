//! Product and variant metafields.
//!
//! Spec-sheet style details live in metafields whose `description` encodes
//! placement as `mainOrder|category|label|subOrder`. Values are free-form and
//! frequently JSON-encoded.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::variant::CatalogProduct;

/// Keys never shown in the details table (rendered elsewhere or internal).
pub const EXCLUDED_KEYS: &[&str] = &["spec_sheet", "install_sheet", "included", "ratings_certifications"];

/// Categories never shown in the details table.
pub const EXCLUDED_CATEGORIES: &[&str] = &["Other"];

const DEFAULT_CATEGORY: &str = "Other";

/// Metafield key holding the "what's in the box" list.
pub const INCLUDED_KEY: &str = "included";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaField {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

fn join_values<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    values.map(display_value).collect::<Vec<_>>().join(", ")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => join_values(items.iter()),
        Value::Object(map) => join_values(map.values()),
    }
}

/// Render a raw metafield value for display.
///
/// JSON arrays and objects are flattened into `", "`-joined text, JSON strings
/// lose their quotes, anything that is not JSON is returned as-is.
pub fn format_value(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) | Err(_) => raw.to_string(),
        Ok(value) => display_value(&value),
    }
}

/// `snake_case_key` → `Snake Case Key`.
fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leading integer of `s` (after whitespace), 0 when there is none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub category: String,
    pub order: i64,
    pub main_order: i64,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailGroup {
    pub category: String,
    pub order: i64,
    pub details: Vec<DetailRow>,
}

impl DetailRow {
    fn from_field(field: &MetaField) -> Option<Self> {
        let description = field.description.as_deref().unwrap_or("");
        let mut parts = description.split('|');
        let main_order = parts.next();
        let category = non_empty(parts.next()).unwrap_or(DEFAULT_CATEGORY);
        let label = non_empty(parts.next());
        let sub_order = parts.next();

        if EXCLUDED_KEYS.contains(&field.key.as_str()) || EXCLUDED_CATEGORIES.contains(&category) {
            return None;
        }

        Some(Self {
            category: category.to_string(),
            order: leading_int(sub_order.unwrap_or("0")),
            main_order: leading_int(main_order.unwrap_or("0")),
            label: label.map(str::to_string).unwrap_or_else(|| title_case(&field.key)),
            value: format_value(&field.value),
        })
    }
}

/// Group displayable metafields by category.
///
/// Groups keep the main order of their first row and are sorted by it; rows
/// inside a group are sorted by their sub order. Both sorts are stable.
pub fn group_details(fields: &[MetaField]) -> Vec<DetailGroup> {
    let mut groups: Vec<DetailGroup> = Vec::new();

    for row in fields.iter().filter_map(DetailRow::from_field) {
        match groups.iter_mut().find(|g| g.category == row.category) {
            Some(group) => group.details.push(row),
            None => groups.push(DetailGroup {
                category: row.category.clone(),
                order: row.main_order,
                details: vec![row],
            }),
        }
    }

    groups.sort_by_key(|g| g.order);
    for group in &mut groups {
        group.details.sort_by_key(|d| d.order);
    }
    groups.retain(|g| !g.details.is_empty());
    groups
}

/// Why a metafield lookup returned what it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Found on the SKU-matched variant.
    Variant,
    /// Product has variant options, but the variant lacks the field.
    ProductWithoutVariantField,
    /// Product has variants but none of its options are variant options.
    ProductWithoutVariantOptions,
    /// Product has no variants/options, or none matches its SKU.
    ProductWithoutVariants,
    /// Neither level carries the field.
    Missing,
}

impl ResolutionSource {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Variant => "found both variant and product data",
            Self::ProductWithoutVariantField => "no variant data found, showing product data only",
            Self::ProductWithoutVariantOptions => "no variant options, showing product data only",
            Self::ProductWithoutVariants => "no variant data available, showing product data only",
            Self::Missing => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFieldResolution {
    /// Variant-level field, when one was found.
    pub meta_field: Option<MetaField>,
    /// Product-level field, when one exists.
    pub product_meta_field: Option<MetaField>,
    pub has_variant_options: bool,
    pub source: ResolutionSource,
}

impl MetaFieldResolution {
    pub fn is_variant_data(&self) -> bool {
        self.source == ResolutionSource::Variant
    }

    /// The field to display: variant level first, then product level.
    pub fn effective(&self) -> Option<&MetaField> {
        self.meta_field.as_ref().or(self.product_meta_field.as_ref())
    }
}

fn find<'a>(fields: &'a [MetaField], key: &str) -> Option<&'a MetaField> {
    fields.iter().find(|f| f.key == key)
}

/// Resolve `key` for a product, preferring its SKU-matched variant.
///
/// `variant_fields` are the metafields of the product's current variant.
pub fn resolve(
    key: &str,
    product: &CatalogProduct,
    product_fields: &[MetaField],
    variant_fields: &[MetaField],
) -> MetaFieldResolution {
    let product_meta_field = find(product_fields, key).cloned();
    let has_product_field = product_meta_field.is_some();
    let product_source = move |source| {
        if has_product_field {
            source
        } else {
            ResolutionSource::Missing
        }
    };

    let variant_context = !product.variants.is_empty()
        && !product.product_options.is_empty()
        && product.current_variant().is_some();

    if !variant_context {
        return MetaFieldResolution {
            source: product_source(ResolutionSource::ProductWithoutVariants),
            meta_field: None,
            product_meta_field,
            has_variant_options: false,
        };
    }

    let has_variant_options = product.has_variant_options();
    if !has_variant_options {
        return MetaFieldResolution {
            source: product_source(ResolutionSource::ProductWithoutVariantOptions),
            meta_field: None,
            product_meta_field,
            has_variant_options,
        };
    }

    match find(variant_fields, key) {
        Some(variant_field) => MetaFieldResolution {
            meta_field: Some(variant_field.clone()),
            product_meta_field,
            has_variant_options,
            source: ResolutionSource::Variant,
        },
        None => MetaFieldResolution {
            source: product_source(ResolutionSource::ProductWithoutVariantField),
            meta_field: None,
            product_meta_field,
            has_variant_options,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedItem {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedItems {
    pub product_level: Vec<IncludedItem>,
    pub variant_level: Vec<IncludedItem>,
}

/// Parse an `included` metafield value. Malformed JSON yields an empty list.
pub fn parse_included(raw: &str) -> Vec<IncludedItem> {
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, "failed to parse included items");
            Vec::new()
        }
    }
}

/// Included items at product level and, when the variant has its own list,
/// at variant level.
pub fn included_items(
    product: &CatalogProduct,
    product_fields: &[MetaField],
    variant_fields: &[MetaField],
) -> IncludedItems {
    let product_level = find(product_fields, INCLUDED_KEY)
        .map(|f| parse_included(&f.value))
        .unwrap_or_default();

    let resolution = resolve(INCLUDED_KEY, product, product_fields, variant_fields);
    let variant_level = match (&resolution.meta_field, resolution.is_variant_data()) {
        (Some(field), true) if !field.value.is_empty() => parse_included(&field.value),
        _ => Vec::new(),
    };

    IncludedItems {
        product_level,
        variant_level,
    }
}
