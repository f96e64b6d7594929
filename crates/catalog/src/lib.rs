//! Catalog helpers: variant resolution and product metafields.
//!
//! Works over payloads already fetched from the commerce backend; nothing here
//! performs IO.

pub mod metafield;
pub mod variant;

pub use metafield::{
    DetailGroup, DetailRow, IncludedItem, IncludedItems, MetaField, MetaFieldResolution,
    ResolutionSource,
};
pub use variant::{CatalogProduct, ProductOption, Variant};
