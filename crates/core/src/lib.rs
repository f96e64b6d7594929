//! `storefront-core`: shared building blocks for the storefront workspace.
//!
//! This crate contains **pure** primitives (no IO): identifiers, money, lenient
//! numeric decoding and the domain error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod lenient;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BrandId, CategoryId, CustomerGroupId, ProductId, VariantId};
pub use money::{CurrencyCode, Money};
pub use value_object::ValueObject;
