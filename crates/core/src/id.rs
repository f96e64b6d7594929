//! Strongly-typed identifiers used across the storefront.
//!
//! The commerce backend numbers every catalog entity with a positive integer
//! (`entityId`). Some backend payloads (discount rules in particular) carry the
//! same ids as strings, so every identifier accepts both on input and always
//! serializes as a number.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(u64);

/// Identifier of a product variant (a purchasable SKU).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VariantId(u64);

/// Identifier of a brand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BrandId(u64);

/// Identifier of a catalog category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryId(u64);

/// Identifier of a customer group (trade, wholesale, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CustomerGroupId(u64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

macro_rules! impl_entity_id {
    ($t:ident, $name:literal) => {
        impl $t {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {:?}: {}", $name, s, e)))?;
                Ok(Self(raw))
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(n) => Ok(Self(n)),
                    RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

impl_entity_id!(ProductId, "ProductId");
impl_entity_id!(VariantId, "VariantId");
impl_entity_id!(BrandId, "BrandId");
impl_entity_id!(CategoryId, "CategoryId");
impl_entity_id!(CustomerGroupId, "CustomerGroupId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_decimal() {
        assert_eq!(" 47 ".parse::<BrandId>().unwrap(), BrandId::new(47));
    }

    #[test]
    fn rejects_non_numeric() {
        let err = "abc".parse::<BrandId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn deserializes_from_number_or_string() {
        let ids: Vec<BrandId> = serde_json::from_str(r#"[47, "111"]"#).unwrap();
        assert_eq!(ids, vec![BrandId::new(47), BrandId::new(111)]);
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&CategoryId::new(23)).unwrap();
        assert_eq!(json, "23");
    }
}
