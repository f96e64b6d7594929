//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values:
/// `Money { value: 10.0, currency_code: USD }` equals any other ten dollars.
/// To "change" one, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
