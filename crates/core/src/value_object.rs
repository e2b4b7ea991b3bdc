//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two with the
/// same attribute values are the same value. `Barcode` and `Location` are
/// the value objects of this domain; an `Item` is an entity (same id = same
/// item, whatever its current values).
///
/// To "modify" a value object, construct a new one; constructors are the
/// single place the value's invariants are checked.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
