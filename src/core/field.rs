//! Field value types used for cross-field comparisons

use crate::core::relation::EntityReference;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    /// A related entity, compared by its identifier
    Reference(EntityReference),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    ///
    /// References yield the id of the related entity.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            FieldValue::Reference(r) => Some(r.id),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Check if the value carries no usable comparison key
    ///
    /// Null, empty strings, zero numbers and `false` are all falsy.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(s) => s.is_empty(),
            FieldValue::Integer(i) => *i == 0,
            FieldValue::Float(f) => *f == 0.0 || f.is_nan(),
            FieldValue::Boolean(b) => !b,
            FieldValue::Uuid(_) | FieldValue::DateTime(_) | FieldValue::Reference(_) => false,
        }
    }

    /// The value used when comparing two entities on this field
    ///
    /// References are dereferenced to the related entity's id, everything
    /// else compares as-is.
    pub fn comparison_value(&self) -> FieldValue {
        match self {
            FieldValue::Reference(r) => FieldValue::Uuid(r.id),
            other => other.clone(),
        }
    }

    /// Compare two values the way uniqueness checks do
    pub fn same_as(&self, other: &FieldValue) -> bool {
        self.comparison_value() == other.comparison_value()
    }
}

/// Conversion from a struct field into a [`FieldValue`]
///
/// Implemented for the field types entities are built from, so that
/// `impl_entity!` can expose every field dynamically.
pub trait IntoFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl IntoFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl IntoFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl IntoFieldValue for i32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }
}

impl IntoFieldValue for u32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }
}

impl IntoFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl IntoFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl IntoFieldValue for Uuid {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }
}

impl IntoFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl IntoFieldValue for EntityReference {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Reference(self.clone())
    }
}

impl<V: IntoFieldValue> IntoFieldValue for Option<V> {
    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(v) => v.to_field_value(),
            None => FieldValue::Null,
        }
    }
}
