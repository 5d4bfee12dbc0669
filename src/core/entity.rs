//! Entity trait defining what the validation engine needs from a domain type

use crate::core::field::FieldValue;
use crate::core::relation::EntityReference;
use uuid::Uuid;

/// Base trait for all entities that can carry entity-level validators.
///
/// Validators are attached per entity type, so the trait only has to expose:
/// - entity_name: the class name used as target name and in messages
/// - id: unique identifier of the instance
/// - fields: names of the fields that can be compared
/// - field_value: dynamic field access
///
/// Use the `impl_entity!` macro to generate both the struct and this
/// implementation.
pub trait Entity: Send + Sync + 'static {
    /// The entity class name (e.g., "User", "Article")
    fn entity_name() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Names of the fields exposed through `field_value`
    fn fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    ///
    /// Returns `None` for unknown fields. Relation fields return a
    /// `FieldValue::Reference`.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Build a reference to this instance, for use in relation fields
    fn reference(&self) -> EntityReference {
        EntityReference::new(self.id(), Self::entity_name())
    }

    /// Check whether a field name is exposed by this entity
    fn has_field(field: &str) -> bool {
        field == "id" || Self::fields().contains(&field)
    }
}
