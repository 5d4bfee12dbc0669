//! References between entities and relation metadata

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to an entity instance held by another entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityReference {
    /// The unique ID of the entity
    pub id: Uuid,

    /// The type of entity (e.g., "Category", "User")
    pub entity_type: String,
}

impl EntityReference {
    /// Create a new entity reference
    pub fn new(id: Uuid, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
        }
    }
}

/// Describes a relation field declared by the persistence layer
///
/// Relation fields are compared by the identifier of the related entity
/// rather than by value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationMetadata {
    /// Property holding the relation on the owning entity (e.g., "category")
    pub property: String,

    /// Entity type on the other side of the relation
    pub target_type: String,
}

impl RelationMetadata {
    /// Create a new relation description
    pub fn new(property: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            target_type: target_type.into(),
        }
    }

    /// Name of the join column backing this relation (e.g., "category_id")
    pub fn join_column(&self) -> String {
        format!("{}_id", self.property)
    }
}
