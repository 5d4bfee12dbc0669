//! Conjunctive equality queries handed to the persistence layer

use crate::core::field::FieldValue;
use crate::core::relation::RelationMetadata;
use serde::Serialize;

/// A single `field = value` condition
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Condition {
    /// Property name on the queried entity
    pub field: String,

    /// Name of the bound parameter (the join column for relations)
    pub parameter: String,

    /// Value to compare against (already dereferenced for relations)
    pub value: FieldValue,
}

impl Condition {
    /// Check a stored value against this condition
    pub fn matches(&self, stored: Option<&FieldValue>) -> bool {
        match stored {
            Some(value) => value.same_as(&self.value),
            None => self.value.is_null(),
        }
    }
}

/// Select query over one entity type, filtered by ANDed equality conditions
///
/// # Example
/// ```rust,ignore
/// let query = SelectQuery::new("Article")
///     .and_where("title", FieldValue::String("First article".into()))
///     .and_where_relation(&category_relation, FieldValue::Uuid(category_id));
///
/// let existing = repository.get_one(&query).await?;
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectQuery {
    /// Entity type being queried (also used as alias)
    pub entity_type: String,

    /// Conditions that must all hold
    pub conditions: Vec<Condition>,
}

impl SelectQuery {
    /// Start a query on an entity type
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            conditions: Vec::new(),
        }
    }

    /// Add a scalar equality condition
    pub fn and_where(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        let field = field.into();
        self.conditions.push(Condition {
            parameter: field.clone(),
            field,
            value,
        });
        self
    }

    /// Add a relation equality condition, compared by identifier
    ///
    /// The condition binds against the relation's join column.
    pub fn and_where_relation(mut self, relation: &RelationMetadata, value: FieldValue) -> Self {
        self.conditions.push(Condition {
            field: relation.property.clone(),
            parameter: relation.join_column(),
            value: value.comparison_value(),
        });
        self
    }

    /// Check whether a row satisfies every condition
    ///
    /// `lookup` resolves a field name to the stored value.
    pub fn matches<'a, F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<&'a FieldValue>,
    {
        self.conditions
            .iter()
            .all(|condition| condition.matches(lookup(&condition.field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::relation::EntityReference;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn category() -> RelationMetadata {
        RelationMetadata::new("category", "Category")
    }

    #[test]
    fn test_parameter_names() {
        let query = SelectQuery::new("Article")
            .and_where("title", FieldValue::String("a".to_string()))
            .and_where_relation(&category(), FieldValue::Uuid(Uuid::new_v4()));

        assert_eq!(query.conditions[0].parameter, "title");
        assert_eq!(query.conditions[1].field, "category");
        assert_eq!(query.conditions[1].parameter, "category_id");
    }

    #[test]
    fn test_relation_condition_dereferences() {
        let id = Uuid::new_v4();
        let query = SelectQuery::new("Article").and_where_relation(
            &category(),
            FieldValue::Reference(EntityReference::new(id, "Category")),
        );

        assert_eq!(query.conditions[0].value, FieldValue::Uuid(id));
    }

    #[test]
    fn test_matches_all_conditions() {
        let id = Uuid::new_v4();
        let mut row = HashMap::new();
        row.insert("title".to_string(), FieldValue::String("a".to_string()));
        row.insert(
            "category".to_string(),
            FieldValue::Reference(EntityReference::new(id, "Category")),
        );

        let query = SelectQuery::new("Article")
            .and_where("title", FieldValue::String("a".to_string()))
            .and_where_relation(&category(), FieldValue::Uuid(id));
        assert!(query.matches(|field| row.get(field)));

        let other = SelectQuery::new("Article")
            .and_where("title", FieldValue::String("b".to_string()))
            .and_where_relation(&category(), FieldValue::Uuid(id));
        assert!(!other.matches(|field| row.get(field)));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let row: HashMap<String, FieldValue> = HashMap::new();
        assert!(SelectQuery::new("Article").matches(|field| row.get(field)));
    }
}
