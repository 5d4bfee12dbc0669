//! Bundled entity validators
//!
//! `IsUnique` checks that no other record shares the values of a set of
//! fields. The record source comes from the validation context:
//!
//! 1. a [`Repository`] → a conjunctive equality query is issued
//! 2. an [`InMemoryStore<T>`] → the collection is scanned
//! 3. neither → the check is skipped

use crate::core::entity::Entity;
use crate::core::error::EntityValidatorError;
use crate::core::field::FieldValue;
use crate::core::service::Repository;
use crate::core::validation::constraint::{EntityConstraint, Outcome, ValidationArguments};
use crate::core::validation::options::EntityValidatorOptions;
use crate::core::validation::registration::RuleDefinition;
use crate::storage::InMemoryStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name under which uniqueness rules are registered
pub const IS_UNIQUE: &str = "IsUnique";

/// Data payload of a uniqueness rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IsUniqueData {
    /// Fields that must not all match an existing record
    pub fields: Vec<String>,
}

impl IsUniqueData {
    /// Read the payload given at registration
    pub fn from_data(data: Option<&Value>) -> Result<Self, EntityValidatorError> {
        let data = data.ok_or_else(|| EntityValidatorError::InvalidData {
            validator: IS_UNIQUE.to_string(),
            message: "missing data payload".to_string(),
        })?;

        serde_json::from_value(data.clone()).map_err(|e| EntityValidatorError::InvalidData {
            validator: IS_UNIQUE.to_string(),
            message: e.to_string(),
        })
    }
}

/// Checks that an entity doesn't already exist with the same field values
///
/// # Example
/// ```rust,ignore
/// let store = MetadataStore::global();
///
/// // Whole entity, several fields
/// store.register_class_rule(IsUnique::class_rule::<User>(
///     &["first_name", "last_name"],
///     EntityValidatorOptions::new(),
/// ))?;
///
/// // One field, only when creating
/// store.register_field_rule(
///     "title",
///     IsUnique::field_rule::<Article>(
///         "title",
///         EntityValidatorOptions::new().groups(["article_create"]),
///     ),
/// )?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IsUnique;

impl IsUnique {
    /// Uniqueness over several fields, attached to the entity type
    pub fn class_rule<T: Entity>(
        fields: &[&str],
        options: EntityValidatorOptions<T>,
    ) -> RuleDefinition<T> {
        let label = fields.join(", ");
        Self::rule(fields, label, options)
    }

    /// Uniqueness of a single field, attached to that field
    pub fn field_rule<T: Entity>(
        field: &str,
        options: EntityValidatorOptions<T>,
    ) -> RuleDefinition<T> {
        Self::rule(&[field], field.to_string(), options)
    }

    fn rule<T: Entity>(
        fields: &[&str],
        label: String,
        options: EntityValidatorOptions<T>,
    ) -> RuleDefinition<T> {
        let data = IsUniqueData {
            fields: fields.iter().map(|field| field.to_string()).collect(),
        };
        let default_message = format!(
            "Another <{}> entity already exists with unique constraints on : <{}>",
            T::entity_name(),
            label
        );

        RuleDefinition::new(IS_UNIQUE, IsUnique)
            .options(options)
            .data(serde_json::json!(data))
            .default_message(default_message)
            .property(label)
    }
}

impl<T: Entity> EntityConstraint<T> for IsUnique {
    fn validate<'a>(&'a self, entity: &'a T, args: ValidationArguments<'a, T>) -> Outcome<'a> {
        Outcome::deferred(check_unique(entity, args))
    }
}

async fn check_unique<T: Entity>(entity: &T, args: ValidationArguments<'_, T>) -> Result<bool> {
    let data = IsUniqueData::from_data(args.data)?;
    let Some(context) = args.context else {
        return Ok(true);
    };

    if let Some(repository) = context.repository() {
        return unique_in_repository(repository.as_ref(), entity, &data.fields).await;
    }

    match context.store::<T>() {
        Some(store) => unique_in_store(store, entity, &data.fields),
        None => Ok(true),
    }
}

/// In-memory variant: no stored record matches on every field
pub fn unique_in_store<T: Entity>(
    store: &InMemoryStore<T>,
    entity: &T,
    fields: &[String],
) -> Result<bool> {
    let duplicate = store.any(|existing| {
        fields.iter().all(|field| {
            match (existing.field_value(field), entity.field_value(field)) {
                (Some(stored), Some(candidate)) => stored.same_as(&candidate),
                (None, None) => true,
                _ => false,
            }
        })
    })?;

    Ok(!duplicate)
}

/// Query-capable variant: no row matches the conjunctive equality filter
///
/// The check is skipped when any field has no usable value, partial keys are
/// not enforced.
pub async fn unique_in_repository<T: Entity>(
    repository: &dyn Repository,
    entity: &T,
    fields: &[String],
) -> Result<bool> {
    let entity_type = T::entity_name();
    let mut query = repository.query(entity_type);

    for field in fields {
        let value = entity
            .field_value(field)
            .map(|value| value.comparison_value())
            .unwrap_or(FieldValue::Null);
        if value.is_falsy() {
            tracing::trace!(
                entity = entity_type,
                field = %field,
                "partial key, skipping uniqueness check"
            );
            return Ok(true);
        }

        query = match repository.find_relation(entity_type, field) {
            Some(relation) => query.and_where_relation(&relation, value),
            None => query.and_where(field.as_str(), value),
        };
    }

    tracing::trace!(query = ?query, "checking uniqueness");
    let existing = repository.get_one(&query).await?;

    Ok(existing.is_none())
}
