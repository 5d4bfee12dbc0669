//! Class-level and field-level registration entry points
//!
//! Both entry points build a [`RegisterArgs`] and funnel into
//! [`MetadataStore::register`]. They only differ in how the reported
//! property label is derived.

use crate::core::entity::Entity;
use crate::core::error::Result;
use crate::core::validation::constraint::EntityConstraint;
use crate::core::validation::metadata::{MetadataStore, RegisterArgs};
use crate::core::validation::options::{EntityValidatorOptions, Message};
use serde_json::Value;
use std::sync::Arc;

/// A validator ready to be attached to an entity type or one of its fields
pub struct RuleDefinition<T: Entity> {
    /// Validator name used as constraint key
    pub name: String,

    /// The validator implementation
    pub validator: Arc<dyn EntityConstraint<T>>,

    /// Options given by the caller
    pub options: EntityValidatorOptions<T>,

    /// Custom data forwarded to the validator
    pub data: Option<Value>,

    /// Fallback message
    pub default_message: Option<Message<T>>,

    /// Label derived by the rule itself (e.g. the compared fields)
    pub property: Option<String>,
}

impl<T: Entity> RuleDefinition<T> {
    /// Define a rule from a validator
    pub fn new(name: impl Into<String>, validator: impl EntityConstraint<T> + 'static) -> Self {
        Self {
            name: name.into(),
            validator: Arc::new(validator),
            options: EntityValidatorOptions::new(),
            data: None,
            default_message: None,
            property: None,
        }
    }

    /// Set the options
    pub fn options(mut self, options: EntityValidatorOptions<T>) -> Self {
        self.options = options;
        self
    }

    /// Set the data payload
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the fallback message
    pub fn default_message(mut self, message: impl Into<Message<T>>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    /// Set the derived property label
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    fn into_args(self, property: Option<String>) -> RegisterArgs<T> {
        RegisterArgs {
            name: self.name,
            options: self.options,
            validator: self.validator,
            data: self.data,
            default_message: self.default_message,
            property,
        }
    }
}

impl MetadataStore {
    /// Attach a rule to the whole entity type
    ///
    /// The reported property is `options.property`, else the rule's own
    /// label, else `"class"`.
    pub fn register_class_rule<T: Entity>(&self, rule: RuleDefinition<T>) -> Result<()> {
        let property = rule.options.property.clone().or(rule.property.clone());
        self.register(rule.into_args(property))
    }

    /// Attach a rule to one field of the entity type
    ///
    /// The reported property is `options.property`, else `field`.
    pub fn register_field_rule<T: Entity>(
        &self,
        field: &str,
        rule: RuleDefinition<T>,
    ) -> Result<()> {
        let property = rule
            .options
            .property
            .clone()
            .unwrap_or_else(|| field.to_string());
        self.register(rule.into_args(Some(property)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::validation::constraint::{Outcome, constraint_fn};
    use uuid::Uuid;

    #[derive(Clone, Debug)]
    struct Invoice {
        id: Uuid,
        number: String,
    }

    impl Entity for Invoice {
        fn entity_name() -> &'static str {
            "Invoice"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn fields() -> &'static [&'static str] {
            &["number"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "number" => Some(FieldValue::String(self.number.clone())),
                _ => None,
            }
        }
    }

    fn rule() -> RuleDefinition<Invoice> {
        RuleDefinition::new(
            "HasNumber",
            constraint_fn::<Invoice, _>(|invoice, _| Outcome::from(!invoice.number.is_empty())),
        )
    }

    #[test]
    fn test_class_rule_without_label() {
        let store = MetadataStore::new();
        store.register_class_rule(rule()).unwrap();

        let record = store.record::<Invoice>().unwrap().unwrap();
        assert_eq!(record.get("HasNumber").unwrap().property_label(), None);
    }

    #[test]
    fn test_class_rule_keeps_derived_label() {
        let store = MetadataStore::new();
        store.register_class_rule(rule().property("number")).unwrap();

        let record = store.record::<Invoice>().unwrap().unwrap();
        assert_eq!(
            record.get("HasNumber").unwrap().property_label(),
            Some("number")
        );
    }

    #[test]
    fn test_field_rule_uses_field_as_label() {
        let store = MetadataStore::new();
        store.register_field_rule("number", rule()).unwrap();

        let record = store.record::<Invoice>().unwrap().unwrap();
        let config = record.get("HasNumber").unwrap();
        assert_eq!(config.property.as_deref(), Some("number"));
        assert_eq!(config.options.always, Some(true));
    }

    #[test]
    fn test_field_rule_option_override() {
        let store = MetadataStore::new();
        store
            .register_field_rule(
                "number",
                rule().options(EntityValidatorOptions::new().property("invoice_number")),
            )
            .unwrap();

        let record = store.record::<Invoice>().unwrap().unwrap();
        assert_eq!(
            record.get("HasNumber").unwrap().property_label(),
            Some("invoice_number")
        );
    }
}
