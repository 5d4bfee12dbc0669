//! Declarative validator configuration
//!
//! Rules can be declared in YAML instead of being registered in code:
//!
//! ```yaml
//! rules:
//!   - entity: User
//!     rule: is_unique
//!     fields: [first_name, last_name]
//!   - entity: Article
//!     rule: is_unique
//!     field: title
//!     groups: [article_create]
//!     message: Title should be unique
//! ```

use crate::core::entity::Entity;
use crate::core::error::{EntityValidatorError, Result};
use crate::core::validation::metadata::MetadataStore;
use crate::core::validation::options::EntityValidatorOptions;
use crate::core::validation::validators::IsUnique;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rule kind for uniqueness checks
pub const IS_UNIQUE_RULE: &str = "is_unique";

/// One declared rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleConfig {
    /// Entity name the rule is attached to (e.g., "User")
    pub entity: String,

    /// Rule kind (e.g., "is_unique")
    pub rule: String,

    /// Field the rule is attached to, for field rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Fields compared by a class rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Groups the rule belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    /// Run regardless of the requested groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always: Option<bool>,

    /// Custom failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Reported property label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl RuleConfig {
    fn options<T: Entity>(&self) -> EntityValidatorOptions<T> {
        let mut options = EntityValidatorOptions::new().groups(self.groups.iter().cloned());
        options.always = self.always;
        if let Some(message) = &self.message {
            options = options.message(message.as_str());
        }
        if let Some(property) = &self.property {
            options = options.property(property.as_str());
        }
        options
    }

    fn check_field<T: Entity>(&self, field: &str) -> Result<()> {
        if T::has_field(field) {
            Ok(())
        } else {
            Err(EntityValidatorError::UnknownField {
                entity: self.entity.clone(),
                field: field.to_string(),
            })
        }
    }
}

/// Complete set of declared rules
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    /// Declared rules, in registration order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl ValidationConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Rules declared for one entity name
    pub fn rules_for<'a>(
        &'a self,
        entity: &'a str,
    ) -> impl Iterator<Item = &'a RuleConfig> + 'a {
        self.rules.iter().filter(move |rule| rule.entity == entity)
    }

    /// Register every rule declared for `T` on `store`
    ///
    /// All rules for `T` are checked before any is registered, so a bad rule
    /// leaves the store untouched. Returns the number of rules registered.
    pub fn apply<T: Entity>(&self, store: &MetadataStore) -> Result<usize> {
        let mut pending = Vec::new();

        for rule in self.rules_for(T::entity_name()) {
            if rule.rule != IS_UNIQUE_RULE {
                return Err(EntityValidatorError::UnsupportedRule {
                    entity: rule.entity.clone(),
                    rule: rule.rule.clone(),
                });
            }

            match &rule.field {
                Some(field) => {
                    if !rule.fields.is_empty() {
                        return Err(EntityValidatorError::Config(format!(
                            "rule '{}' on {} sets both field and fields",
                            rule.rule, rule.entity
                        )));
                    }
                    rule.check_field::<T>(field)?;
                    let definition = IsUnique::field_rule::<T>(field, rule.options());
                    pending.push((Some(field.clone()), definition));
                }
                None => {
                    if rule.fields.is_empty() {
                        return Err(EntityValidatorError::Config(format!(
                            "rule '{}' on {} lists no fields",
                            rule.rule, rule.entity
                        )));
                    }
                    for field in &rule.fields {
                        rule.check_field::<T>(field)?;
                    }
                    let fields: Vec<&str> = rule.fields.iter().map(String::as_str).collect();
                    pending.push((None, IsUnique::class_rule::<T>(&fields, rule.options())));
                }
            }
        }

        let count = pending.len();
        for (field, definition) in pending {
            match field {
                Some(field) => store.register_field_rule(&field, definition)?,
                None => store.register_class_rule(definition)?,
            }
        }

        tracing::debug!(entity = T::entity_name(), count, "applied declared validators");
        Ok(count)
    }
}
