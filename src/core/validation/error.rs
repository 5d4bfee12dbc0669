//! Structured errors reported for failed entity validators

use crate::core::entity::Entity;
use crate::core::validation::metadata::ValidatorConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property label used when a rule does not name one
pub const CLASS_PROPERTY: &str = "class";

/// One failed validator, shaped like a field-level validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Failing property, or [`CLASS_PROPERTY`]
    pub property: String,

    /// Validator name to resolved message
    pub constraints: IndexMap<String, String>,

    /// Nested entity errors (always empty for entity-level rules)
    #[serde(default)]
    pub children: Vec<ValidationError>,
}

impl ValidationError {
    /// Build the error reported when `config` fails for `entity`
    ///
    /// The message comes from the options, then the config default, then a
    /// generic text naming the validator.
    pub fn from_config<T: Entity>(entity: &T, config: &ValidatorConfig<T>) -> Self {
        let message = config
            .options
            .message
            .as_ref()
            .or(config.default_message.as_ref())
            .map(|message| message.resolve(entity))
            .unwrap_or_else(|| {
                format!("Failed validation cause of constraint '{}'", config.name)
            });

        let mut constraints = IndexMap::new();
        constraints.insert(config.name.clone(), message);

        Self {
            property: config
                .property_label()
                .unwrap_or(CLASS_PROPERTY)
                .to_string(),
            constraints,
            children: Vec::new(),
        }
    }

    /// Message recorded for a validator name
    pub fn constraint(&self, name: &str) -> Option<&str> {
        self.constraints.get(name).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::validation::constraint::{Outcome, constraint_fn};
    use crate::core::validation::options::{EntityValidatorOptions, Message};
    use std::sync::Arc;
    use uuid::Uuid;

    #[derive(Clone, Debug)]
    struct Post {
        id: Uuid,
        title: String,
    }

    impl Entity for Post {
        fn entity_name() -> &'static str {
            "Post"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn fields() -> &'static [&'static str] {
            &["title"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "title" => Some(FieldValue::String(self.title.clone())),
                _ => None,
            }
        }
    }

    fn config(
        options: EntityValidatorOptions<Post>,
        default_message: Option<Message<Post>>,
        property: Option<&str>,
    ) -> ValidatorConfig<Post> {
        ValidatorConfig {
            name: "IsUnique".to_string(),
            options,
            validator: Arc::new(constraint_fn::<Post, _>(|_, _| Outcome::Ready(false))),
            data: None,
            default_message,
            property: property.map(str::to_string),
        }
    }

    fn post() -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Hello".to_string(),
        }
    }

    #[test]
    fn test_generic_message_and_class_property() {
        let error = ValidationError::from_config(
            &post(),
            &config(EntityValidatorOptions::new(), None, None),
        );

        assert_eq!(error.property, CLASS_PROPERTY);
        assert_eq!(
            error.constraint("IsUnique"),
            Some("Failed validation cause of constraint 'IsUnique'")
        );
        assert!(error.children.is_empty());
    }

    #[test]
    fn test_default_message_used_without_option() {
        let error = ValidationError::from_config(
            &post(),
            &config(
                EntityValidatorOptions::new(),
                Some("Already taken".into()),
                Some("title"),
            ),
        );

        assert_eq!(error.property, "title");
        assert_eq!(error.constraint("IsUnique"), Some("Already taken"));
    }

    #[test]
    fn test_option_message_wins_and_can_use_entity() {
        let options = EntityValidatorOptions::new()
            .message_fn(|post: &Post| format!("'{}' exists", post.title));
        let error = ValidationError::from_config(
            &post(),
            &config(options, Some("Already taken".into()), Some("title")),
        );

        assert_eq!(error.constraint("IsUnique"), Some("'Hello' exists"));
    }

    #[test]
    fn test_serializes_expected_shape() {
        let error = ValidationError::from_config(
            &post(),
            &config(EntityValidatorOptions::new(), None, Some("title")),
        );
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["property"], "title");
        assert!(json["constraints"]["IsUnique"].is_string());
        assert_eq!(json["children"], serde_json::json!([]));
    }
}
