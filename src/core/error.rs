//! Typed error handling for the entity validator
//!
//! Validation failures are never errors: they come back from
//! `EntityValidator::execute` as a list of [`ValidationError`] values.
//! [`EntityValidatorError`] covers the faults that can still happen around
//! them:
//!
//! - the metadata store cannot be read or written (poisoned lock)
//! - a declarative rule references a field or rule kind that does not exist
//! - a validator received a payload it cannot interpret
//! - a configuration file cannot be loaded
//!
//! [`ValidationError`]: crate::core::validation::ValidationError

use thiserror::Error;

/// The main error type for the entity validator
#[derive(Debug, Error)]
pub enum EntityValidatorError {
    /// The metadata store lock was poisoned by a panicking writer
    #[error("Validator metadata for {entity} is unavailable: {message}")]
    MetadataUnavailable { entity: String, message: String },

    /// A rule references a field the entity does not expose
    #[error("Entity {entity} has no field '{field}'")]
    UnknownField { entity: String, field: String },

    /// A declarative rule uses a kind this crate cannot build
    #[error("Unsupported rule '{rule}' for entity {entity}")]
    UnsupportedRule { entity: String, rule: String },

    /// A validator payload could not be interpreted
    #[error("Invalid data for validator '{validator}': {message}")]
    InvalidData { validator: String, message: String },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EntityValidatorError {
    /// Build a `MetadataUnavailable` error from a lock failure
    pub fn metadata_unavailable(entity: &str, err: impl std::fmt::Display) -> Self {
        EntityValidatorError::MetadataUnavailable {
            entity: entity.to_string(),
            message: err.to_string(),
        }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EntityValidatorError::MetadataUnavailable { .. } => "METADATA_UNAVAILABLE",
            EntityValidatorError::UnknownField { .. } => "UNKNOWN_FIELD",
            EntityValidatorError::UnsupportedRule { .. } => "UNSUPPORTED_RULE",
            EntityValidatorError::InvalidData { .. } => "INVALID_DATA",
            EntityValidatorError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<serde_yaml::Error> for EntityValidatorError {
    fn from(err: serde_yaml::Error) -> Self {
        EntityValidatorError::Config(err.to_string())
    }
}

impl From<std::io::Error> for EntityValidatorError {
    fn from(err: std::io::Error) -> Self {
        EntityValidatorError::Config(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T, E = EntityValidatorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_display() {
        let err = EntityValidatorError::UnknownField {
            entity: "User".to_string(),
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "Entity User has no field 'email'");
        assert_eq!(err.error_code(), "UNKNOWN_FIELD");
    }

    #[test]
    fn test_metadata_unavailable() {
        let err = EntityValidatorError::metadata_unavailable("User", "poisoned");
        assert!(err.to_string().contains("User"));
        assert!(err.to_string().contains("poisoned"));
        assert_eq!(err.error_code(), "METADATA_UNAVAILABLE");
    }

    #[test]
    fn test_yaml_error_converts_to_config() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ not: [a list").unwrap_err();
        let err: EntityValidatorError = yaml_err.into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_data_display() {
        let err = EntityValidatorError::InvalidData {
            validator: "IsUnique".to_string(),
            message: "missing field `fields`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid data for validator 'IsUnique': missing field `fields`"
        );
    }
}
