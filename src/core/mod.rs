//! Core module containing fundamental traits and types for entity validation

pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod relation;
pub mod service;
pub mod validation;

pub use entity::Entity;
pub use error::{EntityValidatorError, Result};
pub use field::{FieldValue, IntoFieldValue};
pub use query::{Condition, SelectQuery};
pub use relation::{EntityReference, RelationMetadata};
pub use service::Repository;
