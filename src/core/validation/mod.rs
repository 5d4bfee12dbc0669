//! Entity-level validation
//!
//! Validators are registered per entity type in a [`MetadataStore`], either
//! on the whole entity or on one of its fields, then run together by an
//! [`EntityValidator`]. Each failure comes back as a [`ValidationError`].

pub mod constraint;
pub mod context;
pub mod error;
pub mod executor;
pub mod metadata;
pub mod options;
pub mod registration;
pub mod validators;

pub use constraint::{EntityConstraint, FnConstraint, Outcome, ValidationArguments, constraint_fn};
pub use context::{ValidationContext, ValidationContextBuilder};
pub use error::{CLASS_PROPERTY, ValidationError};
pub use executor::{EntityValidator, ExecuteOptions};
pub use metadata::{MetadataRecord, MetadataStore, RegisterArgs, ValidatorConfig};
pub use options::{EntityValidatorOptions, Message, normalize_options};
pub use registration::RuleDefinition;
pub use validators::{IS_UNIQUE, IsUnique, IsUniqueData};
