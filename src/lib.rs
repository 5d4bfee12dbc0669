//! # Entity Validator
//!
//! Entity-level validation for Rust domain types.
//!
//! Field validators look at one value at a time. Some rules need the whole
//! entity instead: "no other user has this first and last name", "this title
//! is unique within its category". This crate lets you attach such rules to
//! an entity type, or to one of its fields, and run them together.
//!
//! ## Features
//!
//! - **Per-type registry**: validators attached to an entity type, keyed by name
//! - **Groups**: run a rule only when one of its groups is requested
//! - **Sync or async validators**: a single trait, deferred results joined concurrently
//! - **Fault tolerant**: a validator that errors or panics is logged and skipped
//! - **Uniqueness**: bundled `IsUnique` over an in-memory collection or a query-capable repository
//! - **Configuration-Based**: declare rules in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use entity_validator::prelude::*;
//!
//! impl_entity!(User, "User", {
//!     first_name: String,
//!     last_name: String,
//! });
//!
//! let store = MetadataStore::global();
//! store.register_class_rule(IsUnique::class_rule::<User>(
//!     &["first_name", "last_name"],
//!     EntityValidatorOptions::new(),
//! ))?;
//!
//! let users = InMemoryStore::new();
//! users.insert(User::new("Alexandre".into(), "Dupont".into()))?;
//!
//! let ctx = ValidationContext::builder().store(users).build();
//! let errors = EntityValidator::new()
//!     .execute(
//!         &User::new("Alexandre".into(), "Dupont".into()),
//!         &ExecuteOptions::new().context(ctx),
//!     )
//!     .await?;
//!
//! assert_eq!(errors[0].property, "first_name, last_name");
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::Entity,
        error::EntityValidatorError,
        field::{FieldValue, IntoFieldValue},
        query::SelectQuery,
        relation::{EntityReference, RelationMetadata},
        service::Repository,
    };

    // === Validation ===
    pub use crate::core::validation::{
        EntityConstraint, EntityValidator, EntityValidatorOptions, ExecuteOptions, IsUnique,
        MetadataStore, Outcome, RegisterArgs, RuleDefinition, ValidationArguments,
        ValidationContext, ValidationError, constraint_fn,
    };

    // === Macros ===
    pub use crate::impl_entity;

    // === Storage ===
    pub use crate::storage::{InMemoryRepository, InMemoryStore};

    // === Config ===
    pub use crate::config::{RuleConfig, ValidationConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use uuid::Uuid;
}
