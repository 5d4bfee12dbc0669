//! Runs every applicable entity validator and collects the failures

use crate::core::entity::Entity;
use crate::core::error::Result;
use crate::core::validation::constraint::{Outcome, ValidationArguments};
use crate::core::validation::context::ValidationContext;
use crate::core::validation::error::ValidationError;
use crate::core::validation::metadata::{MetadataStore, ValidatorConfig};
use futures::FutureExt;
use futures::future::join_all;
use std::any::TypeId;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Options for one `execute` call
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Active validation groups
    pub groups: Vec<String>,

    /// Environment forwarded to every validator
    pub context: Option<ValidationContext>,
}

impl ExecuteOptions {
    /// Options with no groups and no context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active groups
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Set the validation context
    pub fn context(mut self, context: ValidationContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Handle validation at the entity level
///
/// Multi-field conditions, uniqueness checks against a store, or any rule
/// that needs the whole entity rather than one field.
///
/// # Example
/// ```rust,ignore
/// let validator = EntityValidator::new();
/// let errors = validator
///     .execute(&user, &ExecuteOptions::new().context(ctx))
///     .await?;
///
/// if errors.is_empty() {
///     // valid under the requested groups
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EntityValidator {
    store: Arc<MetadataStore>,
}

impl EntityValidator {
    /// Executor reading the process-wide metadata store
    pub fn new() -> Self {
        Self {
            store: MetadataStore::global(),
        }
    }

    /// Executor reading a specific metadata store
    pub fn with_store(store: Arc<MetadataStore>) -> Self {
        Self { store }
    }

    /// The metadata store this executor reads
    pub fn store(&self) -> &Arc<MetadataStore> {
        &self.store
    }

    /// Execute all registered validators on `entity`
    ///
    /// Failures come back as data. A validator that errors or panics while
    /// evaluating asynchronously is logged and counted as a pass. Errors are
    /// ordered by registration, whatever order deferred checks finish in.
    pub async fn execute<T: Entity>(
        &self,
        entity: &T,
        options: &ExecuteOptions,
    ) -> Result<Vec<ValidationError>> {
        let Some(record) = self.store.record::<T>()? else {
            return Ok(Vec::new());
        };

        let mut errors: Vec<(usize, ValidationError)> = Vec::new();
        let mut pending = Vec::new();

        for (position, (key, config)) in record.iter().enumerate() {
            if !config.options.applies_to(&options.groups) {
                tracing::debug!(
                    entity = T::entity_name(),
                    key = %key,
                    "skipping entity validator outside active groups"
                );
                continue;
            }

            match self.validate(entity, config, options) {
                Outcome::Ready(true) => {}
                Outcome::Ready(false) => {
                    errors.push((position, ValidationError::from_config(entity, config)));
                }
                Outcome::Deferred(future) => {
                    pending.push(async move {
                        match AssertUnwindSafe(future).catch_unwind().await {
                            Ok(Ok(true)) => None,
                            Ok(Ok(false)) => {
                                Some((position, ValidationError::from_config(entity, config)))
                            }
                            Ok(Err(err)) => {
                                tracing::error!(
                                    validator = %config.name,
                                    entity = T::entity_name(),
                                    id = %entity.id(),
                                    error = %err,
                                    "async validation error"
                                );
                                None
                            }
                            Err(_) => {
                                tracing::error!(
                                    validator = %config.name,
                                    entity = T::entity_name(),
                                    id = %entity.id(),
                                    "async validator panicked"
                                );
                                None
                            }
                        }
                    });
                }
            }
        }

        if !pending.is_empty() {
            errors.extend(join_all(pending).await.into_iter().flatten());
        }

        errors.sort_by_key(|(position, _)| *position);
        Ok(errors.into_iter().map(|(_, error)| error).collect())
    }

    /// Call a validator with the arguments built for `config`
    pub fn validate<'a, T: Entity>(
        &self,
        entity: &'a T,
        config: &'a ValidatorConfig<T>,
        options: &'a ExecuteOptions,
    ) -> Outcome<'a> {
        let args = ValidationArguments {
            value: entity,
            object: TypeId::of::<T>(),
            target_name: T::entity_name(),
            data: config.data.as_ref(),
            property: config.property_label(),
            context: options.context.as_ref(),
        };

        config.validator.validate(entity, args)
    }
}

impl Default for EntityValidator {
    fn default() -> Self {
        Self::new()
    }
}
