//! Per-call environment handed to entity validators

use crate::core::entity::Entity;
use crate::core::service::Repository;
use crate::storage::InMemoryStore;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Context for a single `execute` call.
///
/// Carries the collaborators validators need: a query-capable repository,
/// and any number of typed extensions (an in-memory collection, a tenant id,
/// the current user...). Cloning is cheap, everything is behind `Arc`.
///
/// ## Example
///
/// ```rust,ignore
/// let ctx = ValidationContext::builder()
///     .repository(InMemoryRepository::new())
///     .insert(CurrentTenant(tenant_id))
///     .build();
///
/// validator.execute(&article, &ExecuteOptions::new().context(ctx)).await?;
/// ```
#[derive(Clone, Default)]
pub struct ValidationContext {
    repository: Option<Arc<dyn Repository>>,
    extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ValidationContext {
    /// Create a new empty validation context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing a validation context.
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::new()
    }

    /// Get the repository if configured.
    pub fn repository(&self) -> Option<&Arc<dyn Repository>> {
        self.repository.as_ref()
    }

    /// Get a typed extension.
    pub fn get<V: Any + Send + Sync>(&self) -> Option<&V> {
        self.extensions
            .get(&TypeId::of::<V>())
            .and_then(|value| value.downcast_ref::<V>())
    }

    /// Get the in-memory collection registered for an entity type.
    pub fn store<T: Entity>(&self) -> Option<&InMemoryStore<T>> {
        self.get::<InMemoryStore<T>>()
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("has_repository", &self.repository.is_some())
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

/// Builder for constructing a `ValidationContext`.
#[derive(Default)]
pub struct ValidationContextBuilder {
    repository: Option<Arc<dyn Repository>>,
    extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ValidationContextBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repository.
    pub fn repository(mut self, repository: impl Repository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set the repository from an Arc.
    pub fn repository_arc(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Register the in-memory collection of an entity type.
    pub fn store<T: Entity>(self, store: InMemoryStore<T>) -> Self {
        self.insert(store)
    }

    /// Add a typed extension, replacing any previous value of the same type.
    pub fn insert<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.extensions.insert(TypeId::of::<V>(), Arc::new(value));
        self
    }

    /// Build the validation context.
    pub fn build(self) -> ValidationContext {
        ValidationContext {
            repository: self.repository,
            extensions: self.extensions,
        }
    }
}
