//! The validator contract: one trait for objects and adapted functions

use crate::core::entity::Entity;
use crate::core::validation::context::ValidationContext;
use futures::future::BoxFuture;
use serde_json::Value;
use std::any::TypeId;
use std::future::Future;
use std::marker::PhantomData;

/// Arguments passed to a validator for one invocation
pub struct ValidationArguments<'a, T> {
    /// Entity being validated
    pub value: &'a T,

    /// Class of the entity being validated
    pub object: TypeId,

    /// Entity class name
    pub target_name: &'static str,

    /// Payload given at registration (e.g. the fields to compare)
    pub data: Option<&'a Value>,

    /// Label of the property the rule reports on
    pub property: Option<&'a str>,

    /// Caller-supplied environment
    pub context: Option<&'a ValidationContext>,
}

impl<T> Clone for ValidationArguments<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ValidationArguments<'_, T> {}

/// Result of invoking a validator: known now, or known later
pub enum Outcome<'a> {
    /// The entity passed (`true`) or failed (`false`)
    Ready(bool),

    /// Evaluation continues asynchronously; an `Err` is an internal fault
    Deferred(BoxFuture<'a, anyhow::Result<bool>>),
}

impl<'a> Outcome<'a> {
    /// Wrap an async evaluation
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<bool>> + Send + 'a,
    {
        Outcome::Deferred(Box::pin(future))
    }

    /// Whether the result is already known
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }
}

impl From<bool> for Outcome<'_> {
    fn from(valid: bool) -> Self {
        Outcome::Ready(valid)
    }
}

/// Trait to implement for custom entity validators.
///
/// Synchronous checks return `Outcome::Ready`; checks that need I/O
/// return `Outcome::deferred(async move { ... })`.
pub trait EntityConstraint<T: Entity>: Send + Sync {
    /// Decide whether `entity` passes this rule
    fn validate<'a>(&'a self, entity: &'a T, args: ValidationArguments<'a, T>) -> Outcome<'a>;
}

/// Adapter turning a plain function into an [`EntityConstraint`]
pub struct FnConstraint<T, F> {
    f: F,
    _entity: PhantomData<fn(&T)>,
}

/// Use a function as an entity validator
///
/// # Example
/// ```rust,ignore
/// let rule = constraint_fn::<User, _>(|user, _args| {
///     Outcome::from(user.first_name != user.last_name)
/// });
/// ```
pub fn constraint_fn<T, F>(f: F) -> FnConstraint<T, F>
where
    T: Entity,
    F: for<'a> Fn(&'a T, ValidationArguments<'a, T>) -> Outcome<'a> + Send + Sync,
{
    FnConstraint {
        f,
        _entity: PhantomData,
    }
}

impl<T, F> EntityConstraint<T> for FnConstraint<T, F>
where
    T: Entity,
    F: for<'a> Fn(&'a T, ValidationArguments<'a, T>) -> Outcome<'a> + Send + Sync,
{
    fn validate<'a>(&'a self, entity: &'a T, args: ValidationArguments<'a, T>) -> Outcome<'a> {
        (self.f)(entity, args)
    }
}
