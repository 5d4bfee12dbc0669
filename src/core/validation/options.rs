//! Validator options, messages and group filtering

use std::fmt;
use std::sync::Arc;

/// Message attached to a validator: fixed text or computed from the entity
pub enum Message<T> {
    Static(String),
    Dynamic(Arc<dyn Fn(&T) -> String + Send + Sync>),
}

impl<T> Message<T> {
    /// Build a message computed from the failing entity
    pub fn dynamic(f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Message::Dynamic(Arc::new(f))
    }

    /// Resolve the message for a given entity
    pub fn resolve(&self, entity: &T) -> String {
        match self {
            Message::Static(text) => text.clone(),
            Message::Dynamic(f) => f(entity),
        }
    }
}

impl<T> Clone for Message<T> {
    fn clone(&self) -> Self {
        match self {
            Message::Static(text) => Message::Static(text.clone()),
            Message::Dynamic(f) => Message::Dynamic(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Message<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Message::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl<T> From<&str> for Message<T> {
    fn from(text: &str) -> Self {
        Message::Static(text.to_string())
    }
}

impl<T> From<String> for Message<T> {
    fn from(text: String) -> Self {
        Message::Static(text)
    }
}

/// Options accepted when attaching a validator to an entity
///
/// # Example
/// ```rust,ignore
/// let options = EntityValidatorOptions::<Article>::new()
///     .groups(["article_create"])
///     .message("Title should be unique");
/// ```
pub struct EntityValidatorOptions<T> {
    /// Groups this validator belongs to; empty means "always active"
    pub groups: Vec<String>,

    /// Forces unconditional execution when `Some(true)`
    pub always: Option<bool>,

    /// Message used when the validator fails
    pub message: Option<Message<T>>,

    /// Label of the failing property, overriding the derived one
    pub property: Option<String>,
}

impl<T> EntityValidatorOptions<T> {
    /// Create empty options
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            always: None,
            message: None,
            property: None,
        }
    }

    /// Set the groups this validator runs under
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Force or disable unconditional execution
    pub fn always(mut self, always: bool) -> Self {
        self.always = Some(always);
        self
    }

    /// Set the failure message
    pub fn message(mut self, message: impl Into<Message<T>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set a failure message computed from the entity
    pub fn message_fn(mut self, f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.message = Some(Message::dynamic(f));
        self
    }

    /// Override the failing property label
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Whether a validator with these options runs for the active groups
    ///
    /// Validators forced with `always` or declaring no groups always run.
    /// Otherwise at least one declared group must be active.
    pub fn applies_to(&self, active_groups: &[String]) -> bool {
        if self.always == Some(true) || self.groups.is_empty() {
            return true;
        }

        self.groups
            .iter()
            .any(|group| active_groups.iter().any(|active| active == group))
    }
}

impl<T> Default for EntityValidatorOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EntityValidatorOptions<T> {
    fn clone(&self) -> Self {
        Self {
            groups: self.groups.clone(),
            always: self.always,
            message: self.message.clone(),
            property: self.property.clone(),
        }
    }
}

impl<T> fmt::Debug for EntityValidatorOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityValidatorOptions")
            .field("groups", &self.groups)
            .field("always", &self.always)
            .field("message", &self.message)
            .field("property", &self.property)
            .finish()
    }
}

/// Normalize options once, at registration time
///
/// Options without groups are marked `always: true` unless `always` was
/// explicitly set to `false`.
pub fn normalize_options<T>(mut options: EntityValidatorOptions<T>) -> EntityValidatorOptions<T> {
    if options.groups.is_empty() && options.always != Some(false) {
        options.always = Some(true);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: String,
    }

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_without_groups_sets_always() {
        let options = normalize_options(EntityValidatorOptions::<Item>::new());
        assert_eq!(options.always, Some(true));
    }

    #[test]
    fn test_normalize_keeps_explicit_false() {
        let options = normalize_options(EntityValidatorOptions::<Item>::new().always(false));
        assert_eq!(options.always, Some(false));
    }

    #[test]
    fn test_normalize_with_groups_leaves_always_unset() {
        let options = normalize_options(EntityValidatorOptions::<Item>::new().groups(["create"]));
        assert_eq!(options.always, None);
        assert_eq!(options.groups, groups(&["create"]));
    }

    #[test]
    fn test_applies_without_groups() {
        let options = normalize_options(EntityValidatorOptions::<Item>::new());
        assert!(options.applies_to(&[]));
        assert!(options.applies_to(&groups(&["anything"])));
    }

    #[test]
    fn test_applies_with_intersecting_groups() {
        let options = EntityValidatorOptions::<Item>::new().groups(["create", "update"]);
        assert!(options.applies_to(&groups(&["update"])));
        assert!(options.applies_to(&groups(&["other", "create"])));
    }

    #[test]
    fn test_does_not_apply_with_disjoint_groups() {
        let options = EntityValidatorOptions::<Item>::new().groups(["create"]);
        assert!(!options.applies_to(&groups(&["update"])));
        assert!(!options.applies_to(&[]));
    }

    #[test]
    fn test_always_overrides_groups() {
        let options = EntityValidatorOptions::<Item>::new()
            .groups(["create"])
            .always(true);
        assert!(options.applies_to(&groups(&["update"])));
    }

    #[test]
    fn test_explicit_false_without_groups_still_applies() {
        let options = normalize_options(EntityValidatorOptions::<Item>::new().always(false));
        assert!(options.applies_to(&[]));
    }

    #[test]
    fn test_message_resolution() {
        let item = Item {
            name: "widget".to_string(),
        };

        let fixed: Message<Item> = "fixed".into();
        assert_eq!(fixed.resolve(&item), "fixed");

        let dynamic = Message::dynamic(|item: &Item| format!("{} is taken", item.name));
        assert_eq!(dynamic.resolve(&item), "widget is taken");
    }
}
