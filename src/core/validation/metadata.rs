//! Per-entity validator metadata and the process-wide store holding it

use crate::core::entity::Entity;
use crate::core::error::{EntityValidatorError, Result};
use crate::core::validation::constraint::EntityConstraint;
use crate::core::validation::options::{EntityValidatorOptions, Message, normalize_options};
use indexmap::IndexMap;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

/// One validator attached to an entity type
pub struct ValidatorConfig<T: Entity> {
    /// Key used in the constraints of the produced error
    pub name: String,

    /// Normalized options
    pub options: EntityValidatorOptions<T>,

    /// The validator implementation
    pub validator: Arc<dyn EntityConstraint<T>>,

    /// Custom data forwarded to the validator
    pub data: Option<Value>,

    /// Message used when neither the options nor the validator give one
    pub default_message: Option<Message<T>>,

    /// Derived label of the property the rule reports on
    pub property: Option<String>,
}

impl<T: Entity> ValidatorConfig<T> {
    /// Label reported for this rule: the option override, then the derived one
    pub fn property_label(&self) -> Option<&str> {
        self.options
            .property
            .as_deref()
            .or(self.property.as_deref())
    }
}

impl<T: Entity> fmt::Debug for ValidatorConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("data", &self.data)
            .field("default_message", &self.default_message)
            .field("property", &self.property)
            .finish()
    }
}

/// Arguments of a registration call
pub struct RegisterArgs<T: Entity> {
    pub name: String,
    pub options: EntityValidatorOptions<T>,
    pub validator: Arc<dyn EntityConstraint<T>>,
    pub data: Option<Value>,
    pub default_message: Option<Message<T>>,
    pub property: Option<String>,
}

impl<T: Entity> RegisterArgs<T> {
    /// Start registration arguments for a named validator
    pub fn new(name: impl Into<String>, validator: impl EntityConstraint<T> + 'static) -> Self {
        Self::from_arc(name, Arc::new(validator))
    }

    /// Same as `new`, from a shared validator
    pub fn from_arc(name: impl Into<String>, validator: Arc<dyn EntityConstraint<T>>) -> Self {
        Self {
            name: name.into(),
            options: EntityValidatorOptions::new(),
            validator,
            data: None,
            default_message: None,
            property: None,
        }
    }

    /// Set the options
    pub fn options(mut self, options: EntityValidatorOptions<T>) -> Self {
        self.options = options;
        self
    }

    /// Set the data payload
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the fallback message
    pub fn default_message(mut self, message: impl Into<Message<T>>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    /// Set the derived property label
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }
}

/// Every validator attached to one entity type, in registration order
pub struct MetadataRecord<T: Entity> {
    configs: IndexMap<String, Arc<ValidatorConfig<T>>>,
}

impl<T: Entity> MetadataRecord<T> {
    /// Create an empty record
    pub fn new() -> Self {
        Self {
            configs: IndexMap::new(),
        }
    }

    /// Compute the key a new config named `name` is stored under
    ///
    /// The first config uses its name. Later ones get `name.n`, where `n` is
    /// the number of keys already starting with `name`.
    pub fn next_key(&self, name: &str) -> String {
        if !self.configs.contains_key(name) {
            return name.to_string();
        }

        let mut count = self
            .configs
            .keys()
            .filter(|key| key.starts_with(name))
            .count();
        let mut key = format!("{}.{}", name, count);
        while self.configs.contains_key(&key) {
            count += 1;
            key = format!("{}.{}", name, count);
        }
        key
    }

    /// Store a config, returning the key it was stored under
    pub fn insert(&mut self, config: ValidatorConfig<T>) -> String {
        let key = self.next_key(&config.name);
        self.configs.insert(key.clone(), Arc::new(config));
        key
    }

    /// Get a config by key
    pub fn get(&self, key: &str) -> Option<&Arc<ValidatorConfig<T>>> {
        self.configs.get(key)
    }

    /// Keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(|key| key.as_str())
    }

    /// Configs with their keys, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ValidatorConfig<T>>)> {
        self.configs.iter().map(|(key, config)| (key.as_str(), config))
    }

    /// Number of attached validators
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether no validator is attached
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl<T: Entity> Default for MetadataRecord<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Clone for MetadataRecord<T> {
    fn clone(&self) -> Self {
        Self {
            configs: self.configs.clone(),
        }
    }
}

impl<T: Entity> fmt::Debug for MetadataRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.configs.iter()).finish()
    }
}

/// Registry of validator metadata for all entity types
///
/// Records are keyed by the entity's `TypeId`. Registration normally happens
/// once at startup; reads clone the record so no lock is held while
/// validators run.
#[derive(Default)]
pub struct MetadataStore {
    records: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl MetadataStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide store
    pub fn global() -> Arc<MetadataStore> {
        static GLOBAL: OnceLock<Arc<MetadataStore>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(MetadataStore::new())))
    }

    /// Attach a validator to entity type `T`
    ///
    /// Options are normalized here, once. A validator registered under a
    /// name already present is stored under a suffixed key instead of
    /// replacing the first one.
    pub fn register<T: Entity>(&self, args: RegisterArgs<T>) -> Result<()> {
        let config = ValidatorConfig {
            name: args.name,
            options: normalize_options(args.options),
            validator: args.validator,
            data: args.data,
            default_message: args.default_message,
            property: args.property,
        };

        let mut records = self
            .records
            .write()
            .map_err(|e| EntityValidatorError::metadata_unavailable(T::entity_name(), e))?;

        let record = records
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(MetadataRecord::<T>::new()))
            .downcast_mut::<MetadataRecord<T>>()
            .ok_or_else(|| {
                EntityValidatorError::metadata_unavailable(T::entity_name(), "record type mismatch")
            })?;

        let key = record.insert(config);
        tracing::debug!(entity = T::entity_name(), key = %key, "registered entity validator");

        Ok(())
    }

    /// Get a snapshot of the record for entity type `T`
    ///
    /// Returns `Ok(None)` when nothing was registered for `T`.
    pub fn record<T: Entity>(&self) -> Result<Option<MetadataRecord<T>>> {
        let records = self
            .records
            .read()
            .map_err(|e| EntityValidatorError::metadata_unavailable(T::entity_name(), e))?;

        match records.get(&TypeId::of::<T>()) {
            Some(record) => record
                .downcast_ref::<MetadataRecord<T>>()
                .cloned()
                .map(Some)
                .ok_or_else(|| {
                    EntityValidatorError::metadata_unavailable(
                        T::entity_name(),
                        "record type mismatch",
                    )
                }),
            None => Ok(None),
        }
    }

    /// Whether any validator is attached to entity type `T`
    pub fn contains<T: Entity>(&self) -> Result<bool> {
        let records = self
            .records
            .read()
            .map_err(|e| EntityValidatorError::metadata_unavailable(T::entity_name(), e))?;

        Ok(records.contains_key(&TypeId::of::<T>()))
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.records.read().map(|r| r.len()).unwrap_or_default();
        f.debug_struct("MetadataStore")
            .field("entity_types", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::validation::constraint::{Outcome, constraint_fn};
    use uuid::Uuid;

    #[derive(Clone, Debug)]
    struct Account {
        id: Uuid,
    }

    impl Entity for Account {
        fn entity_name() -> &'static str {
            "Account"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn fields() -> &'static [&'static str] {
            &[]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(FieldValue::Uuid(self.id)),
                _ => None,
            }
        }
    }

    fn pass_rule(name: &str) -> RegisterArgs<Account> {
        RegisterArgs::new(
            name,
            constraint_fn::<Account, _>(|_, _| Outcome::Ready(true)),
        )
    }

    #[test]
    fn test_empty_store_has_no_record() {
        let store = MetadataStore::new();
        assert!(store.record::<Account>().unwrap().is_none());
        assert!(!store.contains::<Account>().unwrap());
    }

    #[test]
    fn test_poisoned_store_reports_unavailable() {
        let store = Arc::new(MetadataStore::new());
        let writer = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = writer.records.write().unwrap();
            panic!("writer crashed");
        })
        .join();

        let err = store.contains::<Account>().unwrap_err();
        assert_eq!(err.error_code(), "METADATA_UNAVAILABLE");
        assert!(store.record::<Account>().is_err());
    }

    #[test]
    fn test_register_creates_record() {
        let store = MetadataStore::new();
        store.register(pass_rule("IsActive")).unwrap();

        let record = store.record::<Account>().unwrap().unwrap();
        assert_eq!(record.len(), 1);
        assert!(record.get("IsActive").is_some());
        assert!(store.contains::<Account>().unwrap());
    }

    #[test]
    fn test_register_normalizes_options() {
        let store = MetadataStore::new();
        store.register(pass_rule("IsActive")).unwrap();
        store
            .register(
                pass_rule("IsGrouped").options(EntityValidatorOptions::new().groups(["create"])),
            )
            .unwrap();

        let record = store.record::<Account>().unwrap().unwrap();
        assert_eq!(record.get("IsActive").unwrap().options.always, Some(true));
        assert_eq!(record.get("IsGrouped").unwrap().options.always, None);
    }

    #[test]
    fn test_same_name_gets_suffixed_key() {
        let store = MetadataStore::new();
        store.register(pass_rule("IsUnique")).unwrap();
        store.register(pass_rule("IsUnique")).unwrap();
        store.register(pass_rule("IsUnique")).unwrap();

        let record = store.record::<Account>().unwrap().unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["IsUnique", "IsUnique.1", "IsUnique.2"]);

        // Every config keeps the validator name used in constraints
        assert!(record.iter().all(|(_, config)| config.name == "IsUnique"));
    }

    #[test]
    fn test_suffix_skips_taken_keys() {
        let store = MetadataStore::new();
        store.register(pass_rule("Rule")).unwrap();
        store.register(pass_rule("Rule.2")).unwrap();
        // Two keys start with "Rule", so "Rule.2" is tried first and is taken
        store.register(pass_rule("Rule")).unwrap();

        let record = store.record::<Account>().unwrap().unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["Rule", "Rule.2", "Rule.3"]);
    }

    #[test]
    fn test_property_label_prefers_options() {
        let store = MetadataStore::new();
        store
            .register(
                pass_rule("IsUnique")
                    .property("title")
                    .options(EntityValidatorOptions::new().property("headline")),
            )
            .unwrap();
        store.register(pass_rule("Other").property("title")).unwrap();

        let record = store.record::<Account>().unwrap().unwrap();
        assert_eq!(
            record.get("IsUnique").unwrap().property_label(),
            Some("headline")
        );
        assert_eq!(record.get("Other").unwrap().property_label(), Some("title"));
    }

    #[test]
    fn test_global_store_is_shared() {
        let first = MetadataStore::global();
        let second = MetadataStore::global();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
