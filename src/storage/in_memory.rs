//! In-memory record sources for testing and development

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use crate::core::query::SelectQuery;
use crate::core::relation::RelationMetadata;
use crate::core::service::Repository;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Plain collection of entities of one type
///
/// Cloning shares the underlying collection. Register it on a
/// `ValidationContext` so that uniqueness checks can scan it.
pub struct InMemoryStore<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T: Entity> InMemoryStore<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append an entity
    pub fn insert(&self, item: T) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        items.push(item);

        Ok(())
    }

    /// Number of stored entities
    pub fn len(&self) -> Result<usize> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.len())
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Check whether any stored entity satisfies `predicate`
    pub fn any<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.iter().any(predicate))
    }
}

impl<T: Entity + Clone> InMemoryStore<T> {
    /// Snapshot of every stored entity
    pub fn list(&self) -> Result<Vec<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.clone())
    }
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InMemoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore").finish_non_exhaustive()
    }
}

type Row = IndexMap<String, FieldValue>;

/// Query-capable repository keeping rows in memory
///
/// Each entity type gets a table of rows keyed by id, in insertion order.
/// Relations have to be declared for their fields to be compared by the
/// related entity's id.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<HashMap<String, IndexMap<Uuid, Row>>>>,
    relations: Arc<RwLock<HashMap<String, HashMap<String, RelationMetadata>>>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `property` of `entity_type` references `target_type`
    pub fn declare_relation(
        &self,
        entity_type: &str,
        property: &str,
        target_type: &str,
    ) -> Result<()> {
        let mut relations = self
            .relations
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        relations
            .entry(entity_type.to_string())
            .or_default()
            .insert(property.to_string(), RelationMetadata::new(property, target_type));

        Ok(())
    }

    /// Insert or replace the row of an entity
    pub fn save<T: Entity>(&self, entity: &T) -> Result<()> {
        let mut row = Row::new();
        row.insert("id".to_string(), FieldValue::Uuid(entity.id()));
        for field in T::fields() {
            if let Some(value) = entity.field_value(field) {
                row.insert(field.to_string(), value);
            }
        }

        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        tables
            .entry(T::entity_name().to_string())
            .or_default()
            .insert(entity.id(), row);

        Ok(())
    }

    /// Number of rows stored for an entity type
    pub fn count(&self, entity_type: &str) -> Result<usize> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.get(entity_type).map_or(0, |table| table.len()))
    }
}

impl fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository").finish_non_exhaustive()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    fn find_relation(&self, entity_type: &str, property: &str) -> Option<RelationMetadata> {
        let relations = self.relations.read().ok()?;
        relations.get(entity_type)?.get(property).cloned()
    }

    async fn get_one(&self, query: &SelectQuery) -> Result<Option<Uuid>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let Some(table) = tables.get(&query.entity_type) else {
            return Ok(None);
        };

        Ok(table
            .iter()
            .find(|(_, row)| query.matches(|field| row.get(field)))
            .map(|(id, _)| *id))
    }
}
