//! Persistence collaborator used by query-capable validators

use crate::core::query::SelectQuery;
use crate::core::relation::RelationMetadata;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Query capability a validator can reach through the validation context
///
/// Implementations wrap whatever persistence layer the application uses.
/// The validation engine never writes through this trait.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Find the relation declared on `property` of `entity_type`, if any
    fn find_relation(&self, entity_type: &str, property: &str) -> Option<RelationMetadata>;

    /// Start a query on an entity type
    fn query(&self, entity_type: &str) -> SelectQuery {
        SelectQuery::new(entity_type)
    }

    /// Fetch at most one row matching the query, returning its id
    async fn get_one(&self, query: &SelectQuery) -> Result<Option<Uuid>>;
}
