use std::collections::BTreeSet;

use anyhow::Result;
use err_derive::Error;
use serde_json::Value;

/// Sort direction for ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

/// Raised when a partial update finds nothing to update; the caller is
/// expected to have checked existence first, so this only surfaces a race.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(display = "document vanished before it could be updated")]
pub struct MissingDocument;

/// The document store contract: collections of JSON objects addressed by
/// caller-supplied string identifiers. Single-document operations are atomic;
/// nothing here spans documents.
pub trait DocumentStore {
    fn exists(&self, collection: &str, id: &str) -> Result<bool>;

    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Create or overwrite the whole document.
    fn set(&self, collection: &str, id: &str, record: &Value) -> Result<()>;

    /// Merge the given top-level fields onto an existing document, leaving
    /// unmentioned fields as they were.
    fn merge(&self, collection: &str, id: &str, partial: &Value) -> Result<()>;

    fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Fetch the documents whose ids appear in the given set. Ids that match
    /// nothing are simply absent from the result.
    fn find_by_ids(&self, collection: &str, ids: &BTreeSet<String>) -> Result<Vec<Value>>;

    /// Scan a collection ordered by one top-level field (ties broken by id,
    /// same direction), skipping `offset` rows and yielding at most `limit`.
    fn list_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<(String, Value)>>;
}
