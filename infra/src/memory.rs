use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::documents::{Direction, DocumentStore, MissingDocument};

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// Process-local store with the same contract as [`persistence::Documents`];
/// used by tests and local tooling. Clones share one underlying map.
///
/// [`persistence::Documents`]: crate::persistence::Documents
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<Collections>> {
        self.collections
            .read()
            .map_err(|_| anyhow!("store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<Collections>> {
        self.collections
            .write()
            .map_err(|_| anyhow!("store lock poisoned"))
    }
}

impl DocumentStore for MemoryStore {
    fn exists(&self, collection: &str, id: &str) -> Result<bool> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.contains_key(id))
            .unwrap_or(false))
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn set(&self, collection: &str, id: &str, record: &Value) -> Result<()> {
        let mut collections = self.write()?;
        collections
            .entry(collection.to_string())
            .or_insert_with(BTreeMap::new)
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    fn merge(&self, collection: &str, id: &str, partial: &Value) -> Result<()> {
        let mut collections = self.write()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or(MissingDocument)?;
        match (doc.as_object_mut(), partial.as_object()) {
            (Some(fields), Some(updates)) => {
                for (name, value) in updates {
                    fields.insert(name.clone(), value.clone());
                }
                Ok(())
            }
            _ => Err(anyhow!("merge requires object documents")),
        }
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.write()?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    fn find_by_ids(&self, collection: &str, ids: &BTreeSet<String>) -> Result<Vec<Value>> {
        let collections = self.read()?;
        let docs = match collections.get(collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };
        Ok(ids.iter().filter_map(|id| docs.get(id).cloned()).collect())
    }

    fn list_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<(String, Value)>> {
        let collections = self.read()?;
        let mut rows: Vec<(String, Value)> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| {
            let by_field = json_cmp(
                a.1.get(order_by).unwrap_or(&Value::Null),
                b.1.get(order_by).unwrap_or(&Value::Null),
            );
            let ord = by_field.then_with(|| a.0.cmp(&b.0));
            match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        });

        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

/// Total order over JSON values: rank by type first (null, bool, number,
/// string, array, object), then by value within the type.
fn json_cmp(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(a)
            .cmp(&rank(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

/// Hands out clones of one shared [`MemoryStore`] so the pool-generic
/// handlers can run without a database.
#[derive(Debug, Default)]
pub struct MemoryConnectionManager {
    store: MemoryStore,
}

impl MemoryConnectionManager {
    pub fn new(store: MemoryStore) -> Self {
        MemoryConnectionManager { store }
    }
}

impl r2d2::ManageConnection for MemoryConnectionManager {
    type Connection = MemoryStore;
    type Error = Infallible;

    fn connect(&self) -> Result<MemoryStore, Infallible> {
        Ok(self.store.clone())
    }

    fn is_valid(&self, _conn: &mut MemoryStore) -> Result<(), Infallible> {
        Ok(())
    }

    fn has_broken(&self, _conn: &mut MemoryStore) -> bool {
        false
    }
}
