use std::marker::PhantomData;

use chrono::{SecondsFormat, Utc};
use log::*;
use r2d2::Pool;
use serde::Serialize;
use serde_json::Value;

use infra::documents::DocumentStore;
use infra::keys::{Entity, Key};

use crate::errors::{ApiError, Rejection};
use crate::listing::{ListParams, ListQuery, OrderField};

/// One catalogued resource type: where it lives, how submissions are
/// validated, and what it can be listed by.
pub trait CatalogEntity: Entity {
    /// Name used in client-facing messages.
    const NAME: &'static str;

    type OrderBy: OrderField;

    /// The validated, client-supplied half of a record; `createdAt` is
    /// attached by the catalog at creation time only.
    type Draft: Serialize;

    fn validate(body: &Value) -> Result<Self::Draft, Rejection>;

    /// Cross-collection checks a draft must pass before it is persisted.
    fn check_references<D: DocumentStore>(_draft: &Self::Draft, _store: &D) -> Result<(), ApiError> {
        Ok(())
    }
}

/// The CRUD + list capability shared by every resource, instantiated per
/// entity type.
pub struct Catalog<M: r2d2::ManageConnection, E> {
    db: Pool<M>,
    _entity: PhantomData<fn() -> E>,
}

impl<M, D, E> Catalog<M, E>
where
    M: r2d2::ManageConnection<Connection = D>,
    D: DocumentStore + Send + 'static,
    E: CatalogEntity,
{
    pub fn new(db: Pool<M>) -> Self {
        Catalog {
            db,
            _entity: PhantomData,
        }
    }

    /// The stored record, verbatim.
    pub fn fetch(&self, key: &Key<E>) -> Result<Value, ApiError> {
        let store = self.store()?;
        let record = store.get(E::COLLECTION, key.as_str())?;
        record.ok_or(ApiError::NotFound(E::NAME))
    }

    pub fn create(&self, key: &Key<E>, body: &Value) -> Result<(), ApiError> {
        let store = self.store()?;
        if store.exists(E::COLLECTION, key.as_str())? {
            return Err(ApiError::AlreadyExists(E::NAME));
        }

        let draft = E::validate(body).map_err(ApiError::InvalidBody)?;
        E::check_references(&draft, &*store)?;

        let mut record = serde_json::to_value(&draft).map_err(ApiError::internal)?;
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        match record.as_object_mut() {
            Some(fields) => fields.insert("createdAt".to_string(), Value::String(stamp)),
            None => {
                return Err(ApiError::internal(anyhow::anyhow!(
                    "draft must serialize to an object"
                )))
            }
        };

        // The existence check and the write are separate store calls; two
        // racing creates can both pass the check, and the later write wins.
        store.set(E::COLLECTION, key.as_str(), &record)?;
        debug!("created {}/{}", E::COLLECTION, key);
        Ok(())
    }

    /// Partial update: only the validated fields change, `createdAt` and
    /// anything else already stored stay as they were.
    pub fn update(&self, key: &Key<E>, body: &Value) -> Result<(), ApiError> {
        let store = self.store()?;
        if !store.exists(E::COLLECTION, key.as_str())? {
            return Err(ApiError::DoesNotExist(E::NAME));
        }

        let draft = E::validate(body).map_err(ApiError::InvalidBody)?;
        E::check_references(&draft, &*store)?;

        let record = serde_json::to_value(&draft).map_err(ApiError::internal)?;
        store.merge(E::COLLECTION, key.as_str(), &record)?;
        debug!("updated {}/{}", E::COLLECTION, key);
        Ok(())
    }

    pub fn remove(&self, key: &Key<E>) -> Result<(), ApiError> {
        let store = self.store()?;
        if !store.exists(E::COLLECTION, key.as_str())? {
            return Err(ApiError::DoesNotExist(E::NAME));
        }
        store.delete(E::COLLECTION, key.as_str())?;
        debug!("deleted {}/{}", E::COLLECTION, key);
        Ok(())
    }

    pub fn list(&self, params: &ListParams) -> Result<Vec<(String, Value)>, ApiError> {
        let query = ListQuery::<E::OrderBy>::from_params(params)?;
        let store = self.store()?;
        let rows = store.list_ordered(
            E::COLLECTION,
            query.order_by.field(),
            query.direction,
            query.offset,
            query.limit,
        )?;
        trace!("list {}: {} rows", E::COLLECTION, rows.len());
        Ok(rows)
    }

    fn store(&self) -> Result<r2d2::PooledConnection<M>, ApiError> {
        self.db.get().map_err(ApiError::internal)
    }
}

impl<M: r2d2::ManageConnection, E> Clone for Catalog<M, E> {
    fn clone(&self) -> Self {
        Catalog {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

/// Listing rows as the wire wants them: the stored fields with the
/// document id folded in.
pub(crate) fn rows_with_ids(rows: Vec<(String, Value)>) -> Value {
    Value::Array(
        rows.into_iter()
            .map(|(id, mut record)| {
                if let Some(fields) = record.as_object_mut() {
                    fields.insert("id".to_string(), Value::String(id));
                }
                record
            })
            .collect(),
    )
}
