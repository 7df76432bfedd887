use anyhow::Result;
use log::*;
use r2d2::Pool;
use serde_json::Value;

use infra::documents::DocumentStore;
use infra::keys::Key;

use crate::catalog::{rows_with_ids, Catalog};
use crate::errors::ApiError;
use crate::listing::{ListParams, MAX_LIMIT};
use crate::reply::Reply;
use crate::services::{Queryable, Request};

use super::models::Cocktail;

/// The cocktail resource: the same CRUD + list shape as ingredients, with
/// the ingredient-existence check gating create and update.
pub struct Cocktails<M: r2d2::ManageConnection> {
    catalog: Catalog<M, Cocktail>,
}

/// Operator listing of the whole catalogue, ordered by name.
#[derive(Debug, Clone, Copy)]
pub struct ShowCocktails;

impl<M, D> Cocktails<M>
where
    M: r2d2::ManageConnection<Connection = D>,
    D: DocumentStore + Send + 'static,
{
    pub fn new(db: Pool<M>) -> Self {
        Cocktails {
            catalog: Catalog::new(db),
        }
    }

    pub fn get(&self, id: &str) -> Reply {
        match self.key(id).and_then(|key| self.catalog.fetch(&key)) {
            Ok(record) => Reply::json(200, record),
            Err(err) => Reply::from(err),
        }
    }

    pub fn create(&self, id: &str, body: &Value) -> Reply {
        debug!("create cocktail {:?}", id);
        match self.key(id).and_then(|key| self.catalog.create(&key, body)) {
            Ok(()) => Reply::text(200, "Cocktail added successfully"),
            Err(err) => Reply::from(err),
        }
    }

    pub fn update(&self, id: &str, body: &Value) -> Reply {
        debug!("update cocktail {:?}", id);
        match self.key(id).and_then(|key| self.catalog.update(&key, body)) {
            Ok(()) => Reply::text(200, "Cocktail changed successfully"),
            Err(err) => Reply::from(err),
        }
    }

    pub fn delete(&self, id: &str) -> Reply {
        debug!("delete cocktail {:?}", id);
        match self.key(id).and_then(|key| self.catalog.remove(&key)) {
            Ok(()) => Reply::text(200, "Cocktail deleted successfully"),
            // A missing cocktail reports as not-found on delete, unlike
            // update; the ingredient resource answers 400 here.
            Err(err @ ApiError::DoesNotExist(_)) => Reply::text(404, err.to_string()),
            Err(err) => Reply::from(err),
        }
    }

    pub fn list(&self, params: &ListParams) -> Reply {
        match self.catalog.list(params) {
            Ok(rows) => Reply::json(200, rows_with_ids(rows)),
            Err(err) => Reply::from(err),
        }
    }

    fn key(&self, id: &str) -> Result<Key<Cocktail>, ApiError> {
        id.parse().map_err(|_| ApiError::InvalidKey)
    }
}

impl Request for ShowCocktails {
    type Resp = Vec<(String, Cocktail)>;
}

impl<M, D> Queryable<ShowCocktails> for Cocktails<M>
where
    M: r2d2::ManageConnection<Connection = D>,
    D: DocumentStore + Send + 'static,
{
    fn query(&self, _req: ShowCocktails) -> Result<Vec<(String, Cocktail)>> {
        let params = ListParams {
            limit: Some(MAX_LIMIT.to_string()),
            ..ListParams::default()
        };
        let rows = self.catalog.list(&params)?;
        rows.into_iter()
            .map(|(id, record)| Ok((id, serde_json::from_value(record)?)))
            .collect()
    }
}

impl<M: r2d2::ManageConnection> Clone for Cocktails<M> {
    fn clone(&self) -> Self {
        Cocktails {
            catalog: self.catalog.clone(),
        }
    }
}
