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
use crate::services::{Commandable, Queryable, Request};

use super::models::Ingredient;

/// The ingredient resource: get/create/update/delete/list over the
/// `ingredients` collection. No cross-entity checks on this side.
pub struct Ingredients<M: r2d2::ManageConnection> {
    catalog: Catalog<M, Ingredient>,
}

/// Operator listing of the whole stock, ordered by name.
#[derive(Debug, Clone, Copy)]
pub struct ShowIngredients;

/// Stock one ingredient, as the create operation would.
#[derive(Debug, Clone)]
pub struct AddIngredient {
    pub id: String,
    pub body: Value,
}

impl<M, D> Ingredients<M>
where
    M: r2d2::ManageConnection<Connection = D>,
    D: DocumentStore + Send + 'static,
{
    pub fn new(db: Pool<M>) -> Self {
        Ingredients {
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
        debug!("create ingredient {:?}", id);
        match self.key(id).and_then(|key| self.catalog.create(&key, body)) {
            Ok(()) => Reply::text(200, "Ingredient added successfully"),
            Err(err) => Reply::from(err),
        }
    }

    pub fn update(&self, id: &str, body: &Value) -> Reply {
        debug!("update ingredient {:?}", id);
        match self.key(id).and_then(|key| self.catalog.update(&key, body)) {
            Ok(()) => Reply::text(200, "Ingredient changed successfully"),
            Err(err) => Reply::from(err),
        }
    }

    pub fn delete(&self, id: &str) -> Reply {
        debug!("delete ingredient {:?}", id);
        match self.key(id).and_then(|key| self.catalog.remove(&key)) {
            Ok(()) => Reply::text(200, "Ingredient deleted successfully"),
            Err(err) => Reply::from(err),
        }
    }

    pub fn list(&self, params: &ListParams) -> Reply {
        match self.catalog.list(params) {
            Ok(rows) => Reply::json(200, rows_with_ids(rows)),
            Err(err) => Reply::from(err),
        }
    }

    fn key(&self, id: &str) -> Result<Key<Ingredient>, ApiError> {
        id.parse().map_err(|_| ApiError::InvalidKey)
    }
}

impl Request for ShowIngredients {
    type Resp = Vec<(String, Ingredient)>;
}

impl<M, D> Queryable<ShowIngredients> for Ingredients<M>
where
    M: r2d2::ManageConnection<Connection = D>,
    D: DocumentStore + Send + 'static,
{
    fn query(&self, _req: ShowIngredients) -> Result<Vec<(String, Ingredient)>> {
        // Operator listing caps at the query maximum.
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

impl Request for AddIngredient {
    type Resp = Reply;
}

impl<M, D> Commandable<AddIngredient> for Ingredients<M>
where
    M: r2d2::ManageConnection<Connection = D>,
    D: DocumentStore + Send + 'static,
{
    fn execute(&self, req: AddIngredient) -> Result<Reply> {
        Ok(self.create(&req.id, &req.body))
    }
}

impl<M: r2d2::ManageConnection> Clone for Ingredients<M> {
    fn clone(&self) -> Self {
        Ingredients {
            catalog: self.catalog.clone(),
        }
    }
}
