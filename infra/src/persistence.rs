use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;
use log::*;
use r2d2_postgres::PostgresConnectionManager;
use serde_json::Value;

use crate::documents::{Direction, DocumentStore, MissingDocument};

const SETUP_SQL: &'static str = include_str!("persistence.sql");
const EXISTS_SQL: &'static str = "SELECT 1 FROM documents WHERE collection = $1 AND id = $2";
const LOAD_SQL: &'static str = "SELECT body FROM documents WHERE collection = $1 AND id = $2";
const SET_SQL: &'static str = "INSERT INTO documents (collection, id, body) \
                               VALUES ($1, $2, $3) \
                               ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body";
const MERGE_SQL: &'static str =
    "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2";
const DELETE_SQL: &'static str = "DELETE FROM documents WHERE collection = $1 AND id = $2";
const FIND_SQL: &'static str = "SELECT body FROM documents WHERE collection = $1 AND id = ANY($2)";

/// Postgres-backed document store: one `documents` table keyed by
/// (collection, id) with the record held as `jsonb`.
pub struct Documents {
    connection: postgres::Connection,
}

impl Documents {
    pub fn new(connection: postgres::Connection) -> Self {
        Documents { connection }
    }

    pub fn get_ref(&self) -> &postgres::Connection {
        &self.connection
    }

    pub fn setup(&self) -> Result<()> {
        self.connection.batch_execute(SETUP_SQL)?;
        Ok(())
    }
}

impl fmt::Debug for Documents {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Documents")
    }
}

impl DocumentStore for Documents {
    fn exists(&self, collection: &str, id: &str) -> Result<bool> {
        let stmt = self.connection.prepare_cached(EXISTS_SQL)?;
        let rows = stmt.query(&[&collection, &id])?;
        Ok(!rows.is_empty())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let stmt = self.connection.prepare_cached(LOAD_SQL)?;
        let rows = stmt.query(&[&collection, &id])?;

        if let Some(row) = rows.iter().next() {
            let body: Value = row.get_opt(0).expect("missing body column?")?;
            Ok(Some(body))
        } else {
            Ok(None)
        }
    }

    fn set(&self, collection: &str, id: &str, record: &Value) -> Result<()> {
        let stmt = self.connection.prepare_cached(SET_SQL)?;
        let nrows = stmt.execute(&[&collection, &id, record])?;
        debug!("set {}/{}: {} rows", collection, id, nrows);
        Ok(())
    }

    fn merge(&self, collection: &str, id: &str, partial: &Value) -> Result<()> {
        let stmt = self.connection.prepare_cached(MERGE_SQL)?;
        let nrows = stmt.execute(&[&collection, &id, partial])?;
        if nrows != 1 {
            warn!("merge of {}/{} touched {} rows", collection, id, nrows);
            return Err(MissingDocument.into());
        }
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let stmt = self.connection.prepare_cached(DELETE_SQL)?;
        let nrows = stmt.execute(&[&collection, &id])?;
        debug!("delete {}/{}: {} rows", collection, id, nrows);
        Ok(())
    }

    fn find_by_ids(&self, collection: &str, ids: &BTreeSet<String>) -> Result<Vec<Value>> {
        let ids: Vec<String> = ids.iter().cloned().collect();
        let stmt = self.connection.prepare_cached(FIND_SQL)?;
        let rows = stmt.query(&[&collection, &ids])?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let body: Value = row.get_opt(0).expect("missing body column?")?;
            found.push(body);
        }
        Ok(found)
    }

    fn list_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<(String, Value)>> {
        // The direction cannot be bound as a parameter; it comes from a
        // closed enum, never from the caller's text.
        let sql = format!(
            "SELECT id, body FROM documents WHERE collection = $1 \
             ORDER BY body -> $2 {dir}, id {dir} OFFSET $3 LIMIT $4",
            dir = direction.as_sql()
        );
        let stmt = self.connection.prepare_cached(&sql)?;
        let rows = stmt.query(&[&collection, &order_by, &offset, &limit])?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let id: String = row.get_opt(0).expect("missing id column?")?;
            let body: Value = row.get_opt(1).expect("missing body column?")?;
            listed.push((id, body));
        }
        trace!("list {}: {} rows", collection, listed.len());
        Ok(listed)
    }
}

/// Adapts [`Documents`] to an r2d2 pool over a postgres connection manager.
pub struct DocumentConnectionManager {
    inner: PostgresConnectionManager,
}

impl DocumentConnectionManager {
    pub fn new(inner: PostgresConnectionManager) -> Self {
        DocumentConnectionManager { inner }
    }
}

impl fmt::Debug for DocumentConnectionManager {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "DocumentConnectionManager")
    }
}

impl r2d2::ManageConnection for DocumentConnectionManager {
    type Connection = Documents;
    type Error = postgres::Error;

    fn connect(&self) -> Result<Documents, postgres::Error> {
        use r2d2::ManageConnection;
        Ok(Documents::new(self.inner.connect()?))
    }

    fn is_valid(&self, conn: &mut Documents) -> Result<(), postgres::Error> {
        conn.connection.batch_execute("")
    }

    fn has_broken(&self, conn: &mut Documents) -> bool {
        conn.connection.is_desynchronized()
    }
}
