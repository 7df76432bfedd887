//! Catalogue service for a bar: ingredients and cocktails held in a document
//! store, with validated writes and deterministic paginated listings.

use anyhow::Result;
use log::*;
use r2d2::Pool;

use infra::persistence::DocumentConnectionManager;

pub mod catalog;
pub mod cocktails;
pub mod config;
pub mod errors;
pub mod ingredients;
pub mod listing;
pub mod reply;
pub mod services;
mod validate;

#[cfg(test)]
mod test;

/// Shared process state: one store pool, opened at startup and handed to
/// each resource handler.
#[derive(Clone)]
pub struct Barkeep {
    db: Pool<DocumentConnectionManager>,
}

impl Barkeep {
    pub fn new(config: &config::Config) -> Result<Self> {
        let db = config.db.build()?;
        Ok(Barkeep { db })
    }

    pub fn setup(&self) -> Result<()> {
        debug!("Init schema");
        self.db.get()?.setup()
    }

    pub fn ingredients(&self) -> ingredients::Ingredients<DocumentConnectionManager> {
        ingredients::Ingredients::new(self.db.clone())
    }

    pub fn cocktails(&self) -> cocktails::Cocktails<DocumentConnectionManager> {
        cocktails::Cocktails::new(self.db.clone())
    }
}
