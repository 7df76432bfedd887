use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use infra::keys::Entity;

use crate::catalog::CatalogEntity;
use crate::errors::Rejection;
use crate::listing::OrderField;
use crate::validate;

/// A stocked ingredient, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub description: String,
    pub is_alcoholic: bool,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

/// The validated, client-supplied half of an [`Ingredient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientDraft {
    pub name: String,
    pub description: String,
    pub is_alcoholic: bool,
    pub photo_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientOrder {
    Name,
    Alcoholic,
    Created,
}

impl Entity for Ingredient {
    const COLLECTION: &'static str = "ingredients";
}

impl CatalogEntity for Ingredient {
    const NAME: &'static str = "Ingredient";

    type OrderBy = IngredientOrder;
    type Draft = IngredientDraft;

    fn validate(body: &Value) -> Result<IngredientDraft, Rejection> {
        let name = validate::require_text(body, "name")?;
        let description = validate::require_text(body, "description")?;
        // Exactly a boolean literal; "true" the string does not count.
        let is_alcoholic = match body.get("isAlcoholic") {
            Some(&Value::Bool(flag)) => flag,
            _ => return Err(Rejection::InvalidBooleanFlag),
        };
        let photo_url = validate::require_text(body, "photoUrl")?;
        if !validate::url_shaped(&photo_url) {
            return Err(Rejection::InvalidUrl);
        }

        Ok(IngredientDraft {
            name,
            description,
            is_alcoholic,
            photo_url,
        })
    }
}

impl OrderField for IngredientOrder {
    const DEFAULT: Self = IngredientOrder::Name;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(IngredientOrder::Name),
            "isAlcoholic" => Some(IngredientOrder::Alcoholic),
            "createdAt" => Some(IngredientOrder::Created),
            _ => None,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            IngredientOrder::Name => "name",
            IngredientOrder::Alcoholic => "isAlcoholic",
            IngredientOrder::Created => "createdAt",
        }
    }
}
