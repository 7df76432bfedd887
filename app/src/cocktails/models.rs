use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use infra::documents::DocumentStore;
use infra::keys::{Entity, Key};

use crate::catalog::CatalogEntity;
use crate::errors::{ApiError, Rejection};
use crate::ingredients::Ingredient;
use crate::listing::OrderField;
use crate::validate;

/// A catalogued cocktail, as persisted. The ingredient list is a
/// denormalized copy of references; nothing is joined at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cocktail {
    pub name: String,
    pub category: String,
    pub recipe: String,
    pub ingredients: Vec<IngredientRef>,
    pub created_at: DateTime<Utc>,
}

/// One line of a recipe: which ingredient, and how much of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRef {
    pub id: Key<Ingredient>,
    pub amount: String,
}

/// The validated, client-supplied half of a [`Cocktail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CocktailDraft {
    pub name: String,
    pub category: String,
    pub recipe: String,
    pub ingredients: Vec<IngredientRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CocktailOrder {
    Name,
    Category,
    Created,
}

impl Entity for Cocktail {
    const COLLECTION: &'static str = "cocktails";
}

impl CatalogEntity for Cocktail {
    const NAME: &'static str = "Cocktail";

    type OrderBy = CocktailOrder;
    type Draft = CocktailDraft;

    fn validate(body: &Value) -> Result<CocktailDraft, Rejection> {
        let name = validate::require_text(body, "name")?;
        let category = validate::require_text(body, "category")?;
        let recipe = validate::require_text(body, "recipe")?;

        let submitted = match body.get("ingredients") {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => return Err(Rejection::MalformedIngredientList),
        };

        let ingredients: Vec<IngredientRef> =
            submitted.iter().filter_map(ingredient_ref).collect();
        // A dropped entry means part of the submission was malformed; refuse
        // the whole request rather than persist a shorter list than was sent.
        if ingredients.len() != submitted.len() {
            return Err(Rejection::MalformedIngredientList);
        }

        Ok(CocktailDraft {
            name,
            category,
            recipe,
            ingredients,
        })
    }

    fn check_references<D: DocumentStore>(
        draft: &CocktailDraft,
        store: &D,
    ) -> Result<(), ApiError> {
        let wanted: BTreeSet<String> = draft
            .ingredients
            .iter()
            .map(|entry| entry.id.to_string())
            .collect();
        let found = store.find_by_ids(Ingredient::COLLECTION, &wanted)?;

        // The lookup is by id set, so a duplicated reference can never
        // account for two entries and always fails this comparison.
        if found.len() != draft.ingredients.len() {
            return Err(ApiError::UnknownIngredients);
        }
        Ok(())
    }
}

fn ingredient_ref(entry: &Value) -> Option<IngredientRef> {
    let id = entry
        .get("id")
        .and_then(validate::coerce_text)?
        .parse()
        .ok()?;
    let amount = entry
        .get("amount")
        .and_then(validate::coerce_text)
        .filter(|amount| !amount.is_empty())?;
    Some(IngredientRef { id, amount })
}

impl OrderField for CocktailOrder {
    const DEFAULT: Self = CocktailOrder::Name;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(CocktailOrder::Name),
            "category" => Some(CocktailOrder::Category),
            "createdAt" => Some(CocktailOrder::Created),
            _ => None,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            CocktailOrder::Name => "name",
            CocktailOrder::Category => "category",
            CocktailOrder::Created => "createdAt",
        }
    }
}
