mod models;
mod resources;

pub use self::models::{Ingredient, IngredientDraft, IngredientOrder};
pub use self::resources::{AddIngredient, Ingredients, ShowIngredients};
