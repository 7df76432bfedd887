mod models;
mod resources;

pub use self::models::{Cocktail, CocktailDraft, CocktailOrder, IngredientRef};
pub use self::resources::{Cocktails, ShowCocktails};
