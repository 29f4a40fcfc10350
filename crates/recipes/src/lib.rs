pub mod error;
mod http;
pub mod mealdb;
pub mod provider;
pub mod spoonacular;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::RecipeError;
pub use mealdb::MealDbClient;
pub use provider::{RecipeClient, RecipeProvider};
pub use spoonacular::SpoonacularClient;
pub use types::{IngredientMeasure, MealDetails, MealSummary};
