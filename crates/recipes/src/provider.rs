use larder_core::{RecipeConfig, RecipeProviderKind};
use std::future::Future;

use crate::error::RecipeError;
use crate::mealdb::{MealDbClient, MEALDB_BASE};
use crate::spoonacular::{SpoonacularClient, SPOONACULAR_BASE};
use crate::types::{MealDetails, MealSummary};

/// A recipe search backend. Every implementation returns the same normalized
/// shapes regardless of the upstream schema.
pub trait RecipeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// `ingredients` is a comma-separated list.
    fn search_by_ingredients(
        &self,
        ingredients: &str,
    ) -> impl Future<Output = Result<Vec<MealSummary>, RecipeError>> + Send;

    fn meal_details(
        &self,
        meal_id: &str,
    ) -> impl Future<Output = Result<MealDetails, RecipeError>> + Send;

    fn random_meal(&self) -> impl Future<Output = Result<MealDetails, RecipeError>> + Send;
}

/// The provider selected in configuration.
pub enum RecipeClient {
    Spoonacular(SpoonacularClient),
    MealDb(MealDbClient),
}

impl RecipeClient {
    pub fn from_config(config: &RecipeConfig) -> Result<Self, RecipeError> {
        let client = match config.provider {
            RecipeProviderKind::Spoonacular => RecipeClient::Spoonacular(SpoonacularClient::new(
                config.base_url.as_deref().unwrap_or(SPOONACULAR_BASE),
                config.api_key.clone(),
                config.timeout_secs,
            )?),
            RecipeProviderKind::MealDb => RecipeClient::MealDb(MealDbClient::new(
                config.base_url.as_deref().unwrap_or(MEALDB_BASE),
                config.timeout_secs,
            )?),
        };
        tracing::info!("Recipe provider: {}", client.name());
        Ok(client)
    }
}

impl RecipeProvider for RecipeClient {
    fn name(&self) -> &'static str {
        match self {
            RecipeClient::Spoonacular(c) => c.name(),
            RecipeClient::MealDb(c) => c.name(),
        }
    }

    async fn search_by_ingredients(&self, ingredients: &str) -> Result<Vec<MealSummary>, RecipeError> {
        match self {
            RecipeClient::Spoonacular(c) => c.search_by_ingredients(ingredients).await,
            RecipeClient::MealDb(c) => c.search_by_ingredients(ingredients).await,
        }
    }

    async fn meal_details(&self, meal_id: &str) -> Result<MealDetails, RecipeError> {
        match self {
            RecipeClient::Spoonacular(c) => c.meal_details(meal_id).await,
            RecipeClient::MealDb(c) => c.meal_details(meal_id).await,
        }
    }

    async fn random_meal(&self) -> Result<MealDetails, RecipeError> {
        match self {
            RecipeClient::Spoonacular(c) => c.random_meal().await,
            RecipeClient::MealDb(c) => c.random_meal().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_spoonacular() {
        let client = RecipeClient::from_config(&RecipeConfig::default()).unwrap();
        assert_eq!(client.name(), "Spoonacular");
    }

    #[test]
    fn selects_mealdb() {
        let config = RecipeConfig {
            provider: RecipeProviderKind::MealDb,
            ..RecipeConfig::default()
        };
        let client = RecipeClient::from_config(&config).unwrap();
        assert_eq!(client.name(), "TheMealDB");
    }

    #[tokio::test]
    async fn spoonacular_without_key_is_input_error() {
        let client = RecipeClient::from_config(&RecipeConfig::default()).unwrap();
        let err = client.search_by_ingredients("eggs").await.unwrap_err();
        assert!(matches!(err, RecipeError::MissingApiKey));
    }
}
