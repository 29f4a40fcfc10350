use serde::Deserialize;

use crate::error::RecipeError;
use crate::http::JsonFetcher;
use crate::provider::RecipeProvider;
use crate::types::{rank_by_used_ingredients, IngredientMeasure, MealDetails, MealSummary};

pub const SPOONACULAR_BASE: &str = "https://api.spoonacular.com";

/// Candidates fetched per search before ranking.
const SEARCH_CANDIDATES: &str = "10";
const TOP_MEALS: usize = 3;

// ── Upstream schema ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpoonIngredient {
    #[serde(default)]
    name: String,
    amount: Option<f64>,
    #[serde(default)]
    unit: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    id: i64,
    title: Option<String>,
    image: Option<String>,
    #[serde(default)]
    used_ingredient_count: u32,
    #[serde(default)]
    missed_ingredient_count: u32,
    #[serde(default)]
    used_ingredients: Vec<SpoonIngredient>,
    #[serde(default)]
    missed_ingredients: Vec<SpoonIngredient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeInformation {
    id: i64,
    title: Option<String>,
    instructions: Option<String>,
    #[serde(default)]
    extended_ingredients: Vec<SpoonIngredient>,
}

#[derive(Debug, Deserialize)]
struct RandomRecipes {
    #[serde(default)]
    recipes: Vec<RecipeInformation>,
}

// ── Normalization ────────────────────────────────────────────────────────────

fn measure(ing: &SpoonIngredient) -> IngredientMeasure {
    let measure = match ing.amount {
        Some(amount) => format!("{amount} {}", ing.unit).trim_end().to_string(),
        None => ing.unit.clone(),
    };
    IngredientMeasure {
        ingredient: ing.name.clone(),
        measure,
    }
}

fn summarize(hit: SearchHit) -> MealSummary {
    MealSummary {
        id: hit.id.to_string(),
        name: hit.title,
        thumbnail: hit.image,
        used_ingredient_count: hit.used_ingredient_count,
        missed_ingredient_count: hit.missed_ingredient_count,
        used_ingredients: hit.used_ingredients.iter().map(measure).collect(),
        missed_ingredients: hit.missed_ingredients.iter().map(measure).collect(),
    }
}

fn details(info: RecipeInformation) -> MealDetails {
    MealDetails {
        id: info.id.to_string(),
        name: info.title,
        instructions: info.instructions.unwrap_or_default().trim().to_string(),
        ingredients: info.extended_ingredients.iter().map(measure).collect(),
    }
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct SpoonacularClient {
    fetcher: JsonFetcher,
    api_key: Option<String>,
}

impl SpoonacularClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self, RecipeError> {
        Ok(Self {
            fetcher: JsonFetcher::new(base_url, timeout_secs)?,
            api_key,
        })
    }

    fn api_key(&self) -> Result<&str, RecipeError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(RecipeError::MissingApiKey)
    }
}

impl RecipeProvider for SpoonacularClient {
    fn name(&self) -> &'static str {
        "Spoonacular"
    }

    async fn search_by_ingredients(&self, ingredients: &str) -> Result<Vec<MealSummary>, RecipeError> {
        let ingredients = ingredients.trim();
        if ingredients.is_empty() {
            return Err(RecipeError::InvalidInput(
                "Please provide some ingredients to search for.".into(),
            ));
        }
        let api_key = self.api_key()?;

        let hits: Vec<SearchHit> = self
            .fetcher
            .get_json(
                "/recipes/findByIngredients",
                &[
                    ("apiKey", api_key),
                    ("ingredients", ingredients),
                    ("number", SEARCH_CANDIDATES),
                    ("ranking", "1"),
                    ("ignorePantry", "true"),
                ],
                self.name(),
            )
            .await?;

        if hits.is_empty() {
            return Err(RecipeError::NotFound(
                "No meals found with the given ingredients.".into(),
            ));
        }

        let meals = hits.into_iter().map(summarize).collect();
        Ok(rank_by_used_ingredients(meals, TOP_MEALS))
    }

    async fn meal_details(&self, meal_id: &str) -> Result<MealDetails, RecipeError> {
        let meal_id = meal_id.trim();
        if meal_id.is_empty() {
            return Err(RecipeError::InvalidInput("meal_id is required".into()));
        }
        // The id becomes a path segment.
        if !meal_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RecipeError::InvalidInput(format!(
                "meal_id must be numeric for Spoonacular, got {meal_id:?}"
            )));
        }
        let api_key = self.api_key()?;

        let info: RecipeInformation = self
            .fetcher
            .get_json(
                &format!("/recipes/{meal_id}/information"),
                &[("apiKey", api_key)],
                self.name(),
            )
            .await
            .map_err(|e| e.or_not_found(format!("No meal found for id={meal_id}")))?;

        Ok(details(info))
    }

    async fn random_meal(&self) -> Result<MealDetails, RecipeError> {
        let api_key = self.api_key()?;

        let random: RandomRecipes = self
            .fetcher
            .get_json("/recipes/random", &[("apiKey", api_key), ("number", "1")], self.name())
            .await?;

        random
            .recipes
            .into_iter()
            .next()
            .map(details)
            .ok_or_else(|| RecipeError::Malformed("No random meal returned from Spoonacular".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn ingredient(name: &str, amount: f64, unit: &str) -> Value {
        json!({"name": name, "amount": amount, "unit": unit})
    }

    fn upstream() -> Router {
        Router::new()
            .route(
                "/recipes/findByIngredients",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    if q.get("apiKey").map(String::as_str) != Some("test-key") {
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                    if q.get("ingredients").map(String::as_str) == Some("unobtainium") {
                        return Ok(Json(json!([])));
                    }
                    Ok(Json(json!([
                        {"id": 1, "title": "Omelette", "image": "o.jpg",
                         "usedIngredientCount": 1, "missedIngredientCount": 2,
                         "usedIngredients": [ingredient("eggs", 2.0, "")],
                         "missedIngredients": []},
                        {"id": 2, "title": "Chicken Frittata",
                         "usedIngredientCount": 3, "missedIngredientCount": 0,
                         "usedIngredients": [ingredient("chicken", 200.0, "g")]},
                        {"id": 3, "title": "Egg Fried Rice", "usedIngredientCount": 2},
                        {"id": 4, "title": "Plain Toast", "usedIngredientCount": 0}
                    ])))
                }),
            )
            .route(
                "/recipes/{id}/information",
                get(|Path(id): Path<String>| async move {
                    if id != "715538" {
                        return Err(StatusCode::NOT_FOUND);
                    }
                    Ok(Json(json!({
                        "id": 715538,
                        "title": "Bruschetta",
                        "instructions": "  Toast the bread.\n",
                        "extendedIngredients": [
                            ingredient("baguette", 1.0, "loaf"),
                            ingredient("tomatoes", 0.5, "kg")
                        ]
                    })))
                }),
            )
            .route(
                "/recipes/random",
                get(|| async {
                    Json(json!({"recipes": [{"id": 9, "title": "Soup", "instructions": null}]}))
                }),
            )
    }

    async fn client() -> SpoonacularClient {
        let base = serve(upstream()).await;
        SpoonacularClient::new(&base, Some("test-key".into()), 5).unwrap()
    }

    #[tokio::test]
    async fn search_keeps_top_three_by_used_ingredients() {
        let meals = client().await.search_by_ingredients("chicken, eggs").await.unwrap();
        let ids: Vec<_> = meals.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "1"]);
        assert_eq!(meals[0].name.as_deref(), Some("Chicken Frittata"));
        assert_eq!(meals[0].used_ingredients, [IngredientMeasure::new("chicken", "200 g")]);
        assert_eq!(meals[2].used_ingredients, [IngredientMeasure::new("eggs", "2")]);
        assert_eq!(meals[2].thumbnail.as_deref(), Some("o.jpg"));
    }

    #[tokio::test]
    async fn empty_search_is_not_found() {
        let err = client().await.search_by_ingredients("unobtainium").await.unwrap_err();
        assert!(matches!(err, RecipeError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_ingredients_rejected_before_request() {
        let err = client().await.search_by_ingredients("  ").await.unwrap_err();
        assert!(matches!(err, RecipeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn details_normalizes_ingredients_and_instructions() {
        let meal = client().await.meal_details("715538").await.unwrap();
        assert_eq!(meal.id, "715538");
        assert_eq!(meal.name.as_deref(), Some("Bruschetta"));
        assert_eq!(meal.instructions, "Toast the bread.");
        assert_eq!(
            meal.ingredients,
            [
                IngredientMeasure::new("baguette", "1 loaf"),
                IngredientMeasure::new("tomatoes", "0.5 kg"),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let err = client().await.meal_details("1").await.unwrap_err();
        assert!(matches!(err, RecipeError::NotFound(m) if m == "No meal found for id=1"));
    }

    #[tokio::test]
    async fn non_numeric_id_rejected_before_request() {
        let client = client().await;
        for id in ["1?x=#", "../random", "715538/x"] {
            let err = client.meal_details(id).await.unwrap_err();
            assert!(matches!(err, RecipeError::InvalidInput(_)), "{id}");
        }
    }

    #[tokio::test]
    async fn random_meal_tolerates_null_instructions() {
        let meal = client().await.random_meal().await.unwrap();
        assert_eq!(meal.id, "9");
        assert_eq!(meal.instructions, "");
    }

    #[tokio::test]
    async fn rejected_key_is_upstream_status() {
        let base = serve(upstream()).await;
        let client = SpoonacularClient::new(&base, Some("wrong".into()), 5).unwrap();
        let err = client.search_by_ingredients("eggs").await.unwrap_err();
        assert!(matches!(err, RecipeError::Status(401)));
    }

    #[tokio::test]
    async fn missing_key_fails_fast() {
        let client = SpoonacularClient::new("http://127.0.0.1:9", None, 1).unwrap();
        assert!(matches!(client.random_meal().await, Err(RecipeError::MissingApiKey)));
    }
}
