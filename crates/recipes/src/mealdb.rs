use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::RecipeError;
use crate::http::JsonFetcher;
use crate::provider::RecipeProvider;
use crate::types::{rank_by_used_ingredients, IngredientMeasure, MealDetails, MealSummary};

/// Public test-key endpoint.
pub const MEALDB_BASE: &str = "https://www.themealdb.com/api/json/v1/1";

/// TheMealDB filters on one ingredient per request.
const MAX_QUERY_INGREDIENTS: usize = 5;
const TOP_MEALS: usize = 3;
const INGREDIENT_SLOTS: usize = 20;

// ── Upstream schema ──────────────────────────────────────────────────────────

/// Every endpoint wraps results in `{"meals": [...] | null}`.
#[derive(Debug, Deserialize)]
struct MealList<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct FilterHit {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strMealThumb")]
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FullMeal {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    /// `strIngredient1..20` / `strMeasure1..20` and everything else.
    #[serde(flatten)]
    fields: Map<String, Value>,
}

// ── Normalization ────────────────────────────────────────────────────────────

fn slot<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
}

fn details(meal: FullMeal) -> MealDetails {
    let ingredients = (1..=INGREDIENT_SLOTS)
        .filter_map(|n| {
            let ingredient = slot(&meal.fields, &format!("strIngredient{n}"));
            if ingredient.is_empty() {
                return None;
            }
            let measure = slot(&meal.fields, &format!("strMeasure{n}"));
            Some(IngredientMeasure::new(ingredient, measure))
        })
        .collect();

    MealDetails {
        id: meal.id,
        name: meal.name,
        instructions: meal.instructions.unwrap_or_default().trim().to_string(),
        ingredients,
    }
}

/// Distinct lowercase ingredients in input order, capped.
fn query_ingredients(ingredients: &str) -> Vec<String> {
    let mut wanted: Vec<String> = Vec::new();
    for name in ingredients.split(',').map(|s| s.trim().to_lowercase()) {
        if wanted.len() == MAX_QUERY_INGREDIENTS {
            break;
        }
        if !name.is_empty() && !wanted.contains(&name) {
            wanted.push(name);
        }
    }
    wanted
}

/// Fold per-ingredient hit lists into summaries counting how many query
/// ingredients each meal matched. First-seen order is kept for ties.
fn merge_hits(wanted: &[String], per_ingredient: Vec<(String, Vec<FilterHit>)>) -> Vec<MealSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<(FilterHit, Vec<String>)> = Vec::new();

    for (ingredient, hits) in per_ingredient {
        for hit in hits {
            match index.get(&hit.id) {
                Some(&i) => merged[i].1.push(ingredient.clone()),
                None => {
                    index.insert(hit.id.clone(), merged.len());
                    merged.push((hit, vec![ingredient.clone()]));
                }
            }
        }
    }

    merged
        .into_iter()
        .map(|(hit, used)| {
            let missed: Vec<_> = wanted.iter().filter(|w| !used.contains(w)).collect();
            MealSummary {
                id: hit.id,
                name: hit.name,
                thumbnail: hit.thumbnail,
                used_ingredient_count: used.len() as u32,
                missed_ingredient_count: missed.len() as u32,
                used_ingredients: used.iter().map(|u| IngredientMeasure::new(u, "")).collect(),
                missed_ingredients: missed.iter().map(|m| IngredientMeasure::new(m, "")).collect(),
            }
        })
        .collect()
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct MealDbClient {
    fetcher: JsonFetcher,
}

impl MealDbClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, RecipeError> {
        Ok(Self {
            fetcher: JsonFetcher::new(base_url, timeout_secs)?,
        })
    }

    async fn first_meal(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<MealDetails>, RecipeError> {
        let list: MealList<FullMeal> = self.fetcher.get_json(path, query, self.name()).await?;
        Ok(list.meals.and_then(|m| m.into_iter().next()).map(details))
    }
}

impl RecipeProvider for MealDbClient {
    fn name(&self) -> &'static str {
        "TheMealDB"
    }

    async fn search_by_ingredients(&self, ingredients: &str) -> Result<Vec<MealSummary>, RecipeError> {
        let wanted = query_ingredients(ingredients);
        if wanted.is_empty() {
            return Err(RecipeError::InvalidInput(
                "Please provide some ingredients to search for.".into(),
            ));
        }

        let mut per_ingredient = Vec::with_capacity(wanted.len());
        for ingredient in &wanted {
            let key = ingredient.replace(' ', "_");
            let list: MealList<FilterHit> = self
                .fetcher
                .get_json("/filter.php", &[("i", key.as_str())], self.name())
                .await?;
            per_ingredient.push((ingredient.clone(), list.meals.unwrap_or_default()));
        }

        let meals = merge_hits(&wanted, per_ingredient);
        if meals.is_empty() {
            return Err(RecipeError::NotFound(
                "No meals found with the given ingredients.".into(),
            ));
        }
        Ok(rank_by_used_ingredients(meals, TOP_MEALS))
    }

    async fn meal_details(&self, meal_id: &str) -> Result<MealDetails, RecipeError> {
        let meal_id = meal_id.trim();
        if meal_id.is_empty() {
            return Err(RecipeError::InvalidInput("meal_id is required".into()));
        }
        self.first_meal("/lookup.php", &[("i", meal_id)])
            .await?
            .ok_or_else(|| RecipeError::NotFound(format!("No meal found for id={meal_id}")))
    }

    async fn random_meal(&self) -> Result<MealDetails, RecipeError> {
        self.first_meal("/random.php", &[])
            .await?
            .ok_or_else(|| RecipeError::Malformed("No random meal returned from TheMealDB".into()))
    }
}
