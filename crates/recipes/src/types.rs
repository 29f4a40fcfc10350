use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientMeasure {
    pub ingredient: String,
    pub measure: String,
}

impl IngredientMeasure {
    pub fn new(ingredient: &str, measure: &str) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            measure: measure.to_string(),
        }
    }
}

/// One search hit, in the shape agents already know from TheMealDB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: Option<String>,
    #[serde(rename = "usedIngredientCount")]
    pub used_ingredient_count: u32,
    #[serde(rename = "missedIngredientCount")]
    pub missed_ingredient_count: u32,
    #[serde(rename = "usedIngredients")]
    pub used_ingredients: Vec<IngredientMeasure>,
    #[serde(rename = "missedIngredients")]
    pub missed_ingredients: Vec<IngredientMeasure>,
}

/// Full recipe: ingredients with measures plus instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDetails {
    #[serde(rename = "idMeal")]
    pub id: String,
    pub name: Option<String>,
    pub instructions: String,
    pub ingredients: Vec<IngredientMeasure>,
}

/// Keep the `limit` hits using the most query ingredients. Ties keep upstream order.
pub(crate) fn rank_by_used_ingredients(mut meals: Vec<MealSummary>, limit: usize) -> Vec<MealSummary> {
    meals.sort_by(|a, b| b.used_ingredient_count.cmp(&a.used_ingredient_count));
    meals.truncate(limit);
    meals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, used: u32) -> MealSummary {
        MealSummary {
            id: id.to_string(),
            name: None,
            thumbnail: None,
            used_ingredient_count: used,
            missed_ingredient_count: 0,
            used_ingredients: vec![],
            missed_ingredients: vec![],
        }
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let ranked = rank_by_used_ingredients(
            vec![hit("a", 1), hit("b", 3), hit("c", 2), hit("d", 3)],
            3,
        );
        let ids: Vec<_> = ranked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b", "d", "c"]);
    }

    #[test]
    fn summary_uses_mealdb_field_names() {
        let json = serde_json::to_value(hit("42", 2)).unwrap();
        assert_eq!(json["idMeal"], "42");
        assert_eq!(json["usedIngredientCount"], 2);
        assert!(json.get("strMeal").is_some());
    }
}
