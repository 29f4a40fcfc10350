use larder_core::{
    envelope, success_or_error, InventoryItem, InventoryRecord, LarderConfig, ToolError, ToolStatus,
};
use larder_grocery::{FlyerMatch, GroceryCatalog, PriceQuote};
use larder_ocr::ReceiptParser;
use larder_recipes::{MealDetails, MealSummary, RecipeClient, RecipeProvider};
use larder_storage::{DbPool, DEFAULT_LIST_LIMIT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

pub const TOOL_PARSE_RECEIPT_TEXT: &str = "parse_receipt_text";
pub const TOOL_INSERT_INVENTORY_ITEMS: &str = "insert_inventory_items";
pub const TOOL_LIST_INVENTORY_ITEMS: &str = "list_inventory_items";
pub const TOOL_SEARCH_MEALS: &str = "search_meals";
pub const TOOL_GET_MEAL_DETAILS: &str = "get_meal_details";
pub const TOOL_GET_RANDOM_MEAL: &str = "get_random_meal";
pub const TOOL_CHECK_LOCAL_FLYERS: &str = "check_local_flyers";
pub const TOOL_GET_STANDARD_PRICE: &str = "get_standard_price";

const DEFAULT_LOCATION: &str = "Ottawa";

// ── Arguments ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ParseReceiptArgs {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct InsertArgs {
    #[serde(default)]
    items: Vec<InventoryItem>,
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

#[derive(Debug, Deserialize)]
struct SearchMealsArgs {
    ingredient: Option<String>,
    /// Diet filter; accepted, not forwarded.
    category: Option<String>,
    /// Cuisine filter; accepted, not forwarded.
    area: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MealIdArgs {
    #[serde(default)]
    meal_id: Value,
}

#[derive(Debug, Deserialize)]
struct FlyerArgs {
    #[serde(default)]
    item_name: String,
    #[serde(default = "default_location")]
    location: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

#[derive(Debug, Deserialize)]
struct PriceArgs {
    #[serde(default)]
    item_name: String,
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| ToolError::Input(format!("Invalid arguments: {e}")))
}

// ── Replies ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ReceiptReply {
    count: usize,
    items: Vec<InventoryItem>,
    skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
struct InsertReply {
    inserted: u64,
}

#[derive(Debug, Serialize)]
struct ListReply {
    count: usize,
    rows: Vec<InventoryRecord>,
}

#[derive(Debug, Serialize)]
struct SearchReply {
    count: usize,
    meals: Vec<MealSummary>,
}

#[derive(Debug, Serialize)]
struct MealReply {
    meal: MealDetails,
}

fn store_error(e: impl fmt::Display) -> ToolError {
    tracing::error!("SQLite error: {e}");
    ToolError::Upstream(format!("SQLite error: {e}"))
}

// ── Toolbox ──────────────────────────────────────────────────────────────────

/// Every tool the server exposes, with the collaborators they need.
pub struct Toolbox {
    db: Option<DbPool>,
    recipes: RecipeClient,
    grocery: GroceryCatalog,
}

impl Toolbox {
    pub fn new(db: Option<DbPool>, recipes: RecipeClient, grocery: GroceryCatalog) -> Self {
        Self { db, recipes, grocery }
    }

    pub async fn from_config(config: &LarderConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let db = match &config.db_path {
            Some(path) => Some(
                larder_storage::create_db(path)
                    .await
                    .with_context(|| format!("Failed to open inventory database {}", path.display()))?,
            ),
            None => {
                tracing::warn!("No db_path configured; inventory tools will report an error");
                None
            }
        };
        let recipes = RecipeClient::from_config(&config.recipes).context("Failed to build recipe client")?;
        let grocery = GroceryCatalog::load_or_builtin(config.grocery.catalog_path.as_deref())
            .context("Failed to load grocery catalog")?;

        Ok(Self::new(db, recipes, grocery))
    }

    /// Dispatch a tool call. `None` when no tool has that name.
    pub async fn call(&self, name: &str, arguments: Value) -> Option<Value> {
        tracing::debug!("Tool call {name}: {arguments}");
        let reply = match name {
            TOOL_PARSE_RECEIPT_TEXT => success_or_error(self.parse_receipt_text(arguments)),
            TOOL_INSERT_INVENTORY_ITEMS => success_or_error(self.insert_inventory_items(arguments).await),
            TOOL_LIST_INVENTORY_ITEMS => success_or_error(self.list_inventory_items(arguments).await),
            TOOL_SEARCH_MEALS => success_or_error(self.search_meals(arguments).await),
            TOOL_GET_MEAL_DETAILS => success_or_error(self.get_meal_details(arguments).await),
            TOOL_GET_RANDOM_MEAL => success_or_error(self.get_random_meal().await),
            TOOL_CHECK_LOCAL_FLYERS => success_or_error(self.check_local_flyers(arguments)),
            TOOL_GET_STANDARD_PRICE => match self.get_standard_price(arguments) {
                Ok(quote) if quote.is_estimate() => envelope(ToolStatus::Estimate, Ok(quote)),
                other => success_or_error(other),
            },
            _ => return None,
        };
        tracing::info!("Tool {name} finished with status {}", reply["status"]);
        Some(reply)
    }

    fn pool(&self) -> Result<&DbPool, ToolError> {
        self.db
            .as_ref()
            .ok_or_else(|| ToolError::Input("Missing db_path in configuration.".into()))
    }

    fn parse_receipt_text(&self, arguments: Value) -> Result<ReceiptReply, ToolError> {
        let args: ParseReceiptArgs = parse_args(arguments)?;
        let parsed = ReceiptParser::parse(&args.text)?;
        Ok(ReceiptReply {
            count: parsed.count(),
            items: parsed.items,
            skipped: parsed.skipped,
        })
    }

    async fn insert_inventory_items(&self, arguments: Value) -> Result<InsertReply, ToolError> {
        let pool = self.pool()?;
        let args: InsertArgs = parse_args(arguments)?;
        if args.items.is_empty() {
            return Err(ToolError::Input("No items provided.".into()));
        }
        if let Some(i) = args.items.iter().position(|item| !item.has_product_name()) {
            return Err(ToolError::Input(format!("Item {i} has an empty product_name.")));
        }

        let inserted = larder_storage::insert_inventory_items(pool, &args.items)
            .await
            .map_err(store_error)?;
        Ok(InsertReply { inserted })
    }

    async fn list_inventory_items(&self, arguments: Value) -> Result<ListReply, ToolError> {
        let pool = self.pool()?;
        let args: ListArgs = parse_args(arguments)?;
        if args.limit < 1 {
            return Err(ToolError::Input("limit must be at least 1.".into()));
        }

        let rows = larder_storage::list_inventory_items(pool, args.limit)
            .await
            .map_err(store_error)?;
        Ok(ListReply { count: rows.len(), rows })
    }

    async fn search_meals(&self, arguments: Value) -> Result<SearchReply, ToolError> {
        let args: SearchMealsArgs = parse_args(arguments)?;
        if args.category.is_some() || args.area.is_some() {
            tracing::debug!(
                "Ignoring category={:?} area={:?} for {}",
                args.category,
                args.area,
                self.recipes.name()
            );
        }
        let ingredient = args.ingredient.unwrap_or_default();
        let meals = self.recipes.search_by_ingredients(&ingredient).await?;
        Ok(SearchReply { count: meals.len(), meals })
    }

    async fn get_meal_details(&self, arguments: Value) -> Result<MealReply, ToolError> {
        let args: MealIdArgs = parse_args(arguments)?;
        let meal_id = match args.meal_id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let meal = self.recipes.meal_details(&meal_id).await?;
        Ok(MealReply { meal })
    }

    async fn get_random_meal(&self) -> Result<MealReply, ToolError> {
        let meal = self.recipes.random_meal().await?;
        Ok(MealReply { meal })
    }

    fn check_local_flyers(&self, arguments: Value) -> Result<FlyerMatch, ToolError> {
        let args: FlyerArgs = parse_args(arguments)?;
        Ok(self.grocery.flyers.check_local_flyers(&args.item_name, &args.location)?)
    }

    fn get_standard_price(&self, arguments: Value) -> Result<PriceQuote, ToolError> {
        let args: PriceArgs = parse_args(arguments)?;
        Ok(self.grocery.prices.standard_price(&args.item_name)?)
    }
}

// ── Definitions ──────────────────────────────────────────────────────────────

pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": TOOL_PARSE_RECEIPT_TEXT,
            "description": "Parse OCR receipt text into inventory items (product_name, quantity, quantity_unit, unit).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "text": {"type": "string", "description": "Newline-separated OCR output."},
                    "config": {"type": "object", "description": "Reserved; ignored by the parser."}
                },
                "required": ["text"]
            }
        }),
        json!({
            "name": TOOL_INSERT_INVENTORY_ITEMS,
            "description": "Insert inventory rows into the inventory table.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "items": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "properties": {
                                "product_name": {"type": "string"},
                                "quantity": {"type": "number", "default": 1},
                                "quantity_unit": {"type": "string", "default": "unit"},
                                "unit": {"type": ["string", "null"]}
                            },
                            "required": ["product_name"]
                        }
                    }
                },
                "required": ["items"]
            }
        }),
        json!({
            "name": TOOL_LIST_INVENTORY_ITEMS,
            "description": "Return the most recent inventory rows, newest first.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "minimum": 1, "default": DEFAULT_LIST_LIMIT}
                }
            }
        }),
        json!({
            "name": TOOL_SEARCH_MEALS,
            "description": "Find the top 3 meals that use the most of the given ingredients.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "ingredient": {"type": "string", "description": "Comma-separated ingredients."},
                    "category": {"type": "string", "description": "Diet (currently unused)."},
                    "area": {"type": "string", "description": "Cuisine (currently unused)."}
                },
                "required": ["ingredient"]
            }
        }),
        json!({
            "name": TOOL_GET_MEAL_DETAILS,
            "description": "Look up full meal details (ingredients and instructions) by id.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "meal_id": {"type": ["string", "integer"]}
                },
                "required": ["meal_id"]
            }
        }),
        json!({
            "name": TOOL_GET_RANDOM_MEAL,
            "description": "Get a random meal recipe.",
            "inputSchema": {"type": "object", "properties": {}}
        }),
        json!({
            "name": TOOL_CHECK_LOCAL_FLYERS,
            "description": "Search this week's local grocery flyers for deals on an item.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_name": {"type": "string", "description": "Grocery item, e.g. \"chicken\"."},
                    "location": {"type": "string", "default": DEFAULT_LOCATION}
                },
                "required": ["item_name"]
            }
        }),
        json!({
            "name": TOOL_GET_STANDARD_PRICE,
            "description": "Get the average market price for an item when it is not on sale.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_name": {"type": "string"}
                },
                "required": ["item_name"]
            }
        }),
    ]
}
