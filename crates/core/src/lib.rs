pub mod config;
pub mod inventory;
pub mod quantity;
pub mod status;

pub use config::{ConfigError, GroceryConfig, LarderConfig, RecipeConfig, RecipeProviderKind};
pub use inventory::{InventoryItem, InventoryRecord};
pub use quantity::{Quantity, QuantityUnit};
pub use status::{envelope, success_or_error, ToolError, ToolStatus};
