pub mod catalog;
pub mod flyers;
pub mod prices;

pub use catalog::{GroceryCatalog, GroceryError};
pub use flyers::{FlyerCatalog, FlyerDeal, FlyerEntry, FlyerMatch};
pub use prices::{PriceQuote, PriceTable, StandardPrice};
