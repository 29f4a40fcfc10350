pub mod db;

pub use db::{create_db, insert_inventory_items, list_inventory_items, DbPool, DEFAULT_LIST_LIMIT};
