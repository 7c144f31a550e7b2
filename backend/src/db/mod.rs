pub mod connection;
pub mod migrations;
pub mod store;
pub mod postgres;
pub mod memory;
pub mod swipes;
pub mod matches;
pub mod profiles;

pub use connection::{get_db_pool, DatabaseConfig};
pub use memory::MemorySwipeStore;
pub use postgres::PgSwipeStore;
pub use store::{MaterializedMatch, StoreError, SwipeRecord, SwipeStore};
