pub mod auth;
pub mod config;
pub mod logging;

pub use auth::{create_token, TokenVerifier};
pub use config::{Config, StorageBackend};
pub use logging::init_logging;
