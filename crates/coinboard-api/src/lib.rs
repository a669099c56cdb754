pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod schema;
pub mod server;

pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::{router, AppState};
pub use server::ApiServer;

pub type Result<T> = std::result::Result<T, ApiError>;
