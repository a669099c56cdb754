pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CronConfig, ProviderConfig, SchedulerConfig, SyncConfig};
pub use error::{Result, SyncError};
