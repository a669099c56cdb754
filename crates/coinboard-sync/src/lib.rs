mod actions;
mod provider;
mod scheduler;
mod store;

pub use actions::{SyncActions, Synchronizer};
pub use provider::{CoinGeckoClient, MarketDataProvider};
pub use scheduler::SyncScheduler;
pub use store::{MarketStore, PgMarketStore};
