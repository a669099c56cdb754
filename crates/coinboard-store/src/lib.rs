mod charts;
mod coins;
mod runs;
mod store;
mod trending;
mod user_coins;

pub use charts::ChartStore;
pub use coins::CoinStore;
pub use runs::{RunRecord, SyncRunLog};
pub use store::MemoryStore;
pub use trending::TrendingStore;
pub use user_coins::UserCoinStore;
