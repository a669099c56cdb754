mod coin;
mod trending;
mod user_coin;

pub use coin::DbCoin;
pub use trending::{DbTrendingSnapshot, TRENDING_SNAPSHOT_ID};
pub use user_coin::DbUserCoin;
