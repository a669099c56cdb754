mod chart;
mod coin;
mod trending;
mod user_coin;

pub use chart::{ChartPoint, DayWindow, MarketChart};
pub use coin::Coin;
pub use trending::TrendingCoin;
pub use user_coin::UserCoin;

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds since Unix epoch
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
