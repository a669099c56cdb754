mod chart;
mod coin;
mod status;
mod trending;
mod user_coin;

pub use chart::{GqlChartPoint, GqlMarketChart, WindowInput};
pub use coin::GqlCoin;
pub use status::GqlSyncStatus;
pub use trending::GqlTrendingCoin;
pub use user_coin::GqlUserCoin;
