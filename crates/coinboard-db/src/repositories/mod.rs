mod coin;
mod market_chart;
mod trending;
mod user_coin;

pub use coin::CoinRepository;
pub use market_chart::MarketChartRepository;
pub use trending::TrendingRepository;
pub use user_coin::UserCoinRepository;
