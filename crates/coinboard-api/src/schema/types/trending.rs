use async_graphql::SimpleObject;
use coinboard_core::types::TrendingCoin;

#[derive(Debug, Clone, SimpleObject)]
pub struct GqlTrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<i32>,
    pub thumb: Option<String>,
    pub score: i32,
}

impl From<TrendingCoin> for GqlTrendingCoin {
    fn from(coin: TrendingCoin) -> Self {
        Self {
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol,
            market_cap_rank: coin.market_cap_rank,
            thumb: coin.thumb,
            score: coin.score,
        }
    }
}
