use async_graphql::SimpleObject;
use coinboard_core::types::Coin;

/// GraphQL Coin type
#[derive(Debug, Clone, SimpleObject)]
pub struct GqlCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<i32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub last_updated: Option<i64>,
}

impl From<Coin> for GqlCoin {
    fn from(coin: Coin) -> Self {
        Self {
            id: coin.id,
            symbol: coin.symbol,
            name: coin.name,
            image: coin.image,
            current_price: coin.current_price,
            market_cap: coin.market_cap,
            market_cap_rank: coin.market_cap_rank,
            total_volume: coin.total_volume,
            price_change_percentage_24h: coin.price_change_percentage_24h,
            last_updated: coin.last_updated,
        }
    }
}
