use coinboard_core::types::Coin;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for coins table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct DbCoin {
    /// Provider coin id (primary key)
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<i32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    /// Provider update time, unix seconds
    pub last_updated: Option<i64>,
}

impl From<&Coin> for DbCoin {
    fn from(coin: &Coin) -> Self {
        Self {
            id: coin.id.clone(),
            symbol: coin.symbol.clone(),
            name: coin.name.clone(),
            image: coin.image.clone(),
            current_price: coin.current_price,
            market_cap: coin.market_cap,
            market_cap_rank: coin.market_cap_rank,
            total_volume: coin.total_volume,
            price_change_percentage_24h: coin.price_change_percentage_24h,
            last_updated: coin.last_updated,
        }
    }
}

impl From<DbCoin> for Coin {
    fn from(row: DbCoin) -> Self {
        Self {
            id: row.id,
            symbol: row.symbol,
            name: row.name,
            image: row.image,
            current_price: row.current_price,
            market_cap: row.market_cap,
            market_cap_rank: row.market_cap_rank,
            total_volume: row.total_volume,
            price_change_percentage_24h: row.price_change_percentage_24h,
            last_updated: row.last_updated,
        }
    }
}
