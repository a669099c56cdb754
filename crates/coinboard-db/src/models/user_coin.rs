use coinboard_core::types::UserCoin;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for user_coins table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbUserCoin {
    pub user_id: String,
    pub coin_id: String,
    pub amount: f64,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_value: Option<f64>,
    pub updated_at: Option<i64>,
}

impl From<DbUserCoin> for UserCoin {
    fn from(row: DbUserCoin) -> Self {
        Self {
            user_id: row.user_id,
            coin_id: row.coin_id,
            amount: row.amount,
            current_price: row.current_price,
            price_change_percentage_24h: row.price_change_percentage_24h,
            total_value: row.total_value,
            updated_at: row.updated_at,
        }
    }
}
