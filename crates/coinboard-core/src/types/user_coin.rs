use super::Coin;
use serde::{Deserialize, Serialize};

/// A user's holding of one coin plus market data derived from that coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCoin {
    pub user_id: String,
    pub coin_id: String,
    pub amount: f64,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    /// `amount * current_price`
    pub total_value: Option<f64>,
    pub updated_at: Option<i64>,
}

impl UserCoin {
    pub fn new(user_id: impl Into<String>, coin_id: impl Into<String>, amount: f64) -> Self {
        Self {
            user_id: user_id.into(),
            coin_id: coin_id.into(),
            amount,
            current_price: None,
            price_change_percentage_24h: None,
            total_value: None,
            updated_at: None,
        }
    }

    /// Recompute derived fields from the coin's latest snapshot
    pub fn apply_market_data(&mut self, coin: &Coin, now: i64) {
        debug_assert_eq!(self.coin_id, coin.id);
        self.current_price = coin.current_price;
        self.price_change_percentage_24h = coin.price_change_percentage_24h;
        self.total_value = coin.current_price.map(|price| price * self.amount);
        self.updated_at = Some(now);
    }
}
