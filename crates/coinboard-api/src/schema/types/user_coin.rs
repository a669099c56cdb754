use async_graphql::SimpleObject;
use coinboard_core::types::UserCoin;

/// GraphQL holding type
#[derive(Debug, Clone, SimpleObject)]
pub struct GqlUserCoin {
    pub user_id: String,
    pub coin_id: String,
    pub amount: f64,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_value: Option<f64>,
    pub updated_at: Option<i64>,
}

impl From<UserCoin> for GqlUserCoin {
    fn from(holding: UserCoin) -> Self {
        Self {
            user_id: holding.user_id,
            coin_id: holding.coin_id,
            amount: holding.amount,
            current_price: holding.current_price,
            price_change_percentage_24h: holding.price_change_percentage_24h,
            total_value: holding.total_value,
            updated_at: holding.updated_at,
        }
    }
}
