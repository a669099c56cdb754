use crate::models::{DbCoin, DbUserCoin};
use crate::Result;
use sqlx::PgPool;

pub struct UserCoinRepository;

impl UserCoinRepository {
    /// Coin ids held by a user
    pub async fn coin_ids_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT coin_id FROM user_coins WHERE user_id = $1 ORDER BY coin_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn get_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<DbUserCoin>> {
        let results = sqlx::query_as::<_, DbUserCoin>(
            r#"
            SELECT user_id, coin_id, amount, current_price, price_change_percentage_24h,
                   total_value, updated_at
            FROM user_coins
            WHERE user_id = $1
            ORDER BY total_value DESC NULLS LAST, coin_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    /// Recompute derived market data of every holding of `coin`.
    /// Returns the number of holdings touched.
    pub async fn refresh_for_coin(pool: &PgPool, coin: &DbCoin, now: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE user_coins SET
                current_price = $2::float8,
                price_change_percentage_24h = $3::float8,
                total_value = amount * $2::float8,
                updated_at = $4
            WHERE coin_id = $1
            "#,
        )
        .bind(&coin.id)
        .bind(coin.current_price)
        .bind(coin.price_change_percentage_24h)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
