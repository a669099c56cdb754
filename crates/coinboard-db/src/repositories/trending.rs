use crate::models::{DbTrendingSnapshot, TRENDING_SNAPSHOT_ID};
use crate::Result;
use coinboard_core::types::TrendingCoin;
use sqlx::types::Json;
use sqlx::PgPool;

pub struct TrendingRepository;

impl TrendingRepository {
    /// Replace the trending snapshot
    pub async fn upsert(pool: &PgPool, coins: &[TrendingCoin]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO trending_snapshots (id, coins, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO UPDATE SET
                coins = EXCLUDED.coins,
                updated_at = NOW()
            "#,
        )
        .bind(TRENDING_SNAPSHOT_ID)
        .bind(Json(coins))
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn get_latest(pool: &PgPool) -> Result<Vec<TrendingCoin>> {
        let result = sqlx::query_as::<_, DbTrendingSnapshot>(
            "SELECT id, coins FROM trending_snapshots WHERE id = $1",
        )
        .bind(TRENDING_SNAPSHOT_ID)
        .fetch_optional(pool)
        .await?;
        Ok(result.map(|snapshot| snapshot.coins.0).unwrap_or_default())
    }
}
