use crate::Result;
use coinboard_core::types::{DayWindow, MarketChart};
use sqlx::types::Json;
use sqlx::PgPool;

pub struct MarketChartRepository;

impl MarketChartRepository {
    /// Write one window's series, leaving the other windows untouched
    pub async fn upsert_window(
        pool: &PgPool,
        coin_id: &str,
        window: DayWindow,
        chart: &MarketChart,
    ) -> Result<()> {
        let column = window.column_name();
        let query = format!(
            r#"
            INSERT INTO market_charts (coin_id, {column}, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (coin_id) DO UPDATE SET
                {column} = EXCLUDED.{column},
                updated_at = NOW()
            "#
        );

        sqlx::query(&query)
            .bind(coin_id)
            .bind(Json(chart))
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn get_window(
        pool: &PgPool,
        coin_id: &str,
        window: DayWindow,
    ) -> Result<Option<MarketChart>> {
        let query = format!(
            "SELECT {} FROM market_charts WHERE coin_id = $1",
            window.column_name()
        );
        let row: Option<(Option<Json<MarketChart>>,)> = sqlx::query_as(&query)
            .bind(coin_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.and_then(|(chart,)| chart).map(|json| json.0))
    }
}
