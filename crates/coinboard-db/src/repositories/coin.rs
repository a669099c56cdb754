use crate::models::DbCoin;
use crate::Result;
use sqlx::PgPool;
use std::collections::HashMap;

const COIN_COLUMNS: &str = "id, symbol, name, image, current_price, market_cap, market_cap_rank, \
                            total_volume, price_change_percentage_24h, last_updated";

pub struct CoinRepository;

impl CoinRepository {
    /// Bulk upsert coins keyed by provider id in a single statement.
    ///
    /// Duplicate ids in the input are collapsed (last one wins) since Postgres
    /// refuses to update the same row twice in one `ON CONFLICT` statement.
    pub async fn bulk_upsert(pool: &PgPool, coins: &[DbCoin]) -> Result<usize> {
        if coins.is_empty() {
            return Ok(0);
        }

        let mut by_id: HashMap<&str, &DbCoin> = HashMap::with_capacity(coins.len());
        let mut order: Vec<&str> = Vec::with_capacity(coins.len());
        for coin in coins {
            if by_id.insert(coin.id.as_str(), coin).is_none() {
                order.push(coin.id.as_str());
            }
        }
        let unique: Vec<&DbCoin> = order.iter().map(|id| by_id[id]).collect();

        let ids: Vec<&str> = unique.iter().map(|c| c.id.as_str()).collect();
        let symbols: Vec<&str> = unique.iter().map(|c| c.symbol.as_str()).collect();
        let names: Vec<&str> = unique.iter().map(|c| c.name.as_str()).collect();
        let images: Vec<Option<&str>> = unique.iter().map(|c| c.image.as_deref()).collect();
        let prices: Vec<Option<f64>> = unique.iter().map(|c| c.current_price).collect();
        let market_caps: Vec<Option<f64>> = unique.iter().map(|c| c.market_cap).collect();
        let ranks: Vec<Option<i32>> = unique.iter().map(|c| c.market_cap_rank).collect();
        let volumes: Vec<Option<f64>> = unique.iter().map(|c| c.total_volume).collect();
        let changes: Vec<Option<f64>> = unique
            .iter()
            .map(|c| c.price_change_percentage_24h)
            .collect();
        let last_updated: Vec<Option<i64>> = unique.iter().map(|c| c.last_updated).collect();

        sqlx::query(
            r#"
            INSERT INTO coins (id, symbol, name, image, current_price, market_cap, market_cap_rank,
                               total_volume, price_change_percentage_24h, last_updated)
            SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[], $5::float8[],
                                 $6::float8[], $7::int[], $8::float8[], $9::float8[], $10::bigint[])
            ON CONFLICT (id) DO UPDATE SET
                symbol = EXCLUDED.symbol,
                name = EXCLUDED.name,
                image = EXCLUDED.image,
                current_price = EXCLUDED.current_price,
                market_cap = EXCLUDED.market_cap,
                market_cap_rank = EXCLUDED.market_cap_rank,
                total_volume = EXCLUDED.total_volume,
                price_change_percentage_24h = EXCLUDED.price_change_percentage_24h,
                last_updated = EXCLUDED.last_updated,
                synced_at = NOW()
            "#,
        )
        .bind(&ids)
        .bind(&symbols)
        .bind(&names)
        .bind(&images)
        .bind(&prices)
        .bind(&market_caps)
        .bind(&ranks)
        .bind(&volumes)
        .bind(&changes)
        .bind(&last_updated)
        .execute(pool)
        .await?;

        Ok(unique.len())
    }

    pub async fn get_by_id(pool: &PgPool, id: &str) -> Result<Option<DbCoin>> {
        let query = format!("SELECT {} FROM coins WHERE id = $1", COIN_COLUMNS);
        let result = sqlx::query_as::<_, DbCoin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(result)
    }

    /// Coins ordered by market cap rank (unranked last)
    pub async fn get_all(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<DbCoin>> {
        let query = format!(
            "SELECT {} FROM coins ORDER BY market_cap_rank ASC NULLS LAST, id ASC LIMIT $1 OFFSET $2",
            COIN_COLUMNS
        );
        let results = sqlx::query_as::<_, DbCoin>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(results)
    }

    /// Ids of the best ranked coins
    pub async fn top_ids_by_rank(pool: &PgPool, limit: i64) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT id FROM coins
            WHERE market_cap_rank IS NOT NULL
            ORDER BY market_cap_rank ASC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
