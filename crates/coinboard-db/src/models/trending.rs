use coinboard_core::types::TrendingCoin;
use sqlx::types::Json;
use sqlx::FromRow;

/// Key of the single trending snapshot row
pub const TRENDING_SNAPSHOT_ID: &str = "main";

/// Database model for trending_snapshots table
#[derive(Debug, Clone, FromRow)]
pub struct DbTrendingSnapshot {
    pub id: String,
    pub coins: Json<Vec<TrendingCoin>>,
}
