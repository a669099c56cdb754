use async_trait::async_trait;
use coinboard_core::types::{Coin, DayWindow, MarketChart, TrendingCoin, UserCoin};
use coinboard_core::{Result, SyncError};
use coinboard_db::models::DbCoin;
use coinboard_db::repositories::{
    CoinRepository, MarketChartRepository, TrendingRepository, UserCoinRepository,
};
use coinboard_db::DatabasePool;
use coinboard_store::MemoryStore;
use std::sync::Arc;

/// Persistence used by the sync actions and the read API
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Insert-or-update coins keyed by id, returns rows written
    async fn upsert_coins(&self, coins: &[Coin]) -> Result<usize>;

    async fn get_coin(&self, id: &str) -> Result<Option<Coin>>;

    async fn list_coins(&self, limit: usize, offset: usize) -> Result<Vec<Coin>>;

    /// Ids of the best ranked coins
    async fn top_coin_ids(&self, limit: usize) -> Result<Vec<String>>;

    /// Write one window of a coin's chart; the coin must exist
    async fn upsert_market_chart(
        &self,
        coin_id: &str,
        window: DayWindow,
        chart: &MarketChart,
    ) -> Result<()>;

    async fn get_market_chart(&self, coin_id: &str, window: DayWindow)
        -> Result<Option<MarketChart>>;

    async fn replace_trending(&self, coins: &[TrendingCoin]) -> Result<()>;

    async fn get_trending(&self) -> Result<Vec<TrendingCoin>>;

    async fn user_coin_ids(&self, user_id: &str) -> Result<Vec<String>>;

    async fn get_user_coins(&self, user_id: &str) -> Result<Vec<UserCoin>>;

    /// Recompute derived data of every holding of `coin`, returns holdings touched
    async fn refresh_user_coins(&self, coin: &Coin, now: i64) -> Result<u64>;

    /// Liveness check of the backing storage
    async fn health(&self) -> Result<()>;
}

/// PostgreSQL-backed store
pub struct PgMarketStore {
    db: Arc<DatabasePool>,
}

impl PgMarketStore {
    pub fn new(db: Arc<DatabasePool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MarketStore for PgMarketStore {
    async fn upsert_coins(&self, coins: &[Coin]) -> Result<usize> {
        let rows: Vec<DbCoin> = coins.iter().map(DbCoin::from).collect();
        Ok(CoinRepository::bulk_upsert(self.db.inner(), &rows).await?)
    }

    async fn get_coin(&self, id: &str) -> Result<Option<Coin>> {
        let row = CoinRepository::get_by_id(self.db.inner(), id).await?;
        Ok(row.map(Coin::from))
    }

    async fn list_coins(&self, limit: usize, offset: usize) -> Result<Vec<Coin>> {
        let rows = CoinRepository::get_all(self.db.inner(), limit as i64, offset as i64).await?;
        Ok(rows.into_iter().map(Coin::from).collect())
    }

    async fn top_coin_ids(&self, limit: usize) -> Result<Vec<String>> {
        Ok(CoinRepository::top_ids_by_rank(self.db.inner(), limit as i64).await?)
    }

    async fn upsert_market_chart(
        &self,
        coin_id: &str,
        window: DayWindow,
        chart: &MarketChart,
    ) -> Result<()> {
        Ok(MarketChartRepository::upsert_window(self.db.inner(), coin_id, window, chart).await?)
    }

    async fn get_market_chart(
        &self,
        coin_id: &str,
        window: DayWindow,
    ) -> Result<Option<MarketChart>> {
        Ok(MarketChartRepository::get_window(self.db.inner(), coin_id, window).await?)
    }

    async fn replace_trending(&self, coins: &[TrendingCoin]) -> Result<()> {
        Ok(TrendingRepository::upsert(self.db.inner(), coins).await?)
    }

    async fn get_trending(&self) -> Result<Vec<TrendingCoin>> {
        Ok(TrendingRepository::get_latest(self.db.inner()).await?)
    }

    async fn user_coin_ids(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(UserCoinRepository::coin_ids_for_user(self.db.inner(), user_id).await?)
    }

    async fn get_user_coins(&self, user_id: &str) -> Result<Vec<UserCoin>> {
        let rows = UserCoinRepository::get_by_user(self.db.inner(), user_id).await?;
        Ok(rows.into_iter().map(UserCoin::from).collect())
    }

    async fn refresh_user_coins(&self, coin: &Coin, now: i64) -> Result<u64> {
        Ok(UserCoinRepository::refresh_for_coin(self.db.inner(), &DbCoin::from(coin), now).await?)
    }

    async fn health(&self) -> Result<()> {
        Ok(self.db.health_check().await?)
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn upsert_coins(&self, coins: &[Coin]) -> Result<usize> {
        Ok(self.coins.upsert_many(coins.iter().cloned()))
    }

    async fn get_coin(&self, id: &str) -> Result<Option<Coin>> {
        Ok(self.coins.get(id))
    }

    async fn list_coins(&self, limit: usize, offset: usize) -> Result<Vec<Coin>> {
        Ok(self.coins.ranked().into_iter().skip(offset).take(limit).collect())
    }

    async fn top_coin_ids(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self.coins.top_ids_by_rank(limit))
    }

    async fn upsert_market_chart(
        &self,
        coin_id: &str,
        window: DayWindow,
        chart: &MarketChart,
    ) -> Result<()> {
        if !self.coins.contains(coin_id) {
            return Err(SyncError::Database(format!(
                "market chart references unknown coin {}",
                coin_id
            )));
        }
        self.charts.upsert(coin_id, window, chart.clone());
        Ok(())
    }

    async fn get_market_chart(
        &self,
        coin_id: &str,
        window: DayWindow,
    ) -> Result<Option<MarketChart>> {
        Ok(self.charts.get(coin_id, window))
    }

    async fn replace_trending(&self, coins: &[TrendingCoin]) -> Result<()> {
        self.trending.replace(coins.to_vec());
        Ok(())
    }

    async fn get_trending(&self) -> Result<Vec<TrendingCoin>> {
        Ok(self.trending.get())
    }

    async fn user_coin_ids(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self.user_coins.coin_ids_for_user(user_id))
    }

    async fn get_user_coins(&self, user_id: &str) -> Result<Vec<UserCoin>> {
        Ok(self.user_coins.get_by_user(user_id))
    }

    async fn refresh_user_coins(&self, coin: &Coin, now: i64) -> Result<u64> {
        Ok(self.user_coins.refresh_for_coin(coin, now))
    }

    async fn health(&self) -> Result<()> {
        Ok(())
    }
}
