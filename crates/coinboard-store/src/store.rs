use std::sync::Arc;

use crate::charts::ChartStore;
use crate::coins::CoinStore;
use crate::trending::TrendingStore;
use crate::user_coins::UserCoinStore;

/// Thread-safe in-memory market data store, used when no database is configured
#[derive(Debug)]
pub struct MemoryStore {
    pub coins: Arc<CoinStore>,
    pub charts: Arc<ChartStore>,
    pub trending: Arc<TrendingStore>,
    pub user_coins: Arc<UserCoinStore>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            coins: Arc::new(CoinStore::new()),
            charts: Arc::new(ChartStore::new()),
            trending: Arc::new(TrendingStore::new()),
            user_coins: Arc::new(UserCoinStore::new()),
        }
    }

    /// Add a holding, refusing coins the store does not know
    pub fn add_user_coin(&self, user_id: &str, coin_id: &str, amount: f64) -> bool {
        if !self.coins.contains(coin_id) {
            return false;
        }
        self.user_coins.upsert(user_id, coin_id, amount);
        true
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
