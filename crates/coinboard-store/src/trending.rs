use coinboard_core::types::TrendingCoin;
use parking_lot::RwLock;

/// Latest trending snapshot
#[derive(Debug, Default)]
pub struct TrendingStore {
    snapshot: RwLock<Vec<TrendingCoin>>,
}

impl TrendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, coins: Vec<TrendingCoin>) {
        *self.snapshot.write() = coins;
    }

    pub fn get(&self) -> Vec<TrendingCoin> {
        self.snapshot.read().clone()
    }
}
