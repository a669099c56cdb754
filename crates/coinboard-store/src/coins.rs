use coinboard_core::types::Coin;
use dashmap::DashMap;
use tracing::debug;

/// Coins keyed by provider id
#[derive(Debug)]
pub struct CoinStore {
    coins: DashMap<String, Coin>,
}

impl CoinStore {
    pub fn new() -> Self {
        Self {
            coins: DashMap::new(),
        }
    }

    /// Insert or replace coins, returns how many were written
    pub fn upsert_many(&self, coins: impl IntoIterator<Item = Coin>) -> usize {
        let mut count = 0;
        for coin in coins {
            self.coins.insert(coin.id.clone(), coin);
            count += 1;
        }
        debug!(
            upserted = count,
            total_coins = self.coins.len(),
            "Upserted coins into memory store"
        );
        count
    }

    pub fn get(&self, id: &str) -> Option<Coin> {
        self.coins.get(id).map(|c| c.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.coins.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.coins.len()
    }

    /// All coins ordered by market cap rank, unranked last
    pub fn ranked(&self) -> Vec<Coin> {
        let mut coins: Vec<Coin> = self.coins.iter().map(|e| e.value().clone()).collect();
        coins.sort_by(|a, b| {
            let rank_a = a.market_cap_rank.unwrap_or(i32::MAX);
            let rank_b = b.market_cap_rank.unwrap_or(i32::MAX);
            rank_a.cmp(&rank_b).then_with(|| a.id.cmp(&b.id))
        });
        coins
    }

    /// Ids of the best ranked coins; unranked coins are never selected
    pub fn top_ids_by_rank(&self, limit: usize) -> Vec<String> {
        self.ranked()
            .into_iter()
            .filter(|c| c.market_cap_rank.is_some())
            .take(limit)
            .map(|c| c.id)
            .collect()
    }
}

impl Default for CoinStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(id: &str, rank: Option<i32>) -> Coin {
        let mut coin = Coin::new(id, id, id);
        coin.market_cap_rank = rank;
        coin
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let store = CoinStore::new();
        store.upsert_many(vec![ranked("bitcoin", Some(1)), ranked("ethereum", Some(2))]);

        let mut updated = ranked("bitcoin", Some(1));
        updated.current_price = Some(65000.0);
        store.upsert_many(vec![updated]);

        assert_eq!(store.count(), 2);
        assert_eq!(store.get("bitcoin").unwrap().current_price, Some(65000.0));
    }

    #[test]
    fn test_top_ids_by_rank() {
        let store = CoinStore::new();
        store.upsert_many(vec![
            ranked("solana", Some(5)),
            ranked("unranked", None),
            ranked("bitcoin", Some(1)),
            ranked("ethereum", Some(2)),
        ]);

        assert_eq!(store.top_ids_by_rank(2), vec!["bitcoin", "ethereum"]);
        assert_eq!(store.top_ids_by_rank(10).len(), 3);
        assert_eq!(store.ranked().last().unwrap().id, "unranked");
    }
}
