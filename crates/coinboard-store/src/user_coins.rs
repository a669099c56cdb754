use coinboard_core::types::{Coin, UserCoin};
use dashmap::DashMap;

/// Holdings keyed by (user id, coin id)
#[derive(Debug)]
pub struct UserCoinStore {
    holdings: DashMap<(String, String), UserCoin>,
}

impl UserCoinStore {
    pub fn new() -> Self {
        Self {
            holdings: DashMap::new(),
        }
    }

    /// Insert a holding or change its amount
    pub fn upsert(&self, user_id: &str, coin_id: &str, amount: f64) {
        self.holdings
            .entry((user_id.to_string(), coin_id.to_string()))
            .and_modify(|h| {
                h.amount = amount;
                h.total_value = h.current_price.map(|p| p * amount);
            })
            .or_insert_with(|| UserCoin::new(user_id, coin_id, amount));
    }

    pub fn coin_ids_for_user(&self, user_id: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .holdings
            .iter()
            .filter(|e| e.key().0 == user_id)
            .map(|e| e.key().1.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn get_by_user(&self, user_id: &str) -> Vec<UserCoin> {
        let mut holdings: Vec<UserCoin> = self
            .holdings
            .iter()
            .filter(|e| e.key().0 == user_id)
            .map(|e| e.value().clone())
            .collect();
        holdings.sort_by(|a, b| a.coin_id.cmp(&b.coin_id));
        holdings
    }

    /// Apply the coin's market data to every holder, returns rows touched
    pub fn refresh_for_coin(&self, coin: &Coin, now: i64) -> u64 {
        let mut touched = 0;
        for mut entry in self.holdings.iter_mut() {
            if entry.key().1 == coin.id {
                entry.value_mut().apply_market_data(coin, now);
                touched += 1;
            }
        }
        touched
    }

    pub fn count(&self) -> usize {
        self.holdings.len()
    }
}

impl Default for UserCoinStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_for_coin_only_touches_holders() {
        let store = UserCoinStore::new();
        store.upsert("alice", "bitcoin", 2.0);
        store.upsert("bob", "bitcoin", 0.5);
        store.upsert("bob", "ethereum", 3.0);

        let mut bitcoin = Coin::new("bitcoin", "btc", "Bitcoin");
        bitcoin.current_price = Some(100.0);

        assert_eq!(store.refresh_for_coin(&bitcoin, 7), 2);

        let bob = store.get_by_user("bob");
        assert_eq!(bob.len(), 2);
        assert_eq!(bob[0].coin_id, "bitcoin");
        assert_eq!(bob[0].total_value, Some(50.0));
        assert_eq!(bob[1].total_value, None);
    }

    #[test]
    fn test_upsert_updates_amount() {
        let store = UserCoinStore::new();
        store.upsert("alice", "bitcoin", 2.0);

        let mut bitcoin = Coin::new("bitcoin", "btc", "Bitcoin");
        bitcoin.current_price = Some(10.0);
        store.refresh_for_coin(&bitcoin, 1);

        store.upsert("alice", "bitcoin", 3.0);
        let holding = &store.get_by_user("alice")[0];
        assert_eq!(holding.amount, 3.0);
        assert_eq!(holding.total_value, Some(30.0));
        assert_eq!(store.count(), 1);
    }
}
