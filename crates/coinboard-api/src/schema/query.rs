use async_graphql::{Context, Object, Result};
use coinboard_core::types::DayWindow;
use coinboard_store::SyncRunLog;
use coinboard_sync::MarketStore;
use std::sync::Arc;

use super::types::{
    GqlCoin, GqlMarketChart, GqlSyncStatus, GqlTrendingCoin, GqlUserCoin, WindowInput,
};

const MAX_PAGE_SIZE: i32 = 250;

/// Root query type
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Coins ordered by market cap rank
    async fn coins(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 100)] limit: i32,
        #[graphql(default = 0)] offset: i32,
    ) -> Result<Vec<GqlCoin>> {
        let store = ctx.data::<Arc<dyn MarketStore>>()?;
        let limit = limit.clamp(0, MAX_PAGE_SIZE) as usize;
        let offset = offset.max(0) as usize;
        let coins = store.list_coins(limit, offset).await?;
        Ok(coins.into_iter().map(GqlCoin::from).collect())
    }

    /// Get a coin by provider id
    async fn coin(&self, ctx: &Context<'_>, id: String) -> Result<Option<GqlCoin>> {
        let store = ctx.data::<Arc<dyn MarketStore>>()?;
        let coin = store.get_coin(&id).await?;
        Ok(coin.map(GqlCoin::from))
    }

    async fn market_chart(
        &self,
        ctx: &Context<'_>,
        coin_id: String,
        window: WindowInput,
    ) -> Result<Option<GqlMarketChart>> {
        let store = ctx.data::<Arc<dyn MarketStore>>()?;
        let window = DayWindow::from(window);
        let chart = store.get_market_chart(&coin_id, window).await?;
        Ok(chart.map(|c| GqlMarketChart::new(coin_id, window, &c)))
    }

    /// Latest trending snapshot, hottest first
    async fn trending(&self, ctx: &Context<'_>) -> Result<Vec<GqlTrendingCoin>> {
        let store = ctx.data::<Arc<dyn MarketStore>>()?;
        let mut coins = store.get_trending().await?;
        coins.sort_by_key(|c| c.score);
        Ok(coins.into_iter().map(GqlTrendingCoin::from).collect())
    }

    /// Holdings of a user
    async fn user_coins(&self, ctx: &Context<'_>, user_id: String) -> Result<Vec<GqlUserCoin>> {
        let store = ctx.data::<Arc<dyn MarketStore>>()?;
        let holdings = store.get_user_coins(&user_id).await?;
        Ok(holdings.into_iter().map(GqlUserCoin::from).collect())
    }

    /// Run counters of every sync action seen since start
    async fn sync_status(&self, ctx: &Context<'_>) -> Result<Vec<GqlSyncStatus>> {
        let runs = ctx.data::<Arc<SyncRunLog>>()?;
        Ok(runs.snapshot().into_iter().map(GqlSyncStatus::from).collect())
    }

    /// Whether the store answers
    async fn health(&self, ctx: &Context<'_>) -> Result<bool> {
        let store = ctx.data::<Arc<dyn MarketStore>>()?;
        Ok(store.health().await.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::build_schema;
    use coinboard_core::types::{ChartPoint, Coin, DayWindow, MarketChart};
    use coinboard_store::{MemoryStore, SyncRunLog};
    use coinboard_sync::MarketStore;
    use serde_json::json;
    use std::sync::Arc;

    fn coin(id: &str, rank: i32) -> Coin {
        let mut coin = Coin::new(id, id, id.to_uppercase());
        coin.market_cap_rank = Some(rank);
        coin.current_price = Some(10.0);
        coin
    }

    #[tokio::test]
    async fn test_coins_and_holdings() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_coins(&[coin("ethereum", 2), coin("bitcoin", 1)]).await.unwrap();
        store.add_user_coin("alice", "bitcoin", 3.0);
        store.refresh_user_coins(&coin("bitcoin", 1), 1_700_000_000).await.unwrap();
        let schema = build_schema(store, Arc::new(SyncRunLog::new()));

        let response = schema
            .execute(r#"{ coins(limit: 1) { id } userCoins(userId: "alice") { coinId totalValue } }"#)
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "coins": [{ "id": "bitcoin" }],
                "userCoins": [{ "coinId": "bitcoin", "totalValue": 30.0 }],
            })
        );
    }

    #[tokio::test]
    async fn test_market_chart_by_window() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_coins(&[coin("bitcoin", 1)]).await.unwrap();
        let chart = MarketChart {
            prices: vec![ChartPoint(1_000, 42.0)],
            ..Default::default()
        };
        store
            .upsert_market_chart("bitcoin", DayWindow::Day7, &chart)
            .await
            .unwrap();
        let schema = build_schema(store, Arc::new(SyncRunLog::new()));

        let response = schema
            .execute(
                r#"{
                    week: marketChart(coinId: "bitcoin", window: DAY_7) { window prices { timestamp value } }
                    day: marketChart(coinId: "bitcoin", window: DAY_1) { window }
                }"#,
            )
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "week": { "window": "7d", "prices": [{ "timestamp": 1000, "value": 42.0 }] },
                "day": null,
            })
        );
    }

    #[tokio::test]
    async fn test_sync_status() {
        let runs = Arc::new(SyncRunLog::new());
        runs.started("trending", 10);
        runs.failed("trending", "upstream returned 429");
        let schema = build_schema(Arc::new(MemoryStore::new()), runs);

        let response = schema
            .execute("{ syncStatus { action runs failures lastError } }")
            .await;

        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "syncStatus": [{
                    "action": "trending",
                    "runs": 1,
                    "failures": 1,
                    "lastError": "upstream returned 429",
                }]
            })
        );
    }
}
