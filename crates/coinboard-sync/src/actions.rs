use crate::provider::MarketDataProvider;
use crate::store::MarketStore;
use async_trait::async_trait;
use coinboard_core::types::{now_secs, DayWindow};
use coinboard_core::{Result, SyncConfig, SyncError};
use coinboard_store::SyncRunLog;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

const COINS_LIST: &str = "coins_list";
const MARKET_CHART: &str = "market_chart";
const TRENDING: &str = "trending";
const USER_COINS: &str = "user_coins";
const USER_COIN: &str = "user_coin";

/// The fetch-and-upsert operations exposed to trigger endpoints.
///
/// Implementations never swallow errors; the caller decides how a failure is
/// reported.
#[async_trait]
pub trait SyncActions: Send + Sync {
    /// Refresh the full coin list, returns coins written
    async fn update_coins_list(&self) -> Result<usize>;

    /// Refresh one chart window for the top ranked coins, returns charts written
    async fn update_coins_market_chart(&self, window: DayWindow) -> Result<usize>;

    /// Replace the trending snapshot, returns its size
    async fn update_trending_data(&self) -> Result<usize>;

    /// Refresh market data of every coin a user holds, returns holdings touched
    async fn update_user_coins_list(&self, user_id: &str) -> Result<u64>;

    /// Refresh one coin for every holder, returns holdings touched
    async fn update_user_coin_data(&self, coin_id: &str) -> Result<u64>;
}

/// Sync actions over a provider and a store
pub struct Synchronizer {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn MarketStore>,
    config: SyncConfig,
    runs: Arc<SyncRunLog>,
}

impl Synchronizer {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn MarketStore>,
        config: SyncConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
            runs: Arc::new(SyncRunLog::new()),
        }
    }

    pub fn runs(&self) -> &Arc<SyncRunLog> {
        &self.runs
    }

    /// Bookkeeping around one action run. Errors pass through untouched and
    /// are not logged here.
    async fn instrument<T, F>(&self, action: &'static str, run: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        let start = Instant::now();
        self.runs.started(action, now_secs());

        let result = run.await;
        coinboard_metrics::histograms::sync_duration(action, start.elapsed());

        match &result {
            Ok(_) => {
                let now = now_secs();
                self.runs.succeeded(action, now);
                coinboard_metrics::counters::sync_run(action, "success");
                coinboard_metrics::gauges::set_last_success(action, now);
            }
            Err(e) => {
                self.runs.failed(action, &e.to_string());
                coinboard_metrics::counters::sync_run(action, e.kind());
            }
        }
        result
    }

    async fn sync_coins_list(&self) -> Result<usize> {
        let per_page = self.config.coins_per_page;
        let mut total = 0;

        for page in 1..=self.config.coins_pages {
            let coins = self.provider.coins_markets(page, per_page).await?;
            if coins.is_empty() {
                break;
            }
            let fetched = coins.len();
            let written = self.store.upsert_coins(&coins).await?;
            total += written;
            debug!(page, fetched, written, "Coin page upserted");

            if fetched < per_page as usize {
                break;
            }
        }

        coinboard_metrics::counters::coins_upserted(total as u64);
        info!(coins = total, "Coin list synced");
        Ok(total)
    }

    async fn sync_market_chart(&self, window: DayWindow) -> Result<usize> {
        let coin_ids = self.store.top_coin_ids(self.config.chart_coin_limit).await?;
        let mut written = 0;

        for coin_id in &coin_ids {
            let chart = self.provider.market_chart(coin_id, window).await?;
            self.store.upsert_market_chart(coin_id, window, &chart).await?;
            written += 1;
        }

        coinboard_metrics::counters::charts_upserted(window.label(), written as u64);
        info!(window = %window, charts = written, "Market charts synced");
        Ok(written)
    }

    async fn sync_trending(&self) -> Result<usize> {
        let trending = self.provider.trending().await?;
        self.store.replace_trending(&trending).await?;

        coinboard_metrics::gauges::set_trending_coins(trending.len());
        info!(coins = trending.len(), "Trending snapshot synced");
        Ok(trending.len())
    }

    async fn sync_user_coins(&self, user_id: &str) -> Result<u64> {
        let coin_ids = self.store.user_coin_ids(user_id).await?;
        if coin_ids.is_empty() {
            debug!(user_id, "User holds no coins, nothing to refresh");
            return Ok(0);
        }

        let coins = self.provider.coins_by_ids(&coin_ids).await?;
        // Coins first so holdings never point at a missing row
        self.store.upsert_coins(&coins).await?;

        let now = now_secs();
        let mut touched = 0;
        for coin in &coins {
            touched += self.store.refresh_user_coins(coin, now).await?;
        }

        coinboard_metrics::counters::user_coins_refreshed(touched);
        info!(
            user_id,
            held = coin_ids.len(),
            priced = coins.len(),
            touched,
            "User coins refreshed"
        );
        Ok(touched)
    }

    async fn sync_user_coin(&self, coin_id: &str) -> Result<u64> {
        let coin = self
            .provider
            .coins_by_ids(&[coin_id.to_string()])
            .await?
            .into_iter()
            .find(|c| c.id == coin_id)
            .ok_or_else(|| SyncError::UnknownCoin(coin_id.to_string()))?;

        self.store.upsert_coins(std::slice::from_ref(&coin)).await?;
        let touched = self.store.refresh_user_coins(&coin, now_secs()).await?;

        for window in DayWindow::all() {
            let chart = self.provider.market_chart(coin_id, *window).await?;
            self.store.upsert_market_chart(coin_id, *window, &chart).await?;
        }

        coinboard_metrics::counters::user_coins_refreshed(touched);
        info!(coin_id, touched, "Coin refreshed for holders");
        Ok(touched)
    }
}

#[async_trait]
impl SyncActions for Synchronizer {
    async fn update_coins_list(&self) -> Result<usize> {
        self.instrument(COINS_LIST, self.sync_coins_list()).await
    }

    async fn update_coins_market_chart(&self, window: DayWindow) -> Result<usize> {
        self.instrument(MARKET_CHART, self.sync_market_chart(window)).await
    }

    async fn update_trending_data(&self) -> Result<usize> {
        self.instrument(TRENDING, self.sync_trending()).await
    }

    async fn update_user_coins_list(&self, user_id: &str) -> Result<u64> {
        let user_id = required(user_id, "userId")?;
        self.instrument(USER_COINS, self.sync_user_coins(user_id)).await
    }

    async fn update_user_coin_data(&self, coin_id: &str) -> Result<u64> {
        let coin_id = required(coin_id, "coinId")?;
        self.instrument(USER_COIN, self.sync_user_coin(coin_id)).await
    }
}

/// Reject blank identifiers before any provider call
fn required<'a>(value: &'a str, name: &'static str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SyncError::MissingParameter(name));
    }
    Ok(trimmed)
}
