//! Client for the external market data provider.
//!
//! Speaks the CoinGecko v3 REST dialect (`/coins/markets`,
//! `/coins/{id}/market_chart`, `/search/trending`) and maps responses into
//! core types. Nothing here retries: a failed request fails the sync run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinboard_core::types::{Coin, DayWindow, MarketChart, TrendingCoin};
use coinboard_core::{ProviderConfig, Result, SyncError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest provider error body kept in `SyncError::ProviderStatus`
const MAX_ERROR_BODY: usize = 512;

/// Upper bound on `per_page` accepted by `/coins/markets`
const MAX_IDS_PER_REQUEST: usize = 250;

/// Source of market data consumed by the sync actions
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// One page of coins ordered by market cap
    async fn coins_markets(&self, page: u32, per_page: u32) -> Result<Vec<Coin>>;

    /// Market snapshot for specific coin ids; unknown ids are silently absent
    async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<Coin>>;

    async fn market_chart(&self, coin_id: &str, window: DayWindow) -> Result<MarketChart>;

    async fn trending(&self) -> Result<Vec<TrendingCoin>>;
}

/// reqwest-backed CoinGecko client
pub struct CoinGeckoClient {
    client: Client,
    config: ProviderConfig,
}

impl CoinGeckoClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("coinboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// GET `path` and decode the JSON body. `endpoint` is a fixed label for metrics.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.client.get(self.url(path)).query(query);
        if let Some(key) = &self.config.api_key {
            request = request.header(self.config.api_key_header.as_str(), key);
        }

        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Provider(format!("{}: {}", endpoint, e)))?;
        let status = response.status();

        coinboard_metrics::histograms::provider_request_duration(endpoint, start.elapsed());
        coinboard_metrics::counters::provider_request(endpoint, status.as_u16());
        debug!(
            endpoint,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Provider response"
        );

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SyncError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SyncError::Decode(format!("{}: {}", endpoint, e)))
    }
}

/// Comma-joined id lists, each small enough for one `/coins/markets` page
fn id_batches(ids: &[String]) -> Vec<(String, usize)> {
    ids.chunks(MAX_IDS_PER_REQUEST)
        .map(|chunk| (chunk.join(","), chunk.len()))
        .collect()
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn coins_markets(&self, page: u32, per_page: u32) -> Result<Vec<Coin>> {
        let query = [
            ("vs_currency", self.config.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("sparkline", "false".to_string()),
        ];
        let rows: Vec<MarketRow> = self
            .get_json("coins_markets", "/coins/markets", &query)
            .await?;
        Ok(rows.into_iter().map(Coin::from).collect())
    }

    async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<Coin>> {
        let mut coins = Vec::with_capacity(ids.len());
        for (batch, len) in id_batches(ids) {
            let query = [
                ("vs_currency", self.config.vs_currency.clone()),
                ("ids", batch),
                ("per_page", len.to_string()),
                ("sparkline", "false".to_string()),
            ];
            let rows: Vec<MarketRow> = self
                .get_json("coins_by_ids", "/coins/markets", &query)
                .await?;
            coins.extend(rows.into_iter().map(Coin::from));
        }
        Ok(coins)
    }

    async fn market_chart(&self, coin_id: &str, window: DayWindow) -> Result<MarketChart> {
        let query = [
            ("vs_currency", self.config.vs_currency.clone()),
            ("days", window.days().to_string()),
        ];
        let path = format!("/coins/{}/market_chart", coin_id);
        self.get_json("market_chart", &path, &query).await
    }

    async fn trending(&self) -> Result<Vec<TrendingCoin>> {
        let response: TrendingResponse = self
            .get_json("trending", "/search/trending", &[])
            .await?;
        Ok(response.into_coins())
    }
}

/// Row of `/coins/markets`
#[derive(Debug, Deserialize)]
struct MarketRow {
    id: String,
    symbol: String,
    name: String,
    image: Option<String>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<i32>,
    total_volume: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    last_updated: Option<DateTime<Utc>>,
}

impl From<MarketRow> for Coin {
    fn from(row: MarketRow) -> Self {
        Self {
            id: row.id,
            symbol: row.symbol,
            name: row.name,
            image: row.image,
            current_price: row.current_price,
            market_cap: row.market_cap,
            market_cap_rank: row.market_cap_rank,
            total_volume: row.total_volume,
            price_change_percentage_24h: row.price_change_percentage_24h,
            last_updated: row.last_updated.map(|t| t.timestamp()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendingEntry {
    item: TrendingItem,
}

#[derive(Debug, Deserialize)]
struct TrendingItem {
    id: String,
    name: String,
    symbol: String,
    market_cap_rank: Option<i32>,
    thumb: Option<String>,
    score: Option<i32>,
}

impl TrendingResponse {
    /// Flatten entries, using list position when the provider omits `score`
    fn into_coins(self) -> Vec<TrendingCoin> {
        self.coins
            .into_iter()
            .enumerate()
            .map(|(position, entry)| TrendingCoin {
                id: entry.item.id,
                name: entry.item.name,
                symbol: entry.item.symbol,
                market_cap_rank: entry.item.market_cap_rank,
                thumb: entry.item.thumb,
                score: entry.item.score.unwrap_or(position as i32),
            })
            .collect()
    }
}
