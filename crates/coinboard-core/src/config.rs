use crate::error::{Result, SyncError};
use std::env;
use std::fmt;
use tracing::{info, warn};

const DEFAULT_PROVIDER_URL: &str = "https://api.coingecko.com/api/v3";
const MAX_COINS_PER_PAGE: u32 = 250;

/// Shared secret presented by the external scheduler on `/cron/*` routes
#[derive(Clone, Default)]
pub struct CronConfig {
    pub secret: Option<String>,
}

impl CronConfig {
    pub fn from_env() -> Self {
        let secret = env::var("CRON_SECRET")
            .ok()
            .map(sanitize)
            .filter(|s| !s.is_empty());

        Self { secret }
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

impl fmt::Debug for CronConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CronConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// External market data provider (CoinGecko-compatible API)
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Optional API key, sent in `api_key_header`
    pub api_key: Option<String>,
    pub api_key_header: String,
    /// Quote currency for prices (e.g. "usd")
    pub vs_currency: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            api_key: None,
            api_key_header: "x-cg-demo-api-key".to_string(),
            vs_currency: "usd".to_string(),
            timeout_secs: 15,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("MARKET_API_URL")
            .map(sanitize)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            api_key: env::var("MARKET_API_KEY")
                .ok()
                .map(sanitize)
                .filter(|s| !s.is_empty()),
            api_key_header: env::var("MARKET_API_KEY_HEADER").unwrap_or(defaults.api_key_header),
            vs_currency: env::var("MARKET_API_VS_CURRENCY")
                .map(|s| s.to_lowercase())
                .unwrap_or(defaults.vs_currency),
            timeout_secs: env::var("MARKET_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_header", &self.api_key_header)
            .field("vs_currency", &self.vs_currency)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sizing of the sync actions
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Coins requested per `/coins/markets` page (max 250)
    pub coins_per_page: u32,
    /// Number of pages fetched by the coin list sync
    pub coins_pages: u32,
    /// How many top-ranked coins get their market chart refreshed
    pub chart_coin_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            coins_per_page: MAX_COINS_PER_PAGE,
            coins_pages: 1,
            chart_coin_limit: 10,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            coins_per_page: env::var("SYNC_COINS_PER_PAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.coins_per_page),
            coins_pages: env::var("SYNC_COINS_PAGES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.coins_pages),
            chart_coin_limit: env::var("SYNC_CHART_COIN_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.chart_coin_limit),
        }
    }
}

/// In-process interval scheduler, an alternative to an external cron
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub coins_list_secs: u64,
    pub market_chart_secs: u64,
    pub trending_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            coins_list_secs: 3600,
            market_chart_secs: 900,
            trending_secs: 600,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: env::var("SCHEDULER_ENABLED")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(defaults.enabled),
            coins_list_secs: env::var("SCHEDULER_COINS_LIST_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.coins_list_secs),
            market_chart_secs: env::var("SCHEDULER_MARKET_CHART_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.market_chart_secs),
            trending_secs: env::var("SCHEDULER_TRENDING_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.trending_secs),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub cron: CronConfig,
    pub provider: ProviderConfig,
    pub sync: SyncConfig,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables and validate it
    pub fn load() -> Result<Self> {
        let config = Self {
            cron: CronConfig::from_env(),
            provider: ProviderConfig::from_env(),
            sync: SyncConfig::from_env(),
            scheduler: SchedulerConfig::from_env(),
        };
        config.validate()?;

        if !config.cron.is_configured() {
            warn!("CRON_SECRET not set, every /cron request will be rejected");
        }
        info!(
            provider = %config.provider.base_url,
            vs_currency = %config.provider.vs_currency,
            api_key = config.provider.api_key.is_some(),
            "Market data provider configured"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(SyncError::Config(format!(
                "MARKET_API_URL must be an http(s) URL, got {:?}",
                self.provider.base_url
            )));
        }
        if self.provider.timeout_secs == 0 {
            return Err(SyncError::Config(
                "MARKET_API_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        if self.sync.coins_per_page == 0 || self.sync.coins_per_page > MAX_COINS_PER_PAGE {
            return Err(SyncError::Config(format!(
                "SYNC_COINS_PER_PAGE must be within 1..={}",
                MAX_COINS_PER_PAGE
            )));
        }
        if self.sync.coins_pages == 0 {
            return Err(SyncError::Config(
                "SYNC_COINS_PAGES must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Strip surrounding whitespace and quotes left over from .env files
fn sanitize(value: String) -> String {
    let trimmed = value.trim();
    let unquoted = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    unquoted.to_string()
}
