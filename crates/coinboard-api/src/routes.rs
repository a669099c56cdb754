use crate::auth::require_cron_secret;
use crate::error::ApiError;
use crate::schema::ApiSchema;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{middleware, Json, Router};
use coinboard_core::types::DayWindow;
use coinboard_core::{CronConfig, SyncError};
use coinboard_sync::SyncActions;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// Time budgets per route, in seconds
const COINS_LIST_BUDGET: u64 = 60;
const MARKET_CHART_1D_BUDGET: u64 = 10;
const MARKET_CHART_BUDGET: u64 = 30;
const TRENDING_BUDGET: u64 = 20;
const USER_COINS_BUDGET: u64 = 20;
const USER_COIN_BUDGET: u64 = 20;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub actions: Arc<dyn SyncActions>,
    pub cron: CronConfig,
    pub schema: ApiSchema,
}

#[derive(Debug, Serialize)]
struct SyncResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct UserCoinsParams {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

type SyncResult = crate::Result<Json<SyncResponse>>;

/// Build the HTTP router. Layers (CORS, tracing) are added by the server.
pub fn router(state: AppState) -> Router {
    let cron = Router::new()
        .route("/cron/coins-list", get(cron_coins_list))
        .route("/cron/market-chart-1d", get(cron_market_chart_1d))
        .route("/cron/market-chart/:window", get(cron_market_chart))
        .route("/cron/trending", get(cron_trending))
        .route_layer(middleware::from_fn_with_state(
            state.cron.clone(),
            require_cron_secret,
        ));

    Router::new()
        .merge(cron)
        .route("/update/coins-list", get(update_coins_list))
        .route("/update/user-coins", get(update_user_coins))
        .route("/update/user-coin/:coin_id", get(update_user_coin))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Run `action` within `budget_secs`. On expiry the future is dropped and
/// whatever it already wrote stays.
async fn within<T, F>(budget_secs: u64, action: F) -> crate::Result<T>
where
    F: Future<Output = coinboard_core::Result<T>>,
{
    match tokio::time::timeout(Duration::from_secs(budget_secs), action).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ApiError::Timeout(budget_secs)),
    }
}

fn success() -> Json<SyncResponse> {
    Json(SyncResponse { success: true })
}

async fn cron_coins_list(State(state): State<AppState>) -> SyncResult {
    let coins = within(COINS_LIST_BUDGET, state.actions.update_coins_list()).await?;
    info!(coins, "Cron coin list sync done");
    Ok(success())
}

async fn cron_market_chart_1d(State(state): State<AppState>) -> SyncResult {
    let charts = within(
        MARKET_CHART_1D_BUDGET,
        state.actions.update_coins_market_chart(DayWindow::Day1),
    )
    .await?;
    info!(charts, "Cron 1d market chart sync done");
    Ok(success())
}

async fn cron_market_chart(
    State(state): State<AppState>,
    Path(window): Path<String>,
) -> SyncResult {
    let window: DayWindow = window.parse()?;
    let charts = within(
        MARKET_CHART_BUDGET,
        state.actions.update_coins_market_chart(window),
    )
    .await?;
    info!(window = %window, charts, "Cron market chart sync done");
    Ok(success())
}

async fn cron_trending(State(state): State<AppState>) -> SyncResult {
    let coins = within(TRENDING_BUDGET, state.actions.update_trending_data()).await?;
    info!(coins, "Cron trending sync done");
    Ok(success())
}

async fn update_coins_list(State(state): State<AppState>) -> SyncResult {
    within(COINS_LIST_BUDGET, state.actions.update_coins_list()).await?;
    Ok(success())
}

async fn update_user_coins(
    State(state): State<AppState>,
    query: Result<Query<UserCoinsParams>, QueryRejection>,
) -> SyncResult {
    let Query(params) = query?;
    let user_id = params
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(SyncError::MissingParameter("userId"))?;

    within(USER_COINS_BUDGET, state.actions.update_user_coins_list(&user_id)).await?;
    Ok(success())
}

async fn update_user_coin(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> SyncResult {
    within(USER_COIN_BUDGET, state.actions.update_user_coin_data(&coin_id)).await?;
    Ok(success())
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GraphiQL playground
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_schema;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use coinboard_core::types::{Coin, MarketChart, TrendingCoin};
    use coinboard_core::{Result, SyncConfig};
    use coinboard_store::MemoryStore;
    use coinboard_sync::{MarketDataProvider, MarketStore, Synchronizer};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    const SECRET: &str = "test-secret";

    /// Counts calls, fails on demand
    #[derive(Default)]
    struct MockActions {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockActions {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn run(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SyncError::Database("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SyncActions for MockActions {
        async fn update_coins_list(&self) -> Result<usize> {
            self.run().await.map(|_| 0)
        }

        async fn update_coins_market_chart(&self, _window: DayWindow) -> Result<usize> {
            self.run().await.map(|_| 0)
        }

        async fn update_trending_data(&self) -> Result<usize> {
            self.run().await.map(|_| 0)
        }

        async fn update_user_coins_list(&self, _user_id: &str) -> Result<u64> {
            self.run().await.map(|_| 0)
        }

        async fn update_user_coin_data(&self, coin_id: &str) -> Result<u64> {
            self.run().await?;
            if coin_id == "missing" {
                return Err(SyncError::UnknownCoin(coin_id.to_string()));
            }
            Ok(1)
        }
    }

    /// Provider returning a fixed coin list
    struct StaticProvider(Vec<Coin>);

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        async fn coins_markets(&self, page: u32, _per_page: u32) -> Result<Vec<Coin>> {
            Ok(if page == 1 { self.0.clone() } else { Vec::new() })
        }

        async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<Coin>> {
            Ok(self.0.iter().filter(|c| ids.contains(&c.id)).cloned().collect())
        }

        async fn market_chart(&self, _coin_id: &str, _window: DayWindow) -> Result<MarketChart> {
            Ok(MarketChart::default())
        }

        async fn trending(&self) -> Result<Vec<TrendingCoin>> {
            Ok(Vec::new())
        }
    }

    /// Counts ERROR events emitted by this crate
    #[derive(Clone, Default)]
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            if *meta.level() == Level::ERROR && meta.target().starts_with("coinboard_api") {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn app(actions: Arc<dyn SyncActions>) -> Router {
        let store: Arc<dyn MarketStore> = Arc::new(MemoryStore::new());
        app_with_store(actions, store)
    }

    fn app_with_store(actions: Arc<dyn SyncActions>, store: Arc<dyn MarketStore>) -> Router {
        router(AppState {
            actions,
            cron: CronConfig::with_secret(SECRET),
            schema: build_schema(store, Arc::new(coinboard_store::SyncRunLog::new())),
        })
    }

    fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_cron_rejects_bad_bearer_without_running_action() {
        let actions = Arc::new(MockActions::default());

        for uri in [
            "/cron/coins-list",
            "/cron/market-chart-1d",
            "/cron/market-chart/7",
            "/cron/trending",
        ] {
            for bearer in [None, Some("wrong"), Some("")] {
                let response = app(actions.clone())
                    .oneshot(get_request(uri, bearer))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
                assert!(body_bytes(response).await.is_empty());
            }
        }

        assert_eq!(actions.calls(), 0);
    }

    #[tokio::test]
    async fn test_cron_without_configured_secret_rejects() {
        let actions = Arc::new(MockActions::default());
        let app = router(AppState {
            actions: actions.clone(),
            cron: CronConfig::default(),
            schema: build_schema(
                Arc::new(MemoryStore::new()),
                Arc::new(coinboard_store::SyncRunLog::new()),
            ),
        });

        let response = app
            .oneshot(get_request("/cron/trending", Some("")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(actions.calls(), 0);
    }

    #[tokio::test]
    async fn test_cron_success() {
        let actions = Arc::new(MockActions::default());

        let response = app(actions.clone())
            .oneshot(get_request("/cron/trending", Some(SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "success": true }));
        assert_eq!(actions.calls(), 1);
    }

    #[tokio::test]
    async fn test_cron_failure_is_logged_once_and_hidden() {
        let counter = ErrorCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = app(Arc::new(MockActions::failing()))
            .oneshot(get_request("/cron/coins-list", Some(SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("connection refused"));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cron_market_chart_rejects_unknown_window() {
        let actions = Arc::new(MockActions::default());

        let response = app(actions.clone())
            .oneshot(get_request("/cron/market-chart/3", Some(SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await.get("error").is_some());
        assert_eq!(actions.calls(), 0);
    }

    #[tokio::test]
    async fn test_budget_expiry_is_timeout() {
        let result = within(0, async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, SyncError>(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, ApiError::Timeout(0)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_user_coins_requires_user_id() {
        let actions = Arc::new(MockActions::default());

        for uri in [
            "/update/user-coins",
            "/update/user-coins?userId=",
            "/update/user-coins?userId=%20",
        ] {
            let response = app(actions.clone()).oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert!(body_json(response).await["error"]
                .as_str()
                .unwrap()
                .contains("userId"));
        }

        assert_eq!(actions.calls(), 0);
    }

    #[tokio::test]
    async fn test_user_coins_rejects_malformed_query() {
        let actions = Arc::new(MockActions::default());

        let response = app(actions.clone())
            .oneshot(get_request("/update/user-coins?userId=a&userId=b", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(actions.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_routes_need_no_secret() {
        let actions = Arc::new(MockActions::default());

        for uri in [
            "/update/coins-list",
            "/update/user-coins?userId=alice",
            "/update/user-coin/bitcoin",
        ] {
            let response = app(actions.clone()).oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }

        assert_eq!(actions.calls(), 3);
    }

    #[tokio::test]
    async fn test_unknown_coin_is_not_found() {
        let response = app(Arc::new(MockActions::default()))
            .oneshot(get_request("/update/user-coin/missing", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cron_coins_list_writes_provider_coins() {
        let coins: Vec<Coin> = ["bitcoin", "ethereum", "solana"]
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let mut coin = Coin::new(*id, *id, id.to_uppercase());
                coin.market_cap_rank = Some(i as i32 + 1);
                coin.current_price = Some(100.0 / (i as f64 + 1.0));
                coin
            })
            .collect();
        let store = Arc::new(MemoryStore::new());
        let sync = Synchronizer::new(
            Arc::new(StaticProvider(coins.clone())),
            store.clone(),
            SyncConfig::default(),
        );

        let response = app_with_store(Arc::new(sync), store.clone())
            .oneshot(get_request("/cron/coins-list", Some(SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "success": true }));
        assert_eq!(store.coins.count(), 3);
        for coin in &coins {
            assert_eq!(store.coins.get(&coin.id).as_ref(), Some(coin));
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(MockActions::default()))
            .oneshot(get_request("/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }
}
