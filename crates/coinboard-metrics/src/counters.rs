use metrics::{counter, describe_counter};

pub fn init() {
    describe_counter!(
        "coinboard_sync_runs_total",
        "Sync action runs by action and outcome"
    );
    describe_counter!(
        "coinboard_coins_upserted_total",
        "Coins written to the store"
    );
    describe_counter!(
        "coinboard_charts_upserted_total",
        "Market chart windows written to the store"
    );
    describe_counter!(
        "coinboard_user_coins_refreshed_total",
        "User holdings whose market data was refreshed"
    );
    describe_counter!(
        "coinboard_provider_requests_total",
        "Requests sent to the market data provider"
    );
    describe_counter!(
        "coinboard_cron_rejected_total",
        "Cron requests rejected for a bad or missing bearer token"
    );
}

/// Record one sync run; `outcome` is "success" or an error kind
pub fn sync_run(action: &str, outcome: &str) {
    counter!(
        "coinboard_sync_runs_total",
        "action" => action.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn coins_upserted(count: u64) {
    counter!("coinboard_coins_upserted_total").increment(count);
}

pub fn charts_upserted(window: &str, count: u64) {
    counter!("coinboard_charts_upserted_total", "window" => window.to_string()).increment(count);
}

pub fn user_coins_refreshed(count: u64) {
    counter!("coinboard_user_coins_refreshed_total").increment(count);
}

pub fn provider_request(endpoint: &str, status: u16) {
    counter!(
        "coinboard_provider_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn cron_rejected(route: &str) {
    counter!("coinboard_cron_rejected_total", "route" => route.to_string()).increment(1);
}
