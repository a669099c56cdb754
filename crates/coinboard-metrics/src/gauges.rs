use metrics::{describe_gauge, gauge};

pub fn init() {
    describe_gauge!(
        "coinboard_last_sync_success_timestamp",
        "Unix time of the last successful run per action"
    );
    describe_gauge!(
        "coinboard_trending_coins",
        "Number of coins in the latest trending snapshot"
    );
}

pub fn set_last_success(action: &str, timestamp: i64) {
    gauge!("coinboard_last_sync_success_timestamp", "action" => action.to_string())
        .set(timestamp as f64);
}

pub fn set_trending_coins(count: usize) {
    gauge!("coinboard_trending_coins").set(count as f64);
}
