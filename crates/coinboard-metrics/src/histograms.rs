use metrics::{describe_histogram, histogram};
use std::time::Duration;

pub fn init() {
    describe_histogram!(
        "coinboard_sync_duration_seconds",
        "Wall time of a sync action"
    );
    describe_histogram!(
        "coinboard_provider_request_duration_seconds",
        "Latency of market data provider requests"
    );
}

pub fn sync_duration(action: &str, duration: Duration) {
    histogram!("coinboard_sync_duration_seconds", "action" => action.to_string())
        .record(duration.as_secs_f64());
}

pub fn provider_request_duration(endpoint: &str, duration: Duration) {
    histogram!(
        "coinboard_provider_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(duration.as_secs_f64());
}
