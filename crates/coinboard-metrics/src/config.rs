use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_enabled() -> bool {
    false
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9090
}

impl MetricsConfig {
    /// Enabled when `METRICS_ENABLED=true` or a `METRICS_PORT` is given
    pub fn from_env() -> Self {
        let port = std::env::var("METRICS_PORT").ok().and_then(|s| s.parse().ok());
        Self {
            enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(port.is_some()),
            host: std::env::var("METRICS_HOST").unwrap_or_else(|_| default_host()),
            port: port.unwrap_or_else(default_port),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
