use serde::Deserialize;

/// Upper bound for `collector.poll_interval_ms` and `collector.request_timeout_ms` (one day).
pub const MAX_POLL_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub collector: CollectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Full URL of the telemetry endpoint (GET).
    pub url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Per-request timeout. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_poll_interval_ms() -> u64 {
    5000
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.collector.url.is_empty(),
            "collector.url must be non-empty"
        );
        let url = reqwest::Url::parse(&self.collector.url)
            .map_err(|e| anyhow::anyhow!("collector.url is not a valid URL: {}", e))?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "collector.url must use http or https, got {}",
            url.scheme()
        );
        anyhow::ensure!(
            self.collector.poll_interval_ms > 0,
            "collector.poll_interval_ms must be > 0, got {}",
            self.collector.poll_interval_ms
        );
        anyhow::ensure!(
            self.collector.poll_interval_ms <= MAX_POLL_INTERVAL_MS,
            "collector.poll_interval_ms must be <= {}, got {}",
            MAX_POLL_INTERVAL_MS,
            self.collector.poll_interval_ms
        );
        if let Some(timeout) = self.collector.request_timeout_ms {
            anyhow::ensure!(
                timeout > 0 && timeout <= MAX_POLL_INTERVAL_MS,
                "collector.request_timeout_ms must be between 1 and {} when set, got {}",
                MAX_POLL_INTERVAL_MS,
                timeout
            );
        }
        Ok(())
    }
}
