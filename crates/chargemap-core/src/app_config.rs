use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub datamall_account_key: Option<String>,
    pub datamall_base_url: String,
    pub feed_request_timeout_secs: u64,
    pub feed_max_retries: u32,
    pub feed_retry_backoff_base_ms: u64,
    pub geolocate_timeout_secs: u64,
    pub geolocate_max_age_secs: u64,
    pub search_debounce_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "datamall_account_key",
                &self.datamall_account_key.as_ref().map(|_| "[redacted]"),
            )
            .field("datamall_base_url", &self.datamall_base_url)
            .field("feed_request_timeout_secs", &self.feed_request_timeout_secs)
            .field("feed_max_retries", &self.feed_max_retries)
            .field(
                "feed_retry_backoff_base_ms",
                &self.feed_retry_backoff_base_ms,
            )
            .field("geolocate_timeout_secs", &self.geolocate_timeout_secs)
            .field("geolocate_max_age_secs", &self.geolocate_max_age_secs)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .finish()
    }
}
