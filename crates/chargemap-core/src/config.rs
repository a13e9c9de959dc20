use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default LTA DataMall OData service root.
pub const DEFAULT_DATAMALL_BASE_URL: &str = "https://datamall2.mytransport.sg/ltaodataservice/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a config value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a config value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("CHARGEMAP_ENV", "development"));

    let bind_addr = parse_addr("CHARGEMAP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CHARGEMAP_LOG_LEVEL", "info");

    let datamall_account_key = lookup("CHARGEMAP_DATAMALL_ACCOUNT_KEY").ok();
    let datamall_base_url = or_default("CHARGEMAP_DATAMALL_BASE_URL", DEFAULT_DATAMALL_BASE_URL);

    let feed_request_timeout_secs = parse_u64("CHARGEMAP_FEED_REQUEST_TIMEOUT_SECS", "30")?;
    let feed_max_retries = parse_u32("CHARGEMAP_FEED_MAX_RETRIES", "3")?;
    let feed_retry_backoff_base_ms = parse_u64("CHARGEMAP_FEED_RETRY_BACKOFF_BASE_MS", "1000")?;

    let geolocate_timeout_secs = parse_u64("CHARGEMAP_GEOLOCATE_TIMEOUT_SECS", "10")?;
    let geolocate_max_age_secs = parse_u64("CHARGEMAP_GEOLOCATE_MAX_AGE_SECS", "60")?;

    let search_debounce_ms = parse_u64("CHARGEMAP_SEARCH_DEBOUNCE_MS", "300")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        datamall_account_key,
        datamall_base_url,
        feed_request_timeout_secs,
        feed_max_retries,
        feed_retry_backoff_base_ms,
        geolocate_timeout_secs,
        geolocate_max_age_secs,
        search_debounce_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
