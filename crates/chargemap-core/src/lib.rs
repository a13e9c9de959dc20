pub mod app_config;
pub mod config;
pub mod geo;
pub mod point;
pub mod status;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_DATAMALL_BASE_URL};
pub use geo::{format_distance, haversine_km};
pub use point::{ChargingPoint, UserPosition, SINGAPORE_CENTER};
pub use status::{classify, Status};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
