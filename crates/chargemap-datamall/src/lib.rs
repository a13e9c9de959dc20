//! Client and normalizer for the LTA DataMall `EVChargingPoints` feed.
//!
//! [`DataMallClient`] handles the credential header, `$skip` pagination, and
//! retry policy; [`normalize_records`] turns the raw, drifting feed records
//! into canonical [`chargemap_core::ChargingPoint`] values.

pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::DataMallClient;
pub use error::DataMallError;
pub use normalize::normalize_records;
pub use types::FeedPage;
