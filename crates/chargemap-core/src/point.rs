//! Canonical charging point model.
//!
//! A [`ChargingPoint`] is the normalized form of one raw feed record. The
//! working collection holds only points with parseable coordinates; anything
//! else is dropped at normalization time and never reaches this type.

use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Default map center when no user position is known.
pub const SINGAPORE_CENTER: UserPosition = UserPosition {
    lat: 1.3521,
    lng: 103.8198,
};

/// A normalized EV charging point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingPoint {
    /// Positional index of the record in the raw feed. Stable across
    /// identical re-fetches and never renumbered when invalid neighbors are
    /// dropped. Upstream serial numbers are not unique, so they are never
    /// used as identity.
    pub id: usize,
    /// Upstream serial number, carried for display only.
    pub serial_number: Option<String>,
    pub address: String,
    /// May be empty.
    pub postal_code: String,
    pub operator: String,
    /// Charger/plug type label. May be empty.
    pub charger_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_lots: u32,
    pub available_lots: u32,
    /// Derived from the lot counts; recomputed on every normalization.
    pub status: Status,
    /// Great-circle distance from the user in kilometers. `None` until a
    /// user position exists; all-or-nothing across the collection.
    pub distance_km: Option<f64>,
}

/// A user position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub lat: f64,
    pub lng: f64,
}
