//! Wire types for the DataMall OData envelope.
//!
//! Record fields inside `value` drift between feed revisions (numbers become
//! strings, lot counts move into nested per-charger arrays), so records stay
//! as raw [`serde_json::Value`] here and are interpreted field-by-field in
//! [`crate::normalize`].

use serde::Deserialize;

/// One page of the `EVChargingPoints` OData feed.
#[derive(Debug, Deserialize)]
pub struct FeedPage {
    /// OData metadata link. Unused, kept so strict parsing of the envelope
    /// does not depend on it being present.
    #[serde(rename = "odata.metadata", default)]
    pub metadata: Option<String>,

    /// Raw feed records.
    #[serde(default)]
    pub value: Vec<serde_json::Value>,
}
