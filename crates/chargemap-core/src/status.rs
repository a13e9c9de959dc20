//! Availability classification.

use serde::{Deserialize, Serialize};

/// Derived availability of a charging station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Available,
    Partial,
    Occupied,
    Unknown,
}

impl Status {
    /// Stable lowercase label, used for marker icon lookup and CSS classes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::Partial => "partial",
            Status::Occupied => "occupied",
            Status::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies availability from lot counts.
///
/// `total == 0` is the degenerate no-data case and always maps to
/// [`Status::Unknown`], even if the feed reports nonzero available lots.
#[must_use]
pub fn classify(available: u32, total: u32) -> Status {
    if total == 0 {
        return Status::Unknown;
    }
    if available == 0 {
        return Status::Occupied;
    }
    if available == total {
        return Status::Available;
    }
    Status::Partial
}
