//! One-shot geolocation with an explicit state machine.
//!
//! The tracker never leaves `Located` or `Error` on its own; retrying
//! requires a fresh session. A fix after the first (a watch-position
//! extension) updates the stored coordinates but must not re-trigger the
//! center-on-user pan, which fires exactly once.

use std::time::Duration;

use chargemap_core::UserPosition;
use thiserror::Error;

/// Why a position request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    Denied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy)]
pub struct LocateOptions {
    /// Maximum wait for a fix before the provider reports
    /// [`PositionError::Timeout`].
    pub timeout: Duration,
    /// Tolerance window for a cached fix; a provider may return a position
    /// no older than this instead of acquiring a fresh one.
    pub max_age: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_age: Duration::from_secs(60),
        }
    }
}

/// One-shot positioning capability.
pub trait PositionProvider {
    /// Requests the current position, waiting at most `options.timeout`.
    fn locate(
        &self,
        options: LocateOptions,
    ) -> impl std::future::Future<Output = Result<UserPosition, PositionError>> + Send;
}

/// Tracker state. `Error` carries the user-facing reason.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    Idle,
    Detecting,
    Located(UserPosition),
    Error(LocationFailure),
}

/// Failure reasons, including the no-capability case that never reaches a
/// provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFailure {
    Unsupported,
    Denied,
    Unavailable,
    Timeout,
}

impl From<PositionError> for LocationFailure {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::Denied => LocationFailure::Denied,
            PositionError::Unavailable => LocationFailure::Unavailable,
            PositionError::Timeout => LocationFailure::Timeout,
        }
    }
}

/// Effects the caller must apply after a successful fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixEffects {
    /// True exactly once, on the first successful fix of the session.
    pub center_view: bool,
}

/// Geolocation state machine.
#[derive(Debug)]
pub struct LocationTracker {
    state: LocationState,
    centered: bool,
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LocationState::Idle,
            centered: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> LocationState {
        self.state
    }

    /// Session start: `Idle → Detecting` when a positioning capability
    /// exists, `Idle → Error(Unsupported)` otherwise. No-op outside `Idle`.
    pub fn start(&mut self, supported: bool) {
        if self.state != LocationState::Idle {
            return;
        }
        self.state = if supported {
            LocationState::Detecting
        } else {
            LocationState::Error(LocationFailure::Unsupported)
        };
    }

    /// Records a successful fix and reports the side effects to apply.
    ///
    /// The first fix transitions to `Located` and requests the one-time
    /// center-on-user pan; later fixes only refresh the coordinates.
    pub fn record_fix(&mut self, position: UserPosition) -> FixEffects {
        self.state = LocationState::Located(position);
        let center_view = !self.centered;
        self.centered = true;
        FixEffects { center_view }
    }

    /// Records a failed request. Only meaningful while `Detecting`; a
    /// failure arriving after a successful fix is ignored.
    pub fn record_failure(&mut self, error: PositionError) {
        if self.state == LocationState::Detecting {
            self.state = LocationState::Error(error.into());
        }
    }

    /// User-visible status text for the current state.
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        match self.state {
            LocationState::Idle => "",
            LocationState::Detecting => "Detecting your location...",
            LocationState::Located(_) => "Location detected",
            LocationState::Error(LocationFailure::Unsupported) => "Geolocation not supported",
            LocationState::Error(LocationFailure::Denied) => "Location permission denied",
            LocationState::Error(LocationFailure::Unavailable) => "Location unavailable",
            LocationState::Error(LocationFailure::Timeout) => "Location request timed out",
        }
    }
}
