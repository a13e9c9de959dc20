//! Session state, geolocation tracking, and the view-state coordinator.
//!
//! This crate is the application half of the pipeline: it owns the working
//! collection of normalized charging points, the optional user position, and
//! the selection/search view state, and it keeps the map and side-panel
//! surfaces consistent with all three. Rendering itself happens behind the
//! [`surface`] traits; everything here is plain state and is unit-tested
//! without a live rendering target.

pub mod bootstrap;
pub mod debounce;
pub mod geoloc;
pub mod session;
pub mod surface;
pub mod view;

pub use bootstrap::run_session;
pub use debounce::Debouncer;
pub use geoloc::{
    FixEffects, LocateOptions, LocationFailure, LocationState, LocationTracker, PositionError,
    PositionProvider,
};
pub use session::SessionState;
pub use surface::{Card, ListViewModel, LocationIndicator, MapSurface, PanelSurface};
pub use view::{availability_label, Coordinator, ViewState, DEFAULT_ZOOM, MARKER_ZOOM};
