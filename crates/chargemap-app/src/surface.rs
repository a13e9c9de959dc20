//! Capability traits for the rendering surfaces.
//!
//! The coordinator drives a map widget and a side panel through these
//! traits. Every method is infallible: a surface with a missing render
//! target degrades to a no-op instead of propagating an error, so a broken
//! piece of chrome never takes the session down.

use chargemap_core::{ChargingPoint, Status, UserPosition};

/// Discrete states of the location indicator chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationIndicator {
    Detecting,
    Located,
    Error,
}

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: usize,
    pub address: String,
    pub postal_code: String,
    pub operator: String,
    pub charger_type: String,
    pub status: Status,
    /// Human-readable availability, e.g. `"2/4 Available"`.
    pub availability_label: String,
    /// Formatted distance, present once a user position exists.
    pub distance_label: Option<String>,
    pub active: bool,
}

/// The full list render payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewModel {
    pub cards: Vec<Card>,
    /// True when an empty `cards` means "no match for the search" rather
    /// than "no data at all" — the empty states read differently.
    pub search_active: bool,
}

/// Interactive map widget: markers, popups, and viewport commands.
pub trait MapSurface {
    fn clear_markers(&mut self);
    /// Places one marker; the icon is chosen by `point.status`.
    fn place_marker(&mut self, point: &ChargingPoint);
    /// Places or moves the single user-position marker.
    fn place_user_marker(&mut self, position: UserPosition);
    fn pan_to(&mut self, position: UserPosition);
    fn set_zoom(&mut self, zoom: u8);
    /// Opens the detail popup for a point, replacing any open popup.
    fn open_popup(&mut self, point: &ChargingPoint);
    fn close_popup(&mut self);
}

/// Side panel: the result list, counts, location status, and error banner.
pub trait PanelSurface {
    fn render_list(&mut self, list: &ListViewModel);
    /// Brings the entry for `id` into view.
    fn scroll_to(&mut self, id: usize);
    fn set_total_count(&mut self, count: usize);
    fn set_location_status(&mut self, indicator: LocationIndicator, text: &str);
    /// Shows the dismissible error banner with a human-readable message.
    fn show_error_banner(&mut self, message: &str);
}
