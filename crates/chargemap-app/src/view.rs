//! The view-state coordinator.
//!
//! Owns the selection and search state and keeps the map markers, detail
//! popup, and side-panel list consistent with the working collection. All
//! mutation happens through the event methods below; data refreshes never
//! touch the view state except to drop a selection whose point disappeared.

use chargemap_core::{format_distance, ChargingPoint, Status, UserPosition};

use crate::geoloc::{LocationState, LocationTracker, PositionError};
use crate::session::SessionState;
use crate::surface::{Card, ListViewModel, LocationIndicator, MapSurface, PanelSurface};

/// Initial map zoom over the island.
pub const DEFAULT_ZOOM: u8 = 12;

/// Zoom applied when jumping to a single station from the list.
pub const MARKER_ZOOM: u8 = 16;

/// Banner message for a failed initial load.
const FEED_ERROR_MESSAGE: &str = "Failed to load charging points. Please refresh the page.";

/// Selection and search state. Mutated only by user interaction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active_id: Option<usize>,
    pub search_term: String,
}

/// Coordinates session data, geolocation, and the two rendering surfaces.
pub struct Coordinator<M, P> {
    session: SessionState,
    tracker: LocationTracker,
    view: ViewState,
    map: M,
    panel: P,
}

impl<M: MapSurface, P: PanelSurface> Coordinator<M, P> {
    pub fn new(map: M, panel: P) -> Self {
        Self {
            session: SessionState::new(),
            tracker: LocationTracker::new(),
            view: ViewState::default(),
            map,
            panel,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    #[must_use]
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Session start: kicks the location indicator into its initial state.
    pub fn start_locating(&mut self, supported: bool) {
        self.tracker.start(supported);
        self.push_location_status();
    }

    /// A fetch completed: replace the collection wholesale and re-render.
    /// The active selection survives only if the point still exists.
    pub fn feed_loaded(&mut self, points: Vec<ChargingPoint>) {
        self.session.replace_points(points);

        if let Some(active) = self.view.active_id {
            if !self.session.contains(active) {
                self.view.active_id = None;
                self.map.close_popup();
            }
        }

        self.render_markers();
        self.panel.set_total_count(self.session.points().len());
        self.render_list();
    }

    /// The initial fetch failed. Fatal to the load, surfaced on the banner;
    /// nothing else about the session changes.
    pub fn feed_failed(&mut self) {
        self.panel.show_error_banner(FEED_ERROR_MESSAGE);
    }

    /// A position fix arrived: rank the collection, drop the user marker,
    /// and center the viewport on the first fix only.
    pub fn position_fix(&mut self, position: UserPosition) {
        let effects = self.tracker.record_fix(position);
        self.session.set_user_position(position);
        self.push_location_status();

        self.map.place_user_marker(position);
        self.render_list();
        if effects.center_view {
            self.map.pan_to(position);
        }
    }

    /// The position request failed. Non-fatal: browsing, search, and
    /// selection keep working with no distances shown.
    pub fn position_failed(&mut self, error: PositionError) {
        self.tracker.record_failure(error);
        self.push_location_status();
    }

    /// Marker click: open the popup, activate the card, and scroll it into
    /// view. Unknown ids (stale marker callbacks) are ignored.
    pub fn marker_clicked(&mut self, id: usize) {
        let Some(point) = self.session.point(id).cloned() else {
            return;
        };
        self.map.close_popup();
        self.map.open_popup(&point);
        self.view.active_id = Some(id);
        self.render_list();
        self.panel.scroll_to(id);
    }

    /// Card click: jump the map to the station and open its popup.
    pub fn card_clicked(&mut self, id: usize) {
        let Some(point) = self.session.point(id).cloned() else {
            return;
        };
        self.map.pan_to(UserPosition {
            lat: point.latitude,
            lng: point.longitude,
        });
        self.map.set_zoom(MARKER_ZOOM);
        self.map.close_popup();
        self.map.open_popup(&point);
        self.view.active_id = Some(id);
        self.render_list();
    }

    /// Click on empty map space: clear the selection, close the popup.
    pub fn map_background_clicked(&mut self) {
        self.map.close_popup();
        if self.view.active_id.take().is_some() {
            self.render_list();
        }
    }

    /// A (debounced) search input change. Filtering never touches the
    /// active selection: a selected point filtered out of the list stays
    /// selected on the map and reappears when the filter relaxes.
    pub fn search_changed(&mut self, term: &str) {
        self.view.search_term = term.to_string();
        self.render_list();
    }

    fn render_markers(&mut self) {
        self.map.clear_markers();
        for point in self.session.points() {
            self.map.place_marker(point);
        }
    }

    fn render_list(&mut self) {
        let active_id = self.view.active_id;
        let cards = self
            .session
            .visible_points(&self.view.search_term)
            .into_iter()
            .map(|point| card_for(point, active_id))
            .collect();
        self.panel.render_list(&ListViewModel {
            cards,
            search_active: !self.view.search_term.trim().is_empty(),
        });
    }

    fn push_location_status(&mut self) {
        let indicator = match self.tracker.state() {
            LocationState::Idle | LocationState::Detecting => LocationIndicator::Detecting,
            LocationState::Located(_) => LocationIndicator::Located,
            LocationState::Error(_) => LocationIndicator::Error,
        };
        self.panel
            .set_location_status(indicator, self.tracker.status_text());
    }
}

/// Human-readable availability for popups and cards.
#[must_use]
pub fn availability_label(point: &ChargingPoint) -> String {
    match point.status {
        Status::Available | Status::Partial => {
            format!("{}/{} Available", point.available_lots, point.total_lots)
        }
        Status::Occupied => "Fully Occupied".to_string(),
        Status::Unknown => "Status Unknown".to_string(),
    }
}

fn card_for(point: &ChargingPoint, active_id: Option<usize>) -> Card {
    Card {
        id: point.id,
        address: point.address.clone(),
        postal_code: point.postal_code.clone(),
        operator: point.operator.clone(),
        charger_type: point.charger_type.clone(),
        status: point.status,
        availability_label: availability_label(point),
        distance_label: point.distance_km.map(format_distance),
        active: active_id == Some(point.id),
    }
}

#[cfg(test)]
mod tests {
    use chargemap_core::classify;

    use super::*;
    use crate::geoloc::PositionError;

    /// Records every surface call for assertion.
    #[derive(Debug, Default)]
    struct RecordingMap {
        markers: Vec<usize>,
        user_marker: Option<UserPosition>,
        pans: Vec<UserPosition>,
        zooms: Vec<u8>,
        open_popups: Vec<usize>,
        close_popup_calls: usize,
        clear_calls: usize,
    }

    impl MapSurface for RecordingMap {
        fn clear_markers(&mut self) {
            self.clear_calls += 1;
            self.markers.clear();
        }
        fn place_marker(&mut self, point: &ChargingPoint) {
            self.markers.push(point.id);
        }
        fn place_user_marker(&mut self, position: UserPosition) {
            self.user_marker = Some(position);
        }
        fn pan_to(&mut self, position: UserPosition) {
            self.pans.push(position);
        }
        fn set_zoom(&mut self, zoom: u8) {
            self.zooms.push(zoom);
        }
        fn open_popup(&mut self, point: &ChargingPoint) {
            self.open_popups.push(point.id);
        }
        fn close_popup(&mut self) {
            self.close_popup_calls += 1;
        }
    }

    #[derive(Debug, Default)]
    struct RecordingPanel {
        lists: Vec<ListViewModel>,
        scrolls: Vec<usize>,
        counts: Vec<usize>,
        statuses: Vec<(LocationIndicator, String)>,
        banners: Vec<String>,
    }

    impl PanelSurface for RecordingPanel {
        fn render_list(&mut self, list: &ListViewModel) {
            self.lists.push(list.clone());
        }
        fn scroll_to(&mut self, id: usize) {
            self.scrolls.push(id);
        }
        fn set_total_count(&mut self, count: usize) {
            self.counts.push(count);
        }
        fn set_location_status(&mut self, indicator: LocationIndicator, text: &str) {
            self.statuses.push((indicator, text.to_string()));
        }
        fn show_error_banner(&mut self, message: &str) {
            self.banners.push(message.to_string());
        }
    }

    fn point(id: usize, lat: f64, lng: f64) -> ChargingPoint {
        ChargingPoint {
            id,
            serial_number: None,
            address: format!("{id} Orchard Road"),
            postal_code: format!("{:06}", 238_800 + id),
            operator: "SP Mobility".to_string(),
            charger_type: "AC Type 2".to_string(),
            latitude: lat,
            longitude: lng,
            total_lots: 4,
            available_lots: 2,
            status: classify(2, 4),
            distance_km: None,
        }
    }

    fn here() -> UserPosition {
        UserPosition {
            lat: 1.3521,
            lng: 103.8198,
        }
    }

    fn coordinator() -> Coordinator<RecordingMap, RecordingPanel> {
        Coordinator::new(RecordingMap::default(), RecordingPanel::default())
    }

    #[test]
    fn feed_load_plots_markers_and_renders_list() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);

        assert_eq!(c.map().markers, vec![0, 1]);
        assert_eq!(c.panel().counts, vec![2]);
        let list = c.panel().lists.last().unwrap();
        assert_eq!(list.cards.len(), 2);
        assert!(!list.search_active);
        assert!(list.cards.iter().all(|card| card.distance_label.is_none()));
    }

    #[test]
    fn feed_failure_shows_banner_only() {
        let mut c = coordinator();
        c.feed_failed();
        assert_eq!(
            c.panel().banners,
            vec!["Failed to load charging points. Please refresh the page.".to_string()]
        );
        assert!(c.panel().lists.is_empty());
    }

    #[test]
    fn position_fix_ranks_marks_and_centers_once() {
        let mut c = coordinator();
        c.start_locating(true);
        c.feed_loaded(vec![point(0, 1.45, 103.95), point(1, 1.3525, 103.8200)]);
        c.position_fix(here());

        assert_eq!(c.map().user_marker, Some(here()));
        assert_eq!(c.map().pans, vec![here()]);
        let list = c.panel().lists.last().unwrap();
        assert_eq!(list.cards[0].id, 1, "nearest point should lead the list");
        assert!(list.cards.iter().all(|card| card.distance_label.is_some()));

        c.position_fix(here());
        assert_eq!(c.map().pans.len(), 1, "center-on-user must fire once");
    }

    #[test]
    fn position_resolving_before_feed_still_ranks() {
        let mut c = coordinator();
        c.start_locating(true);
        c.position_fix(here());
        c.feed_loaded(vec![point(0, 1.45, 103.95), point(1, 1.3525, 103.8200)]);

        let list = c.panel().lists.last().unwrap();
        assert_eq!(list.cards[0].id, 1);
        assert!(list.cards.iter().all(|card| card.distance_label.is_some()));
    }

    #[test]
    fn denied_geolocation_keeps_everything_usable() {
        let mut c = coordinator();
        c.start_locating(true);
        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);
        c.position_failed(PositionError::Denied);

        let (indicator, text) = c.panel().statuses.last().unwrap();
        assert_eq!(*indicator, LocationIndicator::Error);
        assert_eq!(text, "Location permission denied");

        let list = c.panel().lists.last().unwrap();
        assert!(list.cards.iter().all(|card| card.distance_label.is_none()));

        c.marker_clicked(1);
        assert_eq!(c.view().active_id, Some(1));
        assert_eq!(c.map().open_popups, vec![1]);
    }

    #[test]
    fn marker_click_opens_popup_and_scrolls() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);
        c.marker_clicked(0);

        assert_eq!(c.map().close_popup_calls, 1);
        assert_eq!(c.map().open_popups, vec![0]);
        assert_eq!(c.panel().scrolls, vec![0]);

        let list = c.panel().lists.last().unwrap();
        let active: Vec<usize> = list
            .cards
            .iter()
            .filter(|card| card.active)
            .map(|card| card.id)
            .collect();
        assert_eq!(active, vec![0], "exactly one active card");
    }

    #[test]
    fn selecting_another_point_replaces_popup_and_active_card() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);
        c.marker_clicked(0);
        c.marker_clicked(1);

        assert_eq!(c.map().close_popup_calls, 2);
        assert_eq!(c.map().open_popups, vec![0, 1]);
        let list = c.panel().lists.last().unwrap();
        let active: Vec<usize> = list
            .cards
            .iter()
            .filter(|card| card.active)
            .map(|card| card.id)
            .collect();
        assert_eq!(active, vec![1]);
    }

    #[test]
    fn card_click_pans_and_zooms_to_station() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80)]);
        c.card_clicked(0);

        assert_eq!(c.map().pans.len(), 1);
        assert!((c.map().pans[0].lat - 1.30).abs() < 1e-12);
        assert_eq!(c.map().zooms, vec![MARKER_ZOOM]);
        assert_eq!(c.map().open_popups, vec![0]);
        assert_eq!(c.view().active_id, Some(0));
    }

    #[test]
    fn background_click_clears_selection() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80)]);
        c.marker_clicked(0);
        c.map_background_clicked();

        assert!(c.view().active_id.is_none());
        let list = c.panel().lists.last().unwrap();
        assert!(list.cards.iter().all(|card| !card.active));
    }

    #[test]
    fn search_filters_without_touching_selection() {
        let mut c = coordinator();
        let mut far = point(0, 1.30, 103.80);
        far.address = "Jurong East".to_string();
        let near = point(1, 1.31, 103.81);
        c.feed_loaded(vec![far, near]);
        c.marker_clicked(0);

        c.search_changed("orchard");
        let list = c.panel().lists.last().unwrap();
        assert_eq!(list.cards.len(), 1);
        assert_eq!(list.cards[0].id, 1);
        assert!(list.search_active);
        assert_eq!(
            c.view().active_id,
            Some(0),
            "filtered-out selection stays selected"
        );

        c.search_changed("");
        let list = c.panel().lists.last().unwrap();
        assert_eq!(list.cards.len(), 2);
        assert!(list.cards[0].active || list.cards[1].active);
    }

    #[test]
    fn refresh_clears_selection_when_point_disappears() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);
        c.marker_clicked(1);

        let close_before = c.map().close_popup_calls;
        c.feed_loaded(vec![point(0, 1.30, 103.80)]);
        assert!(c.view().active_id.is_none());
        assert!(c.map().close_popup_calls > close_before);

        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);
        assert!(
            c.view().active_id.is_none(),
            "selection does not resurrect on refresh"
        );
    }

    #[test]
    fn refresh_keeps_selection_when_point_survives() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);
        c.marker_clicked(1);
        c.feed_loaded(vec![point(0, 1.30, 103.80), point(1, 1.31, 103.81)]);
        assert_eq!(c.view().active_id, Some(1));
    }

    #[test]
    fn clicks_on_unknown_ids_are_ignored() {
        let mut c = coordinator();
        c.feed_loaded(vec![point(0, 1.30, 103.80)]);
        c.marker_clicked(99);
        c.card_clicked(99);
        assert!(c.view().active_id.is_none());
        assert!(c.map().open_popups.is_empty());
    }

    #[test]
    fn availability_labels_cover_all_statuses() {
        let mut p = point(0, 1.3, 103.8);
        assert_eq!(availability_label(&p), "2/4 Available");
        p.available_lots = 0;
        p.status = classify(0, 4);
        assert_eq!(availability_label(&p), "Fully Occupied");
        p.total_lots = 0;
        p.status = classify(0, 0);
        assert_eq!(availability_label(&p), "Status Unknown");
        p.total_lots = 4;
        p.available_lots = 4;
        p.status = classify(4, 4);
        assert_eq!(availability_label(&p), "4/4 Available");
    }
}
