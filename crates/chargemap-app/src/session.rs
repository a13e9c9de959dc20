//! The working collection and its user-relative ranking.

use chargemap_core::{haversine_km, ChargingPoint, UserPosition};

/// In-memory session state: the current working collection plus the optional
/// user position. The collection is rebuilt wholesale on every fetch; there
/// is no incremental patching.
#[derive(Debug, Default)]
pub struct SessionState {
    points: Vec<ChargingPoint>,
    user_position: Option<UserPosition>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points(&self) -> &[ChargingPoint] {
        &self.points
    }

    #[must_use]
    pub fn user_position(&self) -> Option<UserPosition> {
        self.user_position
    }

    #[must_use]
    pub fn point(&self, id: usize) -> Option<&ChargingPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: usize) -> bool {
        self.point(id).is_some()
    }

    /// Replaces the working collection. When a user position is already
    /// known, distances are recomputed and the new collection is re-ranked
    /// immediately, so the all-or-nothing distance invariant holds across
    /// refreshes.
    pub fn replace_points(&mut self, points: Vec<ChargingPoint>) {
        self.points = points;
        if let Some(position) = self.user_position {
            Self::rank(&mut self.points, position);
        }
    }

    /// Sets the user position and ranks the collection by distance.
    pub fn set_user_position(&mut self, position: UserPosition) {
        self.user_position = Some(position);
        Self::rank(&mut self.points, position);
    }

    /// Points matching the search term, in collection order. An empty term
    /// matches everything; matching is a case-insensitive substring test
    /// over address, postal code, and operator.
    #[must_use]
    pub fn visible_points(&self, search_term: &str) -> Vec<&ChargingPoint> {
        let term = search_term.trim().to_lowercase();
        self.points
            .iter()
            .filter(|p| Self::matches(p, &term))
            .collect()
    }

    fn matches(point: &ChargingPoint, term_lower: &str) -> bool {
        if term_lower.is_empty() {
            return true;
        }
        point.address.to_lowercase().contains(term_lower)
            || point.postal_code.to_lowercase().contains(term_lower)
            || point.operator.to_lowercase().contains(term_lower)
    }

    /// Attaches a distance to every point, then sorts ascending. Points
    /// without a distance order last; that branch is only reachable
    /// transiently, since distances are assigned all-or-nothing.
    fn rank(points: &mut [ChargingPoint], position: UserPosition) {
        for point in points.iter_mut() {
            point.distance_km = Some(haversine_km(
                position.lat,
                position.lng,
                point.latitude,
                point.longitude,
            ));
        }
        points.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }
}
