//! Session startup: the two independent one-shot operations.
//!
//! The data fetch and the geolocation request start together and are
//! awaited concurrently; neither is ordered relative to the other, and a
//! failure of one never masks the success of the other. The coordinator's
//! update methods commute — position-then-feed and feed-then-position
//! produce the same rendered state — so the results can be folded in as a
//! pair.

use std::future::Future;

use chargemap_core::ChargingPoint;

use crate::geoloc::{LocateOptions, PositionProvider};
use crate::surface::{MapSurface, PanelSurface};
use crate::view::Coordinator;

/// Runs one session start: await the feed and the position fix together,
/// then fold both outcomes into the coordinator.
///
/// `provider` is `None` when the platform has no positioning capability at
/// all; the tracker then reports "unsupported" without issuing a request.
pub async fn run_session<M, P, F, E, L>(
    coordinator: &mut Coordinator<M, P>,
    feed: F,
    provider: Option<&L>,
    options: LocateOptions,
) where
    M: MapSurface,
    P: PanelSurface,
    F: Future<Output = Result<Vec<ChargingPoint>, E>>,
    E: std::fmt::Display,
    L: PositionProvider,
{
    coordinator.start_locating(provider.is_some());

    let fix = async {
        match provider {
            Some(p) => Some(p.locate(options).await),
            None => None,
        }
    };

    let (feed_result, fix_result) = futures::join!(feed, fix);

    match feed_result {
        Ok(points) => coordinator.feed_loaded(points),
        Err(error) => {
            tracing::error!(error = %error, "initial feed load failed");
            coordinator.feed_failed();
        }
    }

    match fix_result {
        Some(Ok(position)) => coordinator.position_fix(position),
        Some(Err(error)) => {
            tracing::warn!(error = %error, "geolocation failed");
            coordinator.position_failed(error);
        }
        None => {}
    }
}
