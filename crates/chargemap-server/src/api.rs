//! Proxy routes.
//!
//! The proxy exists so browser clients can read the feed without holding the
//! DataMall account key. The key is attached server-side as a request
//! header; successful upstream bodies pass through untouched, upstream
//! failure statuses are preserved, and the key never appears in any
//! response, error payload, or log line.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Shared proxy state: one upstream client plus the credential.
#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    account_key: Arc<str>,
    endpoint: reqwest::Url,
}

impl AppState {
    /// Builds the upstream client and resolves the feed endpoint URL.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed or `base_url` does
    /// not parse.
    pub fn new(account_key: &str, base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("chargemap/0.1 (feed-proxy)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = reqwest::Url::parse(&normalised)?.join("EVChargingPoints")?;

        Ok(Self {
            client,
            account_key: Arc::from(account_key),
            endpoint,
        })
    }
}

/// Error payload returned to callers. Never carries upstream credentials.
#[derive(Debug, Serialize)]
pub struct ProxyErrorBody {
    pub error: String,
    pub details: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    request_id: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    skip: Option<usize>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/healthz", get(health));

    let proxied = Router::new()
        .route("/api/charging-points", get(charging_points))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ));

    Router::new()
        .merge(public_routes)
        .merge(proxied)
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        request_id: req_id.0,
        timestamp: Utc::now(),
    })
}

/// Forwards one feed page upstream, attaching the credential header.
async fn charging_points(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Response {
    let skip = query.skip.unwrap_or(0);
    let mut url = state.endpoint.clone();
    url.query_pairs_mut()
        .append_pair("$skip", &skip.to_string());

    let upstream = state
        .client
        .get(url)
        .header("AccountKey", state.account_key.as_ref())
        .header("accept", "application/json")
        .send()
        .await;

    match upstream {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                match response.bytes().await {
                    Ok(body) => (
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                        .into_response(),
                    Err(error) => {
                        tracing::error!(error = %error, "failed to read upstream body");
                        bad_gateway()
                    }
                }
            } else {
                // Pass the upstream failure status through transparently so
                // clients can distinguish throttling from outages.
                tracing::warn!(status = status.as_u16(), skip, "upstream feed error");
                let passthrough = StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    passthrough,
                    Json(ProxyErrorBody {
                        error: "Failed to fetch charging points".to_string(),
                        details: format!("upstream returned {}", status.as_u16()),
                    }),
                )
                    .into_response()
            }
        }
        Err(error) => {
            tracing::error!(error = %error, "upstream request failed");
            bad_gateway()
        }
    }
}

fn bad_gateway() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ProxyErrorBody {
            error: "Failed to fetch charging points".to_string(),
            details: "could not reach the upstream feed".to_string(),
        }),
    )
        .into_response()
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}
