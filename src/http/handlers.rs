//! Route handlers.

use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::http::request::request_id;
use crate::http::response::ProxyError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{QueryParams, UpstreamQuery};

pub const ROOT_GREETING: &str = "hello instafood lovers !!! ";

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({ "test": ROOT_GREETING }))
}

/// Proxy one inbound query to its upstream endpoint and relay the JSON.
///
/// Shared by every `/api/*` route; `Q` decides the upstream URL.
pub async fn proxy_get<Q: UpstreamQuery>(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let query = Q::from_params(QueryParams::parse(raw_query.as_deref()));

    let response = match relay(&state, &query, request_id).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    };

    metrics::record_request(Q::ROUTE, response.status().as_u16(), start);
    response
}

async fn relay<Q: UpstreamQuery>(
    state: &AppState,
    query: &Q,
    request_id: &str,
) -> Result<Value, ProxyError> {
    let url = query
        .upstream_url(state.upstream.base_url(), state.param_mode)
        .inspect_err(|e| {
            tracing::warn!(request_id = %request_id, route = Q::ROUTE, error = %e, "Rejected query parameters");
        })?;

    tracing::debug!(
        request_id = %request_id,
        route = Q::ROUTE,
        upstream_url = %url,
        "Proxying request"
    );

    let body = state.upstream.fetch_json(&url).await.inspect_err(|e| {
        tracing::error!(
            request_id = %request_id,
            route = Q::ROUTE,
            kind = e.kind(),
            error = %e,
            "Upstream fetch failed"
        );
        metrics::record_upstream_failure(Q::ROUTE, e.kind());
    })?;

    Ok(body)
}
