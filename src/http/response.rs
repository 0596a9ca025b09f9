//! Mapping proxy failures onto client responses.
//!
//! Upstream failures of any kind collapse to a generic 500 with a
//! plain-text body; the caller never sees the upstream status or body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::upstream::{ParamError, UpstreamError};

pub const UPSTREAM_FAILURE_MESSAGE: &str = "An error occurred while fetching data";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    InvalidParams(#[from] ParamError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::InvalidParams(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            ProxyError::Upstream(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_MESSAGE).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    #[test]
    fn upstream_failure_is_plain_text_500() {
        let response =
            ProxyError::Upstream(UpstreamError::Status(reqwest::StatusCode::NOT_FOUND))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }

    #[test]
    fn bad_params_are_400() {
        let response = ProxyError::from(ParamError::Missing("lat")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
