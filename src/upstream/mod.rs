//! Upstream food-delivery service integration.
//!
//! # Data Flow
//! ```text
//! inbound query (RestaurantListQuery / MenuQuery)
//!     → endpoints.rs (render upstream URL, verbatim or strict)
//!     → client.rs (single GET with browser headers)
//!     → serde_json::Value passed back untouched
//! ```

pub mod client;
pub mod constants;
pub mod endpoints;
pub mod error;

pub use client::UpstreamClient;
pub use endpoints::{MenuQuery, ParamMode, QueryParams, RestaurantListQuery, UpstreamQuery};
pub use error::{ClientInitError, ParamError, UpstreamError};
