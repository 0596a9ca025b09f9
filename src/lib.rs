//! Instafood proxy library.
//!
//! A small CORS-friendly relay in front of a third-party food-delivery
//! API: browser calls come in on `/api/*`, go out once to the upstream
//! service with browser-like headers, and the JSON comes back untouched.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
