//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (permissive CORS headers, preflight answered here)
//!     → handlers (query parameters validated only in strict mode,
//!       see upstream::endpoints)
//! ```

pub mod cors;

pub use cors::cors_layer;
