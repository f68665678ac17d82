//! HTTP/REST API layer for Parley.
//!
//! Axum-based REST API at `/api/v1/` exposing the four chat and image
//! operations, with envelope responses and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
