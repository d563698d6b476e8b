#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # AltTrend-Integration
//! Low-level Http plumbing shared by every AltTrend component that talks to a remote API.
//!
//! ## Core abstractions:
//! - **RestRequest** describing a single Http endpoint: path, method, query, Json body or
//!   multipart form, and the expected response type.
//! - **RestClient** executing [`RestRequest`](protocol::http::rest::RestRequest)s with a
//!   configurable [`BuildStrategy`](protocol::http::BuildStrategy) and
//!   [`HttpParser`](protocol::http::HttpParser), measuring each round trip as a [`Metric`](metric::Metric).
//! - **RateLimiter** token bucket used to keep a client within an API's request-weight budget.

#[cfg(test)]
use axum as _;

/// All [`Error`](std::error::Error)s generated in AltTrend-Integration.
pub mod error;

/// Http protocol abstractions: [`RestRequest`](protocol::http::rest::RestRequest),
/// [`RestClient`](protocol::http::rest::client::RestClient) & friends.
pub mod protocol;

/// Contains the flexible `Metric` type used for representing request measurements generically.
pub mod metric;

/// Utilities to assist deserialisation.
pub mod de;

/// Token bucket [`RateLimiter`](rate_limit::RateLimiter) with adaptive backoff.
pub mod rate_limit;

pub mod collection;

