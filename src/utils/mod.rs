//! Utility modules supporting the search pipeline.
//!
//! - [`HttpClient`]: reqwest client with a fixed per-request timeout and crate user agent

mod http;

pub use http::{HttpClient, USER_AGENT};
