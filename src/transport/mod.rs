//! Transport layer for talking to the PXWeb API
//!
//! This module contains:
//! - HTTP client construction with user agent and timeouts
//! - GET and POST requests with status classification
//! - Request pacing applied after every request

mod client;
mod pacing;

pub use client::{build_http_client, check_status, Payload, StatusOutcome, Transport};
pub use pacing::{FixedDelay, Pacer};
