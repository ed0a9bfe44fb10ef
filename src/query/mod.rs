//! Table queries
//!
//! This module contains:
//! - Building the POST body from a resolved selection
//! - Posting it and decoding the delimited response into rows

mod builder;
mod fetcher;

pub use builder::{
    build_query, ItemSelection, QueryBody, QueryClause, ResponseFormat, DEFAULT_FORMAT,
};
pub use fetcher::{decode_body, fetch, parse_rows, resolve_encodings};
