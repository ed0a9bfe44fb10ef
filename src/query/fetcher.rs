//! Posting table queries and decoding the delimited response

use crate::output::Dataset;
use crate::query::QueryBody;
use crate::transport::{Payload, Transport};
use crate::{Result, StatError};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8};
use url::Url;

/// Looks up encodings by label, skipping unknown ones
pub fn resolve_encodings(labels: &[String]) -> Vec<&'static Encoding> {
    labels
        .iter()
        .filter_map(|label| {
            let encoding = Encoding::for_label(label.as_bytes());
            if encoding.is_none() {
                tracing::warn!("Ignoring unknown encoding '{}'", label);
            }
            encoding
        })
        .collect()
}

/// Decodes a body as UTF-8, then as each fallback in order
///
/// Servers sometimes mislabel Latin-1 content, so the declared charset is ignored.
pub fn decode_body(bytes: &[u8], fallbacks: &[&'static Encoding]) -> Option<String> {
    std::iter::once(UTF_8)
        .chain(fallbacks.iter().copied())
        .find_map(|encoding| {
            let decoded = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
            if encoding != UTF_8 {
                tracing::debug!("Body decoded as {}", encoding.name());
            }
            Some(decoded.into_owned())
        })
}

/// Parses comma-delimited text; the first row is the header
pub fn parse_rows(text: &str) -> std::result::Result<Dataset, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Dataset::new(headers, rows))
}

/// Posts a query to a table URL and returns the decoded rows
///
/// An HTTP 204 yields an empty dataset.
pub async fn fetch(
    transport: &Transport,
    url: &Url,
    query: &QueryBody,
    fallbacks: &[&'static Encoding],
) -> Result<Dataset> {
    let bytes = match transport.post_json(url, query).await? {
        Payload::NoContent => return Ok(Dataset::default()),
        Payload::Body(bytes) => bytes,
    };

    let text = decode_body(&bytes, fallbacks).ok_or_else(|| StatError::MalformedResponse {
        url: url.to_string(),
        message: "body is neither UTF-8 nor any fallback encoding".to_string(),
    })?;

    parse_rows(&text).map_err(|e| StatError::MalformedResponse {
        url: url.to_string(),
        message: format!("invalid delimited data: {}", e),
    })
}
