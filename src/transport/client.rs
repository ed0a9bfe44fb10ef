//! HTTP transport implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a proper user agent string
//! - GET requests for navigation and POST requests for table queries
//! - Status code classification
//! - Pacing after every request

use crate::config::CrawlerConfig;
use crate::transport::pacing::{FixedDelay, Pacer};
use crate::{ConfigError, Result, StatError};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Body of a response that passed status checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Raw response bytes
    Body(Vec<u8>),
    /// HTTP 204; the caller gets an empty result
    NoContent,
}

/// Classification of a non-error status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Content,
    NoContent,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use statfin_crawler::config::CrawlerConfig;
/// use statfin_crawler::transport::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> std::result::Result<Client, reqwest::Error> {
    let user_agent = format!("statfin-crawler/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a status code to an outcome
///
/// | Status | Outcome |
/// |--------|---------|
/// | 204 | `NoContent`, logged as a warning |
/// | 4xx, 5xx | `StatError::HttpStatus` |
/// | 2xx | `Content` |
/// | anything else | `Content`, logged as undefined |
pub fn check_status(url: &Url, status: StatusCode) -> Result<StatusOutcome> {
    if status == StatusCode::NO_CONTENT {
        tracing::warn!("No content. URL: {}", url);
        return Ok(StatusOutcome::NoContent);
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(StatError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            description: describe_status(status),
        });
    }

    if !status.is_success() {
        tracing::warn!("Status code not defined ({}) URL: {}", status.as_u16(), url);
    }

    Ok(StatusOutcome::Content)
}

fn describe_status(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        410 => "Gone",
        429 => "Too Many Requests",
        500..=599 => "Server Error",
        _ => "Client Error",
    }
}

/// Paced HTTP transport shared by the navigator and the fetcher
pub struct Transport {
    client: Client,
    pacer: Box<dyn Pacer>,
    debug: bool,
}

impl Transport {
    pub fn new(client: Client, pacer: impl Pacer + 'static, debug: bool) -> Self {
        Self {
            client,
            pacer: Box::new(pacer),
            debug,
        }
    }

    /// Builds a transport with a fixed delay derived from the request budget
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        let client = build_http_client(config).map_err(ConfigError::HttpClient)?;
        let pacer = FixedDelay::from_rate(config.requests_per_second)?;
        Ok(Self::new(client, pacer, config.debug))
    }

    /// Swaps the pacing policy
    pub fn set_pacer(&mut self, pacer: impl Pacer + 'static) {
        self.pacer = Box::new(pacer);
    }

    pub fn pause(&self) -> Duration {
        self.pacer.pause()
    }

    /// Sends a GET request
    pub async fn get(&self, url: &Url) -> Result<Payload> {
        self.execute(self.client.get(url.clone()), url).await
    }

    /// Sends a POST request with a JSON body
    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &Url, body: &T) -> Result<Payload> {
        self.execute(self.client.post(url.clone()).json(body), url)
            .await
    }

    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Payload> {
        if self.debug {
            tracing::info!("Requesting {}", url);
        } else {
            tracing::debug!("Requesting {}", url);
        }

        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status();
                if self.debug {
                    tracing::info!("Status {}", status.as_u16());
                } else {
                    tracing::debug!("Status {} for {}", status.as_u16(), url);
                }

                match check_status(url, status) {
                    Ok(StatusOutcome::NoContent) => Ok(Payload::NoContent),
                    Ok(StatusOutcome::Content) => response
                        .bytes()
                        .await
                        .map(|bytes| Payload::Body(bytes.to_vec()))
                        .map_err(|source| StatError::Http {
                            url: url.to_string(),
                            source,
                        }),
                    Err(e) => Err(e),
                }
            }
            Err(source) => Err(StatError::Http {
                url: url.to_string(),
                source,
            }),
        };

        tokio::time::sleep(self.pacer.pause()).await;

        outcome
    }
}
