use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use crate::ConfigError;

/// Main configuration structure for a crawler session
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "date-range")]
    pub date_range: DateRangeConfig,
    /// Session-level default selections keyed by variable code or text
    #[serde(default)]
    pub defaults: BTreeMap<String, DefaultValues>,
}

/// Segments of the PXWeb base URL:
/// `{host}/{api-name}/{api-version}/{language}/{database-id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Scheme, host and any fixed prefix (e.g. `http://pxnet2.stat.fi/PXWeb`)
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_api_name")]
    pub api_name: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Database identifier; an empty string omits the segment
    #[serde(default = "default_database_id")]
    pub database_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_name: default_api_name(),
            api_version: default_api_version(),
            language: default_language(),
            database_id: default_database_id(),
        }
    }
}

impl ApiConfig {
    /// Builds the root URL every navigation path is rooted at
    pub fn root_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.host)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host '{}': {}", self.host, e)))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ConfigError::InvalidUrl(format!("Host '{}' cannot be a base URL", self.host))
            })?;
            segments
                .pop_if_empty()
                .extend([&self.api_name, &self.api_version, &self.language]);
            if !self.database_id.is_empty() {
                segments.push(&self.database_id);
            }
        }

        Ok(url)
    }
}

/// Request behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Request budget; the transport pauses `1 / requests_per_second` after every request
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log every request URL and status at info level
    #[serde(default)]
    pub debug: bool,

    /// Encodings tried, in order, when a response body is not valid UTF-8
    #[serde(default = "default_fallback_encodings")]
    pub fallback_encodings: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_timeout_secs(),
            debug: false,
            fallback_encodings: default_fallback_encodings(),
        }
    }
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How fetched tables are handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Rows keyed by their first column
    #[default]
    Labeled,
    /// Header plus plain rows
    Raw,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Labeled => "labeled",
            Self::Raw => "raw",
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,

    /// Response format requested from the API
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            format: default_format(),
        }
    }
}

/// Optional date range consulted for the year dimension
///
/// Either the year pair or the calendar pair may be given, not both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DateRangeConfig {
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    /// `dd.mm.yyyy`
    pub start_date: Option<String>,
    /// `dd.mm.yyyy`
    pub end_date: Option<String>,
}

/// A default selection: a single value or a list of values
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValues {
    One(String),
    Many(Vec<String>),
}

impl DefaultValues {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

fn default_host() -> String {
    "http://pxnet2.stat.fi/PXWeb".to_string()
}

fn default_api_name() -> String {
    "api".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_database_id() -> String {
    "StatFin".to_string()
}

fn default_requests_per_second() -> f64 {
    2.0
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_fallback_encodings() -> Vec<String> {
    vec!["iso-8859-1".to_string()]
}

fn default_format() -> String {
    "csv".to_string()
}
