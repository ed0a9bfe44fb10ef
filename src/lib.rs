//! StatFin crawler: a polite walker for PXWeb statistical databases
//!
//! This crate navigates the folder tree of a PXWeb REST API, resolves the
//! caller's filter values against each table's variable domains and
//! retrieves the selected data as rows.

pub mod config;
pub mod crawler;
pub mod navigator;
pub mod node;
pub mod output;
pub mod query;
pub mod resolver;
pub mod transport;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum StatError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP error at connecting to {url}: code {status} ({description})")]
    HttpStatus {
        url: String,
        status: u16,
        description: &'static str,
    },

    #[error("Selection '{selection}' is invalid at {location}")]
    InvalidSelection { location: String, selection: String },

    #[error("Cannot {operation} at {location}")]
    InvalidState {
        location: String,
        operation: &'static str,
    },

    #[error("No navigable children at {location}")]
    DeadEnd { location: String },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Variable resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatError {
    /// Returns true for transport failures a caller may retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::HttpStatus { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors raised while resolving selectors against a table's variables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No values could be resolved for variable '{variable}'")]
    Unresolved { variable: String },

    #[error("Values not found for variable '{variable}': {}", values.join(", "))]
    InvalidValue {
        variable: String,
        values: Vec<String>,
    },
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, StatError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{History, Session};
pub use navigator::{Location, NavState, Navigator, Selection};
pub use node::{ChildRef, Node, TableDescriptor, VariableDomain};
pub use output::{Dataset, LabeledTable, TableOutput};
pub use resolver::{DateRange, ResolvedQuery, SelectorSet};
