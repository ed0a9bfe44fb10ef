//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; an empty file yields the Statistics Finland defaults.
//!
//! # Example
//!
//! ```no_run
//! use statfin_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("statfin.toml")).unwrap();
//! println!("Root URL: {}", config.api.root_url().unwrap());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, CrawlerConfig, DateRangeConfig, DefaultValues, OutputConfig, OutputMode,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
