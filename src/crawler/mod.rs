//! Crawler module for walking the database and fetching tables
//!
//! This module contains the crawl strategies, including:
//! - Random walks from the current folder down to some table
//! - Direct walks to a known table path
//! - The session history of fetched tables

mod history;
mod session;

pub use history::{History, HistoryEntry};
pub use session::{Session, MAX_CONSECUTIVE_FAILURES};
