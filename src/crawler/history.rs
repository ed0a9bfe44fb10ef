use chrono::{DateTime, Utc};
use url::Url;

/// A table fetched during the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
    pub url: Url,
    pub fetched_at: DateTime<Utc>,
}

/// Append-only record of fetched tables
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, title: impl Into<String>, url: Url) {
        self.entries.push(HistoryEntry {
            title: title.into(),
            url,
            fetched_at: Utc::now(),
        });
    }

    /// Location at which a table was most recently fetched
    pub fn get(&self, title: &str) -> Option<&Url> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.title == title)
            .map(|entry| &entry.url)
    }

    /// Distinct titles in the order they were first fetched
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !titles.contains(&entry.title.as_str()) {
                titles.push(&entry.title);
            }
        }
        titles
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
