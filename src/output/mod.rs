//! Output module for fetched tables
//!
//! This module handles:
//! - The raw header plus rows returned by a table query
//! - Adapting rows into a labeled table keyed by the first column
//! - Exporting rows as CSV

mod traits;

pub use traits::{RawRows, TableSink};

use crate::config::OutputMode;
use std::io::Write;
use std::path::Path;

/// Header row plus data rows of a fetched table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the header and rows as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the dataset to a CSV file
    pub fn save_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

/// Rows keyed by their first column
///
/// `index_name` is the first header, `columns` the remaining headers, and
/// each row's first cell becomes its key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledTable {
    pub index_name: String,
    pub columns: Vec<String>,
    pub index: Vec<String>,
    pub data: Vec<Vec<String>>,
}

impl LabeledTable {
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut headers = dataset.headers.into_iter();
        let index_name = headers.next().unwrap_or_default();
        let columns = headers.collect();

        let (index, data) = dataset
            .rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter();
                let key = cells.next().unwrap_or_default();
                (key, cells.collect::<Vec<_>>())
            })
            .unzip();

        Self {
            index_name,
            columns,
            index,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Cells of the first row with this key
    pub fn row(&self, key: &str) -> Option<&[String]> {
        self.index
            .iter()
            .position(|k| k == key)
            .map(|i| self.data[i].as_slice())
    }

    /// Cell at a row key and column header
    pub fn get(&self, key: &str, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.row(key)?.get(col).map(String::as_str)
    }

    /// Back to header plus rows
    pub fn into_dataset(self) -> Dataset {
        let mut headers = vec![self.index_name];
        headers.extend(self.columns);

        let rows = self
            .index
            .into_iter()
            .zip(self.data)
            .map(|(key, cells)| {
                let mut row = vec![key];
                row.extend(cells);
                row
            })
            .collect();

        Dataset::new(headers, rows)
    }
}

/// A fetched table in the configured output shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutput {
    Labeled(LabeledTable),
    Raw(Dataset),
}

impl TableOutput {
    pub fn len(&self) -> usize {
        match self {
            Self::Labeled(table) => table.len(),
            Self::Raw(dataset) => dataset.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_dataset(self) -> Dataset {
        match self {
            Self::Labeled(table) => table.into_dataset(),
            Self::Raw(dataset) => dataset,
        }
    }
}

/// Adapts a dataset to the configured output mode
pub fn adapt(dataset: Dataset, mode: OutputMode) -> TableOutput {
    mode.accept(dataset)
}
