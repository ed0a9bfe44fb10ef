//! Output sink traits
//!
//! A sink receives the header plus rows of a fetched table and shapes them
//! for the caller. Any sink must treat the first row as headers and the first
//! column as the row key.

use crate::config::OutputMode;
use crate::output::{Dataset, LabeledTable, TableOutput};

/// Shapes a fetched dataset
pub trait TableSink {
    type Output;

    /// Consumes the dataset and produces the sink's output
    fn accept(&self, dataset: Dataset) -> Self::Output;
}

/// Hands back the dataset unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRows;

impl TableSink for RawRows {
    type Output = Dataset;

    fn accept(&self, dataset: Dataset) -> Dataset {
        dataset
    }
}

impl TableSink for OutputMode {
    type Output = TableOutput;

    fn accept(&self, dataset: Dataset) -> TableOutput {
        match self {
            OutputMode::Labeled => TableOutput::Labeled(LabeledTable::from_dataset(dataset)),
            OutputMode::Raw => TableOutput::Raw(dataset),
        }
    }
}
