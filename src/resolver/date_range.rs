use crate::config::DateRangeConfig;
use crate::ConfigError;
use chrono::{Datelike, NaiveDate};

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Session date range used for the year dimension when no selector is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// Half-open year range `start..end`
    Years { start: i32, end: i32 },
    /// Calendar dates; covers every year from `start` through `end`
    Calendar { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn years(start: i32, end: i32) -> Result<Self, ConfigError> {
        if start >= end {
            return Err(ConfigError::Validation(format!(
                "year range {}..{} is empty",
                start, end
            )));
        }
        Ok(Self::Years { start, end })
    }

    /// Parses two `dd.mm.yyyy` dates
    pub fn calendar(start: &str, end: &str) -> Result<Self, ConfigError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        if start > end {
            return Err(ConfigError::Validation(format!(
                "start date {} is after end date {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            )));
        }
        Ok(Self::Calendar { start, end })
    }

    /// Builds the configured range, if any
    pub fn from_config(config: &DateRangeConfig) -> Result<Option<Self>, ConfigError> {
        let years = (config.year_start, config.year_end);
        let dates = (config.start_date.as_deref(), config.end_date.as_deref());

        match (years, dates) {
            ((None, None), (None, None)) => Ok(None),
            ((Some(start), Some(end)), (None, None)) => Self::years(start, end).map(Some),
            ((None, None), (Some(start), Some(end))) => Self::calendar(start, end).map(Some),
            ((None, None), _) | (_, (None, None)) => Err(ConfigError::Validation(
                "date-range needs both a start and an end".to_string(),
            )),
            _ => Err(ConfigError::Validation(
                "date-range takes either years or dates, not both".to_string(),
            )),
        }
    }

    /// The year values this range selects, as they appear in a year dimension
    pub fn year_values(&self) -> Vec<String> {
        match *self {
            Self::Years { start, end } => (start..end).map(|year| year.to_string()).collect(),
            Self::Calendar { start, end } => (start.year()..=end.year())
                .map(|year| year.to_string())
                .collect(),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        ConfigError::Validation(format!("invalid date '{}' (expected dd.mm.yyyy): {}", value, e))
    })
}
