//! Variable resolution
//!
//! Turns the caller's selectors into the machine codes each table variable
//! is queried with. For every variable the candidate values come from the
//! first source that has an entry:
//!
//! 1. the selector set, keyed by the variable's code
//! 2. the selector set, keyed by the variable's text
//! 3. a session default, keyed by the variable's text
//! 4. a session default, keyed by the variable's code
//! 5. the session date range, for the year variable only
//!
//! With no source at all, every value of the domain is selected. Candidates
//! are then matched against the domain's codes, or else its labels.

mod date_range;
mod selectors;

pub use date_range::DateRange;
pub use selectors::{SelectorSet, SessionDefaults};

use crate::node::{TableDescriptor, VariableDomain};
use crate::ResolveError;

/// Code of the time dimension that the session date range applies to
pub const YEAR_VARIABLE_CODE: &str = "vuosi";

/// Where a variable's candidate values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    SelectorCode,
    SelectorText,
    DefaultText,
    DefaultCode,
    DateRange,
}

/// Machine codes to request for one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    pub code: String,
    pub values: Vec<String>,
}

/// Validated selection for every variable of a table, in table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedQuery {
    variables: Vec<ResolvedVariable>,
}

impl ResolvedQuery {
    pub fn new(variables: Vec<ResolvedVariable>) -> Self {
        Self { variables }
    }

    pub fn get(&self, code: &str) -> Option<&[String]> {
        self.variables
            .iter()
            .find(|variable| variable.code == code)
            .map(|variable| variable.values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedVariable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Resolves selectors against variable domains using session state
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver<'a> {
    defaults: &'a SessionDefaults,
    date_range: Option<&'a DateRange>,
}

impl<'a> VariableResolver<'a> {
    pub fn new(defaults: &'a SessionDefaults, date_range: Option<&'a DateRange>) -> Self {
        Self {
            defaults,
            date_range,
        }
    }

    /// Finds the candidate values for a variable, or `None` when nothing names it
    pub fn candidates(
        &self,
        domain: &VariableDomain,
        selectors: &SelectorSet,
    ) -> Option<(SelectionSource, Vec<String>)> {
        let found = selectors
            .get(&domain.code)
            .map(|values| (SelectionSource::SelectorCode, values))
            .or_else(|| {
                selectors
                    .get(&domain.text)
                    .map(|values| (SelectionSource::SelectorText, values))
            })
            .or_else(|| {
                self.defaults
                    .get(&domain.text)
                    .map(|values| (SelectionSource::DefaultText, values))
            })
            .or_else(|| {
                self.defaults
                    .get(&domain.code)
                    .map(|values| (SelectionSource::DefaultCode, values))
            });

        if let Some((source, values)) = found {
            return Some((source, values.to_vec()));
        }

        match self.date_range {
            Some(range) if domain.code.eq_ignore_ascii_case(YEAR_VARIABLE_CODE) => {
                Some((SelectionSource::DateRange, range.year_values()))
            }
            _ => None,
        }
    }

    /// Resolves one variable to the machine codes to request
    ///
    /// # Errors
    ///
    /// * `Unresolved` - a source names the variable but supplies no values
    /// * `InvalidValue` - some candidate is neither a code nor a label of the domain
    pub fn resolve_variable(
        &self,
        domain: &VariableDomain,
        selectors: &SelectorSet,
    ) -> Result<Vec<String>, ResolveError> {
        let Some((source, candidates)) = self.candidates(domain, selectors) else {
            tracing::trace!("No selector for '{}', selecting all values", domain.code);
            return Ok(domain.values.clone());
        };

        if candidates.is_empty() {
            return Err(ResolveError::Unresolved {
                variable: domain.code.clone(),
            });
        }

        tracing::trace!(
            "Resolving '{}' from {:?}: {:?}",
            domain.code,
            source,
            candidates
        );
        match_domain(domain, &candidates)
    }

    /// Resolves every variable of a table independently
    pub fn resolve_table(
        &self,
        table: &TableDescriptor,
        selectors: &SelectorSet,
    ) -> Result<ResolvedQuery, ResolveError> {
        let variables = table
            .variables
            .iter()
            .map(|domain| {
                self.resolve_variable(domain, selectors)
                    .map(|values| ResolvedVariable {
                        code: domain.code.clone(),
                        values,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedQuery::new(variables))
    }
}

/// Validates candidates against a domain
///
/// If every candidate is a code, the candidates are returned unchanged. If
/// every candidate is a label, the codes at the labels' positions are
/// returned. Anything else is an error naming the unmatched candidates.
pub fn match_domain(
    domain: &VariableDomain,
    candidates: &[String],
) -> Result<Vec<String>, ResolveError> {
    if candidates.iter().all(|c| domain.contains_value(c)) {
        return Ok(candidates.to_vec());
    }

    let positions: Option<Vec<usize>> = candidates
        .iter()
        .map(|c| domain.position_of_text(c))
        .collect();
    if let Some(positions) = positions {
        return Ok(positions
            .into_iter()
            .map(|index| domain.values[index].clone())
            .collect());
    }

    let mut unmatched: Vec<String> = candidates
        .iter()
        .filter(|c| !domain.contains_value(c) && domain.position_of_text(c).is_none())
        .cloned()
        .collect();

    // Codes and labels mixed in one selection
    if unmatched.is_empty() {
        unmatched = candidates
            .iter()
            .filter(|c| !domain.contains_value(c))
            .cloned()
            .collect();
    }

    Err(ResolveError::InvalidValue {
        variable: domain.code.clone(),
        values: unmatched,
    })
}
