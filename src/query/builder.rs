use crate::resolver::ResolvedQuery;
use serde::Serialize;

/// Response format requested when none is configured
pub const DEFAULT_FORMAT: &str = "csv";

/// Body of a table query POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryBody {
    pub query: Vec<QueryClause>,
    pub response: ResponseFormat,
}

/// Filter clause for one variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryClause {
    pub code: String,
    pub selection: ItemSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSelection {
    pub filter: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
    pub format: String,
}

/// Builds the query body: one `item` filter per variable, in table order
pub fn build_query(resolved: &ResolvedQuery, format: &str) -> QueryBody {
    QueryBody {
        query: resolved
            .iter()
            .map(|variable| QueryClause {
                code: variable.code.clone(),
                selection: ItemSelection {
                    filter: "item".to_string(),
                    values: variable.values.clone(),
                },
            })
            .collect(),
        response: ResponseFormat {
            format: format.to_string(),
        },
    }
}
