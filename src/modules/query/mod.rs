//! Query module
//!
//! Answers the report queries over a parsed record: summary, gene and
//! CDS sequence retrieval, feature listing and degenerate site search.

pub mod engine;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use engine::{Lines, QueryEngine};

/// Problems with a query argument. The first four are recovered inside
/// the engine and rendered as their message line; the rest are returned
/// when a query is built from a key and argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{kind} pattern '{pattern}' is not valid pattern, '.' was used instead.")]
    InvalidPattern { kind: &'static str, pattern: String },

    #[error(
        "A problem occurred: '{0}' should be two numbers separated by a comma. \
         Only the first (before the first comma) and last (after the last comma) numbers are used."
    )]
    InvalidRange(String),

    #[error("The site pattern '{0}' is not a valid pattern. Pattern should only contain IUPAC codes.")]
    EmptySitePattern(String),

    #[error("The site pattern '{pattern}' could not be searched as regex '{regex}'.")]
    UnsearchableSitePattern { pattern: String, regex: String },

    #[error("Query '{0}' requires an argument")]
    MissingArgument(&'static str),

    #[error("Query '{0}' does not take an argument")]
    UnexpectedArgument(&'static str),

    #[error("Unknown query '{0}'")]
    UnknownQuery(String),
}

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// One of the supported report queries with its argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", content = "argument", rename_all = "snake_case")]
pub enum Query {
    Summary,
    FetchGene(String),
    FetchCds(String),
    FetchFeatures(String),
    FindSites(String),
}

impl Query {
    /// Build a query from its stable key and optional argument
    pub fn from_parts(key: &str, argument: Option<&str>) -> QueryResult<Self> {
        let key = key.trim();
        match (key, argument) {
            ("summary", None) => Ok(Query::Summary),
            ("summary", Some(_)) => Err(QueryError::UnexpectedArgument("summary")),
            ("fetch_gene", Some(arg)) => Ok(Query::FetchGene(arg.to_string())),
            ("fetch_cds", Some(arg)) => Ok(Query::FetchCds(arg.to_string())),
            ("fetch_features", Some(arg)) => Ok(Query::FetchFeatures(arg.to_string())),
            ("find_sites", Some(arg)) => Ok(Query::FindSites(arg.to_string())),
            ("fetch_gene", None) => Err(QueryError::MissingArgument("fetch_gene")),
            ("fetch_cds", None) => Err(QueryError::MissingArgument("fetch_cds")),
            ("fetch_features", None) => Err(QueryError::MissingArgument("fetch_features")),
            ("find_sites", None) => Err(QueryError::MissingArgument("find_sites")),
            (other, _) => Err(QueryError::UnknownQuery(other.to_string())),
        }
    }

    /// The stable key of this query
    pub fn key(&self) -> &'static str {
        match self {
            Query::Summary => "summary",
            Query::FetchGene(_) => "fetch_gene",
            Query::FetchCds(_) => "fetch_cds",
            Query::FetchFeatures(_) => "fetch_features",
            Query::FindSites(_) => "find_sites",
        }
    }

    /// The argument of this query, `None` for the summary
    pub fn argument(&self) -> Option<&str> {
        match self {
            Query::Summary => None,
            Query::FetchGene(arg)
            | Query::FetchCds(arg)
            | Query::FetchFeatures(arg)
            | Query::FindSites(arg) => Some(arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_parts() {
        assert_eq!(Query::from_parts("summary", None), Ok(Query::Summary));
        assert_eq!(
            Query::from_parts("fetch_gene", Some("abc.*")),
            Ok(Query::FetchGene("abc.*".to_string()))
        );
        assert_eq!(
            Query::from_parts(" find_sites ", Some("GAATTC")),
            Ok(Query::FindSites("GAATTC".to_string()))
        );
        assert_eq!(
            Query::from_parts("fetch_features", None),
            Err(QueryError::MissingArgument("fetch_features"))
        );
        assert_eq!(
            Query::from_parts("summary", Some("x")),
            Err(QueryError::UnexpectedArgument("summary"))
        );
        assert_eq!(
            Query::from_parts("translate", Some("x")),
            Err(QueryError::UnknownQuery("translate".to_string()))
        );
    }

    #[test]
    fn test_query_key_round_trip() {
        let queries = [
            Query::Summary,
            Query::FetchGene("g".to_string()),
            Query::FetchCds("c".to_string()),
            Query::FetchFeatures("1,2".to_string()),
            Query::FindSites("N".to_string()),
        ];
        for query in queries {
            let rebuilt = Query::from_parts(query.key(), query.argument()).unwrap();
            assert_eq!(rebuilt, query);
        }
    }

    #[test]
    fn test_error_messages() {
        let err = QueryError::InvalidPattern {
            kind: "Gene",
            pattern: "[".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Gene pattern '[' is not valid pattern, '.' was used instead."
        );

        let err = QueryError::EmptySitePattern("123".to_string());
        assert!(err.to_string().starts_with("The site pattern '123' is not a valid pattern."));
    }
}
