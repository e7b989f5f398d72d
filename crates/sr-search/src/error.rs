use std::fmt;

use thiserror::Error;

use sr_core::Coord;

/// Which end of a search an error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndpointSide {
    Start,
    Goal,
}

impl fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointSide::Start => f.write_str("start"),
            EndpointSide::Goal => f.write_str("goal"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("{side} {at} is not navigable water")]
    EndpointNotTraversable { side: EndpointSide, at: Coord },

    /// One side's frontier emptied without meeting the other: the endpoints
    /// are in different water bodies (as far as is currently known).
    #[error("no water route exists between {start} and {goal}")]
    NoPathExists { start: Coord, goal: Coord },

    #[error("search gave up after {expansions} expansions")]
    SearchBudgetExceeded { expansions: usize },

    #[error("search timed out after {elapsed_ms} ms ({expansions} expansions)")]
    TimedOut { elapsed_ms: u64, expansions: usize },
}

impl SearchError {
    /// `true` if another attempt (after more of the map is observed, or with
    /// the other strategy) might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SearchError::SearchBudgetExceeded { .. } | SearchError::TimedOut { .. }
        )
    }

    /// Short message for interactive callers.
    pub fn reason(&self) -> &'static str {
        match self {
            SearchError::EndpointNotTraversable { .. } => {
                "an endpoint is not on navigable water"
            }
            SearchError::NoPathExists { .. } => "no water route possible",
            SearchError::SearchBudgetExceeded { .. } | SearchError::TimedOut { .. } => {
                "search gave up: try again later or use the other strategy"
            }
        }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
