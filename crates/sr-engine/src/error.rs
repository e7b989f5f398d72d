use thiserror::Error;

use sr_cache::CacheError;
use sr_core::{Coord, CoreError};
use sr_routes::RouteStoreError;
use sr_search::SearchError;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("cost cache error: {0}")]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("route store error: {0}")]
    Routes(#[from] RouteStoreError),

    #[error("endpoint {0:?} has no navigation point")]
    MissingNavigationPoint(String),

    #[error("no navigable water near endpoint {endpoint:?} at {at}")]
    NoAnchor { endpoint: String, at: Coord },

    /// The background search ended without reporting a result.
    #[error("search worker stopped without a result")]
    WorkerLost,
}

impl NavError {
    /// Short message for interactive callers.
    pub fn reason(&self) -> &'static str {
        match self {
            NavError::Search(e) => e.reason(),
            NavError::MissingNavigationPoint(_) => "endpoint has no navigation point set",
            NavError::NoAnchor { .. } => "no open water near the endpoint",
            NavError::Config(_) => "invalid navigator configuration",
            NavError::Cache(_) | NavError::Routes(_) | NavError::WorkerLost => {
                "internal error: see the log for details"
            }
        }
    }

    /// `true` if the same request might succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            NavError::Search(e) => e.is_retryable(),
            NavError::WorkerLost => true,
            _ => false,
        }
    }
}

pub type NavResult<T> = Result<T, NavError>;
