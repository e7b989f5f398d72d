use thiserror::Error;

use crate::RouteKey;

#[derive(Debug, Error)]
pub enum RouteStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("corrupt persisted route data: {0}")]
    CorruptPersistedData(String),

    #[error("route {0} has no waypoints")]
    EmptyRoute(RouteKey),
}

pub type RouteResult<T> = Result<T, RouteStoreError>;
