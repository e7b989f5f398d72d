use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported cache format version {0}")]
    UnsupportedVersion(u32),

    #[error("corrupt persisted cache: {0}")]
    CorruptPersistedData(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
