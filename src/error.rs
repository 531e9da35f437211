use thiserror::Error;

/// Errors returned by the clustering engine and its import/export helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter or call contract was violated (zero centers, `k == 0`, ...).
    #[error("invalid configuration {name}: {message}")]
    InvalidConfiguration {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Caller-supplied seed centers do not match the configured cluster count.
    #[error("seed count mismatch: expected {expected} centers, got {found}")]
    SeedCountMismatch {
        /// Configured `k`.
        expected: usize,
        /// Number of seeds supplied.
        found: usize,
    },

    /// Reading or writing a point file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The CSV layer rejected the input or output stream.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(name: &'static str, message: &'static str) -> Self {
        Error::InvalidConfiguration { name, message }
    }
}
