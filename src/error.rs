use thiserror::Error;

/// Errors reported by a reconstruction call
///
/// Every variant aborts the call; no partial result is produced.
#[derive(Error, Debug)]
pub enum HomodyneError {
    #[error("invalid input shape: {0}")]
    InputShape(String),
    #[error("k-space not centered or not contiguous: {0}")]
    Sampling(String),
    #[error("k-space is fully sampled (fractions {fractions:?}), no partial-Fourier gap to exploit")]
    FullySampled { fractions: Vec<f64> },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HomodyneError>;
