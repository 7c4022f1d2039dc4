use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No candidate documents supplied")]
    NoCandidates,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Text extraction failed for {name}: {reason}")]
    Extraction { name: String, reason: String },

    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Ranking cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category, used by callers to decide how loudly to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing to rank; callers treat this as a silent no-op
    Input,
    Validation,
    Extraction,
    Computation,
    Cancelled,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoCandidates => ErrorKind::Input,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Extraction { .. } | Error::Io(_) => ErrorKind::Extraction,
            Error::EmptyCorpus(_) | Error::InvalidDimension { .. } | Error::Computation(_) => {
                ErrorKind::Computation
            }
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// True for errors that abort a request without anything worth reporting
    pub fn is_benign(&self) -> bool {
        matches!(self.kind(), ErrorKind::Input | ErrorKind::Cancelled)
    }
}
