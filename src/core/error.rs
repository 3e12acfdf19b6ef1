// error.rs - Error taxonomy for the alignment core

use thiserror::Error;

/// Errors raised by the scoring model and the alignment engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    /// Malformed scoring configuration, unsupported mode or illegal sequence content
    #[error("Validation error: {0}")]
    Validation(String),

    /// No candidate alignment exists for the given inputs and mode
    #[error("No alignment could be produced with the given sequences and parameters")]
    NoAlignment,

    /// The dynamic-programming matrix would exceed the configured bound
    #[error("Sequences too large: {cells} matrix cells exceed the limit of {limit}")]
    SequenceTooLarge { cells: usize, limit: usize },
}

impl AlignError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }
}
