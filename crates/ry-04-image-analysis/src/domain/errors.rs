//! # Analysis Errors

use shared_chain::ChainError;
use thiserror::Error;

/// Why an analysis did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No image reference was given.
    #[error("Image reference is empty")]
    MissingImage,

    /// The oracle did not answer within the polling budget.
    #[error("Oracle did not answer after {attempts} polls")]
    Timeout { attempts: u32 },

    /// The oracle answered with something that is not a valid analysis.
    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    /// Transport or contract failure while talking to the oracle.
    #[error("Oracle call failed: {0}")]
    Oracle(String),
}

impl From<ChainError> for AnalysisError {
    fn from(err: ChainError) -> Self {
        AnalysisError::Oracle(err.to_string())
    }
}
