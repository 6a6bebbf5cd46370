use std::fmt;

use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, RelayError>;

/// Known failure patterns reported by the chain when a submission fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureHint {
    InsufficientFunds,
    ExecutionReverted,
}

impl FailureHint {
    /// Match a raw chain error message against the known patterns
    pub fn classify(message: &str) -> Option<Self> {
        let message = message.to_lowercase();
        if message.contains("insufficient funds") {
            Some(FailureHint::InsufficientFunds)
        } else if message.contains("reverted") {
            Some(FailureHint::ExecutionReverted)
        } else {
            None
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            FailureHint::InsufficientFunds => {
                "Insufficient funds: the wallet cannot cover gas plus the update fee. Top it up from a testnet faucet"
            }
            FailureHint::ExecutionReverted => {
                "Execution reverted: the contract rejected the update. Check the contract address, the oracle address it was deployed with, and that the payload is fresh"
            }
        }
    }
}

impl fmt::Display for FailureHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Oracle service returned {status} for {endpoint}")]
    OracleStatus { endpoint: String, status: u16 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Price feed {0} not found in oracle response")]
    FeedNotFound(String),

    #[error("Oracle returned no update data for {0}")]
    EmptyPayload(String),

    #[error("Stream is not supported by the {0} strategy")]
    StreamUnsupported(&'static str),

    #[error("Blockchain error: {0}")]
    Chain(String),

    #[error("Fee query failed: {message}")]
    FeeQuery {
        hint: Option<FailureHint>,
        message: String,
    },

    #[error("Submission failed: {message}")]
    Submission {
        hint: Option<FailureHint>,
        message: String,
    },
}

impl RelayError {
    /// Hint attached to a failed chain call, if the failure matched a known pattern
    pub fn hint(&self) -> Option<FailureHint> {
        match self {
            RelayError::FeeQuery { hint, .. } | RelayError::Submission { hint, .. } => *hint,
            _ => None,
        }
    }

    pub fn chain(err: impl fmt::Display) -> Self {
        RelayError::Chain(err.to_string())
    }
}

/// Log a terminal chain failure and the matching hint, if any
///
/// Returns the raw message together with its classification so the caller can
/// wrap both into its own error variant.
pub fn log_failure(action: &str, err: &RelayError) -> (Option<FailureHint>, String) {
    let message = err.to_string();
    let hint = FailureHint::classify(&message);
    error!("❌ {} failed: {}", action, message);
    if let Some(hint) = hint {
        error!("💡 {}", hint);
    }
    (hint, message)
}
