use crate::types::FailedClaim;
use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

/// Transport-level failure reported by a [`crate::actor::Connector`].
#[derive(Clone, Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Uniform error contract for every service operation.
///
/// Reason strings are the contract with UI layers: callers display
/// `Display` output directly instead of translating error codes.
#[derive(Clone, Debug, Error)]
pub enum GameError {
    /// Client-detected malformed input. Never reaches the network.
    #[error("{0}")]
    Validation(String),
    /// An identity-bound operation was attempted without a session.
    #[error("not authenticated: sign in to continue")]
    NotAuthenticated,
    /// The remote side returned a tagged failure with a reason string.
    #[error("{0}")]
    Rejected(String),
    /// A claim triggered payout but one or more sub-payments failed.
    /// Distinct from [`GameError::Rejected`] so callers can offer retry.
    #[error("payout incomplete for game {}: {}", .0.game_id, .0.last_error)]
    PartialPayout(FailedClaim),
    /// The response violated the wire contract (bad optional slot,
    /// unknown variant tag, out-of-range amount).
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Network or agent failure, surfaced in the same shape as a
    /// business-rule rejection.
    #[error("{0}")]
    Transport(String),
}

impl GameError {
    /// Whether the failure carries a recorded claim that can be retried
    /// via `retryFailedClaim`.
    pub fn retryable_claim(&self) -> Option<&FailedClaim> {
        match self {
            GameError::PartialPayout(claim) => Some(claim),
            _ => None,
        }
    }
}

impl From<TransportError> for GameError {
    fn from(err: TransportError) -> Self {
        GameError::Transport(err.0)
    }
}
