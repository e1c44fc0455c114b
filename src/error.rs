//! Error taxonomy for the sniper.
//!
//! The driver loop matches on the error kind to decide between "skip and
//! carry on" and "halt the process"; only [`SniperError::Config`] is fatal.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SniperError>;

/// All failure modes surfaced by the sniper's components.
#[derive(Debug, Error)]
pub enum SniperError {
    /// Missing or invalid settings. Raised once at startup and halts the
    /// process; never produced mid-cycle by healthy configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A failed or timed-out HTTP call. Recovered locally: the affected
    /// candidate or listing is treated as "no data".
    #[error("network error: {0}")]
    Network(String),

    /// Instruction decoding, signing or submission failure. Recovered
    /// locally: the buy attempt reports failure and the loop moves on.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Anything else that leaks out of a cycle. Logged at the loop
    /// boundary and the iteration is abandoned.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for SniperError {
    fn from(err: reqwest::Error) -> Self {
        SniperError::Network(err.to_string())
    }
}

impl From<solana_client::client_error::ClientError> for SniperError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        SniperError::Transaction(err.to_string())
    }
}

impl From<solana_sdk::pubkey::ParsePubkeyError> for SniperError {
    fn from(err: solana_sdk::pubkey::ParsePubkeyError) -> Self {
        SniperError::Transaction(format!("invalid pubkey in instruction: {}", err))
    }
}
