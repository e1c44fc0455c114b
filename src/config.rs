//! Process configuration, loaded once from environment variables.
//!
//! Constructed at startup, validated eagerly, and passed by reference to
//! every component. Nothing reads the environment after this point.

use crate::error::{Result, SniperError};

/// Default Solana RPC endpoint when `SOLANA_RPC_ENDPOINT` is unset.
pub const DEFAULT_RPC_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

/// Minimum trailing 7-day volume in SOL a collection must show.
const DEFAULT_MIN_VOLUME_THRESHOLD: f64 = 10.0;
/// Maximum fraction of a collection allowed to be listed.
const DEFAULT_MAX_SCARCITY_RATIO: f64 = 0.1;
/// Maximum price in SOL to pay for a single NFT.
const DEFAULT_MAX_PRICE_SOL: f64 = 10.0;

/// ed25519 keypair length: 32-byte secret plus 32-byte public half.
pub const KEYPAIR_LENGTH: usize = 64;

/// Immutable process-wide settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Solana RPC endpoint URL
    pub rpc_endpoint: String,
    /// Minimum 7-day volume in SOL
    pub min_volume_threshold: f64,
    /// Maximum listed/total ratio, in (0, 1]
    pub max_scarcity_ratio: f64,
    /// Price ceiling per NFT in SOL
    pub max_price_sol: f64,
    /// Raw wallet keypair bytes, exactly [`KEYPAIR_LENGTH`] long
    pub private_key: Vec<u8>,
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Factored out of
    /// [`Config::from_env`] so validation is testable without touching the
    /// process environment.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_endpoint =
            var("SOLANA_RPC_ENDPOINT").unwrap_or_else(|| DEFAULT_RPC_ENDPOINT.to_string());

        let min_volume_threshold =
            parse_numeric(&var, "MIN_VOLUME_THRESHOLD", DEFAULT_MIN_VOLUME_THRESHOLD)?;
        let max_scarcity_ratio =
            parse_numeric(&var, "MAX_SCARCITY_RATIO", DEFAULT_MAX_SCARCITY_RATIO)?;
        let max_price_sol = parse_numeric(&var, "MAX_PRICE_SOL", DEFAULT_MAX_PRICE_SOL)?;

        let raw_key = var("SOLANA_PRIVATE_KEY").ok_or_else(|| {
            SniperError::Config("SOLANA_PRIVATE_KEY environment variable is required".to_string())
        })?;
        let private_key = parse_private_key(&raw_key)?;

        let config = Self {
            rpc_endpoint,
            min_volume_threshold,
            max_scarcity_ratio,
            max_price_sol,
            private_key,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate settings, failing fast on anything out of range.
    pub fn validate(&self) -> Result<()> {
        if self.rpc_endpoint.is_empty() {
            return Err(SniperError::Config(
                "SOLANA_RPC_ENDPOINT must not be empty".to_string(),
            ));
        }
        if self.min_volume_threshold <= 0.0 {
            return Err(SniperError::Config(
                "MIN_VOLUME_THRESHOLD must be positive".to_string(),
            ));
        }
        if !(self.max_scarcity_ratio > 0.0 && self.max_scarcity_ratio <= 1.0) {
            return Err(SniperError::Config(
                "MAX_SCARCITY_RATIO must be between 0 and 1".to_string(),
            ));
        }
        if self.max_price_sol <= 0.0 {
            return Err(SniperError::Config(
                "MAX_PRICE_SOL must be positive".to_string(),
            ));
        }
        if self.private_key.len() != KEYPAIR_LENGTH {
            return Err(SniperError::Config(format!(
                "SOLANA_PRIVATE_KEY must decode to {} bytes, got {}",
                KEYPAIR_LENGTH,
                self.private_key.len()
            )));
        }
        Ok(())
    }
}

/// Parse an optional numeric variable, applying the default when unset.
fn parse_numeric(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: f64,
) -> Result<f64> {
    match var(name) {
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
            SniperError::Config(format!("{} must be a number, got {:?}", name, raw))
        }),
        None => Ok(default),
    }
}

/// Parse a comma-separated byte list into raw keypair bytes.
fn parse_private_key(raw: &str) -> Result<Vec<u8>> {
    raw.split(',')
        .map(|part| {
            part.trim().parse::<u8>().map_err(|_| {
                SniperError::Config(format!(
                    "invalid private key format: {:?} is not a byte",
                    part.trim()
                ))
            })
        })
        .collect()
}
