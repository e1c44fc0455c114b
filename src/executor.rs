//! Buy-side execution: floor listings and purchase transactions.
//!
//! The executor turns marketplace buy instructions into signed Solana
//! transactions. Buy failures are reported as `false`, never as errors;
//! nothing in here may take down the driver loop.

use crate::config::Config;
use crate::error::{Result, SniperError};
use crate::marketplace::{ListingEntry, MarketplaceApi, WireInstruction};
use crate::types::{sol_to_lamports, Listing};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{error, info};

const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes purchases against the marketplace on Solana.
///
/// Owns one HTTP session (inside the marketplace client) and one RPC
/// connection for the process lifetime; both are released exactly once by
/// [`TradingExecutor::shutdown`]. The RPC client is pinned to "confirmed"
/// commitment, so preflight runs at that level and submission waits for
/// confirmation.
pub struct TradingExecutor<M> {
    api: M,
    rpc: RpcClient,
    wallet: Keypair,
    buys_attempted: AtomicU64,
    buys_confirmed: AtomicU64,
}

impl<M: MarketplaceApi> TradingExecutor<M> {
    /// Build the executor from validated configuration.
    pub fn new(api: M, config: &Config) -> Result<Self> {
        let wallet = Keypair::try_from(config.private_key.as_slice()).map_err(|err| {
            SniperError::Config(format!(
                "SOLANA_PRIVATE_KEY does not decode to a keypair: {}",
                err
            ))
        })?;
        let rpc = RpcClient::new_with_timeout_and_commitment(
            config.rpc_endpoint.clone(),
            RPC_TIMEOUT,
            CommitmentConfig::confirmed(),
        );
        info!("Trading wallet: {}", wallet.pubkey());
        Ok(Self {
            api,
            rpc,
            wallet,
            buys_attempted: AtomicU64::new(0),
            buys_confirmed: AtomicU64::new(0),
        })
    }

    /// Public key of the configured trading wallet.
    pub fn wallet_pubkey(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    /// Floor listings for a collection, cheapest first.
    ///
    /// Failures collapse to an empty list: a collection we cannot read is a
    /// collection with nothing to buy. The sort is stable, so listings at
    /// the same price keep their marketplace order.
    pub async fn fetch_floor_listings(&self, symbol: &str) -> Vec<Listing> {
        match self.api.collection_listings(symbol).await {
            Ok(entries) => {
                let mut listings: Vec<Listing> = entries
                    .into_iter()
                    .filter_map(ListingEntry::into_listing)
                    .collect();
                listings.sort_by_key(|listing| listing.price);
                listings
            }
            Err(err) => {
                error!("Error fetching floor listings for {}: {}", symbol, err);
                Vec::new()
            }
        }
    }

    /// Attempt to buy a listed NFT at the given SOL price.
    ///
    /// Returns whether the transaction was confirmed. Every failure path is
    /// logged and mapped to `false`; this never returns an error.
    pub async fn execute_buy(&self, mint_address: &str, price_in_sol: f64) -> bool {
        self.buys_attempted.fetch_add(1, Ordering::Relaxed);
        match self.try_execute_buy(mint_address, price_in_sol).await {
            Ok(signature) => {
                self.buys_confirmed.fetch_add(1, Ordering::Relaxed);
                info!("Buy transaction successful: {}", signature);
                true
            }
            Err(err) => {
                error!("Error executing buy for {}: {}", mint_address, err);
                false
            }
        }
    }

    async fn try_execute_buy(&self, mint_address: &str, price_in_sol: f64) -> Result<Signature> {
        let price_lamports = sol_to_lamports(price_in_sol);
        let response = self
            .api
            .buy_instructions(&self.wallet.pubkey(), mint_address, price_lamports)
            .await?;

        let instructions = build_instructions(&response.instructions)?;
        if instructions.is_empty() {
            return Err(SniperError::Transaction(format!(
                "marketplace returned no instructions for {}",
                mint_address
            )));
        }

        let recent_blockhash = self.rpc.get_latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            &instructions,
            Some(&self.wallet.pubkey()),
            &[&self.wallet],
            recent_blockhash,
        );

        let signature = self.rpc.send_and_confirm_transaction(&transaction).await?;
        Ok(signature)
    }

    /// Release the RPC connection and HTTP session. Call once at shutdown.
    pub async fn shutdown(self) {
        info!(
            "Trading executor shutting down: {} buys attempted, {} confirmed",
            self.buys_attempted.load(Ordering::Relaxed),
            self.buys_confirmed.load(Ordering::Relaxed)
        );
    }
}

/// Listings at or below the price ceiling, order preserved.
pub fn profitable_listings(listings: &[Listing], max_price_sol: f64) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| listing.price_sol() <= max_price_sol)
        .cloned()
        .collect()
}

/// Rebuild runnable instructions from marketplace wire form.
fn build_instructions(wire: &[WireInstruction]) -> Result<Vec<Instruction>> {
    wire.iter().map(build_instruction).collect()
}

fn build_instruction(wire: &WireInstruction) -> Result<Instruction> {
    let program_id = Pubkey::from_str(&wire.program_id)?;
    let accounts = wire
        .accounts
        .iter()
        .map(|meta| {
            let pubkey = Pubkey::from_str(&meta.pubkey)?;
            Ok(if meta.is_writable {
                AccountMeta::new(pubkey, meta.is_signer)
            } else {
                AccountMeta::new_readonly(pubkey, meta.is_signer)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Instruction {
        program_id,
        accounts,
        data: wire.data.clone(),
    })
}
