//! Marketplace HTTP API client and wire types.
//!
//! All external marketplace traffic goes through [`MarketplaceApi`]; the
//! reqwest-backed [`MarketplaceClient`] is the production implementation.

use crate::error::{Result, SniperError};
use crate::types::Listing;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::debug;

/// Magic Eden mainnet v2 API root.
pub const MARKETPLACE_BASE_URL: &str = "https://api-mainnet.magiceden.dev/v2";

/// Per-request timeout. The upstream API has none configured server-side,
/// so a hung connection would otherwise stall the whole loop.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Collection statistics from `GET /collections/{symbol}/stats`.
///
/// Values are lamports. Fields the API omits decode as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionStatsResponse {
    /// Lowest active listing price
    pub floor_price: u64,
    /// Trailing traded volume
    pub volume_all: u64,
}

/// One entry of `GET /collections/{symbol}/listings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    pub mint_address: Option<String>,
    /// Asking price in lamports
    pub price: Option<u64>,
}

impl ListingEntry {
    /// An entry missing its mint or price can never be bought; drop it.
    pub fn into_listing(self) -> Option<Listing> {
        Some(Listing {
            mint_address: self.mint_address?,
            price: self.price?,
        })
    }
}

/// Response of `GET /instructions/buy`.
#[derive(Debug, Clone, Deserialize)]
pub struct BuyInstructionsResponse {
    pub instructions: Vec<WireInstruction>,
}

/// A single instruction in marketplace wire form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireInstruction {
    /// Base58 program id
    pub program_id: String,
    /// Ordered account metas
    pub accounts: Vec<WireAccountMeta>,
    /// Opaque instruction data bytes
    pub data: Vec<u8>,
}

/// Account reference inside a [`WireInstruction`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAccountMeta {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// Read/trade surface of the marketplace REST API.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Fetch collection statistics.
    async fn collection_stats(&self, symbol: &str) -> Result<CollectionStatsResponse>;

    /// Fetch the collection's active listings, in marketplace order.
    async fn collection_listings(&self, symbol: &str) -> Result<Vec<ListingEntry>>;

    /// Request buy instructions for a listing at the given lamport price.
    async fn buy_instructions(
        &self,
        buyer: &Pubkey,
        seller_mint: &str,
        price_lamports: u64,
    ) -> Result<BuyInstructionsResponse>;
}

/// reqwest-backed marketplace client.
///
/// Holds one long-lived HTTP session for the process lifetime; cloning is
/// cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: Client,
    base_url: String,
}

impl MarketplaceClient {
    /// Client against the mainnet API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(MARKETPLACE_BASE_URL)
    }

    /// Client against an alternate API root.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(SniperError::from)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketplaceApi for MarketplaceClient {
    async fn collection_stats(&self, symbol: &str) -> Result<CollectionStatsResponse> {
        let url = format!("{}/collections/{}/stats", self.base_url, symbol);
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn collection_listings(&self, symbol: &str) -> Result<Vec<ListingEntry>> {
        let url = format!("{}/collections/{}/listings", self.base_url, symbol);
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn buy_instructions(
        &self,
        buyer: &Pubkey,
        seller_mint: &str,
        price_lamports: u64,
    ) -> Result<BuyInstructionsResponse> {
        let url = format!("{}/instructions/buy", self.base_url);
        debug!("GET {} for mint {}", url, seller_mint);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("buyer", buyer.to_string()),
                ("seller", seller_mint.to_string()),
                ("price", price_lamports.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Surface the body: the API explains rejections in plain text.
            let body = response.text().await.unwrap_or_default();
            return Err(SniperError::Network(format!(
                "buy instruction request returned {}: {}",
                status, body
            )));
        }
        Ok(response.json().await?)
    }
}
