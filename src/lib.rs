//! floor-sn1per - thin-floor NFT sniping bot for Solana marketplaces.
//!
//! Polls Magic Eden collection statistics, screens for collections with a
//! thin sell-side floor, and buys qualifying listings below a configured
//! price ceiling.

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod marketplace;
pub mod types;
pub mod watchlist;

// Re-export main types for convenience
pub use analyzer::VolumeAnalyzer;
pub use config::Config;
pub use engine::{CycleTrigger, IntervalTrigger, SniperEngine, CYCLE_INTERVAL};
pub use error::{Result, SniperError};
pub use executor::{profitable_listings, TradingExecutor};
pub use marketplace::{MarketplaceApi, MarketplaceClient};
pub use types::{lamports_to_sol, sol_to_lamports, CollectionStats, CollectionSummary, Listing};
pub use watchlist::{CollectionSource, StaticWatchlist};
