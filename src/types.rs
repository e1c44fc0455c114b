//! Core types and data structures for the floor sniper.

use serde::{Deserialize, Serialize};
use solana_sdk::native_token::LAMPORTS_PER_SOL;

/// An NFT collection under watch.
///
/// Supplied by a [`crate::watchlist::CollectionSource`] and immutable for the
/// duration of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Marketplace symbol identifying the collection
    pub symbol: String,
    /// Human-readable collection name
    pub name: String,
    /// Total number of items minted in the collection
    pub total_items: u64,
}

/// Per-cycle statistics derived from marketplace responses.
///
/// Recomputed from fresh data every cycle, never carried over.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    /// Lowest active listing price in SOL
    pub floor_price: f64,
    /// Trailing 7-day traded volume in SOL
    pub volume_7d: f64,
    /// Number of active listings
    pub listed_count: usize,
    /// listed_count / total_items, in [0, 1]
    pub scarcity_ratio: f64,
}

/// A single active listing on a collection's floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Mint address of the listed NFT
    pub mint_address: String,
    /// Asking price in lamports
    pub price: u64,
}

impl Listing {
    /// Asking price converted to SOL.
    pub fn price_sol(&self) -> f64 {
        lamports_to_sol(self.price)
    }
}

/// Convert lamports to whole SOL.
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Convert SOL to lamports, rounded to the nearest integer lamport.
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamports_to_sol_exact() {
        assert_eq!(lamports_to_sol(5_000_000_000), 5.0);
        assert_eq!(lamports_to_sol(0), 0.0);
        assert_eq!(lamports_to_sol(1_500_000_000), 1.5);
    }

    #[test]
    fn test_sol_to_lamports_rounds() {
        assert_eq!(sol_to_lamports(10.0), 10_000_000_000);
        assert_eq!(sol_to_lamports(0.5), 500_000_000);
        // Sub-lamport fractions round to the nearest lamport.
        assert_eq!(sol_to_lamports(0.000000001), 1);
    }

    #[test]
    fn test_listing_price_sol() {
        let listing = Listing {
            mint_address: "So11111111111111111111111111111111111111112".to_string(),
            price: 12_000_000_000,
        };
        assert_eq!(listing.price_sol(), 12.0);
    }
}
