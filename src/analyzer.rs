//! Collection screening: volume and scarcity analysis.
//!
//! The analyzer fetches per-collection stats and listings from the
//! marketplace, derives floor price, trailing volume and scarcity ratio,
//! and keeps only collections inside the configured thresholds.

use crate::config::Config;
use crate::error::Result;
use crate::marketplace::MarketplaceApi;
use crate::types::{lamports_to_sol, CollectionStats, CollectionSummary};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Screens candidate collections for thin-floor opportunities.
pub struct VolumeAnalyzer<M> {
    api: M,
    config: Arc<Config>,
}

impl<M: MarketplaceApi> VolumeAnalyzer<M> {
    pub fn new(api: M, config: Arc<Config>) -> Self {
        Self { api, config }
    }

    /// Analyze candidates one at a time, keeping those that qualify.
    ///
    /// A failed candidate is logged and skipped; it never poisons the rest
    /// of the batch. Output preserves input order.
    pub async fn analyze_collections(
        &self,
        candidates: &[CollectionSummary],
    ) -> Vec<(CollectionSummary, CollectionStats)> {
        let mut qualifying = Vec::new();
        for candidate in candidates {
            match self.analyze_candidate(candidate).await {
                Ok(Some(stats)) => qualifying.push((candidate.clone(), stats)),
                Ok(None) => {}
                Err(err) => {
                    warn!("Error analyzing collection {}: {}", candidate.symbol, err);
                }
            }
        }
        qualifying
    }

    /// Stats for one candidate, or `None` when it does not qualify.
    async fn analyze_candidate(
        &self,
        candidate: &CollectionSummary,
    ) -> Result<Option<CollectionStats>> {
        if candidate.total_items == 0 {
            // A zero-item collection is a watchlist defect, not market data.
            error!(
                "Collection {} has total_items = 0; fix the watchlist entry",
                candidate.symbol
            );
            return Ok(None);
        }

        let raw_stats = self.api.collection_stats(&candidate.symbol).await?;
        let listings = self.api.collection_listings(&candidate.symbol).await?;
        if listings.is_empty() {
            debug!("Collection {} has no active listings", candidate.symbol);
            return Ok(None);
        }

        let listed_count = listings.len();
        let stats = CollectionStats {
            floor_price: lamports_to_sol(raw_stats.floor_price),
            volume_7d: lamports_to_sol(raw_stats.volume_all),
            listed_count,
            scarcity_ratio: listed_count as f64 / candidate.total_items as f64,
        };

        if self.meets_criteria(&stats) {
            Ok(Some(stats))
        } else {
            debug!(
                "Collection {} outside thresholds (volume {:.2} SOL, scarcity {:.4})",
                candidate.symbol, stats.volume_7d, stats.scarcity_ratio
            );
            Ok(None)
        }
    }

    fn meets_criteria(&self, stats: &CollectionStats) -> bool {
        stats.volume_7d >= self.config.min_volume_threshold
            && stats.scarcity_ratio <= self.config.max_scarcity_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SniperError;
    use crate::marketplace::{BuyInstructionsResponse, CollectionStatsResponse, ListingEntry};
    use async_trait::async_trait;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Keypair;
    use std::collections::HashMap;

    /// In-memory marketplace: per-symbol canned stats and listing counts,
    /// with an optional set of symbols that fail with a network error.
    #[derive(Default)]
    struct StubMarketplace {
        stats: HashMap<String, CollectionStatsResponse>,
        listing_counts: HashMap<String, usize>,
        failing: Vec<String>,
    }

    impl StubMarketplace {
        fn with_collection(mut self, symbol: &str, volume_all: u64, listed: usize) -> Self {
            self.stats.insert(
                symbol.to_string(),
                CollectionStatsResponse {
                    floor_price: 2_000_000_000,
                    volume_all,
                },
            );
            self.listing_counts.insert(symbol.to_string(), listed);
            self
        }

        fn failing_on(mut self, symbol: &str) -> Self {
            self.failing.push(symbol.to_string());
            self
        }
    }

    #[async_trait]
    impl MarketplaceApi for StubMarketplace {
        async fn collection_stats(&self, symbol: &str) -> Result<CollectionStatsResponse> {
            if self.failing.iter().any(|s| s == symbol) {
                return Err(SniperError::Network("connection reset".to_string()));
            }
            Ok(self.stats.get(symbol).cloned().unwrap_or_default())
        }

        async fn collection_listings(&self, symbol: &str) -> Result<Vec<ListingEntry>> {
            let count = self.listing_counts.get(symbol).copied().unwrap_or(0);
            Ok((0..count)
                .map(|i| ListingEntry {
                    mint_address: Some(format!("{}Mint{}", symbol, i)),
                    price: Some(1_000_000_000 + i as u64),
                })
                .collect())
        }

        async fn buy_instructions(
            &self,
            _buyer: &Pubkey,
            _seller_mint: &str,
            _price_lamports: u64,
        ) -> Result<BuyInstructionsResponse> {
            Err(SniperError::Network("not supported by stub".to_string()))
        }
    }

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            rpc_endpoint: "http://localhost:8899".to_string(),
            min_volume_threshold: 10.0,
            max_scarcity_ratio: 0.1,
            max_price_sol: 10.0,
            private_key: Keypair::new().to_bytes().to_vec(),
        })
    }

    fn summary(symbol: &str, total_items: u64) -> CollectionSummary {
        CollectionSummary {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            total_items,
        }
    }

    const SOL: u64 = 1_000_000_000;

    #[tokio::test]
    async fn test_scarcity_ratio_computation() {
        let api = StubMarketplace::default().with_collection("degods", 100 * SOL, 500);
        let analyzer = VolumeAnalyzer::new(api, test_config());

        let result = analyzer
            .analyze_collections(&[summary("degods", 10_000)])
            .await;
        assert_eq!(result.len(), 1);
        let stats = &result[0].1;
        assert!((stats.scarcity_ratio - 0.05).abs() < 1e-12);
        assert_eq!(stats.listed_count, 500);
        assert_eq!(stats.floor_price, 2.0);
        assert_eq!(stats.volume_7d, 100.0);
    }

    #[tokio::test]
    async fn test_scarcity_threshold_excludes() {
        let api = StubMarketplace::default().with_collection("degods", 100 * SOL, 500);
        let mut config = (*test_config()).clone();
        config.max_scarcity_ratio = 0.04;
        let analyzer = VolumeAnalyzer::new(api, Arc::new(config));

        let result = analyzer
            .analyze_collections(&[summary("degods", 10_000)])
            .await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_volume_boundary_is_inclusive() {
        // volume_7d == min_volume_threshold qualifies
        let api = StubMarketplace::default()
            .with_collection("at_threshold", 10 * SOL, 100)
            .with_collection("below_threshold", 10 * SOL - 1, 100);
        let analyzer = VolumeAnalyzer::new(api, test_config());

        let result = analyzer
            .analyze_collections(&[
                summary("at_threshold", 10_000),
                summary("below_threshold", 10_000),
            ])
            .await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].0.symbol, "at_threshold");
    }

    #[tokio::test]
    async fn test_scarcity_boundary_is_inclusive() {
        // scarcity_ratio == max_scarcity_ratio qualifies (1000/10000 = 0.1)
        let api = StubMarketplace::default().with_collection("edge", 50 * SOL, 1_000);
        let analyzer = VolumeAnalyzer::new(api, test_config());

        let result = analyzer.analyze_collections(&[summary("edge", 10_000)]).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].1.scarcity_ratio, 0.1);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_poison_batch() {
        let api = StubMarketplace::default()
            .with_collection("first", 100 * SOL, 100)
            .with_collection("third", 100 * SOL, 100)
            .failing_on("second");
        let analyzer = VolumeAnalyzer::new(api, test_config());

        let result = analyzer
            .analyze_collections(&[
                summary("first", 10_000),
                summary("second", 10_000),
                summary("third", 10_000),
            ])
            .await;
        assert_eq!(result.len(), 2);
        // Input order preserved.
        assert_eq!(result[0].0.symbol, "first");
        assert_eq!(result[1].0.symbol, "third");
    }

    #[tokio::test]
    async fn test_zero_total_items_is_skipped_not_fatal() {
        let api = StubMarketplace::default()
            .with_collection("broken", 100 * SOL, 100)
            .with_collection("good", 100 * SOL, 100);
        let analyzer = VolumeAnalyzer::new(api, test_config());

        let result = analyzer
            .analyze_collections(&[summary("broken", 0), summary("good", 10_000)])
            .await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].0.symbol, "good");
    }

    #[tokio::test]
    async fn test_empty_listings_skipped() {
        let api = StubMarketplace::default().with_collection("ghost_town", 100 * SOL, 0);
        let analyzer = VolumeAnalyzer::new(api, test_config());

        let result = analyzer
            .analyze_collections(&[summary("ghost_town", 10_000)])
            .await;
        assert!(result.is_empty());
    }
}
