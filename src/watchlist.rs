//! Candidate collection sources.

use crate::error::Result;
use crate::types::CollectionSummary;
use async_trait::async_trait;

/// Supplies the candidate collections for each trading cycle.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn fetch_candidates(&self) -> Result<Vec<CollectionSummary>>;
}

/// Fixed in-process watchlist.
///
/// Stands in for a richer discovery feed; the engine only sees the
/// [`CollectionSource`] seam, so swapping in a live source later does not
/// touch the analysis or execution logic.
pub struct StaticWatchlist {
    entries: Vec<CollectionSummary>,
}

impl StaticWatchlist {
    pub fn new(entries: Vec<CollectionSummary>) -> Self {
        Self { entries }
    }
}

impl Default for StaticWatchlist {
    fn default() -> Self {
        Self::new(vec![
            CollectionSummary {
                symbol: "degods".to_string(),
                name: "DeGods".to_string(),
                total_items: 10_000,
            },
            CollectionSummary {
                symbol: "okay_bears".to_string(),
                name: "Okay Bears".to_string(),
                total_items: 10_000,
            },
        ])
    }
}

#[async_trait]
impl CollectionSource for StaticWatchlist {
    async fn fetch_candidates(&self) -> Result<Vec<CollectionSummary>> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_watchlist_entries() {
        let watchlist = StaticWatchlist::default();
        let candidates = watchlist.fetch_candidates().await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].symbol, "degods");
        assert!(candidates.iter().all(|c| c.total_items > 0));
    }
}
