//! Driver loop: analyze, hunt, sleep, repeat.
//!
//! One logical task runs the whole pipeline; network calls are await points
//! but never overlap. Scheduling goes through the [`CycleTrigger`] seam so
//! the fixed timer can be swapped for an event-driven trigger without
//! touching the analysis or execution logic.

use crate::analyzer::VolumeAnalyzer;
use crate::config::Config;
use crate::error::{Result, SniperError};
use crate::executor::{profitable_listings, TradingExecutor};
use crate::marketplace::MarketplaceApi;
use crate::types::CollectionSummary;
use crate::watchlist::CollectionSource;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Time between polling cycles.
pub const CYCLE_INTERVAL: Duration = Duration::from_secs(60);

/// Scheduling seam for the driver loop.
#[async_trait]
pub trait CycleTrigger: Send {
    /// Resolve when the next cycle should start.
    async fn wait(&mut self);
}

/// Fixed-interval trigger.
///
/// Missed ticks are delayed rather than bursted: a cycle that overruns the
/// interval pushes the next one back, so two cycles can never be in flight
/// at once and a listing cannot be bought twice by overlapping iterations.
pub struct IntervalTrigger {
    interval: Interval,
}

impl IntervalTrigger {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Default for IntervalTrigger {
    fn default() -> Self {
        Self::new(CYCLE_INTERVAL)
    }
}

#[async_trait]
impl CycleTrigger for IntervalTrigger {
    async fn wait(&mut self) {
        self.interval.tick().await;
    }
}

/// Orchestrates one full analyze/filter/execute pass per trigger tick.
pub struct SniperEngine<M> {
    config: Arc<Config>,
    collections: Box<dyn CollectionSource>,
    analyzer: VolumeAnalyzer<M>,
    executor: TradingExecutor<M>,
    trigger: Box<dyn CycleTrigger>,
    /// Mints bought this run. Never re-attempted, so a listing that stays
    /// visible in marketplace responses after purchase cannot be bought
    /// again in a later cycle.
    purchased: HashSet<String>,
}

impl<M: MarketplaceApi> SniperEngine<M> {
    pub fn new(
        config: Arc<Config>,
        collections: Box<dyn CollectionSource>,
        analyzer: VolumeAnalyzer<M>,
        executor: TradingExecutor<M>,
        trigger: Box<dyn CycleTrigger>,
    ) -> Self {
        Self {
            config,
            collections,
            analyzer,
            executor,
            trigger,
            purchased: HashSet::new(),
        }
    }

    /// Run until an unrecoverable error.
    ///
    /// Per-cycle failures are logged and the loop continues; only a
    /// configuration error terminates it.
    pub async fn run(&mut self) -> Result<()> {
        info!("Sniper engine running");
        loop {
            self.trigger.wait().await;
            match self.run_cycle().await {
                Ok(()) => {}
                Err(err @ SniperError::Config(_)) => {
                    error!("Unrecoverable configuration error: {}", err);
                    return Err(err);
                }
                Err(err) => error!("Error in trading cycle: {}", err),
            }
        }
    }

    /// One analyze/filter/execute pass over the current watchlist.
    pub async fn run_cycle(&mut self) -> Result<()> {
        let candidates = self.collections.fetch_candidates().await?;
        let analyzed = self.analyzer.analyze_collections(&candidates).await;

        if analyzed.is_empty() {
            info!("No collections meeting criteria found");
            return Ok(());
        }

        info!("Found {} collections meeting criteria:", analyzed.len());
        for (summary, stats) in &analyzed {
            info!(
                "Collection: {}, Floor: {:.2} SOL, Volume 7d: {:.2} SOL, Scarcity: {:.2}%",
                summary.name,
                stats.floor_price,
                stats.volume_7d,
                stats.scarcity_ratio * 100.0
            );
        }

        for (summary, _stats) in &analyzed {
            self.hunt_collection(summary).await;
        }
        Ok(())
    }

    /// Walk a collection's floor from the cheapest listing up, stopping at
    /// the first confirmed purchase.
    async fn hunt_collection(&mut self, summary: &CollectionSummary) {
        let listings = self.executor.fetch_floor_listings(&summary.symbol).await;
        if listings.is_empty() {
            return;
        }

        let targets = profitable_listings(&listings, self.config.max_price_sol);
        for listing in targets {
            if self.purchased.contains(&listing.mint_address) {
                debug!("Already bought {}, skipping", listing.mint_address);
                continue;
            }

            let price_sol = listing.price_sol();
            info!("Attempting to buy {} at {} SOL", summary.name, price_sol);
            if self.executor.execute_buy(&listing.mint_address, price_sol).await {
                info!(
                    "Successfully bought {} NFT for {} SOL",
                    summary.name, price_sol
                );
                self.purchased.insert(listing.mint_address);
                break;
            }
        }
    }

    /// Consume the engine and release executor resources exactly once.
    pub async fn shutdown(self) {
        self.executor.shutdown().await;
    }
}
