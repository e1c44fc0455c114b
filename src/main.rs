//! Binary entry point: wiring for config, logging and the trading loop.

use anyhow::Result;
use floor_sn1per::{
    Config, IntervalTrigger, MarketplaceClient, SniperEngine, StaticWatchlist, TradingExecutor,
    VolumeAnalyzer,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Console plus a daily-rotating file under logs/.
    let file_appender = tracing_appender::rolling::daily("logs", "trading.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    info!("Starting floor-sn1per");

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            error!("Fatal error: {}", err);
            return Err(err.into());
        }
    };
    info!(
        "Configuration loaded: rpc={}, min_volume={} SOL, max_scarcity={}, max_price={} SOL",
        config.rpc_endpoint,
        config.min_volume_threshold,
        config.max_scarcity_ratio,
        config.max_price_sol
    );

    let marketplace = MarketplaceClient::new()?;
    let analyzer = VolumeAnalyzer::new(marketplace.clone(), config.clone());
    let executor = TradingExecutor::new(marketplace, &config)?;
    let mut engine = SniperEngine::new(
        config,
        Box::new(StaticWatchlist::default()),
        analyzer,
        executor,
        Box::new(IntervalTrigger::default()),
    );

    let result = tokio::select! {
        res = engine.run() => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            Ok(())
        }
    };

    // Single release point for the HTTP session and RPC connection,
    // reached on fatal errors and on Ctrl-C alike.
    engine.shutdown().await;
    result.map_err(Into::into)
}
