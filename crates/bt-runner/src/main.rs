//! Behavior tree runner entry point.
mod demo;

use anyhow::Result;
use behavior_tree::{DriverConfig, TreeConfig, TreeDriver, TreeNode};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::demo::{DemoConfig, Path};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let driver_config = DriverConfig::from_env();
    let tree_config = TreeConfig::from_env();
    let root = demo::build_tree(DemoConfig::from_env(), tree_config, Path::default())?;
    info!(root = root.name(), depth = root.depth(), "tree assembled");

    let stop = CancellationToken::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => warn!(error = %e, "failed to listen for shutdown signal"),
            }
            stop.cancel();
        });
    }

    let summary = TreeDriver::new(driver_config).run(&root, &stop).await;
    info!(ticks = summary.ticks, status = %summary.last_status, "driver finished");

    root.shutdown().await?;
    Ok(())
}
