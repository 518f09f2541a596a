//! # Entitlement Authority Node
//!
//! Issues verification codes, redeems them for subscription activation or
//! account linking, and answers entitlement queries over HTTP.

use anyhow::Result;
use ea_telemetry::{init_logging, TelemetryConfig};
use node_runtime::{load_config, EntitlementNode};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&TelemetryConfig::from_env())?;

    let config = load_config();
    let node = EntitlementNode::new(config)?;
    let addr = node.start().await?;

    info!(addr = %addr, "Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    node.shutdown().await;
    Ok(())
}
