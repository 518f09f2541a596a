//! Node lifecycle: start background tasks, serve HTTP, shut down.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ea_03_entitlement::maintenance_task;
use ea_04_api_gateway::ApiGatewayService;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::container::{NodeConfig, ServiceContainer};

/// How long shutdown waits for each task to drain.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The running entitlement authority.
pub struct EntitlementNode {
    /// Wired subsystems.
    container: Arc<ServiceContainer>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
    /// Spawned background tasks.
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl EntitlementNode {
    /// Validate the configuration and wire all subsystems.
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;
        Ok(Self::from_container(ServiceContainer::new(config)))
    }

    /// Run on an already wired container.
    pub fn from_container(container: ServiceContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Start the sweeper and the HTTP server.
    ///
    /// Returns the address the server is bound to.
    pub async fn start(&self) -> Result<SocketAddr> {
        info!("===========================================");
        info!("  Entitlement Authority v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let config = &self.container.config;
        let api = self.container.api();

        let gateway = ApiGatewayService::new(config.gateway.clone(), Arc::clone(&api))
            .context("Failed to build API gateway")?;
        let listener = TcpListener::bind(config.gateway.http_addr())
            .await
            .with_context(|| format!("Failed to bind {}", config.gateway.http_addr()))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read bound address")?;

        // Maintenance sweeper
        let interval = config.maintenance.sweep_interval();
        let mut sweep_shutdown = self.shutdown_rx.clone();
        let sweeper = tokio::spawn(async move {
            tokio::select! {
                _ = maintenance_task(api, interval) => {}
                _ = sweep_shutdown.changed() => {
                    info!("[maintenance] Shutdown signal received");
                }
            }
        });

        // HTTP server
        let mut http_shutdown = self.shutdown_rx.clone();
        let server = tokio::spawn(async move {
            let signal = async move {
                let _ = http_shutdown.changed().await;
                info!("[gateway] Shutdown signal received");
            };
            if let Err(e) = gateway.serve_on(listener, signal).await {
                error!(error = %e, "HTTP server error");
            }
        });

        self.tasks.lock().extend([sweeper, server]);

        info!(addr = %local_addr, sweep_interval_secs = interval.as_secs(), "Node started");
        Ok(local_addr)
    }

    /// Signal every task to stop and wait for them to finish.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Task ended abnormally"),
                Err(_) => warn!("Task did not stop within the grace period"),
            }
        }

        info!("Shutdown complete");
    }

    /// Get a reference to the service container.
    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }
}
