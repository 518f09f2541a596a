//! # Service Container
//!
//! Holds the wired subsystem instances. Everything is built once at startup
//! and shared by `Arc`; no subsystem owns another.
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────────┐
//! │ ea-04 Gateway (HTTP) │────→│ ea-03 EntitlementService │
//! └──────────────────────┘     └──────────┬───────────────┘
//!                    ┌────────────────────┼────────────────────┐
//!                    ↓                    ↓                    ↓
//!          ea-01 CodeStore     ea-02 LinkageRegistry   SubscriptionRepository
//! ```

pub mod config;

pub use config::{load_config, ConfigError, MaintenanceConfig, NodeConfig};

use std::sync::Arc;

use ea_01_code_registry::{CodeIssuer, CodeStore, CsprngCodeGenerator, InMemoryCodeStore};
use ea_02_linkage_registry::InMemoryLinkageRegistry;
use ea_03_entitlement::{EntitlementApi, EntitlementService, InMemorySubscriptionRepository};
use shared_types::{SystemTimeSource, TimeSource};
use tracing::info;

/// Wired subsystem instances.
pub struct ServiceContainer {
    pub config: NodeConfig,
    pub time_source: Arc<dyn TimeSource>,
    pub code_store: Arc<InMemoryCodeStore>,
    pub linkages: Arc<InMemoryLinkageRegistry>,
    pub subscriptions: Arc<InMemorySubscriptionRepository>,
    pub entitlement: Arc<EntitlementService>,
}

impl ServiceContainer {
    /// Build all subsystems against the system clock.
    pub fn new(config: NodeConfig) -> Self {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    /// Build all subsystems against the given clock.
    pub fn with_time_source(config: NodeConfig, time_source: Arc<dyn TimeSource>) -> Self {
        let code_store = Arc::new(InMemoryCodeStore::new(&config.codes));
        let store: Arc<dyn CodeStore> = code_store.clone();

        let issuer = Arc::new(CodeIssuer::new(
            Arc::clone(&store),
            Arc::new(CsprngCodeGenerator::default()),
            Arc::clone(&time_source),
            config.codes.clone(),
        ));

        let linkages = Arc::new(InMemoryLinkageRegistry::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());

        let entitlement = Arc::new(EntitlementService::new(
            config.entitlement.clone(),
            issuer,
            store,
            linkages.clone(),
            subscriptions.clone(),
            Arc::clone(&time_source),
        ));

        info!(
            max_codes = config.codes.max_codes,
            period_anchor = ?config.entitlement.period_anchor,
            "Subsystems initialized"
        );

        Self {
            config,
            time_source,
            code_store,
            linkages,
            subscriptions,
            entitlement,
        }
    }

    /// The entitlement API as seen by the gateway and the sweeper.
    pub fn api(&self) -> Arc<dyn EntitlementApi> {
        self.entitlement.clone()
    }
}
