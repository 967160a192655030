//! High-level runtime orchestrator.
//!
//! The runtime owns the background workers, wires the persistence channel
//! and event bus into the [`EconomyService`], and exposes a builder-based
//! API for hosts.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use economy_core::{BonusCatalog, EconomyConfig, EntityId, RewardTableDef};

use crate::api::{Clock, NoopRealizer, Result, RewardRealizer, RuntimeError, SystemClock};
use crate::events::{EconomyEvent, EventBus, Notifier, Topic};
use crate::repository::{EntityProfile, InMemoryProfileRepo, ProfileRepository};
use crate::rewards::RewardRegistry;
use crate::service::{EconomyService, HydrateReport, ServiceParts};
use crate::workers::{ExpirySweeper, PersistenceWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub sweep_interval: Duration,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from(&EconomyConfig::default())
    }
}

impl From<&EconomyConfig> for RuntimeConfig {
    fn from(config: &EconomyConfig) -> Self {
        Self {
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
            event_buffer_size: config.event_buffer_size,
        }
    }
}

/// Running economy: the shared service plus its background workers.
pub struct Runtime {
    service: Arc<EconomyService>,
    repository: Arc<dyn ProfileRepository>,
    stop_sweeper: watch::Sender<bool>,
    stop_persistence: watch::Sender<bool>,

    // Background workers
    sweeper_handle: JoinHandle<()>,
    persistence_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn service(&self) -> Arc<EconomyService> {
        Arc::clone(&self.service)
    }

    /// Loads and hydrates the persisted state of an entity that joined.
    ///
    /// A repository failure is returned and leaves in-memory state alone.
    pub async fn connect(&self, entity: EntityId) -> Result<HydrateReport> {
        let repository = Arc::clone(&self.repository);
        let profile = tokio::task::spawn_blocking(move || repository.load(entity))
            .await
            .map_err(|source| RuntimeError::WorkerJoin {
                worker: "profile loader",
                source,
            })??
            .unwrap_or_default();

        let report = self.service.hydrate(entity, profile);
        debug!("Connected {}", entity);
        Ok(report)
    }

    /// Persists and evicts an entity that left.
    pub fn disconnect(&self, entity: EntityId) -> EntityProfile {
        self.service.disconnect(entity)
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<EconomyEvent> {
        self.service.events().subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops the sweeper, then lets the persistence worker flush every
    /// queued write before returning.
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down economy runtime");
        // Err only means the worker already exited.
        let _ = self.stop_sweeper.send(true);
        self.sweeper_handle
            .await
            .map_err(|source| RuntimeError::WorkerJoin {
                worker: "sweeper",
                source,
            })?;

        let _ = self.stop_persistence.send(true);
        self.persistence_handle
            .await
            .map_err(|source| RuntimeError::WorkerJoin {
                worker: "persistence",
                source,
            })?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<BonusCatalog>>,
    rewards: Vec<RewardTableDef>,
    repository: Option<Arc<dyn ProfileRepository>>,
    notifier: Option<Arc<dyn Notifier>>,
    realizer: Option<Arc<dyn RewardRealizer>>,
    clock: Option<Arc<dyn Clock>>,
    rng_seed: Option<u64>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            rewards: Vec::new(),
            repository: None,
            notifier: None,
            realizer: None,
            clock: None,
            rng_seed: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the bonus catalog (required)
    pub fn catalog(mut self, catalog: impl Into<Arc<BonusCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn rewards(mut self, tables: impl IntoIterator<Item = RewardTableDef>) -> Self {
        self.rewards.extend(tables);
        self
    }

    /// Profile storage (default: in-memory)
    pub fn repository(mut self, repository: Arc<dyn ProfileRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Announcement sink (default: the runtime's event bus)
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Handler for currency and item rewards (default: log and drop)
    pub fn realizer(mut self, realizer: Arc<dyn RewardRealizer>) -> Self {
        self.realizer = Some(realizer);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seed the reward and reveal RNG for reproducible draws.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Wires the service and spawns the workers. Must be called inside a
    /// tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;

        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryProfileRepo::new()) as Arc<dyn ProfileRepository>);
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(events.clone()) as Arc<dyn Notifier>);
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        let (stop_sweeper, sweeper_rx) = watch::channel(false);
        let (stop_persistence, persistence_rx) = watch::channel(false);

        let service = Arc::new(EconomyService::new(ServiceParts {
            catalog,
            rewards: Arc::new(RewardRegistry::new(self.rewards)),
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
            notifier,
            realizer: self
                .realizer
                .unwrap_or_else(|| Arc::new(NoopRealizer) as Arc<dyn RewardRealizer>),
            events,
            persist_tx,
            rng,
        }));

        let persistence =
            PersistenceWorker::new(Arc::clone(&repository), persist_rx, persistence_rx);
        let persistence_handle = tokio::spawn(async move {
            persistence.run().await;
        });

        let sweeper = ExpirySweeper::new(
            Arc::clone(&service),
            self.config.sweep_interval,
            sweeper_rx,
        );
        let sweeper_handle = tokio::spawn(async move {
            sweeper.run().await;
        });

        info!(
            "Economy runtime started: {} reward table(s), sweep every {:?}",
            service.rewards().len(),
            self.config.sweep_interval
        );

        Ok(Runtime {
            service,
            repository,
            stop_sweeper,
            stop_persistence,
            sweeper_handle,
            persistence_handle,
        })
    }
}
