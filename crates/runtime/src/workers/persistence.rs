//! Persistence worker for per-entity profiles.
//!
//! The service hands over complete profile snapshots through an unbounded
//! channel and never waits for the write. The worker coalesces queued
//! snapshots per entity (only the newest is written), saves them through the
//! repository on the blocking pool, and logs failures without retrying.
//!
//! On shutdown the channel is closed and everything still queued is written
//! before the worker exits.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use economy_core::EntityId;

use crate::repository::{EntityProfile, ProfileRepository};

/// Snapshot of one entity's state to be written.
#[derive(Debug, Clone)]
pub struct PersistRequest {
    pub entity: EntityId,
    pub profile: EntityProfile,
}

/// Background worker that owns all profile writes.
pub struct PersistenceWorker {
    repository: Arc<dyn ProfileRepository>,
    rx: mpsc::UnboundedReceiver<PersistRequest>,
    shutdown: watch::Receiver<bool>,
}

impl PersistenceWorker {
    pub fn new(
        repository: Arc<dyn ProfileRepository>,
        rx: mpsc::UnboundedReceiver<PersistRequest>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            repository,
            rx,
            shutdown,
        }
    }

    /// Main worker loop
    pub async fn run(mut self) {
        info!("PersistenceWorker started");

        loop {
            tokio::select! {
                Some(request) = self.rx.recv() => {
                    let mut pending = vec![request];
                    while let Ok(more) = self.rx.try_recv() {
                        pending.push(more);
                    }
                    self.write(pending).await;
                }
                _ = self.shutdown.changed() => break,
                else => break,
            }
        }

        // Accept nothing new, flush what is already queued.
        self.rx.close();
        let mut pending = Vec::new();
        while let Some(request) = self.rx.recv().await {
            pending.push(request);
        }
        let flushed = pending.len();
        self.write(pending).await;

        info!("PersistenceWorker stopped ({} queued write(s) flushed)", flushed);
    }

    async fn write(&self, pending: Vec<PersistRequest>) {
        if pending.is_empty() {
            return;
        }

        let latest = coalesce(pending);
        let repository = Arc::clone(&self.repository);
        let result = tokio::task::spawn_blocking(move || {
            for (entity, profile) in latest {
                match repository.save(entity, &profile) {
                    Ok(()) => debug!("Persisted profile[{}]", entity),
                    Err(e) => warn!("Failed to persist profile[{}]: {}", entity, e),
                }
            }
        })
        .await;

        if let Err(e) = result {
            warn!("Profile write task failed: {}", e);
        }
    }
}

/// Keeps only the newest snapshot per entity, in first-seen order.
fn coalesce(pending: Vec<PersistRequest>) -> Vec<(EntityId, EntityProfile)> {
    let mut order = Vec::new();
    let mut latest: HashMap<EntityId, EntityProfile> = HashMap::new();
    for PersistRequest { entity, profile } in pending {
        if latest.insert(entity, profile).is_none() {
            order.push(entity);
        }
    }
    order
        .into_iter()
        .filter_map(|entity| latest.remove(&entity).map(|profile| (entity, profile)))
        .collect()
}
