//! Hand-off for reward payloads the bonus engine does not own.

use economy_core::{EntityId, RewardPayload};

/// Turns a currency or item payload into a concrete in-game grant.
///
/// Called synchronously from [`EconomyService::grant`](crate::EconomyService::grant);
/// implementations should enqueue work rather than block.
pub trait RewardRealizer: Send + Sync {
    fn realize(&self, entity: EntityId, payload: &RewardPayload);
}

/// Realizer that only logs. Used when the host has no economy of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRealizer;

impl RewardRealizer for NoopRealizer {
    fn realize(&self, entity: EntityId, payload: &RewardPayload) {
        tracing::debug!(
            "No realizer configured, dropping {} for {}",
            payload.describe(),
            entity
        );
    }
}
