//! Event payloads for each topic.

use serde::{Deserialize, Serialize};

use economy_core::{BoostInstance, ContentId, Crystal, EntityId, PetId, RewardPayload};

/// Who an announcement is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    Everyone,
    Entity(EntityId),
}

/// Human-readable notice delivered through the [`Notifier`](super::Notifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub audience: Audience,
    pub message: String,
}

impl Announcement {
    pub fn everyone(message: impl Into<String>) -> Self {
        Self {
            audience: Audience::Everyone,
            message: message.into(),
        }
    }

    pub fn to_entity(entity: EntityId, message: impl Into<String>) -> Self {
        Self {
            audience: Audience::Entity(entity),
            message: message.into(),
        }
    }
}

/// Timed boost lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoostEvent {
    /// `entity` is `None` for admin-global boosts.
    Activated {
        entity: Option<EntityId>,
        boost: BoostInstance,
    },
    Expired {
        entity: Option<EntityId>,
        boost: BoostInstance,
    },
}

/// A reward payload was granted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub entity: EntityId,
    /// Source table, `None` for direct grants.
    pub table: Option<ContentId>,
    pub payload: RewardPayload,
}

/// Crystal and pet changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierEvent {
    CrystalAdded { entity: EntityId, crystal: Crystal },
    CrystalRevealed { entity: EntityId, crystal: Crystal },
    PetAdded { entity: EntityId, pet: PetId },
    PetGrew {
        entity: EntityId,
        pet: PetId,
        growth: u8,
    },
}
