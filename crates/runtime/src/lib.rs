//! Concurrent runtime for the economy modifier engine.
//!
//! This crate wraps the pure rules of `economy-core` in shared stores, a
//! service object, and background workers. Hosts build a [`Runtime`], call
//! into its [`EconomyService`] from any thread, and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`service`] exposes every operation a game host calls
//! - [`store`] holds the timed boosts and permanent modifiers in memory
//! - [`api`] collects the seams hosts plug into (clock, realizer, errors)
//! - [`events`] provides the topic-based event bus and the notifier seam
//! - [`repository`] persists per-entity profiles
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod rewards;
pub mod runtime;
pub mod service;
pub mod store;

mod workers;

pub use api::{
    Clock, ManualClock, NoopRealizer, Result, RewardRealizer, RuntimeError, SystemClock,
};
pub use events::{
    Announcement, Audience, BoostEvent, EconomyEvent, EventBus, ModifierEvent, Notifier,
    RewardEvent, Topic,
};
pub use repository::{
    EntityProfile, FileProfileRepository, InMemoryProfileRepo, ProfileRepository,
    RepositoryError, StoredBoost,
};
pub use rewards::RewardRegistry;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use service::{EconomyService, HydrateReport};
pub use store::{
    ExpiredBoosts, PermanentModifierStore, PlayerBoosts, SweepReport, TemporalBonusStore,
};
