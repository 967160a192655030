//! Persistence of per-entity economy state.
//!
//! Only player-scoped data is persisted: timed player boosts, crystals, pets
//! and the equipped crystal set. Admin-global boosts live in memory only.

mod error;
mod file;
mod memory;
mod profile;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileProfileRepository;
pub use memory::InMemoryProfileRepo;
pub use profile::{EntityProfile, StoredBoost};
pub use traits::ProfileRepository;
