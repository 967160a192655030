//! Topic-based event bus and the notifier seam.
//!
//! Typed [`EconomyEvent`]s are published per topic so consumers subscribe
//! only to what they need. Human-readable notices go through [`Notifier`];
//! the bus itself is a notifier that republishes them on
//! [`Topic::Announcement`].

mod bus;
mod types;

pub use bus::{EconomyEvent, EventBus, Topic};
pub use types::{Announcement, Audience, BoostEvent, ModifierEvent, RewardEvent};

/// Delivers announcements to players.
///
/// Called synchronously from service operations; implementations must not
/// block.
pub trait Notifier: Send + Sync {
    fn announce(&self, announcement: &Announcement);
}

impl Notifier for EventBus {
    fn announce(&self, announcement: &Announcement) {
        self.publish(EconomyEvent::Announced(announcement.clone()));
    }
}
