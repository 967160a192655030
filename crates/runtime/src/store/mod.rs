//! In-memory state behind the economy service.

mod permanent;
mod temporal;

pub use permanent::PermanentModifierStore;
pub use temporal::{ExpiredBoosts, PlayerBoosts, SweepReport, TemporalBonusStore};
