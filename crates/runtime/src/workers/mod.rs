//! Background tasks spawned by the runtime.
//!
//! Each worker stops when its stop signal flips to `true`.

mod persistence;
mod sweeper;

pub use persistence::{PersistRequest, PersistenceWorker};
pub use sweeper::ExpirySweeper;
