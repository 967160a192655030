use crate::modifiers::{Crystal, Pet};

/// Economy tuning parameters.
///
/// Level and growth limits are fixed by the domain types and mirrored here
/// for display; the remaining fields are runtime-tunable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EconomyConfig {
    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: u64,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
}

impl EconomyConfig {
    // ===== fixed by the domain types =====
    pub const MAX_CRYSTAL_LEVEL: u8 = Crystal::MAX_LEVEL;
    pub const MIN_CRYSTAL_LEVEL: u8 = Crystal::MIN_LEVEL;
    pub const XP_PER_GROWTH: u32 = Pet::XP_PER_GROWTH;
    pub const MAX_PET_GROWTH: u8 = Pet::MAX_GROWTH;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

    pub fn new() -> Self {
        Self {
            sweep_interval_secs: Self::DEFAULT_SWEEP_INTERVAL_SECS,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
        }
    }

    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self::new()
    }
}
