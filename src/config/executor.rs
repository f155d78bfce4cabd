//! Executor settings.

use serde::Deserialize;

/// Executor tuning from the `[executor]` table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ExecutorConfig {
    /// Control loop rate in Hz.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,

    /// Moves shorter than this (in steps) complete without a profile.
    #[serde(default = "default_tolerance")]
    pub arrival_tolerance_steps: f32,
}

fn default_tick_rate() -> u32 {
    1000
}

fn default_tolerance() -> f32 {
    0.1
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            arrival_tolerance_steps: default_tolerance(),
        }
    }
}

impl ExecutorConfig {
    /// Tick period in microseconds.
    pub fn tick_period_us(&self) -> u64 {
        1_000_000 / u64::from(self.tick_rate_hz.max(1))
    }
}
