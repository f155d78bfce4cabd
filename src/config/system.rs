//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::axis::AxisConfig;
use super::executor::ExecutorConfig;
use super::mechanical::MechanicalConstraints;
use super::moves::{HomingConfig, MoveConfig};

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// The axis being driven.
    pub axis: AxisConfig,

    /// Executor settings.
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Homing settings.
    #[serde(default)]
    pub homing: HomingConfig,

    /// Named moves.
    #[serde(default)]
    pub moves: FnvIndexMap<String<32>, MoveConfig, 32>,
}

impl SystemConfig {
    /// Get a named move by name.
    pub fn move_config(&self, name: &str) -> Option<&MoveConfig> {
        self.moves
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all move names.
    pub fn move_names(&self) -> impl Iterator<Item = &str> {
        self.moves.keys().map(|s| s.as_str())
    }

    /// Derive the axis' mechanical constraints.
    pub fn mechanical(&self) -> MechanicalConstraints {
        MechanicalConstraints::from_config(&self.axis)
    }
}
