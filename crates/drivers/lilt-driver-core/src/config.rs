//! Runtime configuration.

use serde::{Deserialize, Serialize};

/// Tunable limits for a [`crate::Runtime`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest delta time (seconds) fed to drivers in one update. Frames
    /// longer than this are clamped so a hitch cannot fling spring
    /// integration past its target.
    pub max_delta_time: f32,
    /// Initial capacity reserved per family schedule.
    pub schedule_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_delta_time: 0.033,
            schedule_capacity: 64,
        }
    }
}
