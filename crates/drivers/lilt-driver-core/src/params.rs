//! Serializable parameter bundles for the driver families.
//!
//! Hosts keep these in data files (tuning presets, per-entity overrides) and
//! hand them to [`crate::Runtime`] one-shot helpers or to
//! `set_parameters` on a driver.

use serde::{Deserialize, Serialize};

use crate::ease::Easing;

/// Spring stiffness and damping.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    pub tension: f32,
    pub dampening: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            tension: 50.0,
            dampening: 10.0,
        }
    }
}

/// Tween timing and curve.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenParams {
    /// Seconds from start to completion.
    pub duration: f32,
    /// Seconds to idle before the tween begins animating.
    pub delay: f32,
    /// Curve applied to every bound property.
    pub easing: Easing,
}

impl Default for TweenParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            delay: 0.0,
            easing: Easing::CubicInOut,
        }
    }
}

/// Wobble oscillation shape and envelope.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WobbleParams {
    /// Seconds to run before the auto-stop kicks in; negative means forever.
    pub duration: f32,
    pub frequency: f32,
    pub amplitude: f32,
    /// Ramp strength 0 -> 1 at start.
    pub ease_in: Option<TweenParams>,
    /// Ramp strength back to 0 on stop.
    pub ease_out: Option<TweenParams>,
}

impl Default for WobbleParams {
    fn default() -> Self {
        Self {
            duration: -1.0,
            frequency: 5.0,
            amplitude: 10.0,
            ease_in: None,
            ease_out: None,
        }
    }
}
