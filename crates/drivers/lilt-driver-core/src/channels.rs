//! Channel abstraction over the unit types a driver can animate.
//!
//! Every animated unit is 1-4 independent f32 channels: a bare scalar, a
//! 2D/3D vector, or an RGBA color. Drivers run the same per-channel math
//! regardless of unit, so the families are written once over this trait
//! instead of once per unit type.

/// A fixed set of independent f32 channels animated in lockstep.
pub trait Channels: Copy + PartialEq + core::fmt::Debug + 'static {
    /// Number of independent channels in this unit.
    const COUNT: usize;

    /// Read one channel. `index < Self::COUNT`.
    fn channel(&self, index: usize) -> f32;

    /// Write one channel. `index < Self::COUNT`.
    fn set_channel(&mut self, index: usize, value: f32);

    /// A unit with every channel set to `value`.
    fn splat(value: f32) -> Self;
}

impl Channels for f32 {
    const COUNT: usize = 1;

    #[inline]
    fn channel(&self, _index: usize) -> f32 {
        *self
    }

    #[inline]
    fn set_channel(&mut self, _index: usize, value: f32) {
        *self = value;
    }

    #[inline]
    fn splat(value: f32) -> Self {
        value
    }
}

/// Vectors and colors are plain arrays: `[f32; 2]`, `[f32; 3]`, and
/// `[f32; 4]` (RGBA).
impl<const N: usize> Channels for [f32; N] {
    const COUNT: usize = N;

    #[inline]
    fn channel(&self, index: usize) -> f32 {
        self[index]
    }

    #[inline]
    fn set_channel(&mut self, index: usize, value: f32) {
        self[index] = value;
    }

    #[inline]
    fn splat(value: f32) -> Self {
        [value; N]
    }
}
