//! Frame-driven animation drivers for host-owned values.
//!
//! - [`Spring`]: damped harmonic motion toward a target, snapped exact on
//!   settle
//! - [`Tween`]: fixed-duration eased interpolation with an optional start
//!   delay
//! - [`Wobble`]: sinusoidal oscillation with optional ease-in/ease-out
//!   strength envelopes
//! - [`Runtime`]: per-family schedules plus one-shot [`Runtime::spring_to`],
//!   [`Runtime::tween_to`] and [`Runtime::wobble_on`] helpers that keep at
//!   most one registered driver per bound value
//!
//! Values are bound through [`ValueCell`] and [`Binding`]; a driver never
//! keeps a host value alive and retires itself once the value is dropped.
//! Everything is single-threaded and polled from one `Runtime::update` call
//! per frame.

pub mod binding;
pub mod channels;
pub mod config;
pub mod driver;
pub mod ease;
pub mod error;
pub mod motion;
pub mod params;
pub mod registry;
pub mod runtime;
pub mod schedule;
pub mod spring;
pub mod timer;
pub mod tween;
pub mod wobble;

pub use binding::{Binding, BindingKey, ValueCell};
pub use channels::Channels;
pub use config::Config;
pub use driver::{Callback, CallbackTable, Driver, DriverState};
pub use ease::Easing;
pub use error::DriverError;
pub use motion::simple_harmonic_motion;
pub use params::{SpringParams, TweenParams, WobbleParams};
pub use registry::CustomRegistry;
pub use runtime::Runtime;
pub use schedule::{DriverHandle, Schedule, ScheduleRef};
pub use spring::Spring;
pub use timer::Timer;
pub use tween::Tween;
pub use wobble::Wobble;
