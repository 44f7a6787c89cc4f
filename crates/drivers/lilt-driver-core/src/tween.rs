//! Tween drivers: fixed-duration eased interpolation.
//!
//! A tween captures its start values when started, advances a normalized
//! percentage by `dt / duration` each tick, and writes
//! `ease(percentage, start, target)` per channel. An optional delay holds the
//! tween in `Idle` before the first animated tick.

use log::debug;

use crate::binding::Binding;
use crate::channels::Channels;
use crate::driver::{CallbackTable, Driver, DriverState};
use crate::ease::Easing;
use crate::error::DriverError;
use crate::params::TweenParams;
use crate::schedule::ScheduleRef;
use crate::timer::Timer;

/// A timed interpolation over one or more bound values of unit type `T`.
#[derive(Debug)]
pub struct Tween<T: Channels> {
    properties: Vec<Binding<T>>,
    start_values: Vec<T>,
    targets: Vec<T>,
    easings: Vec<Easing>,
    duration: f32,
    delay: f32,
    delay_timer: Timer,
    percentage: f32,
    start_on_target_assigned: bool,
    state: DriverState,
    callbacks: CallbackTable,
    schedule: ScheduleRef,
}

impl<T: Channels> Default for Tween<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Channels> Tween<T> {
    pub fn new() -> Self {
        let params = TweenParams::default();
        Self {
            properties: Vec::new(),
            start_values: Vec::new(),
            targets: Vec::new(),
            easings: Vec::new(),
            duration: params.duration,
            delay: params.delay,
            delay_timer: Timer::new(0.0),
            percentage: 0.0,
            start_on_target_assigned: true,
            state: DriverState::Idle,
            callbacks: CallbackTable::new(),
            schedule: ScheduleRef::unlinked(),
        }
    }

    /// Bind the values this tween animates. Easing resets to linear until
    /// assigned through `set_ease` or a parameter bundle.
    pub fn set_references(&mut self, properties: Vec<Binding<T>>) -> &mut Self {
        let count = properties.len();
        self.targets = properties
            .iter()
            .map(|p| p.get().unwrap_or(T::splat(0.0)))
            .collect();
        self.properties = properties;
        self.easings = vec![Easing::default(); count];
        self
    }

    /// Retarget and start. Start values are re-captured, so chaining `to`
    /// calls animates from wherever the values currently sit.
    pub fn to(&mut self, targets: &[T]) -> Result<&mut Self, DriverError> {
        if self.properties.is_empty() {
            return Err(DriverError::NoProperties);
        }
        if targets.len() != self.properties.len() {
            return Err(DriverError::MismatchedTargets {
                expected: self.properties.len(),
                got: targets.len(),
            });
        }
        self.targets.clear();
        self.targets.extend_from_slice(targets);
        if self.start_on_target_assigned {
            self.start();
        }
        Ok(self)
    }

    /// Capture start values and begin. With a positive delay the tween idles
    /// first; the start callbacks fire on the tick the delay elapses.
    pub fn start(&mut self) {
        if self.properties.is_empty() {
            return;
        }
        self.start_values = self
            .properties
            .iter()
            .zip(&self.targets)
            .map(|(p, target)| p.get().unwrap_or(*target))
            .collect();
        self.percentage = 0.0;
        if self.delay > 0.0 {
            self.delay_timer = Timer::started(self.delay);
            self.state = DriverState::Idle;
        } else {
            self.begin();
        }
        self.schedule.enqueue();
    }

    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
    }

    pub fn set_duration(&mut self, duration: f32) -> &mut Self {
        self.duration = duration;
        self
    }

    pub fn set_delay(&mut self, delay: f32) -> &mut Self {
        self.delay = delay;
        self
    }

    /// Assign easing curves per property. A short list fills the remaining
    /// properties from its first entry, so one curve can cover them all.
    pub fn set_ease(&mut self, easings: &[Easing]) -> Result<&mut Self, DriverError> {
        if easings.is_empty() || easings.len() > self.properties.len() {
            return Err(DriverError::MismatchedEasings {
                expected: self.properties.len(),
                got: easings.len(),
            });
        }
        self.easings = (0..self.properties.len())
            .map(|i| easings.get(i).copied().unwrap_or(easings[0]))
            .collect();
        Ok(self)
    }

    pub fn set_parameters(&mut self, params: TweenParams) -> &mut Self {
        self.duration = params.duration;
        self.delay = params.delay;
        for ease in &mut self.easings {
            *ease = params.easing;
        }
        self
    }

    pub fn on_start(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.callbacks.add(DriverState::Start, Box::new(callback));
        self
    }

    pub fn on_update(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.callbacks.add(DriverState::Update, Box::new(callback));
        self
    }

    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.callbacks.add(DriverState::Complete, Box::new(callback));
        self
    }

    pub fn on_stopped(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.callbacks.add(DriverState::Stopped, Box::new(callback));
        self
    }

    pub fn clear_callbacks(&mut self) -> &mut Self {
        self.callbacks.clear();
        self
    }

    pub fn clear_callbacks_for(&mut self, state: DriverState) -> &mut Self {
        self.callbacks.clear_state(state);
        self
    }

    /// Whether `to` starts the tween immediately (the default) or leaves
    /// starting to an explicit `start()`.
    pub fn set_start_on_target_assigned(&mut self, start: bool) -> &mut Self {
        self.start_on_target_assigned = start;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.state == DriverState::Complete
    }

    /// Normalized progress in `[0, 1]`.
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    pub(crate) fn attach(
        &mut self,
        schedule: &std::rc::Rc<crate::schedule::Schedule>,
        handle: &crate::schedule::DriverHandle,
    ) {
        self.schedule.link(schedule, handle);
    }

    fn begin(&mut self) {
        self.state = DriverState::Start;
        self.callbacks.run(DriverState::Start);
    }
}

impl<T: Channels> Driver for Tween<T> {
    fn update(&mut self, dt: f32) -> bool {
        match self.state {
            DriverState::Complete | DriverState::Stopped => return false,
            DriverState::Idle => {
                if self.delay_timer.tick(dt) {
                    // Delay elapsed; animate on this same tick.
                    self.begin();
                } else {
                    return true;
                }
            }
            DriverState::Start | DriverState::Update => {}
        }
        self.state = DriverState::Update;

        if self.duration <= 0.0 {
            self.percentage = 1.0;
        } else {
            self.percentage = (self.percentage + dt / self.duration).min(1.0);
        }

        for i in 0..self.properties.len() {
            let start = self.start_values[i];
            let target = self.targets[i];
            let ease = self.easings[i];
            let mut value = start;
            for c in 0..T::COUNT {
                value.set_channel(
                    c,
                    ease.interpolate(self.percentage, start.channel(c), target.channel(c)),
                );
            }
            if !self.properties[i].set(value) {
                debug!("tween property dropped mid-flight; retiring");
                self.state = DriverState::Complete;
                return false;
            }
        }

        self.callbacks.run(DriverState::Update);

        if self.percentage >= 1.0 {
            self.state = DriverState::Complete;
            return false;
        }
        true
    }

    fn state(&self) -> DriverState {
        self.state
    }

    fn handle_tasks(&mut self) {
        self.callbacks.run(self.state);
    }

    fn delete(&mut self) {
        self.state = DriverState::Complete;
    }
}
