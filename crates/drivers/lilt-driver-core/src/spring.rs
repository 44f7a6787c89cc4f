//! Spring drivers: damped harmonic motion toward a target.
//!
//! A spring accelerates each bound channel toward its target with force
//! `tension * displacement - dampening * speed`, integrated per tick. It
//! completes once every channel's force drops below a minimum proportional to
//! the original displacement, then snaps exactly onto the target.

use log::debug;

use crate::binding::Binding;
use crate::channels::Channels;
use crate::driver::{CallbackTable, Driver, DriverState};
use crate::error::DriverError;
use crate::motion::simple_harmonic_motion;
use crate::params::SpringParams;
use crate::schedule::ScheduleRef;

/// Fraction of the initial displacement below which a channel's force counts
/// as settled.
const MINIMUM_FORCE_SCALE: f32 = 1e-4;

/// A damped spring over one or more bound values of unit type `T`.
#[derive(Debug)]
pub struct Spring<T: Channels> {
    properties: Vec<Binding<T>>,
    targets: Vec<T>,
    speeds: Vec<T>,
    min_forces: Vec<T>,
    tension: f32,
    dampening: f32,
    start_on_target_assigned: bool,
    state: DriverState,
    callbacks: CallbackTable,
    schedule: ScheduleRef,
}

impl<T: Channels> Default for Spring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Channels> Spring<T> {
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            targets: Vec::new(),
            speeds: Vec::new(),
            min_forces: Vec::new(),
            tension: SpringParams::default().tension,
            dampening: SpringParams::default().dampening,
            start_on_target_assigned: true,
            state: DriverState::Stopped,
            callbacks: CallbackTable::new(),
            schedule: ScheduleRef::unlinked(),
        }
    }

    /// Bind the values this spring animates. Resets speeds and targets.
    pub fn set_references(&mut self, properties: Vec<Binding<T>>) -> &mut Self {
        let count = properties.len();
        self.targets = properties
            .iter()
            .map(|p| p.get().unwrap_or(T::splat(0.0)))
            .collect();
        self.properties = properties;
        self.speeds = vec![T::splat(0.0); count];
        self.min_forces = vec![T::splat(f32::EPSILON); count];
        self
    }

    /// Retarget and start moving. Momentum from a previous flight carries
    /// over, so re-targeting mid-motion feels continuous.
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
        self.recompute_min_forces();
        if self.start_on_target_assigned {
            self.start();
        }
        Ok(self)
    }

    /// Jump straight onto new targets without animating.
    pub fn snap_to(&mut self, targets: &[T]) -> Result<&mut Self, DriverError> {
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
        self.snap();
        Ok(self)
    }

    /// Begin polling. Runs start callbacks and enqueues on the linked
    /// schedule. A spring already at its target never enters the schedule:
    /// it snaps and completes in place, firing its complete callbacks.
    pub fn start(&mut self) {
        if self.properties.is_empty() {
            return;
        }
        if !self.needs_force() {
            self.snap();
            self.state = DriverState::Complete;
            self.callbacks.run(DriverState::Complete);
            return;
        }
        self.state = DriverState::Start;
        self.callbacks.run(DriverState::Start);
        self.schedule.enqueue();
    }

    /// True while any channel sits further from its target than the settling
    /// threshold.
    pub fn needs_force(&self) -> bool {
        for i in 0..self.properties.len() {
            let Some(current) = self.properties[i].get() else {
                continue;
            };
            for c in 0..T::COUNT {
                let displacement = (self.targets[i].channel(c) - current.channel(c)).abs();
                if displacement > self.min_forces[i].channel(c) {
                    return true;
                }
                if self.speeds[i].channel(c).abs() > self.min_forces[i].channel(c) {
                    return true;
                }
            }
        }
        false
    }

    /// Halt without reaching the target; stopped callbacks fire on the next
    /// poll as the spring leaves its schedule.
    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
    }

    /// Jump every bound value exactly onto its target and kill momentum.
    pub fn snap(&mut self) {
        for i in 0..self.properties.len() {
            self.speeds[i] = T::splat(0.0);
            self.properties[i].set(self.targets[i]);
        }
    }

    pub fn set_tension(&mut self, tension: f32) -> &mut Self {
        self.tension = tension;
        self
    }

    pub fn set_dampening(&mut self, dampening: f32) -> &mut Self {
        self.dampening = dampening;
        self
    }

    pub fn set_parameters(&mut self, params: SpringParams) -> &mut Self {
        self.tension = params.tension;
        self.dampening = params.dampening;
        self
    }

    /// Whether `to` kicks the spring off immediately (the default) or leaves
    /// starting to an explicit `start()`.
    pub fn set_start_on_target_assigned(&mut self, start: bool) -> &mut Self {
        self.start_on_target_assigned = start;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.state == DriverState::Complete
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

    pub(crate) fn attach(
        &mut self,
        schedule: &std::rc::Rc<crate::schedule::Schedule>,
        handle: &crate::schedule::DriverHandle,
    ) {
        self.schedule.link(schedule, handle);
    }

    /// Settling threshold per channel, scaled to the displacement at retarget
    /// time and floored so a channel already at its target counts settled.
    fn recompute_min_forces(&mut self) {
        for i in 0..self.properties.len() {
            let current = self.properties[i].get().unwrap_or(self.targets[i]);
            let mut min = T::splat(0.0);
            for c in 0..T::COUNT {
                let displacement = (self.targets[i].channel(c) - current.channel(c)).abs();
                min.set_channel(c, (MINIMUM_FORCE_SCALE * displacement).max(f32::EPSILON));
            }
            self.min_forces[i] = min;
        }
    }
}

impl<T: Channels> Driver for Spring<T> {
    fn update(&mut self, dt: f32) -> bool {
        match self.state {
            DriverState::Complete | DriverState::Stopped => return false,
            DriverState::Idle => return true,
            DriverState::Start | DriverState::Update => {}
        }
        self.state = DriverState::Update;

        let mut settled = true;
        for i in 0..self.properties.len() {
            let Some(mut value) = self.properties[i].get() else {
                debug!("spring property dropped mid-flight; retiring");
                self.state = DriverState::Complete;
                return false;
            };
            let target = self.targets[i];
            let min = self.min_forces[i];
            let mut speed = self.speeds[i];
            for c in 0..T::COUNT {
                let displacement = target.channel(c) - value.channel(c);
                let force =
                    simple_harmonic_motion(self.tension, displacement, self.dampening, speed.channel(c));
                // Net force alone dips through zero at each overshoot peak;
                // the tension term keeps a still-displaced channel unsettled.
                if force.abs() >= min.channel(c)
                    || (self.tension * displacement).abs() >= min.channel(c)
                {
                    settled = false;
                }
                speed.set_channel(c, speed.channel(c) + force * dt);
                value.set_channel(c, value.channel(c) + speed.channel(c) * dt);
            }
            self.speeds[i] = speed;
            self.properties[i].set(value);
        }

        self.callbacks.run(DriverState::Update);

        if settled {
            self.snap();
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
