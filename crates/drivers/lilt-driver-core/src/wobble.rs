//! Wobble drivers: sinusoidal oscillation around a captured base value.
//!
//! Each tick writes `base + sin(time * frequency) * amplitude * strength`
//! scaled by a per-channel percentage multiplier. Strength lives in an
//! internal bound scalar so optional ease-in/ease-out envelope tweens can
//! ramp the oscillation up and down; the envelopes are ticked inline by the
//! wobble rather than scheduled on their own.

use log::debug;

use crate::binding::{Binding, ValueCell};
use crate::channels::Channels;
use crate::driver::{CallbackTable, Driver, DriverState};
use crate::params::{TweenParams, WobbleParams};
use crate::schedule::ScheduleRef;
use crate::timer::Timer;
use crate::tween::Tween;

/// Accumulated time wraps here to keep `sin` arguments well-conditioned over
/// long-running oscillations.
const TIME_WRAP: f32 = 1e5;

/// A sinusoidal oscillator over one or more bound values of unit type `T`.
pub struct Wobble<T: Channels> {
    properties: Vec<Binding<T>>,
    start_values: Vec<T>,
    /// Per-channel multiplier on the wave, so one wobble can shake the x
    /// axis harder than the y axis.
    percentage: T,
    frequency: f32,
    amplitude: f32,
    /// Seconds to oscillate before auto-stopping; negative runs forever.
    duration: f32,
    time: f32,
    strength: ValueCell<f32>,
    ease_in: Option<Tween<f32>>,
    ease_out: Option<Tween<f32>>,
    easing_in: bool,
    easing_out: bool,
    stop_timer: Option<Timer>,
    state: DriverState,
    callbacks: CallbackTable,
    schedule: ScheduleRef,
}

impl<T: Channels> Default for Wobble<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Channels> Wobble<T> {
    pub fn new() -> Self {
        let params = WobbleParams::default();
        Self {
            properties: Vec::new(),
            start_values: Vec::new(),
            percentage: T::splat(1.0),
            frequency: params.frequency,
            amplitude: params.amplitude,
            duration: params.duration,
            time: 0.0,
            strength: ValueCell::new(1.0),
            ease_in: None,
            ease_out: None,
            easing_in: false,
            easing_out: false,
            stop_timer: None,
            state: DriverState::Idle,
            callbacks: CallbackTable::new(),
            schedule: ScheduleRef::unlinked(),
        }
    }

    /// Bind the values this wobble oscillates around.
    pub fn set_references(&mut self, properties: Vec<Binding<T>>) -> &mut Self {
        self.properties = properties;
        self.start_values.clear();
        self
    }

    /// Capture base values and begin oscillating. With an ease-in envelope,
    /// strength ramps from zero; any finite duration countdown starts only
    /// once that ramp finishes.
    pub fn start(&mut self) {
        if self.properties.is_empty() {
            return;
        }
        self.start_values = self
            .properties
            .iter()
            .map(|p| p.get().unwrap_or(T::splat(0.0)))
            .collect();
        self.time = 0.0;
        self.easing_out = false;
        self.stop_timer = None;
        if let Some(ease_in) = self.ease_in.as_mut() {
            self.strength.set(0.0);
            ease_in
                .to(&[1.0])
                .expect("envelope tween binds exactly one value");
            self.easing_in = true;
        } else {
            self.strength.set(1.0);
            self.easing_in = false;
            if self.duration >= 0.0 {
                self.stop_timer = Some(Timer::started(self.duration));
            }
        }
        self.state = DriverState::Start;
        self.callbacks.run(DriverState::Start);
        self.schedule.enqueue();
    }

    /// Wind down. With an ease-out envelope the wobble keeps polling while
    /// strength ramps to zero, then completes; without one it stops cold.
    pub fn stop(&mut self) {
        if matches!(self.state, DriverState::Complete | DriverState::Stopped) {
            return;
        }
        self.stop_timer = None;
        let animating = matches!(self.state, DriverState::Start | DriverState::Update);
        if animating {
            if let Some(ease_out) = self.ease_out.as_mut() {
                ease_out
                    .to(&[0.0])
                    .expect("envelope tween binds exactly one value");
                self.easing_in = false;
                self.easing_out = true;
                return;
            }
        }
        self.state = DriverState::Stopped;
        if animating {
            // Hard stop: settle bound values back on their base.
            self.restore_base_values();
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) -> &mut Self {
        self.frequency = frequency;
        self
    }

    pub fn set_amplitude(&mut self, amplitude: f32) -> &mut Self {
        self.amplitude = amplitude;
        self
    }

    /// Seconds to oscillate before auto-stopping; negative means run until
    /// stopped by hand.
    pub fn set_duration(&mut self, duration: f32) -> &mut Self {
        self.duration = duration;
        self
    }

    pub fn set_percentage(&mut self, percentage: T) -> &mut Self {
        self.percentage = percentage;
        self
    }

    /// Ramp strength from 0 to 1 at start.
    pub fn ease_in(&mut self, params: TweenParams) -> &mut Self {
        self.ease_in = Some(envelope(&self.strength, params));
        self
    }

    /// Ramp strength back to 0 when stopping.
    pub fn ease_out(&mut self, params: TweenParams) -> &mut Self {
        self.ease_out = Some(envelope(&self.strength, params));
        self
    }

    /// Same envelope shape on both ends.
    pub fn ease_in_out(&mut self, params: TweenParams) -> &mut Self {
        self.ease_in(params).ease_out(params)
    }

    pub fn set_parameters(&mut self, params: WobbleParams) -> &mut Self {
        self.duration = params.duration;
        self.frequency = params.frequency;
        self.amplitude = params.amplitude;
        self.ease_in = params.ease_in.map(|p| envelope(&self.strength, p));
        self.ease_out = params.ease_out.map(|p| envelope(&self.strength, p));
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

    pub fn is_complete(&self) -> bool {
        self.state == DriverState::Complete
    }

    /// Current envelope strength in `[0, 1]`.
    pub fn strength(&self) -> f32 {
        self.strength.get()
    }

    pub(crate) fn attach(
        &mut self,
        schedule: &std::rc::Rc<crate::schedule::Schedule>,
        handle: &crate::schedule::DriverHandle,
    ) {
        self.schedule.link(schedule, handle);
    }

    fn restore_base_values(&mut self) {
        for i in 0..self.properties.len() {
            self.properties[i].set(self.start_values[i]);
        }
    }
}

fn envelope(strength: &ValueCell<f32>, params: TweenParams) -> Tween<f32> {
    let mut tween = Tween::new();
    tween
        .set_references(vec![strength.binding()])
        .set_duration(params.duration)
        .set_delay(params.delay)
        .set_ease(&[params.easing])
        .expect("envelope tween binds exactly one value");
    tween
}

impl<T: Channels> Driver for Wobble<T> {
    fn update(&mut self, dt: f32) -> bool {
        match self.state {
            DriverState::Complete | DriverState::Stopped => return false,
            DriverState::Idle => return true,
            DriverState::Start | DriverState::Update => {}
        }
        self.state = DriverState::Update;

        // Drive the envelopes first so this tick's wave sees the ramped
        // strength.
        if self.easing_in {
            if let Some(tween) = self.ease_in.as_mut() {
                if !tween.update(dt) {
                    self.easing_in = false;
                    if self.duration >= 0.0 {
                        self.stop_timer = Some(Timer::started(self.duration));
                    }
                }
            }
        }
        if self.easing_out {
            if let Some(tween) = self.ease_out.as_mut() {
                if !tween.update(dt) {
                    self.easing_out = false;
                    self.state = DriverState::Complete;
                }
            }
        }
        let auto_stop = self
            .stop_timer
            .as_mut()
            .is_some_and(|timer| timer.tick(dt));
        if auto_stop {
            self.stop();
            if self.state == DriverState::Stopped {
                return false;
            }
        }

        self.time = (self.time + dt) % TIME_WRAP;
        let wave = (self.time * self.frequency).sin() * self.amplitude * self.strength.get();
        for i in 0..self.properties.len() {
            let base = self.start_values[i];
            let mut value = base;
            for c in 0..T::COUNT {
                value.set_channel(c, base.channel(c) + wave * self.percentage.channel(c));
            }
            if !self.properties[i].set(value) {
                debug!("wobble property dropped mid-flight; retiring");
                self.state = DriverState::Complete;
                return false;
            }
        }

        self.callbacks.run(DriverState::Update);

        if self.state == DriverState::Complete {
            // Ease-out finished this tick; settle back on the base values.
            self.restore_base_values();
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
