//! The runtime: per-family schedules, one-shot registries, and the single
//! per-frame entry point.
//!
//! Hosts construct one [`Runtime`], call [`Runtime::update`] once per frame
//! with the frame's delta time, and drive values either through owned driver
//! handles ([`Runtime::add_spring`] and friends) or through the
//! fire-and-forget helpers ([`Runtime::spring_to`], [`Runtime::tween_to`],
//! [`Runtime::wobble_on`]) that manage driver lifetime per bound value.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::binding::ValueCell;
use crate::channels::Channels;
use crate::config::Config;
use crate::driver::Driver;
use crate::params::{SpringParams, TweenParams, WobbleParams};
use crate::registry::CustomRegistry;
use crate::schedule::{DriverHandle, Schedule};
use crate::spring::Spring;
use crate::tween::Tween;
use crate::wobble::Wobble;

pub struct Runtime {
    config: Config,
    springs: Rc<Schedule>,
    tweens: Rc<Schedule>,
    wobbles: Rc<Schedule>,
    spring_customs: Rc<CustomRegistry>,
    tween_customs: Rc<CustomRegistry>,
    wobble_customs: Rc<CustomRegistry>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let capacity = config.schedule_capacity;
        Self {
            config,
            springs: Schedule::with_capacity(capacity),
            tweens: Schedule::with_capacity(capacity),
            wobbles: Schedule::with_capacity(capacity),
            spring_customs: Rc::new(CustomRegistry::new()),
            tween_customs: Rc::new(CustomRegistry::new()),
            wobble_customs: Rc::new(CustomRegistry::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Advance every active driver by `dt` seconds, clamped to
    /// `max_delta_time` so a frame hitch cannot fling integration.
    pub fn update(&self, dt: f32) {
        let dt = dt.clamp(0.0, self.config.max_delta_time);
        self.springs.update_all(dt);
        self.tweens.update_all(dt);
        self.wobbles.update_all(dt);
    }

    pub fn active_springs(&self) -> usize {
        self.springs.len()
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    pub fn active_wobbles(&self) -> usize {
        self.wobbles.len()
    }

    /// Register a host-built spring. The spring is linked to the spring
    /// schedule but not polled until it starts.
    pub fn add_spring<T: Channels>(&self, spring: Spring<T>) -> Rc<RefCell<Spring<T>>> {
        let rc = Rc::new(RefCell::new(spring));
        let handle: DriverHandle = rc.clone();
        rc.borrow_mut().attach(&self.springs, &handle);
        rc
    }

    pub fn add_tween<T: Channels>(&self, tween: Tween<T>) -> Rc<RefCell<Tween<T>>> {
        let rc = Rc::new(RefCell::new(tween));
        let handle: DriverHandle = rc.clone();
        rc.borrow_mut().attach(&self.tweens, &handle);
        rc
    }

    pub fn add_wobble<T: Channels>(&self, wobble: Wobble<T>) -> Rc<RefCell<Wobble<T>>> {
        let rc = Rc::new(RefCell::new(wobble));
        let handle: DriverHandle = rc.clone();
        rc.borrow_mut().attach(&self.wobbles, &handle);
        rc
    }

    /// Spring `cell` toward `target`, displacing any spring previously
    /// registered on the same cell. Absent params fall back to the family
    /// defaults; with `start` false the spring is registered and targeted
    /// but waits for an explicit `start()` on the returned handle. The
    /// registry entry clears itself when the spring completes or stops.
    pub fn spring_to<T: Channels>(
        &self,
        cell: &ValueCell<T>,
        target: T,
        params: Option<SpringParams>,
        start: bool,
    ) -> Rc<RefCell<Spring<T>>> {
        let key = cell.key();
        displace(&self.spring_customs, key, "spring");

        let mut spring = Spring::new();
        spring
            .set_references(vec![cell.binding()])
            .set_parameters(params.unwrap_or_default())
            .set_start_on_target_assigned(start);
        let rc = self.add_spring(spring);
        register(&self.spring_customs, key, &rc);
        rc.borrow_mut()
            .to(&[target])
            .expect("one bound value takes one target");
        rc
    }

    /// Tween `cell` toward `target`, displacing any tween previously
    /// registered on the same cell. Absent params fall back to the family
    /// defaults (cubic-in-out easing); with `start` false the tween waits
    /// for an explicit `start()` on the returned handle.
    pub fn tween_to<T: Channels>(
        &self,
        cell: &ValueCell<T>,
        target: T,
        params: Option<TweenParams>,
        start: bool,
    ) -> Rc<RefCell<Tween<T>>> {
        let key = cell.key();
        displace(&self.tween_customs, key, "tween");

        let mut tween = Tween::new();
        tween
            .set_references(vec![cell.binding()])
            .set_parameters(params.unwrap_or_default())
            .set_start_on_target_assigned(start);
        let rc = self.add_tween(tween);
        register(&self.tween_customs, key, &rc);
        rc.borrow_mut()
            .to(&[target])
            .expect("one bound value takes one target");
        rc
    }

    /// Register a wobble on `cell`, displacing any wobble previously
    /// registered on the same cell. Absent params fall back to the family
    /// defaults; with `start` false the wobble waits for an explicit
    /// `start()` on the returned handle.
    pub fn wobble_on<T: Channels>(
        &self,
        cell: &ValueCell<T>,
        params: Option<WobbleParams>,
        start: bool,
    ) -> Rc<RefCell<Wobble<T>>> {
        let key = cell.key();
        displace(&self.wobble_customs, key, "wobble");

        let mut wobble = Wobble::new();
        wobble
            .set_references(vec![cell.binding()])
            .set_parameters(params.unwrap_or_default());
        let rc = self.add_wobble(wobble);
        register(&self.wobble_customs, key, &rc);
        if start {
            rc.borrow_mut().start();
        }
        rc
    }

    /// The spring currently registered on `cell` by [`Runtime::spring_to`],
    /// if any.
    pub fn custom_spring<T: Channels>(&self, cell: &ValueCell<T>) -> Option<Rc<RefCell<Spring<T>>>> {
        self.spring_customs.get_typed(cell.key())
    }

    pub fn custom_tween<T: Channels>(&self, cell: &ValueCell<T>) -> Option<Rc<RefCell<Tween<T>>>> {
        self.tween_customs.get_typed(cell.key())
    }

    pub fn custom_wobble<T: Channels>(&self, cell: &ValueCell<T>) -> Option<Rc<RefCell<Wobble<T>>>> {
        self.wobble_customs.get_typed(cell.key())
    }
}

fn displace(registry: &Rc<CustomRegistry>, key: crate::binding::BindingKey, family: &str) {
    if let Some(previous) = registry.remove(key) {
        debug!("displacing registered {family} on re-target");
        previous.borrow_mut().delete();
    }
}

/// Register a driver under `key` and wire it to clear its own entry when it
/// completes or stops. The removal is guarded so a retiring driver never
/// evicts a successor registered on the same cell.
fn register<D>(registry: &Rc<CustomRegistry>, key: crate::binding::BindingKey, rc: &Rc<RefCell<D>>)
where
    D: DriverCallbacks + 'static,
{
    let handle: DriverHandle = rc.clone();
    let registry_ref = Rc::downgrade(registry);
    let weak_self = Rc::downgrade(&handle);
    let unregister = move || {
        if let Some(registry) = registry_ref.upgrade() {
            registry.remove_matching(key, &weak_self);
        }
    };
    {
        let mut driver = rc.borrow_mut();
        driver.on_complete_boxed(Box::new(unregister.clone()));
        driver.on_stopped_boxed(Box::new(unregister));
    }
    registry.insert(key, handle, rc.clone());
}

/// Callback-registration seam shared by the three families so the one-shot
/// helpers can wire lifecycle hooks generically.
pub(crate) trait DriverCallbacks: Driver {
    fn on_complete_boxed(&mut self, callback: crate::driver::Callback);
    fn on_stopped_boxed(&mut self, callback: crate::driver::Callback);
}

impl<T: Channels> DriverCallbacks for Spring<T> {
    fn on_complete_boxed(&mut self, callback: crate::driver::Callback) {
        self.on_complete(callback);
    }
    fn on_stopped_boxed(&mut self, callback: crate::driver::Callback) {
        self.on_stopped(callback);
    }
}

impl<T: Channels> DriverCallbacks for Tween<T> {
    fn on_complete_boxed(&mut self, callback: crate::driver::Callback) {
        self.on_complete(callback);
    }
    fn on_stopped_boxed(&mut self, callback: crate::driver::Callback) {
        self.on_stopped(callback);
    }
}

impl<T: Channels> DriverCallbacks for Wobble<T> {
    fn on_complete_boxed(&mut self, callback: crate::driver::Callback) {
        self.on_complete(callback);
    }
    fn on_stopped_boxed(&mut self, callback: crate::driver::Callback) {
        self.on_stopped(callback);
    }
}
