//! One-shot driver registry keyed by bound-value identity.
//!
//! The runtime's fire-and-forget helpers (`spring_to`, `tween_to`,
//! `wobble_on`) register each driver here under its value's [`BindingKey`].
//! Re-targeting the same value displaces the previous driver, and a driver
//! removes its own entry on completion, so at most one registered driver
//! animates a value per family at a time.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;

use crate::binding::BindingKey;
use crate::driver::Driver;
use crate::schedule::DriverHandle;

struct Entry {
    driver: DriverHandle,
    /// Same driver behind `Rc<dyn Any>` so callers can downcast back to the
    /// concrete family type.
    typed: Rc<dyn Any>,
}

/// Registry of the active one-shot driver per bound value, for one family.
#[derive(Default)]
pub struct CustomRegistry {
    entries: RefCell<HashMap<BindingKey, Entry>>,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver for `key`, returning the driver it displaced.
    pub fn insert(
        &self,
        key: BindingKey,
        driver: DriverHandle,
        typed: Rc<dyn Any>,
    ) -> Option<DriverHandle> {
        self.entries
            .borrow_mut()
            .insert(key, Entry { driver, typed })
            .map(|entry| entry.driver)
    }

    pub fn remove(&self, key: BindingKey) -> Option<DriverHandle> {
        self.entries.borrow_mut().remove(&key).map(|e| e.driver)
    }

    /// Remove the entry for `key` only while it still holds `driver`. Used by
    /// completion callbacks so a finished driver never evicts its successor.
    pub fn remove_matching(&self, key: BindingKey, driver: &Weak<RefCell<dyn Driver>>) -> bool {
        let Some(driver) = driver.upgrade() else {
            return false;
        };
        let mut entries = self.entries.borrow_mut();
        let matches = entries
            .get(&key)
            .is_some_and(|entry| Rc::ptr_eq(&entry.driver, &driver));
        if matches {
            entries.remove(&key);
        }
        matches
    }

    pub fn get(&self, key: BindingKey) -> Option<DriverHandle> {
        self.entries
            .borrow()
            .get(&key)
            .map(|entry| Rc::clone(&entry.driver))
    }

    /// Registered driver for `key`, downcast to its concrete family type.
    pub fn get_typed<D: Driver>(&self, key: BindingKey) -> Option<Rc<RefCell<D>>> {
        self.entries
            .borrow()
            .get(&key)
            .and_then(|entry| Rc::clone(&entry.typed).downcast::<RefCell<D>>().ok())
    }

    pub fn contains(&self, key: BindingKey) -> bool {
        self.entries.borrow().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
