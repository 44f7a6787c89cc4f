//! Bound values: the get/set seam between drivers and host-owned fields.
//!
//! The host owns a `ValueCell<T>`; drivers hold `Binding<T>` weak accessors.
//! A binding never keeps the underlying value alive — when the host drops the
//! cell, the binding reports "gone" and the driver retires itself instead of
//! touching freed state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Identity of a bound value, used as the custom-registry key.
///
/// Derived from the cell's allocation address. If a cell is dropped and a new
/// allocation lands on the same address, the stale key aliases the new one
/// until the dangling driver self-deletes on its next poll (one tick).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BindingKey(usize);

/// A host-owned mutable value that drivers can animate.
#[derive(Debug, Default)]
pub struct ValueCell<T> {
    inner: Rc<RefCell<T>>,
}

impl<T: Copy> ValueCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    pub fn get(&self) -> T {
        *self.inner.borrow()
    }

    pub fn set(&self, value: T) {
        *self.inner.borrow_mut() = value;
    }

    /// A weak accessor for drivers.
    pub fn binding(&self) -> Binding<T> {
        Binding {
            target: Rc::downgrade(&self.inner),
        }
    }

    pub fn key(&self) -> BindingKey {
        BindingKey(Rc::as_ptr(&self.inner) as usize)
    }
}

impl<T> Clone for ValueCell<T> {
    /// Clones share the same underlying value (and identity).
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// A driver-held accessor over one bound value.
#[derive(Debug)]
pub struct Binding<T> {
    target: Weak<RefCell<T>>,
}

impl<T: Copy> Binding<T> {
    /// Current value, or `None` when the cell is gone.
    pub fn get(&self) -> Option<T> {
        self.target.upgrade().map(|cell| *cell.borrow())
    }

    /// Write a new value. Returns false when the cell is gone.
    pub fn set(&self, value: T) -> bool {
        match self.target.upgrade() {
            Some(cell) => {
                *cell.borrow_mut() = value;
                true
            }
            None => false,
        }
    }

    pub fn is_dangling(&self) -> bool {
        self.target.strong_count() == 0
    }

    pub fn key(&self) -> BindingKey {
        BindingKey(self.target.as_ptr() as usize)
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            target: Weak::clone(&self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_reads_and_writes_through() {
        let cell = ValueCell::new(1.0f32);
        let binding = cell.binding();
        assert_eq!(binding.get(), Some(1.0));
        assert!(binding.set(4.0));
        assert_eq!(cell.get(), 4.0);
        assert_eq!(binding.key(), cell.key());
    }

    #[test]
    fn binding_dangles_after_cell_drop() {
        let cell = ValueCell::new([0.0f32; 2]);
        let binding = cell.binding();
        drop(cell);
        assert!(binding.is_dangling());
        assert_eq!(binding.get(), None);
        assert!(!binding.set([1.0, 1.0]));
    }

    #[test]
    fn distinct_cells_have_distinct_keys() {
        let a = ValueCell::new(0.0f32);
        let b = ValueCell::new(0.0f32);
        assert_ne!(a.key(), b.key());
        assert_eq!(a.clone().key(), a.key());
    }
}
