//! Driver lifecycle: states, callback table, and the polling contract.

use serde::{Deserialize, Serialize};

/// Lifecycle state shared by all driver families.
///
/// Springs begin in `Stopped`, tweens and wobbles in `Idle`. `Complete` and
/// `Stopped` do no further numeric work; `Complete` additionally reports
/// inactive to the schedule, which removes the driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DriverState {
    Idle,
    Start,
    Update,
    Complete,
    Stopped,
}

impl DriverState {
    pub const COUNT: usize = 5;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            DriverState::Idle => 0,
            DriverState::Start => 1,
            DriverState::Update => 2,
            DriverState::Complete => 3,
            DriverState::Stopped => 4,
        }
    }
}

/// A lifecycle hook. Fires synchronously inline; it may start or stop other
/// drivers, but must not re-enter the driver it is registered on.
pub type Callback = Box<dyn FnMut()>;

/// Callback lists keyed by lifecycle state.
///
/// A fixed table built eagerly at construction, one append-only slot per
/// state. Callbacks run in registration order.
#[derive(Default)]
pub struct CallbackTable {
    slots: [Vec<Callback>; DriverState::COUNT],
}

impl CallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, state: DriverState, callback: Callback) {
        self.slots[state.index()].push(callback);
    }

    pub fn run(&mut self, state: DriverState) {
        for callback in &mut self.slots[state.index()] {
            callback();
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    pub fn clear_state(&mut self, state: DriverState) {
        self.slots[state.index()].clear();
    }
}

impl core::fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let counts: Vec<usize> = self.slots.iter().map(Vec::len).collect();
        f.debug_struct("CallbackTable").field("counts", &counts).finish()
    }
}

/// Polling contract between a driver and its family schedule.
pub trait Driver: 'static {
    /// Advance by `dt` seconds. Returns true while the driver wants further
    /// polling and false once it is complete (the schedule then fires the
    /// current-state callbacks and drops it).
    fn update(&mut self, dt: f32) -> bool;

    fn state(&self) -> DriverState;

    /// Run the callbacks registered for the current state.
    fn handle_tasks(&mut self);

    /// Force completion on the next poll (lazy removal).
    fn delete(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn callbacks_run_in_registration_order() {
        let order = Rc::new(Cell::new(0u32));
        let mut table = CallbackTable::new();
        for expected in 0..3u32 {
            let order = Rc::clone(&order);
            table.add(
                DriverState::Start,
                Box::new(move || {
                    assert_eq!(order.get(), expected);
                    order.set(expected + 1);
                }),
            );
        }
        table.run(DriverState::Start);
        assert_eq!(order.get(), 3);
        // Other slots stay empty.
        table.run(DriverState::Complete);
        assert_eq!(order.get(), 3);
    }

    #[test]
    fn clear_state_only_touches_one_slot() {
        let hits = Rc::new(Cell::new(0u32));
        let mut table = CallbackTable::new();
        let h = Rc::clone(&hits);
        table.add(DriverState::Start, Box::new(move || h.set(h.get() + 1)));
        let h = Rc::clone(&hits);
        table.add(DriverState::Complete, Box::new(move || h.set(h.get() + 10)));
        table.clear_state(DriverState::Start);
        table.run(DriverState::Start);
        table.run(DriverState::Complete);
        assert_eq!(hits.get(), 10);
    }
}
