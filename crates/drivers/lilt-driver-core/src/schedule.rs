//! Per-family driver schedules.
//!
//! Each driver family (springs, tweens, wobbles) gets its own [`Schedule`].
//! A schedule polls every active driver once per update, fires the finished
//! drivers' current-state callbacks, and drops them. Drivers are not polled
//! until something enqueues them, so an idle runtime costs nothing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::trace;

use crate::driver::Driver;

/// Shared handle to a scheduled driver.
pub type DriverHandle = Rc<RefCell<dyn Driver>>;

/// The active set for one driver family.
pub struct Schedule {
    active: RefCell<Vec<DriverHandle>>,
}

impl Schedule {
    pub fn new() -> Rc<Self> {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Rc<Self> {
        Rc::new(Self {
            active: RefCell::new(Vec::with_capacity(capacity)),
        })
    }

    /// Enqueue a driver for polling. Enqueuing a driver that is already
    /// active is a no-op, so restarting mid-flight never double-polls.
    pub fn add(&self, driver: DriverHandle) {
        let mut active = self.active.borrow_mut();
        if active.iter().any(|d| Rc::ptr_eq(d, &driver)) {
            return;
        }
        active.push(driver);
    }

    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }

    /// Poll every active driver once.
    ///
    /// Works over a snapshot so callbacks may enqueue new drivers mid-update;
    /// those start polling on the next call. Finished drivers run their
    /// current-state callbacks after the poll pass, then leave the set.
    pub fn update_all(&self, dt: f32) {
        let snapshot: Vec<DriverHandle> = self.active.borrow().clone();
        if snapshot.is_empty() {
            return;
        }

        let mut finished: Vec<DriverHandle> = Vec::new();
        for driver in &snapshot {
            let keep = driver.borrow_mut().update(dt);
            if !keep {
                finished.push(Rc::clone(driver));
            }
        }

        for driver in &finished {
            driver.borrow_mut().handle_tasks();
        }

        if !finished.is_empty() {
            trace!("schedule retiring {} driver(s)", finished.len());
            self.active
                .borrow_mut()
                .retain(|d| !finished.iter().any(|f| Rc::ptr_eq(d, f)));
        }
    }
}

/// A driver's back-reference to its schedule.
///
/// Drivers start detached; the runtime links them at registration. Starting a
/// detached driver (a nested envelope tween, or one built in a test) simply
/// skips the enqueue.
#[derive(Default)]
pub struct ScheduleRef {
    link: Option<(Weak<Schedule>, Weak<RefCell<dyn Driver>>)>,
}

impl ScheduleRef {
    pub fn unlinked() -> Self {
        Self::default()
    }

    pub fn link(&mut self, schedule: &Rc<Schedule>, driver: &DriverHandle) {
        self.link = Some((Rc::downgrade(schedule), Rc::downgrade(driver)));
    }

    /// Push the linked driver onto its schedule. Returns false when detached
    /// or when either side has been dropped.
    pub fn enqueue(&self) -> bool {
        let Some((schedule, driver)) = &self.link else {
            return false;
        };
        match (schedule.upgrade(), driver.upgrade()) {
            (Some(schedule), Some(driver)) => {
                schedule.add(driver);
                true
            }
            _ => false,
        }
    }
}

impl core::fmt::Debug for ScheduleRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScheduleRef")
            .field("linked", &self.link.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverState;

    struct Countdown {
        remaining: u32,
        state: DriverState,
        tasks_handled: u32,
    }

    impl Driver for Countdown {
        fn update(&mut self, _dt: f32) -> bool {
            if self.remaining == 0 {
                self.state = DriverState::Complete;
                return false;
            }
            self.remaining -= 1;
            self.state = DriverState::Update;
            true
        }

        fn state(&self) -> DriverState {
            self.state
        }

        fn handle_tasks(&mut self) {
            self.tasks_handled += 1;
        }

        fn delete(&mut self) {
            self.remaining = 0;
        }
    }

    fn countdown(remaining: u32) -> Rc<RefCell<Countdown>> {
        Rc::new(RefCell::new(Countdown {
            remaining,
            state: DriverState::Idle,
            tasks_handled: 0,
        }))
    }

    #[test]
    fn finished_drivers_leave_after_one_task_pass() {
        let schedule = Schedule::new();
        let driver = countdown(2);
        schedule.add(driver.clone());

        schedule.update_all(0.016);
        schedule.update_all(0.016);
        assert_eq!(schedule.len(), 1);
        schedule.update_all(0.016);
        assert_eq!(schedule.len(), 0);
        assert_eq!(driver.borrow().tasks_handled, 1);

        // Retired drivers are not polled again.
        schedule.update_all(0.016);
        assert_eq!(driver.borrow().tasks_handled, 1);
    }

    #[test]
    fn double_add_polls_once_per_update() {
        let schedule = Schedule::new();
        let driver = countdown(10);
        schedule.add(driver.clone());
        schedule.add(driver.clone());
        assert_eq!(schedule.len(), 1);
        schedule.update_all(0.016);
        assert_eq!(driver.borrow().remaining, 9);
    }

    #[test]
    fn unlinked_ref_enqueues_nothing() {
        let schedule_ref = ScheduleRef::unlinked();
        assert!(!schedule_ref.enqueue());
    }

    #[test]
    fn linked_ref_enqueues_its_driver() {
        let schedule = Schedule::new();
        let driver = countdown(1);
        let handle: DriverHandle = driver.clone();
        let mut schedule_ref = ScheduleRef::unlinked();
        schedule_ref.link(&schedule, &handle);
        assert!(schedule_ref.enqueue());
        assert_eq!(schedule.len(), 1);
    }
}
