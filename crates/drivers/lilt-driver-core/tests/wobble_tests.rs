use std::cell::Cell;
use std::rc::Rc;

use lilt_driver_core::{Easing, Runtime, TweenParams, ValueCell, Wobble};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn tick(runtime: &Runtime, frames: usize, dt: f32) {
    for _ in 0..frames {
        runtime.update(dt);
    }
}

/// it should oscillate around the base value captured at start
#[test]
fn wobble_oscillates_around_base() {
    let runtime = Runtime::new();
    let cell = ValueCell::new(5.0f32);

    let mut wobble = Wobble::new();
    wobble
        .set_references(vec![cell.binding()])
        .set_frequency(8.0)
        .set_amplitude(2.0);
    let wobble = runtime.add_wobble(wobble);
    wobble.borrow_mut().start();

    let mut seen_above = false;
    let mut seen_below = false;
    for _ in 0..120 {
        runtime.update(1.0 / 60.0);
        let value = cell.get();
        assert!(value >= 3.0 - 1e-4 && value <= 7.0 + 1e-4, "bounded: {value}");
        if value > 5.5 {
            seen_above = true;
        }
        if value < 4.5 {
            seen_below = true;
        }
    }
    assert!(seen_above && seen_below, "wave crosses both sides of the base");
    assert_eq!(runtime.active_wobbles(), 1, "runs until stopped");
}

/// it should stop automatically after a finite duration and restore the base
#[test]
fn wobble_auto_stops_after_duration() {
    let runtime = Runtime::new();
    let cell = ValueCell::new(5.0f32);
    let stopped = Rc::new(Cell::new(false));

    let mut wobble = Wobble::new();
    wobble
        .set_references(vec![cell.binding()])
        .set_duration(0.2);
    let flag = Rc::clone(&stopped);
    wobble.on_stopped(move || flag.set(true));

    let wobble = runtime.add_wobble(wobble);
    wobble.borrow_mut().start();

    tick(&runtime, 30, 1.0 / 60.0);

    assert!(stopped.get());
    assert_eq!(runtime.active_wobbles(), 0);
    assert_eq!(cell.get(), 5.0, "hard stop settles back on the base value");
}

/// it should ramp strength from zero through an ease-in envelope
#[test]
fn wobble_ease_in_ramps_strength() {
    let runtime = Runtime::new();
    let cell = ValueCell::new(0.0f32);

    let mut wobble = Wobble::new();
    wobble
        .set_references(vec![cell.binding()])
        .set_frequency(4.0)
        .set_amplitude(3.0)
        .ease_in(TweenParams {
            duration: 0.5,
            delay: 0.0,
            easing: Easing::Linear,
        });
    let wobble = runtime.add_wobble(wobble);
    wobble.borrow_mut().start();
    assert_eq!(wobble.borrow().strength(), 0.0);

    tick(&runtime, 6, 1.0 / 60.0);
    let early = wobble.borrow().strength();
    assert!(early > 0.0 && early < 0.5, "ramping: {early}");

    tick(&runtime, 40, 1.0 / 60.0);
    assert_eq!(wobble.borrow().strength(), 1.0);
}

/// it should start its duration countdown only after the ease-in finishes
#[test]
fn wobble_duration_counts_after_ease_in() {
    let runtime = Runtime::new();
    let cell = ValueCell::new(0.0f32);

    let mut wobble = Wobble::new();
    wobble
        .set_references(vec![cell.binding()])
        .set_duration(0.2)
        .ease_in(TweenParams {
            duration: 0.5,
            delay: 0.0,
            easing: Easing::Linear,
        });
    let wobble = runtime.add_wobble(wobble);
    wobble.borrow_mut().start();

    // 0.4s: still easing in, countdown not yet armed.
    tick(&runtime, 24, 1.0 / 60.0);
    assert_eq!(runtime.active_wobbles(), 1);

    // Past ease-in plus duration.
    tick(&runtime, 30, 1.0 / 60.0);
    assert_eq!(runtime.active_wobbles(), 0);
}

/// it should wind down through an ease-out envelope and then complete
#[test]
fn wobble_ease_out_winds_down_to_complete() {
    let runtime = Runtime::new();
    let cell = ValueCell::new(5.0f32);
    let completed = Rc::new(Cell::new(false));

    let mut wobble = Wobble::new();
    wobble
        .set_references(vec![cell.binding()])
        .set_frequency(6.0)
        .set_amplitude(2.0)
        .ease_out(TweenParams {
            duration: 0.3,
            delay: 0.0,
            easing: Easing::Linear,
        });
    let flag = Rc::clone(&completed);
    wobble.on_complete(move || flag.set(true));

    let wobble = runtime.add_wobble(wobble);
    wobble.borrow_mut().start();
    tick(&runtime, 20, 1.0 / 60.0);

    wobble.borrow_mut().stop();
    assert_eq!(runtime.active_wobbles(), 1, "keeps polling while winding down");
    tick(&runtime, 5, 1.0 / 60.0);
    let strength = wobble.borrow().strength();
    assert!(strength < 1.0 && strength > 0.0, "ramping down: {strength}");

    tick(&runtime, 30, 1.0 / 60.0);
    assert!(completed.get());
    assert_eq!(runtime.active_wobbles(), 0);
    assert_eq!(wobble.borrow().strength(), 0.0);
    assert_eq!(cell.get(), 5.0, "settles back on the base value");
}

/// it should scale each channel by its percentage multiplier
#[test]
fn wobble_percentage_scales_per_channel() {
    let runtime = Runtime::new();
    let cell = ValueCell::new([1.0f32, 2.0]);

    let mut wobble = Wobble::new();
    wobble
        .set_references(vec![cell.binding()])
        .set_frequency(10.0)
        .set_amplitude(4.0)
        .set_percentage([1.0, 0.0]);
    let wobble = runtime.add_wobble(wobble);
    wobble.borrow_mut().start();

    tick(&runtime, 10, 1.0 / 60.0);
    let value = cell.get();
    assert!(!approx(value[0], 1.0, 1e-3), "full-percentage channel moves");
    assert_eq!(value[1], 2.0, "zero-percentage channel never moves");
}

/// it should capture a fresh base value on each start
#[test]
fn wobble_recaptures_base_on_restart() {
    let runtime = Runtime::new();
    let cell = ValueCell::new(0.0f32);

    let mut wobble = Wobble::new();
    wobble
        .set_references(vec![cell.binding()])
        .set_amplitude(1.0)
        .set_duration(0.1);
    let wobble = runtime.add_wobble(wobble);
    wobble.borrow_mut().start();
    tick(&runtime, 20, 1.0 / 60.0);
    assert_eq!(runtime.active_wobbles(), 0);
    assert_eq!(cell.get(), 0.0);

    cell.set(10.0);
    wobble.borrow_mut().start();
    tick(&runtime, 3, 1.0 / 60.0);
    let value = cell.get();
    assert!(value >= 9.0 && value <= 11.0, "oscillates around the new base");
    tick(&runtime, 20, 1.0 / 60.0);
    assert_eq!(cell.get(), 10.0);
}