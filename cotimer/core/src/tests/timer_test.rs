//! Timer state machine tests for cotimer-core

use crate::{millis_from_ticks, ticks_from_millis, Action, Timer, TimerConfig, TimerState};
use core::sync::atomic::{AtomicUsize, Ordering};

fn noop() {}

#[test]
fn test_new_timer_is_on_hold_and_loaded() {
    let timer = Timer::new(7, noop, None);
    assert_eq!(timer.preset(), 7);
    assert_eq!(timer.remaining(), 7);
    assert_eq!(timer.state(), TimerState::Hold);
    assert!(timer.on_timeout().is_some());
    assert!(timer.on_restart().is_none());
}

#[test]
fn test_placeholder_is_empty() {
    let timer = Timer::placeholder();
    assert_eq!(timer.preset(), 0);
    assert_eq!(timer.remaining(), 0);
    assert_eq!(timer.state(), TimerState::Hold);
    assert!(timer.on_timeout().is_none());
    assert!(timer.on_restart().is_none());
}

#[test]
fn test_exact_tick_count_to_timeout() {
    for preset in 1..=50 {
        let mut timer = Timer::new(preset, noop, None);
        timer.reset();
        timer.restart();

        for tick in 1..preset {
            assert_eq!(timer.count_down(), preset - tick);
            assert_eq!(timer.state(), TimerState::Running);
        }
        assert_eq!(timer.count_down(), 0);
        assert_eq!(timer.state(), TimerState::Timeout);
    }
}

#[test]
fn test_count_down_on_hold_is_noop() {
    let mut timer = Timer::new(5, noop, None);
    assert_eq!(timer.count_down(), 5);
    assert_eq!(timer.remaining(), 5);
    assert_eq!(timer.state(), TimerState::Hold);
}

#[test]
fn test_count_down_after_timeout_is_noop() {
    let mut timer = Timer::new(2, noop, None);
    timer.restart();
    timer.count_down();
    timer.count_down();
    assert_eq!(timer.state(), TimerState::Timeout);

    for _ in 0..10 {
        assert_eq!(timer.count_down(), 0);
        assert_eq!(timer.state(), TimerState::Timeout);
    }
}

#[test]
fn test_zero_preset_times_out_on_first_tick() {
    let mut timer = Timer::placeholder();
    timer.restart();
    assert_eq!(timer.count_down(), 0);
    assert_eq!(timer.state(), TimerState::Timeout);
}

#[test]
fn test_process_resumes_by_default() {
    static FIRED: AtomicUsize = AtomicUsize::new(0);
    fn on_timeout() {
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    let mut timer = Timer::new(3, on_timeout, None);
    timer.restart();
    for _ in 0..3 {
        timer.count_down();
    }
    assert_eq!(timer.state(), TimerState::Timeout);
    assert_eq!(timer.remaining(), 0);

    assert!(timer.process(Action::default()));
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(timer.remaining(), 3);
    assert_eq!(FIRED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_process_with_hold_is_one_shot() {
    static FIRED: AtomicUsize = AtomicUsize::new(0);
    fn on_timeout() {
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    let mut timer = Timer::new(1, on_timeout, None);
    timer.restart();
    timer.count_down();

    assert!(timer.process(Action::GoToHold));
    assert_eq!(timer.state(), TimerState::Hold);
    assert_eq!(timer.remaining(), 1);
    assert_eq!(FIRED.load(Ordering::SeqCst), 1);

    // stays put until restarted
    timer.count_down();
    assert!(!timer.process(Action::GoToHold));
    assert_eq!(timer.remaining(), 1);
    assert_eq!(FIRED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_process_outside_timeout_is_noop() {
    static FIRED: AtomicUsize = AtomicUsize::new(0);
    fn on_timeout() {
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    let mut timer = Timer::new(4, on_timeout, None);
    assert!(!timer.process(Action::ResumeRunning));
    assert_eq!(timer.state(), TimerState::Hold);

    timer.restart();
    timer.count_down();
    assert!(!timer.process(Action::ResumeRunning));
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(timer.remaining(), 3);
    assert_eq!(FIRED.load(Ordering::SeqCst), 0);
}

#[test]
fn test_process_without_callback() {
    let mut timer = Timer::placeholder();
    timer.set_preset(2);
    timer.reset();
    timer.restart();
    timer.count_down();
    timer.count_down();

    assert!(timer.process(Action::ResumeRunning));
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(timer.remaining(), 2);
}

#[test]
fn test_expire_applies_transition_before_dispatch() {
    let mut timer = Timer::new(1, noop, None);
    timer.restart();
    timer.count_down();

    let dispatch = timer.expire(Action::GoToHold).unwrap();
    assert_eq!(timer.state(), TimerState::Hold);
    assert_eq!(timer.remaining(), 1);
    assert!(!dispatch.is_empty());
    dispatch.run();

    assert!(timer.expire(Action::GoToHold).is_none());
}

#[test]
fn test_restart_fires_every_time() {
    static RESTARTS: AtomicUsize = AtomicUsize::new(0);
    fn on_restart() {
        RESTARTS.fetch_add(1, Ordering::SeqCst);
    }

    let mut timer = Timer::new(5, noop, Some(on_restart));
    timer.restart();
    timer.count_down();
    timer.restart();
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(timer.remaining(), 4);
    assert_eq!(RESTARTS.load(Ordering::SeqCst), 2);

    timer.hold();
    timer.restart();
    assert_eq!(RESTARTS.load(Ordering::SeqCst), 3);

    for _ in 0..4 {
        timer.count_down();
    }
    assert_eq!(timer.state(), TimerState::Timeout);
    timer.restart();
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(timer.remaining(), 0);
    assert_eq!(RESTARTS.load(Ordering::SeqCst), 4);
}

#[test]
fn test_resume_defers_restart_callback() {
    static RESTARTS: AtomicUsize = AtomicUsize::new(0);
    fn on_restart() {
        RESTARTS.fetch_add(1, Ordering::SeqCst);
    }

    let mut timer = Timer::new(5, noop, Some(on_restart));
    let dispatch = timer.resume();
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(RESTARTS.load(Ordering::SeqCst), 0);

    dispatch.run();
    assert_eq!(RESTARTS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_restart_from_timeout_skips_reload() {
    let mut timer = Timer::new(2, noop, None);
    timer.restart();
    timer.count_down();
    timer.count_down();
    assert_eq!(timer.state(), TimerState::Timeout);

    timer.restart();
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(timer.remaining(), 0);

    // already at zero: times out again on the next tick
    assert_eq!(timer.count_down(), 0);
    assert_eq!(timer.state(), TimerState::Timeout);
}

#[test]
fn test_hold_keeps_remaining() {
    let mut timer = Timer::new(10, noop, None);
    timer.restart();
    timer.count_down();
    timer.count_down();
    timer.hold();
    assert_eq!(timer.state(), TimerState::Hold);
    assert_eq!(timer.remaining(), 8);

    timer.count_down();
    assert_eq!(timer.remaining(), 8);
}

#[test]
fn test_set_preset_needs_reset() {
    let mut timer = Timer::new(6, noop, None);
    timer.restart();
    timer.count_down();
    timer.count_down();
    assert_eq!(timer.remaining(), 4);

    timer.set_preset(10);
    assert_eq!(timer.remaining(), 4);
    assert_eq!(timer.state(), TimerState::Running);

    timer.restart();
    assert_eq!(timer.remaining(), 4);

    timer.reset();
    assert_eq!(timer.remaining(), 10);
    assert_eq!(timer.state(), TimerState::Hold);
}

#[test]
fn test_setters_replace_callbacks() {
    static FIRST: AtomicUsize = AtomicUsize::new(0);
    static SECOND: AtomicUsize = AtomicUsize::new(0);
    fn first() {
        FIRST.fetch_add(1, Ordering::SeqCst);
    }
    fn second() {
        SECOND.fetch_add(1, Ordering::SeqCst);
    }

    let mut timer = Timer::new(1, first, None);
    timer.restart();
    timer.set_on_timeout(Some(second));
    timer.count_down();
    timer.process(Action::ResumeRunning);
    assert_eq!(FIRST.load(Ordering::SeqCst), 0);
    assert_eq!(SECOND.load(Ordering::SeqCst), 1);

    timer.set_on_timeout(None);
    timer.count_down();
    assert!(timer.process(Action::ResumeRunning));
    assert_eq!(SECOND.load(Ordering::SeqCst), 1);
}

#[test]
fn test_elapsed_and_snapshot() {
    let mut timer = Timer::new(5, noop, None);
    timer.restart();
    timer.count_down();
    timer.count_down();
    assert_eq!(timer.elapsed(), 2);

    let snap = timer.snapshot();
    assert_eq!(snap.preset, 5);
    assert_eq!(snap.remaining, 3);
    assert_eq!(snap.state, TimerState::Running);

    timer.set_preset(1);
    assert_eq!(timer.elapsed(), 0);
}

#[test]
fn test_apply_config_individualizes_placeholder() {
    let config = TimerConfig::builder().preset(12).on_timeout(noop).build();
    let mut timer = Timer::placeholder();
    timer.restart();
    timer.apply(config);

    assert_eq!(timer.preset(), 12);
    assert_eq!(timer.remaining(), 12);
    assert_eq!(timer.state(), TimerState::Hold);
    assert!(timer.on_timeout().is_some());
}

#[test]
fn test_with_config_matches_new() {
    let timer = Timer::with_config(TimerConfig::new(9, noop));
    assert_eq!(timer.preset(), 9);
    assert_eq!(timer.remaining(), 9);
    assert!(timer.is_held());
    assert!(timer.on_restart().is_none());
}

#[test]
fn test_tick_conversions() {
    assert_eq!(ticks_from_millis(1_000, 1_000), 1_000);
    assert_eq!(ticks_from_millis(15, 100), 2);
    assert_eq!(ticks_from_millis(100, 0), 0);
    assert_eq!(ticks_from_millis(u32::MAX, 10_000), u32::MAX);
    assert_eq!(millis_from_ticks(25, 100), 250);
    assert_eq!(millis_from_ticks(25, 0), 0);
}
