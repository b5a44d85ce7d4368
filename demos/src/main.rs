//! Control panel demo
//!
//! A 1 kHz ticker thread plays the timer interrupt and the main thread runs
//! the scan loop, the same split firmware would use:
//!
//! - `LCD` refreshes the status line every 250 ms (free-running)
//! - `KEYS` polls the keypad every 20 ms (free-running)
//! - `EXPOSURE` is a 1.5 s one-shot started by a key press
//! - `BUZZER` is a 100 ms one-shot beep started with each exposure
//!
//! The demo exits after three exposures, or on Ctrl-C. Set `RUST_LOG=trace`
//! to see every timer transition.

use std::ops::ControlFlow;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use cotimer_bank::{BankResult, SharedBank, TimerId};
use cotimer_core::{millis_from_ticks, ticks_from_millis, Action, TimerConfig};
use cotimer_posix::{PortResult, ScanLoop, Ticker, TickerConfig, DEFAULT_TICK_HZ};
use log::error;
use tracing_subscriber::EnvFilter;

const LCD: TimerId = TimerId::new(0);
const KEYS: TimerId = TimerId::new(1);
const EXPOSURE: TimerId = TimerId::new(2);
const BUZZER: TimerId = TimerId::new(3);

const EXPOSURES_TO_RUN: u32 = 3;

/// Key polls between simulated presses
const POLLS_PER_PRESS: u32 = 100;

static TIMERS: SharedBank<4> = SharedBank::new();

static KEY_POLLS: AtomicU32 = AtomicU32::new(0);
static EXPOSURES: AtomicU32 = AtomicU32::new(0);

fn refresh_lcd() {
    let exposure = TIMERS.snapshot(EXPOSURE).ok();
    match exposure {
        Some(snap) if snap.state.is_running() => println!(
            "[lcd] exposing: {} ms left",
            millis_from_ticks(snap.remaining, DEFAULT_TICK_HZ)
        ),
        _ => println!("[lcd] idle, {} exposures done", EXPOSURES.load(Ordering::SeqCst)),
    }
}

fn poll_keys() {
    let polls = KEY_POLLS.fetch_add(1, Ordering::SeqCst) + 1;
    if polls % POLLS_PER_PRESS != 0 {
        return;
    }

    let busy = TIMERS
        .snapshot(EXPOSURE)
        .map(|snap| !snap.state.is_hold())
        .unwrap_or(true);
    if busy {
        println!("[keys] shutter pressed, exposure already running");
        return;
    }

    println!("[keys] shutter pressed");
    start_one_shot(EXPOSURE);
    start_one_shot(BUZZER);
}

fn exposure_started() {
    println!("[exposure] open");
}

fn exposure_done() {
    let done = EXPOSURES.fetch_add(1, Ordering::SeqCst) + 1;
    println!("[exposure] closed ({done}/{EXPOSURES_TO_RUN})");
}

fn beep_on() {
    println!("[buzzer] on");
}

fn beep_off() {
    println!("[buzzer] off");
}

/// Count a one-shot from its full preset.
fn start_one_shot(id: TimerId) {
    if let Err(err) = TIMERS.reset(id).and_then(|()| TIMERS.restart(id)) {
        error!("cannot start {id}: {err}");
    }
}

fn configure(tick_hz: u32) -> BankResult<()> {
    TIMERS.configure(LCD, TimerConfig::new(ticks_from_millis(250, tick_hz), refresh_lcd))?;
    TIMERS.configure(KEYS, TimerConfig::new(ticks_from_millis(20, tick_hz), poll_keys))?;
    TIMERS.configure(
        EXPOSURE,
        TimerConfig::builder()
            .preset(ticks_from_millis(1_500, tick_hz))
            .on_timeout(exposure_done)
            .on_restart(exposure_started)
            .build(),
    )?;
    TIMERS.configure(
        BUZZER,
        TimerConfig::builder()
            .preset(ticks_from_millis(100, tick_hz))
            .on_timeout(beep_off)
            .on_restart(beep_on)
            .build(),
    )?;

    TIMERS.restart(LCD)?;
    TIMERS.restart(KEYS)?;
    Ok(())
}

fn scan() -> ControlFlow<()> {
    let slots = [
        (LCD, Action::ResumeRunning),
        (KEYS, Action::ResumeRunning),
        (EXPOSURE, Action::GoToHold),
        (BUZZER, Action::GoToHold),
    ];
    for (id, action) in slots {
        if let Err(err) = TIMERS.process(id, action) {
            error!("scan failed: {err}");
            return ControlFlow::Break(());
        }
    }

    if EXPOSURES.load(Ordering::SeqCst) >= EXPOSURES_TO_RUN {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

fn run() -> PortResult<()> {
    let config = TickerConfig::new(DEFAULT_TICK_HZ);
    configure(config.rate_hz)?;

    let scans = ScanLoop::new(Duration::from_millis(1));
    scans.install_ctrlc()?;

    let ticker = Ticker::start(config, || {
        TIMERS.tick();
    })?;
    let cycles = scans.run(scan);
    let ticks = ticker.ticks();
    ticker.stop();

    println!("{cycles} scan cycles, {ticks} ticks");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cotimer-demo: {err}");
            ExitCode::FAILURE
        }
    }
}
