//! POSIX host port for cotimer.
//!
//! On a microcontroller the tick comes from a timer interrupt and the scan
//! cycle is the firmware's `loop {}`. This crate stands in for both on a
//! Linux/Unix host:
//!
//! - [`Ticker`] runs a drift-free tick thread that plays the role of the
//!   timer interrupt;
//! - [`ScanLoop`] runs the main-loop side at a fixed cadence until stopped,
//!   optionally on Ctrl-C.
//!
//! Enabling this crate also enables the `std` implementation of
//! `critical-section`, so [`cotimer_bank::SharedBank`] works across the two
//! threads.

use std::io;

use cotimer_bank::BankError;
use thiserror::Error;

pub mod scan;
pub mod ticker;

pub use scan::{ScanLoop, StopHandle};
pub use ticker::{Ticker, TickerConfig, DEFAULT_TICK_HZ, MAX_TICK_HZ};

/// Errors raised by the host port.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("tick rate {0} Hz outside 1..=10000 Hz")]
    InvalidRate(u32),
    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("timer bank: {0}")]
    Bank(#[from] BankError),
}

pub type PortResult<T> = Result<T, PortError>;
