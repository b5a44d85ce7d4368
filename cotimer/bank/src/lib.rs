#![no_std]
#![forbid(unsafe_code)]

//! # cotimer bank
//!
//! Fixed-size collections of [`Timer`]s driven by one shared tick source.
//!
//! [`TimerBank`] is a plain array of timers addressed by [`TimerId`].
//! [`SharedBank`] wraps a bank in a `critical_section::Mutex` so the tick
//! interrupt and the main loop can both reach it from a `static`:
//!
//! ```
//! use cotimer_bank::{SharedBank, TimerId};
//! use cotimer_core::{Action, TimerConfig};
//!
//! const LCD: TimerId = TimerId::new(0);
//! const KEYS: TimerId = TimerId::new(1);
//!
//! static TIMERS: SharedBank<2> = SharedBank::new();
//!
//! fn refresh_lcd() {}
//! fn scan_keys() {}
//!
//! TIMERS.configure(LCD, TimerConfig::new(100, refresh_lcd)).unwrap();
//! TIMERS.configure(KEYS, TimerConfig::new(10, scan_keys)).unwrap();
//! TIMERS.restart(LCD).unwrap();
//! TIMERS.restart(KEYS).unwrap();
//!
//! // timer interrupt
//! TIMERS.tick();
//!
//! // main loop
//! TIMERS.process(LCD, Action::ResumeRunning).unwrap();
//! TIMERS.process(KEYS, Action::GoToHold).unwrap();
//! ```

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

pub mod bank;
pub mod shared;

pub use bank::*;
pub use shared::*;

pub use cotimer_core::{
    Action, Callback, Dispatch, Ticks, Timer, TimerConfig, TimerSnapshot, TimerState,
};


/// Result type used by bank operations
pub type BankResult<T> = Result<T, BankError>;

/// Error types for bank operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankError {
    /// Slot index outside the bank
    InvalidSlot {
        /// Requested slot
        index: usize,
        /// Number of slots in the bank
        len: usize,
    },
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::InvalidSlot { index, len } => {
                write!(f, "Timer slot {index} out of range for bank of {len}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BankError {}

#[cfg(feature = "defmt")]
impl defmt::Format for BankError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            BankError::InvalidSlot { index, len } => {
                defmt::write!(fmt, "InvalidSlot({}/{})", index, len)
            }
        }
    }
}
