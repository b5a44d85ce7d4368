#![no_std]
#![forbid(unsafe_code)]

//! # cotimer core
//!
//! Cooperative countdown timers for control loops that run without an
//! operating-system scheduler.
//!
//! Each [`Timer`] is driven from two places:
//!
//! - a fixed-period tick source (usually a timer interrupt) calls
//!   [`Timer::count_down`] on every instance;
//! - the main loop calls [`Timer::process`] on every instance once per scan
//!   cycle. Expiry callbacks run here, never in the tick context.
//!
//! ```
//! use cotimer_core::{Action, Timer, TimerState};
//!
//! fn blink() {}
//!
//! let mut led = Timer::new(3, blink, None);
//! led.restart();
//! for _ in 0..3 {
//!     led.count_down();
//! }
//! assert_eq!(led.state(), TimerState::Timeout);
//!
//! led.process(Action::ResumeRunning);
//! assert_eq!(led.state(), TimerState::Running);
//! assert_eq!(led.remaining(), 3);
//! ```

pub mod config;
pub mod dispatch;
pub mod state;
pub mod time;
pub mod timer;

pub use config::*;
pub use dispatch::*;
pub use state::*;
pub use time::*;
pub use timer::*;

#[cfg(test)]
mod tests;

/// cotimer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
