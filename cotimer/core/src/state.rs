//! Timer states and scan-cycle actions

use core::fmt;

/// Stored state of a [`Timer`](crate::Timer).
///
/// - `Hold`: `remaining` is frozen; the timer never expires.
/// - `Running`: `remaining` is decremented on every tick until it reaches 0.
/// - `Timeout`: `remaining` reached 0; ticks are ignored until the main loop
///   processes the expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerState {
    /// Counting is suspended
    #[default]
    Hold,
    /// Counting down on every tick
    Running,
    /// Expired, waiting to be processed
    Timeout,
}

impl TimerState {
    /// Check if the timer is counting
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Check if the timer has expired and not yet been processed
    pub const fn is_timeout(self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Check if the timer is on hold
    pub const fn is_hold(self) -> bool {
        matches!(self, Self::Hold)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hold => "HOLD",
            Self::Running => "RUNNING",
            Self::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Hold => defmt::write!(fmt, "HOLD"),
            Self::Running => defmt::write!(fmt, "RUNNING"),
            Self::Timeout => defmt::write!(fmt, "TIMEOUT"),
        }
    }
}

/// What a timed-out timer does once its expiry is processed.
///
/// Processing a timer with [`Action::GoToHold`] on every expiry makes it a
/// one-shot; the default [`Action::ResumeRunning`] makes it free-running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Reload and keep counting
    #[default]
    ResumeRunning,
    /// Reload and stop until the next restart
    GoToHold,
}

impl Action {
    /// State the timer lands in after a processed expiry
    pub const fn next_state(self) -> TimerState {
        match self {
            Self::ResumeRunning => TimerState::Running,
            Self::GoToHold => TimerState::Hold,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResumeRunning => f.write_str("resume"),
            Self::GoToHold => f.write_str("hold"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Action {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ResumeRunning => defmt::write!(fmt, "ResumeRunning"),
            Self::GoToHold => defmt::write!(fmt, "GoToHold"),
        }
    }
}
