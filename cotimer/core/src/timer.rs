//! Countdown timer state machine

use log::trace;

use crate::{Action, Callback, Dispatch, Ticks, TimerConfig, TimerState};

/// Cooperative countdown timer.
///
/// A timer is created on [`TimerState::Hold`] with `remaining == preset`. Call
/// [`restart`](Self::restart) to start counting. The tick source calls
/// [`count_down`](Self::count_down) at a fixed rate; the main loop calls
/// [`process`](Self::process) once per scan cycle and receives the timeout
/// callback there.
///
/// `restart` only changes the state. After changing the preset, call
/// [`reset`](Self::reset) before `restart` to count the full new preset:
///
/// ```
/// use cotimer_core::{Timer, TimerState};
///
/// fn on_timeout() {}
///
/// let mut t = Timer::new(5, on_timeout, None);
/// t.restart();
/// t.count_down();
/// t.set_preset(10);
/// t.restart();
/// assert_eq!(t.remaining(), 4);
///
/// t.reset();
/// t.restart();
/// assert_eq!(t.remaining(), 10);
/// assert_eq!(t.state(), TimerState::Running);
/// ```
#[derive(Debug, Clone)]
pub struct Timer {
    preset: Ticks,
    remaining: Ticks,
    state: TimerState,
    on_timeout: Option<Callback>,
    on_restart: Option<Callback>,
}

impl Timer {
    /// Create a timer on hold that counts `preset` ticks once restarted.
    pub const fn new(preset: Ticks, on_timeout: Callback, on_restart: Option<Callback>) -> Self {
        Self {
            preset,
            remaining: preset,
            state: TimerState::Hold,
            on_timeout: Some(on_timeout),
            on_restart,
        }
    }

    /// Create an empty timer for a fixed-size array.
    ///
    /// Preset and remaining are 0 and no callbacks are set. Fill the slot in
    /// with [`set_preset`](Self::set_preset) and
    /// [`set_on_timeout`](Self::set_on_timeout) (then [`reset`](Self::reset)),
    /// or with [`apply`](Self::apply).
    pub const fn placeholder() -> Self {
        Self {
            preset: 0,
            remaining: 0,
            state: TimerState::Hold,
            on_timeout: None,
            on_restart: None,
        }
    }

    /// Create a timer on hold from a configuration.
    pub const fn with_config(config: TimerConfig) -> Self {
        Self {
            preset: config.preset,
            remaining: config.preset,
            state: TimerState::Hold,
            on_timeout: config.on_timeout,
            on_restart: config.on_restart,
        }
    }

    /// Replace preset and callbacks, then [`reset`](Self::reset).
    pub fn apply(&mut self, config: TimerConfig) {
        self.preset = config.preset;
        self.on_timeout = config.on_timeout;
        self.on_restart = config.on_restart;
        self.reset();
    }

    /// Overwrite the preset. `remaining` and the state are left alone.
    pub fn set_preset(&mut self, preset: Ticks) {
        self.preset = preset;
    }

    pub const fn preset(&self) -> Ticks {
        self.preset
    }

    pub const fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub const fn state(&self) -> TimerState {
        self.state
    }

    pub fn set_on_timeout(&mut self, callback: Option<Callback>) {
        self.on_timeout = callback;
    }

    pub fn set_on_restart(&mut self, callback: Option<Callback>) {
        self.on_restart = callback;
    }

    pub const fn on_timeout(&self) -> Option<Callback> {
        self.on_timeout
    }

    pub const fn on_restart(&self) -> Option<Callback> {
        self.on_restart
    }

    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub const fn is_expired(&self) -> bool {
        self.state.is_timeout()
    }

    pub const fn is_held(&self) -> bool {
        self.state.is_hold()
    }

    /// Ticks counted since the last reload. Saturates at 0 when the preset
    /// was lowered below `remaining`.
    pub const fn elapsed(&self) -> Ticks {
        self.preset.saturating_sub(self.remaining)
    }

    /// Copy of the counters and state.
    pub const fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            preset: self.preset,
            remaining: self.remaining,
            state: self.state,
        }
    }

    /// Resume counting from the current `remaining` and run `on_restart`.
    ///
    /// Fires the callback even if the timer was already running.
    pub fn restart(&mut self) {
        self.resume().run();
    }

    /// Move to [`TimerState::Running`] and hand back `on_restart` without
    /// calling it.
    pub fn resume(&mut self) -> Dispatch {
        trace!("timer restart: {} -> RUNNING, remaining={}", self.state, self.remaining);
        self.state = TimerState::Running;
        Dispatch::new(self.on_restart)
    }

    /// Reload `remaining` from the preset and put the timer on hold.
    pub fn reset(&mut self) {
        trace!("timer reset: preset={}", self.preset);
        self.remaining = self.preset;
        self.state = TimerState::Hold;
    }

    /// Stop counting. `remaining` is kept.
    pub fn hold(&mut self) {
        trace!("timer hold: remaining={}", self.remaining);
        self.state = TimerState::Hold;
    }

    /// Advance one tick.
    ///
    /// Only a running timer counts. When `remaining` reaches 0 the timer moves
    /// to [`TimerState::Timeout`] and stops counting until processed. A running
    /// timer that is already at 0 times out without decrementing. Returns
    /// `remaining` after the tick.
    pub fn count_down(&mut self) -> Ticks {
        if self.state == TimerState::Running {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.state = TimerState::Timeout;
                trace!("timer expired: preset={}", self.preset);
            }
        }
        self.remaining
    }

    /// Handle a pending expiry.
    ///
    /// Does nothing unless the timer is in [`TimerState::Timeout`]. Otherwise
    /// `remaining` is reloaded from the preset, the state follows `action`,
    /// and `on_timeout` runs after the new state is in place. Returns `true`
    /// if an expiry was handled.
    pub fn process(&mut self, action: Action) -> bool {
        match self.expire(action) {
            Some(dispatch) => {
                dispatch.run();
                true
            }
            None => false,
        }
    }

    /// The state transition of [`process`](Self::process), with `on_timeout`
    /// handed back instead of called. `None` if the timer had not expired.
    pub fn expire(&mut self, action: Action) -> Option<Dispatch> {
        if self.state != TimerState::Timeout {
            return None;
        }

        self.remaining = self.preset;
        self.state = action.next_state();
        trace!("timer reload: preset={}, action={}", self.preset, action);
        Some(Dispatch::new(self.on_timeout))
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl From<TimerConfig> for Timer {
    fn from(config: TimerConfig) -> Self {
        Self::with_config(config)
    }
}

/// Counters and state of a timer at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub preset: Ticks,
    pub remaining: Ticks,
    pub state: TimerState,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}/{}ticks {}", self.remaining, self.preset, self.state);
    }
}
