//! Fixed-size timer bank

use core::fmt;
use core::ops::{Index, IndexMut};
use core::slice;

use cotimer_core::{Action, Dispatch, Ticks, Timer, TimerConfig, TimerSnapshot};
use heapless::Vec;
use log::warn;

use crate::{BankError, BankResult};

/// Index of a timer within a [`TimerBank`].
///
/// Declare one `const` per slot to give timers names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(usize);

impl TimerId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw slot index
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "timer#{}", self.0);
    }
}

/// `N` timers sharing one tick source.
///
/// The tick handler calls [`count_down_all`](Self::count_down_all); the main
/// loop processes slots individually with their own [`Action`] or all at once
/// with [`process_all`](Self::process_all).
#[derive(Debug, Clone)]
pub struct TimerBank<const N: usize> {
    timers: [Timer; N],
}

impl<const N: usize> TimerBank<N> {
    /// Create a bank of placeholder timers
    pub const fn new() -> Self {
        const EMPTY: Timer = Timer::placeholder();
        Self { timers: [EMPTY; N] }
    }

    /// Create a bank from already configured timers
    pub const fn from_timers(timers: [Timer; N]) -> Self {
        Self { timers }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Ids of every slot, in order
    pub fn ids(&self) -> impl Iterator<Item = TimerId> {
        (0..N).map(TimerId::new)
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(id.0)
    }

    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.timers.get_mut(id.0)
    }

    /// Get a timer, or [`BankError::InvalidSlot`] if `id` is out of range
    pub fn timer(&self, id: TimerId) -> BankResult<&Timer> {
        self.timers.get(id.0).ok_or_else(|| invalid_slot(id, N))
    }

    /// Get a timer mutably, or [`BankError::InvalidSlot`] if `id` is out of range
    pub fn timer_mut(&mut self, id: TimerId) -> BankResult<&mut Timer> {
        self.timers.get_mut(id.0).ok_or_else(|| invalid_slot(id, N))
    }

    /// Individualize a slot. The timer is left on hold with `remaining == preset`.
    pub fn configure(&mut self, id: TimerId, config: TimerConfig) -> BankResult<()> {
        self.timer_mut(id)?.apply(config);
        Ok(())
    }

    /// Change a slot's preset without touching its count. See [`Timer::set_preset`].
    pub fn set_preset(&mut self, id: TimerId, preset: Ticks) -> BankResult<()> {
        self.timer_mut(id)?.set_preset(preset);
        Ok(())
    }

    pub fn snapshot(&self, id: TimerId) -> BankResult<TimerSnapshot> {
        self.timer(id).map(Timer::snapshot)
    }

    pub fn iter(&self) -> slice::Iter<'_, Timer> {
        self.timers.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Timer> {
        self.timers.iter_mut()
    }

    /// Iterate over `(id, timer)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (TimerId, &Timer)> {
        self.timers
            .iter()
            .enumerate()
            .map(|(index, timer)| (TimerId::new(index), timer))
    }

    /// Advance every timer by one tick.
    ///
    /// Returns how many timers expired on this tick.
    pub fn count_down_all(&mut self) -> usize {
        let mut expired = 0;
        for timer in self.timers.iter_mut() {
            let was_running = timer.is_running();
            timer.count_down();
            if was_running && timer.is_expired() {
                expired += 1;
            }
        }
        expired
    }

    /// Process every slot with the same action, in slot order.
    ///
    /// Each timeout callback runs right after its own timer's transition.
    /// Returns the ids whose expiry was handled.
    pub fn process_all(&mut self, action: Action) -> Vec<TimerId, N> {
        let mut fired = Vec::new();
        for (index, timer) in self.timers.iter_mut().enumerate() {
            if timer.process(action) {
                // capacity equals the slot count
                let _ = fired.push(TimerId::new(index));
            }
        }
        fired
    }

    /// Apply the expiry transition to every timed-out slot and collect the
    /// pending callbacks without running them.
    pub fn expire_all(&mut self, action: Action) -> Vec<(TimerId, Dispatch), N> {
        let mut pending = Vec::new();
        for (index, timer) in self.timers.iter_mut().enumerate() {
            if let Some(dispatch) = timer.expire(action) {
                let _ = pending.push((TimerId::new(index), dispatch));
            }
        }
        pending
    }

    /// Restart every slot, running each `on_restart` in slot order.
    pub fn restart_all(&mut self) {
        for timer in self.timers.iter_mut() {
            timer.restart();
        }
    }

    pub fn reset_all(&mut self) {
        for timer in self.timers.iter_mut() {
            timer.reset();
        }
    }

    pub fn hold_all(&mut self) {
        for timer in self.timers.iter_mut() {
            timer.hold();
        }
    }
}

fn invalid_slot(id: TimerId, len: usize) -> BankError {
    warn!("{} out of range for bank of {}", id, len);
    BankError::InvalidSlot { index: id.0, len }
}

impl<const N: usize> Default for TimerBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<[Timer; N]> for TimerBank<N> {
    fn from(timers: [Timer; N]) -> Self {
        Self::from_timers(timers)
    }
}

impl<const N: usize> Index<TimerId> for TimerBank<N> {
    type Output = Timer;

    fn index(&self, id: TimerId) -> &Timer {
        &self.timers[id.0]
    }
}

impl<const N: usize> IndexMut<TimerId> for TimerBank<N> {
    fn index_mut(&mut self, id: TimerId) -> &mut Timer {
        &mut self.timers[id.0]
    }
}

impl<'a, const N: usize> IntoIterator for &'a TimerBank<N> {
    type Item = &'a Timer;
    type IntoIter = slice::Iter<'a, Timer>;

    fn into_iter(self) -> Self::IntoIter {
        self.timers.iter()
    }
}

impl<'a, const N: usize> IntoIterator for &'a mut TimerBank<N> {
    type Item = &'a mut Timer;
    type IntoIter = slice::IterMut<'a, Timer>;

    fn into_iter(self) -> Self::IntoIter {
        self.timers.iter_mut()
    }
}
