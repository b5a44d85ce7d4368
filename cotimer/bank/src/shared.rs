//! Timer bank shared between interrupt and main-loop context

use core::cell::RefCell;

use cotimer_core::{Action, Ticks, Timer, TimerConfig, TimerSnapshot};
use critical_section::Mutex;
use heapless::Vec;

use crate::{BankResult, TimerBank, TimerId};

/// A [`TimerBank`] behind a `critical_section::Mutex`, usable from a `static`.
///
/// Every operation takes the critical section only for the state transition.
/// Callbacks run after it is released, so they execute with interrupts
/// enabled and may call back into the same bank.
pub struct SharedBank<const N: usize> {
    bank: Mutex<RefCell<TimerBank<N>>>,
}

impl<const N: usize> SharedBank<N> {
    /// Create a shared bank of placeholder timers
    pub const fn new() -> Self {
        Self::from_bank(TimerBank::new())
    }

    pub const fn from_bank(bank: TimerBank<N>) -> Self {
        Self {
            bank: Mutex::new(RefCell::new(bank)),
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Run `f` on the bank inside a critical section.
    ///
    /// Callbacks triggered from within `f` (e.g. by [`Timer::process`]) run
    /// with the section held and must not touch this bank again.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut TimerBank<N>) -> R,
    {
        critical_section::with(|cs| {
            let mut bank = self.bank.borrow_ref_mut(cs);
            f(&mut bank)
        })
    }

    /// Advance every timer by one tick. Call from the tick interrupt.
    ///
    /// Returns how many timers expired on this tick.
    pub fn tick(&self) -> usize {
        self.with(|bank| bank.count_down_all())
    }

    /// Process one slot from the main loop.
    ///
    /// Returns `true` if the timer had expired and its expiry was handled.
    pub fn process(&self, id: TimerId, action: Action) -> BankResult<bool> {
        let pending = self.with(|bank| bank.timer_mut(id).map(|timer| timer.expire(action)))?;
        match pending {
            Some(dispatch) => {
                dispatch.run();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Process every slot with the same action, in slot order.
    ///
    /// Each slot takes its own critical section and its callback runs before
    /// the next slot is examined, so a callback that holds or resets a later
    /// slot cancels that slot's pending expiry. Returns the ids whose expiry
    /// was handled.
    pub fn process_all(&self, action: Action) -> Vec<TimerId, N> {
        let mut fired = Vec::new();
        for index in 0..N {
            let id = TimerId::new(index);
            if let Ok(true) = self.process(id, action) {
                let _ = fired.push(id);
            }
        }
        fired
    }

    /// Set a slot running and run its `on_restart`.
    pub fn restart(&self, id: TimerId) -> BankResult<()> {
        let dispatch = self.with(|bank| bank.timer_mut(id).map(Timer::resume))?;
        dispatch.run();
        Ok(())
    }

    pub fn reset(&self, id: TimerId) -> BankResult<()> {
        self.with(|bank| bank.timer_mut(id).map(Timer::reset))
    }

    pub fn hold(&self, id: TimerId) -> BankResult<()> {
        self.with(|bank| bank.timer_mut(id).map(Timer::hold))
    }

    pub fn configure(&self, id: TimerId, config: TimerConfig) -> BankResult<()> {
        self.with(|bank| bank.configure(id, config))
    }

    pub fn set_preset(&self, id: TimerId, preset: Ticks) -> BankResult<()> {
        self.with(|bank| bank.set_preset(id, preset))
    }

    /// Consistent view of one slot's counters and state.
    pub fn snapshot(&self, id: TimerId) -> BankResult<TimerSnapshot> {
        self.with(|bank| bank.snapshot(id))
    }
}

impl<const N: usize> Default for SharedBank<N> {
    fn default() -> Self {
        Self::new()
    }
}
