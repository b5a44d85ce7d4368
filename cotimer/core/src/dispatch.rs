//! Callback handles and deferred dispatch

/// Zero-argument procedure attached to a timer event.
///
/// Function pointers carry no captured state, so a timer holding them can live
/// in `static` storage and be shared between interrupt and main-loop context.
pub type Callback = fn();

/// A callback taken out of a timer by a state transition, not yet invoked.
///
/// [`Timer::expire`](crate::Timer::expire) and
/// [`Timer::resume`](crate::Timer::resume) apply their transition first and
/// return a `Dispatch`. Running it later lets the caller release any lock
/// around the timer before user code executes.
#[must_use = "the callback only runs when the dispatch is run"]
#[derive(Debug, Clone, Copy)]
pub struct Dispatch {
    callback: Option<Callback>,
}

impl Dispatch {
    /// A dispatch that does nothing when run
    pub const NONE: Self = Self { callback: None };

    pub const fn new(callback: Option<Callback>) -> Self {
        Self { callback }
    }

    /// The pending callback, if any
    pub const fn callback(&self) -> Option<Callback> {
        self.callback
    }

    /// Check whether running this dispatch would call anything
    pub const fn is_empty(&self) -> bool {
        self.callback.is_none()
    }

    /// Invoke the callback if present.
    pub fn run(self) {
        if let Some(callback) = self.callback {
            callback();
        }
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::NONE
    }
}
