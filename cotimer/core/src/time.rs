//! Tick counts and conversions

/// Tick counter type used for presets and remaining counts
pub type Ticks = u32;

/// Milliseconds per second
const MILLIS_PER_SEC: u64 = 1_000;

/// Convert a period in milliseconds to ticks of a `tick_hz` time base.
///
/// Rounds up so a timer never fires early, and saturates at [`Ticks::MAX`].
/// A zero `tick_hz` yields 0.
///
/// ```
/// use cotimer_core::ticks_from_millis;
///
/// assert_eq!(ticks_from_millis(250, 1_000), 250);
/// assert_eq!(ticks_from_millis(250, 100), 25);
/// assert_eq!(ticks_from_millis(5, 100), 1);
/// ```
pub const fn ticks_from_millis(millis: u32, tick_hz: u32) -> Ticks {
    let ticks = (millis as u64 * tick_hz as u64).div_ceil(MILLIS_PER_SEC);
    if ticks > Ticks::MAX as u64 {
        Ticks::MAX
    } else {
        ticks as Ticks
    }
}

/// Convert a tick count back to whole milliseconds at `tick_hz`, rounding down.
pub const fn millis_from_ticks(ticks: Ticks, tick_hz: u32) -> u64 {
    if tick_hz == 0 {
        return 0;
    }
    ticks as u64 * MILLIS_PER_SEC / tick_hz as u64
}
