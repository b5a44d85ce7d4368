//! Clock tick service for POSIX
//!
//! Generates periodic ticks on a dedicated thread. Deadlines are absolute on
//! the monotonic clock so sleep jitter does not accumulate into drift.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::{PortError, PortResult};

/// Default tick rate in Hz
pub const DEFAULT_TICK_HZ: u32 = 1_000;

/// Highest supported tick rate in Hz
pub const MAX_TICK_HZ: u32 = 10_000;

/// Nanoseconds per second
const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Clock tick configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerConfig {
    pub rate_hz: u32,
}

impl TickerConfig {
    pub const fn new(rate_hz: u32) -> Self {
        Self { rate_hz }
    }

    /// Check the rate is within 1..=[`MAX_TICK_HZ`]
    pub fn validate(&self) -> PortResult<()> {
        if self.rate_hz == 0 || self.rate_hz > MAX_TICK_HZ {
            return Err(PortError::InvalidRate(self.rate_hz));
        }
        Ok(())
    }

    /// Get the tick period as a Duration
    pub fn period(&self) -> Duration {
        Duration::from_nanos(NSEC_PER_SEC / u64::from(self.rate_hz.max(1)))
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_HZ)
    }
}

/// Running tick thread. Stops when [`stop`](Self::stop)ped or dropped.
///
/// # Examples
///
/// ```no_run
/// use cotimer_bank::SharedBank;
/// use cotimer_posix::{Ticker, TickerConfig};
///
/// static TIMERS: SharedBank<4> = SharedBank::new();
///
/// let ticker = Ticker::start(TickerConfig::new(1_000), || {
///     TIMERS.tick();
/// })
/// .unwrap();
/// // ... run the scan loop ...
/// ticker.stop();
/// ```
pub struct Ticker {
    config: TickerConfig,
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn the tick thread and call `on_tick` once per period.
    pub fn start<F>(config: TickerConfig, on_tick: F) -> PortResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        config.validate()?;

        let running = Arc::new(AtomicBool::new(true));
        let ticks = Arc::new(AtomicU64::new(0));
        let period = config.period();

        let handle = thread::Builder::new().name("cotimer-tick".into()).spawn({
            let running = Arc::clone(&running);
            let ticks = Arc::clone(&ticks);
            move || tick_loop(period, &running, &ticks, on_tick)
        })?;

        debug!("ticker started at {} Hz", config.rate_hz);
        Ok(Self {
            config,
            running,
            ticks,
            handle: Some(handle),
        })
    }

    pub fn config(&self) -> TickerConfig {
        self.config
    }

    /// Number of ticks delivered so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the tick thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
            debug!("ticker stopped after {} ticks", self.ticks());
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn tick_loop<F: FnMut()>(
    period: Duration,
    running: &AtomicBool,
    ticks: &AtomicU64,
    mut on_tick: F,
) {
    let mut next_tick = Instant::now();

    while running.load(Ordering::Acquire) {
        next_tick += period;

        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else if now - next_tick > period {
            // a stall drops the missed ticks instead of replaying them
            warn!("tick overrun: {:?} behind schedule", now - next_tick);
            next_tick = now;
        }

        on_tick();
        ticks.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_clock_tick_period() {
        assert_eq!(TickerConfig::new(100).period(), Duration::from_millis(10));
        assert_eq!(TickerConfig::new(1_000).period(), Duration::from_micros(1_000));
        assert_eq!(TickerConfig::default().rate_hz, DEFAULT_TICK_HZ);
    }

    #[test]
    fn test_rate_validation() {
        assert!(TickerConfig::new(1).validate().is_ok());
        assert!(TickerConfig::new(MAX_TICK_HZ).validate().is_ok());
        assert!(matches!(
            TickerConfig::new(0).validate(),
            Err(PortError::InvalidRate(0))
        ));
        assert!(matches!(
            Ticker::start(TickerConfig::new(MAX_TICK_HZ + 1), || {}),
            Err(PortError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_ticker_thread() {
        static TICK_COUNT: AtomicUsize = AtomicUsize::new(0);

        let ticker = Ticker::start(TickerConfig::new(100), || {
            TICK_COUNT.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert!(ticker.is_running());

        // ~20 ticks at 10ms
        thread::sleep(Duration::from_millis(200));
        let delivered = ticker.ticks();
        ticker.stop();

        let count = TICK_COUNT.load(Ordering::SeqCst);
        assert!(count >= 5 && count <= 40, "Expected ~20 ticks, got {}", count);
        assert!(delivered as usize <= count);
    }

    #[test]
    fn test_stall_does_not_burst() {
        static TICK_COUNT: AtomicUsize = AtomicUsize::new(0);

        let ticker = Ticker::start(TickerConfig::new(1_000), || {
            if TICK_COUNT.fetch_add(1, Ordering::SeqCst) == 0 {
                thread::sleep(Duration::from_millis(60));
            }
        })
        .unwrap();

        // 60 ms lost to the first tick, then ~40 ticks on schedule
        thread::sleep(Duration::from_millis(100));
        ticker.stop();

        let count = TICK_COUNT.load(Ordering::SeqCst);
        assert!(count <= 70, "Expected ~40 ticks after the stall, got {}", count);
    }

    #[test]
    fn test_drop_stops_thread() {
        static TICK_COUNT: AtomicUsize = AtomicUsize::new(0);

        {
            let _ticker = Ticker::start(TickerConfig::new(1_000), || {
                TICK_COUNT.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
            thread::sleep(Duration::from_millis(20));
        }

        let after_drop = TICK_COUNT.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(TICK_COUNT.load(Ordering::SeqCst), after_drop);
    }
}
