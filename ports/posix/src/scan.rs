//! Main-loop driver for POSIX hosts

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::PortResult;

/// Runs the scan-cycle side of an application at a fixed cadence.
///
/// Each pass calls the supplied closure, which should `process` every timer.
/// The loop ends when the closure breaks, when [`StopHandle::stop`] is called
/// or, after [`install_ctrlc`](Self::install_ctrlc), on Ctrl-C.
pub struct ScanLoop {
    period: Duration,
    running: Arc<AtomicBool>,
}

/// Cloneable handle that stops a [`ScanLoop`] from another thread or callback.
#[derive(Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        !self.running.load(Ordering::Acquire)
    }
}

impl ScanLoop {
    /// Create a loop that scans every `period`. A zero period spins.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Stop the loop on SIGINT/Ctrl-C. Only one handler can be installed per
    /// process.
    pub fn install_ctrlc(&self) -> PortResult<()> {
        let handle = self.stop_handle();
        ctrlc::set_handler(move || {
            debug!("interrupt received, stopping scan loop");
            handle.stop();
        })?;
        Ok(())
    }

    /// Run scan cycles until stopped. Returns how many times `scan` was
    /// called, including a final pass that returned `Break`.
    pub fn run<F>(&self, mut scan: F) -> u64
    where
        F: FnMut() -> ControlFlow<()>,
    {
        let mut cycles = 0;
        let mut next_scan = Instant::now();

        while self.running.load(Ordering::Acquire) {
            cycles += 1;
            if scan().is_break() {
                break;
            }

            if !self.period.is_zero() {
                next_scan += self.period;
                let now = Instant::now();
                if next_scan > now {
                    thread::sleep(next_scan - now);
                } else {
                    // fell behind; don't try to catch up with a burst
                    next_scan = now;
                }
            }
        }

        debug!("scan loop finished after {} cycles", cycles);
        cycles
    }
}
