//! Timer configuration and builder

use crate::{Callback, Ticks};

/// Everything needed to individualize a timer.
///
/// Used to fill in placeholder slots of a fixed-size timer array after
/// construction, or to build a timer in one step with
/// [`Timer::with_config`](crate::Timer::with_config).
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerConfig {
    pub preset: Ticks,
    pub on_timeout: Option<Callback>,
    pub on_restart: Option<Callback>,
}

impl TimerConfig {
    /// Creates a new timer configuration builder.
    pub const fn builder() -> TimerConfigBuilder {
        TimerConfigBuilder::new()
    }

    /// Configuration with a preset and timeout callback, no restart callback.
    pub const fn new(preset: Ticks, on_timeout: Callback) -> Self {
        Self {
            preset,
            on_timeout: Some(on_timeout),
            on_restart: None,
        }
    }
}

/// Builder for [`TimerConfig`].
///
/// All methods are `const` so a configuration table can be declared as a
/// `static`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerConfigBuilder {
    config: TimerConfig,
}

impl TimerConfigBuilder {
    pub const fn new() -> Self {
        Self {
            config: TimerConfig {
                preset: 0,
                on_timeout: None,
                on_restart: None,
            },
        }
    }

    /// Sets the countdown length in ticks.
    pub const fn preset(mut self, preset: Ticks) -> Self {
        self.config.preset = preset;
        self
    }

    /// Sets the callback run when an expiry is processed.
    pub const fn on_timeout(mut self, callback: Callback) -> Self {
        self.config.on_timeout = Some(callback);
        self
    }

    /// Sets the callback run on every restart.
    pub const fn on_restart(mut self, callback: Callback) -> Self {
        self.config.on_restart = Some(callback);
        self
    }

    /// Builds the timer configuration.
    pub const fn build(self) -> TimerConfig {
        self.config
    }
}
