//! Power scheduling: the Active/Suspended state machine
//!
//! The logger is Active for exactly one cycle at a time and Suspended for
//! everything in between. Suspension happens once per cycle after the
//! upload attempt, whatever the upload outcome was. Waking happens on
//! timer expiry or on the external wake signal; an external wake gets a
//! settle window before the cycle proceeds, because a bouncing signal
//! would otherwise retrigger immediately.
//!
//! The wake cause is diagnostics only. It never changes what the cycle
//! does.

use log::{debug, info};

use crate::{
    config::PowerConfig,
    traits::{Delay, PowerControl},
};

/// Why the system left the low-power state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum WakeReason {
    /// The sampling timer expired
    Timer = 0,
    /// The external wake line fired
    ExternalSignal = 1,
    /// The platform could not tell
    Unknown = 2,
}

impl WakeReason {
    /// Human-readable wake cause
    pub const fn name(&self) -> &'static str {
        match self {
            WakeReason::Timer => "timer",
            WakeReason::ExternalSignal => "external signal",
            WakeReason::Unknown => "unknown",
        }
    }
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerState {
    /// A cycle is in progress
    Active = 0,
    /// Waiting in the low-power state for a wake condition
    Suspended = 1,
}

/// Owns the suspend/wake transitions
pub struct PowerManager<P: PowerControl, D: Delay> {
    power: P,
    delay: D,
    config: PowerConfig,
    state: PowerState,
    last_wake: Option<WakeReason>,
}

impl<P: PowerControl, D: Delay> PowerManager<P, D> {
    /// Create a manager over a suspend primitive
    pub fn new(power: P, delay: D, config: PowerConfig) -> Self {
        Self {
            power,
            delay,
            config,
            state: PowerState::Active,
            last_wake: None,
        }
    }

    /// Suspend until the next wake condition and report the cause
    ///
    /// Blocks for the whole suspension. An external wake is settled for
    /// the configured window before the scheduler re-arms.
    pub fn suspend_until_wake(&mut self) -> WakeReason {
        info!(
            "suspending for up to {} ms (timer or external signal)",
            self.config.sample_interval_ms
        );
        self.state = PowerState::Suspended;
        let reason = self.power.suspend(self.config.sample_interval_ms);

        if reason == WakeReason::ExternalSignal {
            debug!("external wake, settling {} ms", self.config.settle_ms);
            self.delay.delay_ms(self.config.settle_ms);
        }

        self.state = PowerState::Active;
        self.last_wake = Some(reason);
        info!("woke up: {}", reason.name());
        reason
    }

    /// Current scheduler state
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Cause of the most recent wake, if any
    pub fn last_wake(&self) -> Option<WakeReason> {
        self.last_wake
    }

    /// Access to the delay provider, for simulated providers
    pub fn delay(&self) -> &D {
        &self.delay
    }
}
