//! Timestamping with authoritative sync and anchored estimation
//!
//! The logger needs a believable wall-clock timestamp on every record, but
//! the wall clock is only available when the network is. [`TimeManager`]
//! keeps an anchor, the last authoritative `(epoch, monotonic)` pair, and
//! extrapolates from it whenever the source goes dark:
//!
//! ```text
//! epoch_estimate = anchor_epoch + (monotonic_now − anchor_monotonic) / 1000
//! ```
//!
//! The anchor is refreshed only on authoritative reads. Estimated reads
//! never touch it, so drift cannot compound across consecutive unsynced
//! cycles; the estimate is always one hop from the last real sync.
//!
//! Sync failure is not an error. The service always produces a
//! [`TimeSample`] and records the degradation in its `synced` flag; the
//! logging pipeline's uptime never depends on network time availability.

use core::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Utc};
use log::{info, warn};

use crate::{
    config::TimeConfig,
    traits::{Delay, MonotonicClock, WallClock},
};

/// One timestamp, real or estimated
///
/// Immutable once produced. `synced` records whether `epoch` came from the
/// authoritative source on this call or from anchor extrapolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSample {
    /// Seconds since the Unix epoch
    pub epoch: u64,
    /// Monotonic milliseconds when this sample was produced
    pub monotonic_ms: u64,
    /// Whether `epoch` is authoritative
    pub synced: bool,
    /// Calendar rendering, `"YYYY-MM-DD HH:MM:SS"` at the static offset
    pub formatted: heapless::String<32>,
}

/// Render an epoch at a static offset
///
/// Falls back to the bare number if the epoch or offset is unrepresentable.
fn render_epoch(epoch: u64, utc_offset_secs: i32) -> heapless::String<32> {
    let mut out = heapless::String::new();
    let rendered = FixedOffset::east_opt(utc_offset_secs).and_then(|offset| {
        DateTime::from_timestamp(epoch as i64, 0).map(|utc| utc.with_timezone(&offset))
    });
    match rendered {
        Some(local) => {
            let _ = write!(out, "{}", local.format("%Y-%m-%d %H:%M:%S"));
        }
        None => {
            let _ = write!(out, "epoch {epoch}");
        }
    }
    out
}

/// Produces timestamps from an authoritative source with estimation fallback
pub struct TimeManager<C: MonotonicClock, W: WallClock, D: Delay> {
    clock: C,
    wall: W,
    delay: D,
    config: TimeConfig,
    initialized: bool,
    anchor_epoch: u64,
    anchor_ms: u64,
}

impl<C: MonotonicClock, W: WallClock, D: Delay> TimeManager<C, W, D> {
    /// Create a manager over a monotonic clock and a wall-clock source
    pub fn new(clock: C, wall: W, delay: D, config: TimeConfig) -> Self {
        Self {
            clock,
            wall,
            delay,
            config,
            initialized: false,
            anchor_epoch: config.fallback_epoch,
            anchor_ms: 0,
        }
    }

    /// Attempt initial synchronization within the configured budget
    ///
    /// Polls the wall clock up to `sync_attempts` times, `sync_poll_ms`
    /// apart. Never fatal: when the budget runs out the anchor falls back
    /// to the fixed epoch and the service keeps working in estimation mode.
    pub fn init(&mut self) {
        info!("synchronizing wall-clock time");
        for attempt in 1..=self.config.sync_attempts {
            if let Some(epoch) = self.wall.epoch_seconds() {
                self.anchor_epoch = epoch;
                self.anchor_ms = self.clock.now_ms();
                self.initialized = true;
                info!("time synchronized after {attempt} attempt(s), epoch {epoch}");
                return;
            }
            self.delay.delay_ms(self.config.sync_poll_ms);
        }

        self.anchor_epoch = self.config.fallback_epoch;
        self.anchor_ms = self.clock.now_ms();
        self.initialized = true;
        warn!(
            "time sync failed, anchoring at fallback epoch {}",
            self.config.fallback_epoch
        );
    }

    /// Produce a timestamp, authoritative when possible
    ///
    /// An authoritative read refreshes the anchor for future estimation;
    /// an estimated read leaves it untouched.
    pub fn now(&mut self) -> TimeSample {
        if !self.initialized {
            warn!("time manager used before init, synchronizing now");
            self.init();
        }

        let monotonic_ms = self.clock.now_ms();
        let (epoch, synced) = match self.wall.epoch_seconds() {
            Some(epoch) => {
                self.anchor_epoch = epoch;
                self.anchor_ms = monotonic_ms;
                (epoch, true)
            }
            None => {
                let elapsed_s = monotonic_ms.saturating_sub(self.anchor_ms) / 1000;
                (self.anchor_epoch + elapsed_s, false)
            }
        };

        TimeSample {
            epoch,
            monotonic_ms,
            synced,
            formatted: render_epoch(epoch, self.config.utc_offset_secs),
        }
    }

    /// Current monotonic milliseconds
    pub fn monotonic_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Mutable access to the monotonic clock, for simulated providers
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Mutable access to the wall-clock source, for simulated providers
    pub fn wall_mut(&mut self) -> &mut W {
        &mut self.wall
    }

    /// Access to the delay provider, for simulated providers
    pub fn delay(&self) -> &D {
        &self.delay
    }
}
