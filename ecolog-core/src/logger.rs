//! The orchestrator: one cycle, strictly sequenced
//!
//! [`DataLogger`] owns one instance of every component for the process
//! lifetime and drives them in a fixed order:
//!
//! ```text
//! timestamp → read sensors → append record → (online?) upload → suspend
//! ```
//!
//! No step is skipped because an earlier one degraded. An invalid sensor
//! reading is still timestamped and appended with its validity flags; a
//! failed append does not block the upload of previously-pending records;
//! a failed upload does not block suspension. The cycle always completes
//! and always leaves the log in a valid append-only state.
//!
//! There is exactly one thread of control. The cycle runs to completion
//! before any suspension starts, and the external wake signal only ever
//! cancels the suspension, never an in-progress step.
//!
//! Providers are chosen at composition time. Wiring the same logger to
//! scripted providers or to the host OS is the whole difference between a
//! test run and a deployment; see the `simulated_cycle` example.

use log::{debug, info, warn};

use crate::{
    power::{PowerManager, WakeReason},
    sensors::SensorManager,
    storage::{DataLog, DurableStore},
    time::TimeManager,
    traits::{AnalogSource, Delay, MonotonicClock, NetworkLink, PowerControl, Transport, WallClock},
    upload::Uploader,
};

/// What one cycle did, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Whether the reading was persisted
    pub appended: bool,
    /// Whether the link was online and an upload was attempted
    pub upload_attempted: bool,
    /// Whether pending records were delivered and the watermark advanced
    pub uploaded: bool,
    /// What ended the suspension
    pub wake: WakeReason,
}

/// Owns every component and drives the sampling cycle
pub struct DataLogger<A, C, W, D, S, T, P, N>
where
    A: AnalogSource,
    C: MonotonicClock,
    W: WallClock,
    D: Delay,
    S: DurableStore,
    T: Transport,
    P: PowerControl,
    N: NetworkLink,
{
    sensors: SensorManager<A>,
    time: TimeManager<C, W, D>,
    log: DataLog<S>,
    uploader: Uploader<T, D>,
    power: PowerManager<P, D>,
    link: N,
}

impl<A, C, W, D, S, T, P, N> DataLogger<A, C, W, D, S, T, P, N>
where
    A: AnalogSource,
    C: MonotonicClock,
    W: WallClock,
    D: Delay,
    S: DurableStore,
    T: Transport,
    P: PowerControl,
    N: NetworkLink,
{
    /// Compose a logger from its components
    pub fn new(
        sensors: SensorManager<A>,
        time: TimeManager<C, W, D>,
        log: DataLog<S>,
        uploader: Uploader<T, D>,
        power: PowerManager<P, D>,
        link: N,
    ) -> Self {
        Self {
            sensors,
            time,
            log,
            uploader,
            power,
            link,
        }
    }

    /// Initialize every component
    ///
    /// Time sync and sensor probing degrade silently; only an unopenable
    /// store is fatal, because the pipeline cannot function without it.
    pub fn init(&mut self) -> Result<(), crate::errors::StorageError> {
        info!("ecolog {} starting", crate::VERSION);
        self.time.init();
        self.sensors.init();
        self.log.init()
    }

    /// Run one full cycle and suspend until the next wake
    pub fn run_cycle(&mut self) -> CycleReport {
        debug!("cycle start");

        let stamp = self.time.now();
        let now_ms = self.time.monotonic_ms() as u32;
        let reading = self.sensors.read(now_ms);

        let appended = match self.log.append(&stamp, &reading) {
            Ok(()) => true,
            Err(e) => {
                warn!("append failed, this reading is dropped: {e}");
                false
            }
        };

        let (upload_attempted, uploaded) = if self.link.is_online() {
            (true, self.uploader.send_with_retries(&mut self.log))
        } else {
            info!("link offline, records stay pending");
            (false, false)
        };

        let wake = self.power.suspend_until_wake();
        CycleReport {
            appended,
            upload_attempted,
            uploaded,
            wake,
        }
    }

    /// Run `count` cycles back to back
    pub fn run_cycles(&mut self, count: u32) {
        for _ in 0..count {
            self.run_cycle();
        }
    }

    /// Run until the process is killed
    pub fn run_forever(&mut self) -> ! {
        loop {
            self.run_cycle();
        }
    }

    /// Cause of the most recent wake, if any
    pub fn last_wake(&self) -> Option<WakeReason> {
        self.power.last_wake()
    }

    /// The sensor manager
    pub fn sensors(&self) -> &SensorManager<A> {
        &self.sensors
    }

    /// The uploader
    pub fn uploader(&self) -> &Uploader<T, D> {
        &self.uploader
    }

    /// Mutable access to the record log, for simulated providers
    pub fn log_mut(&mut self) -> &mut DataLog<S> {
        &mut self.log
    }

    /// Mutable access to the time manager, for simulated providers
    pub fn time_mut(&mut self) -> &mut TimeManager<C, W, D> {
        &mut self.time
    }

    /// Mutable access to the network link, for simulated providers
    pub fn link_mut(&mut self) -> &mut N {
        &mut self.link
    }
}

/// A logger wired entirely to scripted providers
///
/// The composition used by the integration tests and the
/// `simulated_cycle` example.
pub type SimulatedLogger = DataLogger<
    crate::traits::ScriptedAnalog,
    crate::traits::FixedClock,
    crate::traits::FixedWallClock,
    crate::traits::NoopDelay,
    crate::storage::MemoryStore,
    crate::traits::ScriptedTransport,
    crate::traits::ScriptedPower,
    crate::traits::FixedLink,
>;
