//! Core pipeline for the ecolog environmental data logger
//!
//! Drives the sense → timestamp → persist → upload → sleep cycle on
//! battery-powered field hardware, degrading gracefully when sensors,
//! network time or connectivity are missing.
//!
//! Key constraints:
//! - One sequential control flow, no tasks and no locks
//! - A reading cycle always completes and always leaves the log valid
//! - Connectivity and sensor faults degrade data quality, never uptime
//!
//! Hardware access goes through capability-provider traits (analog source,
//! clocks, durable store, transport, power control) with simulated
//! implementations for host-side runs and tests, so component logic carries
//! no conditional compilation.
//!
//! ```no_run
//! use ecolog_core::{DataLog, MemoryStore, SensorManager, SensorConfig};
//! use ecolog_core::traits::ScriptedAnalog;
//!
//! let adc = ScriptedAnalog::new(&[(35, &[2048]), (34, &[2048])]);
//! let mut sensors = SensorManager::new(adc, SensorConfig::default());
//! sensors.init();
//!
//! let mut log = DataLog::new(MemoryStore::new());
//! log.init().expect("memory store cannot fail to open");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod power;
pub mod sensors;
pub mod time;
pub mod traits;

#[cfg(feature = "std")]
pub mod logger;
#[cfg(feature = "std")]
pub mod storage;
#[cfg(feature = "std")]
pub mod upload;

// Public API
pub use config::{MockValidity, PowerConfig, SensorConfig, TimeConfig, UploadConfig};
pub use errors::{SensorError, StorageError, TransportError, UploadError};
pub use power::{PowerManager, PowerState, WakeReason};
pub use sensors::{ChannelMode, SensorManager, SensorReading};
pub use time::{TimeManager, TimeSample};
pub use traits::{AnalogSource, Delay, MonotonicClock, NetworkLink, PowerControl, Transport, WallClock};

#[cfg(feature = "std")]
pub use logger::{CycleReport, DataLogger, SimulatedLogger};
#[cfg(feature = "std")]
pub use storage::{DataLog, DurableStore, FileStore, LogRecord, MemoryStore};
#[cfg(feature = "std")]
pub use upload::Uploader;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
