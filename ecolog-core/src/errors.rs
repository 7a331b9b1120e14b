//! Error types for the logging pipeline
//!
//! Errors here follow the same rules as the rest of the crate's hot path:
//! small, `Copy`, inline data only, `&'static str` for messages. Nothing in
//! the cycle is allowed to terminate the process; every error below maps to
//! a documented degradation:
//!
//! - [`SensorError`] — channel-level, recovered by mock substitution
//! - [`TransportError`] — one attempt failed, recovered by the retry layer
//! - [`StorageError`] — fatal only when the store cannot be opened at
//!   initialization; a failed append is reported and retried next cycle
//! - [`UploadError`] — after retries are exhausted the data simply stays
//!   pending for the next cycle
//!
//! Time sync failure is deliberately not an error type: the time service
//! always produces a sample and records the degradation in its `synced`
//! flag.

use thiserror_no_std::Error;

/// Channel-level acquisition failures
///
/// Never escapes the sensor manager; callers see validity flags instead.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SensorError {
    /// Raw code pinned to an ADC rail, the sensor is absent or shorted
    #[error("sensor not responding (raw code {raw})")]
    NotResponding {
        /// The rail-pinned ADC code
        raw: u16,
    },

    /// Converted value outside the plausible physical band
    #[error("value {value} outside plausible range [{min}, {max}]")]
    OutOfBounds {
        /// The converted reading that was rejected
        value: f32,
        /// Lower plausibility bound
        min: f32,
        /// Upper plausibility bound
        max: f32,
    },
}

/// One failed delivery attempt at the transport layer
///
/// Carriers map their protocol errors onto these three cases; anything
/// richer is logged at the call site.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No route to the collector, or the connection was refused
    #[error("collector unreachable")]
    Unreachable,

    /// The exchange happened but no well-formed response came back
    #[error("protocol error talking to collector")]
    Protocol,

    /// The collector did not answer within the transport timeout
    #[error("timed out waiting for collector")]
    Timeout,
}

/// Durable store and record integrity failures
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StorageError {
    /// The backing store cannot be opened or was never initialized
    ///
    /// Fatal at initialization; the log cannot function without a store.
    #[error("store unavailable: {0}")]
    Unavailable(&'static str),

    /// The store has no room for another record
    #[error("store full")]
    StoreFull,

    /// Read or write on the backing store failed
    #[error("store I/O failed: {0}")]
    Io(&'static str),

    /// A persisted line does not parse as a record
    #[error("malformed record: {0}")]
    Format(&'static str),

    /// Recomputed checksum disagrees with the stored one
    ///
    /// The record is reported as corrupted, never silently accepted and
    /// never silently discarded.
    #[error("checksum mismatch: stored {stored}, computed {computed}")]
    ChecksumMismatch {
        /// Checksum carried by the record
        stored: u32,
        /// Checksum recomputed from the record fields
        computed: u32,
    },
}

/// Batch delivery failures above the transport layer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadError {
    /// The transport attempt itself failed
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The collector answered with a non-success status
    #[error("collector returned status {0}")]
    Status(u16),

    /// The log reported pending data but produced an empty payload
    ///
    /// The log is left untouched so nothing can be lost.
    #[error("pending data reported but payload was empty")]
    ReadInconsistency,

    /// Uploads are administratively disabled
    #[error("upload disabled")]
    Disabled,

    /// The payload envelope could not be serialized
    #[error("payload envelope serialization failed")]
    Envelope,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotResponding { raw } => defmt::write!(fmt, "not responding (raw {})", raw),
            Self::OutOfBounds { value, min, max } => {
                defmt::write!(fmt, "{} outside [{}, {}]", value, min, max)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unreachable => defmt::write!(fmt, "unreachable"),
            Self::Protocol => defmt::write!(fmt, "protocol error"),
            Self::Timeout => defmt::write!(fmt, "timeout"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unavailable(reason) => defmt::write!(fmt, "unavailable: {}", reason),
            Self::StoreFull => defmt::write!(fmt, "store full"),
            Self::Io(reason) => defmt::write!(fmt, "I/O: {}", reason),
            Self::Format(reason) => defmt::write!(fmt, "format: {}", reason),
            Self::ChecksumMismatch { stored, computed } => {
                defmt::write!(fmt, "checksum {} != {}", stored, computed)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for UploadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Transport(e) => defmt::write!(fmt, "transport: {}", e),
            Self::Status(code) => defmt::write!(fmt, "status {}", code),
            Self::ReadInconsistency => defmt::write!(fmt, "read inconsistency"),
            Self::Disabled => defmt::write!(fmt, "disabled"),
            Self::Envelope => defmt::write!(fmt, "envelope"),
        }
    }
}
