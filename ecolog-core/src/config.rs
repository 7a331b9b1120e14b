//! Compile-time configuration surface
//!
//! Each component takes a small config struct whose `Default` is drawn from
//! [`crate::constants`]. Setters follow the builder convention so bench and
//! test setups can tweak a single knob:
//!
//! ```
//! use ecolog_core::config::{MockValidity, SensorConfig};
//!
//! let config = SensorConfig::default()
//!     .with_beta(3435.0)
//!     .with_mock_validity(MockValidity::TreatAsInvalid);
//! assert_eq!(config.beta, 3435.0);
//! ```
//!
//! There is no runtime configuration file; a deployment picks its values
//! here and recompiles.

use crate::constants;

/// What the validity flag of a synthesized channel should say
///
/// Downstream consumers treat validity as a data-quality signal, and field
/// deployments disagree on whether synthesized values count as usable data.
/// The choice is therefore explicit rather than baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MockValidity {
    /// Synthesized values are flagged valid, mirroring the channel's mock
    /// state (the behavior of the original deployment)
    #[default]
    TreatAsValid,
    /// Synthesized values are flagged invalid so consumers can filter them
    TreatAsInvalid,
}

/// Sensor acquisition configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// ADC pin of the thermistor divider
    pub thermistor_pin: u8,
    /// ADC pin of the photoresistor divider
    pub photoresistor_pin: u8,
    /// Thermistor Beta parameter
    pub beta: f32,
    /// Thermistor nominal resistance at the reference temperature, ohms
    pub r0_ohms: f32,
    /// Thermistor reference temperature, kelvin
    pub t0_kelvin: f32,
    /// LDR gamma exponent
    pub gamma: f32,
    /// LDR resistance at 10 lux, kΩ
    pub rl10_kohm: f32,
    /// Whether a failed real read latches the channel to Mock
    pub mock_fallback: bool,
    /// Validity flag policy for synthesized channels
    pub mock_validity: MockValidity,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            thermistor_pin: constants::THERMISTOR_PIN,
            photoresistor_pin: constants::PHOTORESISTOR_PIN,
            beta: constants::THERMISTOR_BETA,
            r0_ohms: constants::THERMISTOR_R0_OHMS,
            t0_kelvin: constants::THERMISTOR_T0_KELVIN,
            gamma: constants::LDR_GAMMA,
            rl10_kohm: constants::LDR_RL10_KOHM,
            mock_fallback: true,
            mock_validity: MockValidity::TreatAsValid,
        }
    }
}

impl SensorConfig {
    /// Set the two channel pins
    pub fn with_pins(mut self, thermistor: u8, photoresistor: u8) -> Self {
        self.thermistor_pin = thermistor;
        self.photoresistor_pin = photoresistor;
        self
    }

    /// Set the thermistor Beta parameter
    pub fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    /// Set the LDR curve parameters
    pub fn with_ldr_curve(mut self, gamma: f32, rl10_kohm: f32) -> Self {
        self.gamma = gamma;
        self.rl10_kohm = rl10_kohm;
        self
    }

    /// Enable or disable the runtime Real→Mock fallback latch
    pub fn with_mock_fallback(mut self, enabled: bool) -> Self {
        self.mock_fallback = enabled;
        self
    }

    /// Set the validity policy for synthesized channels
    pub fn with_mock_validity(mut self, policy: MockValidity) -> Self {
        self.mock_validity = policy;
        self
    }
}

/// Time service configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConfig {
    /// Wall-clock polling attempts during initialization
    pub sync_attempts: u32,
    /// Spacing between polling attempts, milliseconds
    pub sync_poll_ms: u32,
    /// Anchor epoch when sync never succeeds
    pub fallback_epoch: u64,
    /// Static offset applied when rendering timestamps, seconds
    pub utc_offset_secs: i32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            sync_attempts: constants::TIME_SYNC_ATTEMPTS,
            sync_poll_ms: constants::TIME_SYNC_POLL_MS,
            fallback_epoch: constants::TIME_FALLBACK_EPOCH,
            utc_offset_secs: constants::TIME_UTC_OFFSET_SECS,
        }
    }
}

impl TimeConfig {
    /// Set the sync polling budget
    pub fn with_sync_budget(mut self, attempts: u32, poll_ms: u32) -> Self {
        self.sync_attempts = attempts;
        self.sync_poll_ms = poll_ms;
        self
    }

    /// Set the rendering offset in seconds east of UTC
    pub fn with_utc_offset(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }
}

/// Upload service configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadConfig {
    /// Collector endpoint
    pub collector_url: &'static str,
    /// Delivery attempts per drain
    pub max_attempts: u32,
    /// Delay between attempts, milliseconds
    pub retry_delay_ms: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            collector_url: constants::COLLECTOR_URL,
            max_attempts: constants::UPLOAD_MAX_ATTEMPTS,
            retry_delay_ms: constants::UPLOAD_RETRY_DELAY_MS,
        }
    }
}

impl UploadConfig {
    /// Set the collector endpoint
    pub fn with_collector(mut self, url: &'static str) -> Self {
        self.collector_url = url;
        self
    }

    /// Set the retry policy
    pub fn with_retries(mut self, max_attempts: u32, retry_delay_ms: u32) -> Self {
        self.max_attempts = max_attempts;
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

/// Power scheduling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerConfig {
    /// Suspension length between cycles, milliseconds
    pub sample_interval_ms: u64,
    /// Settle window after an external wake signal, milliseconds
    pub settle_ms: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: constants::SAMPLE_INTERVAL_PRODUCTION_MS,
            settle_ms: constants::WAKE_SETTLE_MS,
        }
    }
}

impl PowerConfig {
    /// Bench profile: short 30 s cycles
    pub fn demo() -> Self {
        Self {
            sample_interval_ms: constants::SAMPLE_INTERVAL_DEMO_MS,
            ..Self::default()
        }
    }

    /// Set the suspension length
    pub fn with_interval_ms(mut self, ms: u64) -> Self {
        self.sample_interval_ms = ms;
        self
    }
}
