//! Constants for the ecolog pipeline
//!
//! Centralized, documented numeric values used throughout the logger. All
//! magic numbers live here; component defaults in [`crate::config`] are
//! drawn from these values.
//!
//! Values were taken from the deployed hardware: a 12-bit ADC at 3.3 V, a
//! 10 kΩ NTC thermistor in a voltage divider and an LDR photoresistor with
//! the usual datasheet power-law curve.

// ADC geometry

/// Number of distinct ADC codes (12-bit converter)
pub const ADC_COUNTS: u16 = 4096;

/// Highest ADC code the converter can produce
pub const ADC_MAX_CODE: u16 = 4095;

/// Codes at or below this value are treated as "sensor absent"
///
/// A floating or shorted pin reads at the rails; a real divider with a
/// 10 kΩ thermistor or an LDR cannot reach them.
pub const ADC_GUARD_LOW_CODE: u16 = 10;

/// Codes above this value are treated as "sensor absent"
pub const ADC_GUARD_HIGH_CODE: u16 = 4090;

/// ADC reference voltage in volts
pub const ADC_VREF_VOLTS: f32 = 3.3;

// Thermistor channel

/// Thermistor nominal resistance at the reference temperature, in ohms
pub const THERMISTOR_R0_OHMS: f32 = 10_000.0;

/// Thermistor reference temperature in kelvin (25 °C)
pub const THERMISTOR_T0_KELVIN: f32 = 298.15;

/// Beta parameter of the thermistor equation
pub const THERMISTOR_BETA: f32 = 3950.0;

/// Offset between kelvin and degrees Celsius
pub const KELVIN_OFFSET: f32 = 273.15;

/// Coldest temperature accepted as a plausible environment reading, in °C
///
/// Anything below is treated as sensor malfunction, not weather.
pub const TEMP_PLAUSIBLE_MIN_C: f32 = -50.0;

/// Hottest temperature accepted as a plausible environment reading, in °C
pub const TEMP_PLAUSIBLE_MAX_C: f32 = 100.0;

// Photoresistor channel

/// Fixed divider resistor on the LDR channel, in ohms
pub const LDR_DIVIDER_OHMS: f32 = 2000.0;

/// LDR resistance at 10 lux, in kΩ (datasheet RL10)
pub const LDR_RL10_KOHM: f32 = 33.0;

/// LDR gamma exponent (datasheet slope of the log-log curve)
pub const LDR_GAMMA: f32 = 0.7;

/// Dimmest illuminance accepted as plausible, in lux
pub const LUX_PLAUSIBLE_MIN: f32 = 0.1;

/// Brightest illuminance accepted as plausible, in lux
pub const LUX_PLAUSIBLE_MAX: f32 = 100_000.0;

// Mock waveforms
//
// Synthesized channels oscillate smoothly so downstream consumers see
// realistic-looking variation instead of a frozen value.

/// Center of the synthesized temperature oscillation, in °C
pub const MOCK_TEMP_BASE_C: f32 = 22.5;

/// Amplitude of the synthesized temperature oscillation, in °C
pub const MOCK_TEMP_SWING_C: f32 = 2.5;

/// Phase step per synthesized temperature sample
pub const MOCK_TEMP_STEP: f32 = 0.1;

/// Center of the synthesized illuminance oscillation, in lux
pub const MOCK_LUX_BASE: f32 = 550.0;

/// Amplitude of the synthesized illuminance oscillation, in lux
pub const MOCK_LUX_SWING: f32 = 450.0;

/// Phase step per synthesized illuminance sample
pub const MOCK_LUX_STEP: f32 = 0.05;

// Pin assignments

/// Wake button pin
pub const BUTTON_PIN: u8 = 33;

/// Thermistor divider pin
pub const THERMISTOR_PIN: u8 = 35;

/// Photoresistor divider pin
pub const PHOTORESISTOR_PIN: u8 = 34;

// Time service

/// Wall-clock sync polling attempts at initialization
pub const TIME_SYNC_ATTEMPTS: u32 = 20;

/// Spacing between sync polling attempts, in milliseconds
///
/// 20 attempts at 500 ms give the 10 s sync ceiling.
pub const TIME_SYNC_POLL_MS: u32 = 500;

/// Anchor epoch used when sync never succeeds: 2021-01-01T00:00:00Z
pub const TIME_FALLBACK_EPOCH: u64 = 1_609_459_200;

/// Static offset applied when rendering timestamps, in seconds (UTC−3)
pub const TIME_UTC_OFFSET_SECS: i32 = -3 * 3600;

// Upload service

/// Collector endpoint for batched readings
pub const COLLECTOR_URL: &str = "http://collector.example.com/api/readings";

/// Upload attempts per drain before deferring to the next cycle
pub const UPLOAD_MAX_ATTEMPTS: u32 = 3;

/// Delay between upload attempts, in milliseconds
pub const UPLOAD_RETRY_DELAY_MS: u32 = 2000;

// Power scheduling

/// Sampling interval for bench/demo runs, in milliseconds (30 s)
pub const SAMPLE_INTERVAL_DEMO_MS: u64 = 30_000;

/// Sampling interval for field deployments, in milliseconds (5 min)
pub const SAMPLE_INTERVAL_PRODUCTION_MS: u64 = 300_000;

/// Settle window after an external wake signal, in milliseconds
///
/// The wake line bounces; re-arming before it settles would retrigger the
/// cycle immediately.
pub const WAKE_SETTLE_MS: u32 = 300;

// Storage

/// Backing file for the append-only reading log
pub const LOG_FILE_NAME: &str = "data_log.csv";
