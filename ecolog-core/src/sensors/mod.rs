//! Sensor acquisition with per-channel mock fallback
//!
//! Two analog channels, temperature (NTC thermistor) and illuminance (LDR).
//! `read()` never fails and never propagates a hardware fault: a channel
//! whose hardware is absent or misbehaving is switched to a synthesized
//! waveform and the degradation is recorded in the reading's validity
//! flags.
//!
//! ## Mode latch
//!
//! Each channel is probed once at initialization and fixed to Real or Mock.
//! A Real channel that later fails a read latches to Mock (when the
//! fallback is configured on) and never returns to Real until a fresh
//! `init()`. A one-way latch keeps status reports stable; a marginal sensor
//! flapping between modes would be worse than a steady mock.
//!
//! ## Synthesized data
//!
//! Mocked channels oscillate smoothly around indoor-typical values, driven
//! by one call counter shared by both channels and advanced once per
//! `read()` that synthesizes anything. Whether synthesized values are
//! flagged valid is an explicit config choice, see
//! [`MockValidity`](crate::config::MockValidity).

pub mod conversion;

use crate::{
    config::{MockValidity, SensorConfig},
    constants::{
        MOCK_LUX_BASE, MOCK_LUX_STEP, MOCK_LUX_SWING, MOCK_TEMP_BASE_C, MOCK_TEMP_STEP,
        MOCK_TEMP_SWING_C,
    },
    traits::AnalogSource,
};

use log::{debug, info, warn};

/// One acquisition of both channels
///
/// Channels carry independent validity; a reading is never discarded for
/// having one bad channel. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorReading {
    /// Temperature in degrees Celsius
    pub temperature_c: f32,
    /// Illuminance in lux
    pub light_lux: f32,
    /// Whether the temperature value is trustworthy
    pub temperature_valid: bool,
    /// Whether the illuminance value is trustworthy
    pub light_valid: bool,
    /// Monotonic milliseconds at acquisition
    pub acquired_at_ms: u32,
}

/// Acquisition mode of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMode {
    /// Reading the physical sensor
    Real,
    /// Synthesizing data, the sensor is absent or has failed
    Mock,
}

impl ChannelMode {
    /// Human-readable mode name
    pub const fn name(&self) -> &'static str {
        match self {
            ChannelMode::Real => "real sensor",
            ChannelMode::Mock => "simulated data",
        }
    }
}

/// Owns the two analog channels and their mode latches
pub struct SensorManager<A: AnalogSource> {
    adc: A,
    config: SensorConfig,
    initialized: bool,
    temperature_mode: ChannelMode,
    light_mode: ChannelMode,
    mock_counter: u32,
}

impl<A: AnalogSource> SensorManager<A> {
    /// Create a manager over an analog source
    pub fn new(adc: A, config: SensorConfig) -> Self {
        Self {
            adc,
            config,
            initialized: false,
            temperature_mode: ChannelMode::Real,
            light_mode: ChannelMode::Real,
            mock_counter: 0,
        }
    }

    /// Probe both channels once and fix their modes
    ///
    /// A channel that fails its probe starts in Mock regardless of the
    /// runtime fallback setting; there is no point retrying hardware that
    /// was absent at boot.
    pub fn init(&mut self) {
        info!("probing sensor channels");
        self.initialized = true;
        self.mock_counter = 0;

        self.temperature_mode = match self.probe_temperature() {
            Ok(_) => ChannelMode::Real,
            Err(e) => {
                warn!("temperature probe failed ({e}), channel starts mocked");
                ChannelMode::Mock
            }
        };
        self.light_mode = match self.probe_light() {
            Ok(_) => ChannelMode::Real,
            Err(e) => {
                warn!("light probe failed ({e}), channel starts mocked");
                ChannelMode::Mock
            }
        };
        self.log_status();
    }

    /// Acquire both channels
    ///
    /// Always returns a complete reading; hardware failures show up only in
    /// the validity flags and, when the fallback is enabled, in the mode
    /// latch.
    pub fn read(&mut self, now_ms: u32) -> SensorReading {
        if !self.initialized {
            warn!("sensor manager used before init, probing now");
            self.init();
        }

        let mut reading = SensorReading {
            temperature_c: 0.0,
            light_lux: 0.0,
            temperature_valid: false,
            light_valid: false,
            acquired_at_ms: now_ms,
        };

        if self.temperature_mode == ChannelMode::Real {
            match self.probe_temperature() {
                Ok(celsius) => {
                    reading.temperature_c = celsius;
                    reading.temperature_valid = true;
                    debug!("temperature: {celsius:.2} °C");
                }
                Err(e) => {
                    warn!("temperature read failed: {e}");
                    if self.config.mock_fallback {
                        self.temperature_mode = ChannelMode::Mock;
                    }
                }
            }
        }

        if self.light_mode == ChannelMode::Real {
            match self.probe_light() {
                Ok(lux) => {
                    reading.light_lux = lux;
                    reading.light_valid = true;
                    debug!("illuminance: {lux:.2} lux");
                }
                Err(e) => {
                    warn!("light read failed: {e}");
                    if self.config.mock_fallback {
                        self.light_mode = ChannelMode::Mock;
                    }
                }
            }
        }

        if self.temperature_mode == ChannelMode::Mock || self.light_mode == ChannelMode::Mock {
            self.synthesize(&mut reading);
        }

        reading
    }

    /// Current mode of the temperature channel
    pub fn temperature_mode(&self) -> ChannelMode {
        self.temperature_mode
    }

    /// Current mode of the light channel
    pub fn light_mode(&self) -> ChannelMode {
        self.light_mode
    }

    /// Report both channel modes through the log
    pub fn log_status(&self) {
        info!(
            "sensor status: temperature = {}, light = {}",
            self.temperature_mode.name(),
            self.light_mode.name()
        );
    }

    fn probe_temperature(&mut self) -> Result<f32, crate::errors::SensorError> {
        let raw = self.adc.read_raw(self.config.thermistor_pin);
        conversion::thermistor_celsius(raw, &self.config)
    }

    fn probe_light(&mut self) -> Result<f32, crate::errors::SensorError> {
        let raw = self.adc.read_raw(self.config.photoresistor_pin);
        conversion::photoresistor_lux(raw, &self.config)
    }

    /// Fill mocked channels with the oscillating waveform
    ///
    /// The counter advances once per call no matter how many channels are
    /// mocked, so both waveforms stay phase-locked.
    fn synthesize(&mut self, reading: &mut SensorReading) {
        self.mock_counter += 1;
        let n = self.mock_counter as f32;
        let flag = match self.config.mock_validity {
            MockValidity::TreatAsValid => true,
            MockValidity::TreatAsInvalid => false,
        };

        if self.temperature_mode == ChannelMode::Mock {
            reading.temperature_c = MOCK_TEMP_BASE_C + MOCK_TEMP_SWING_C * libm::sinf(MOCK_TEMP_STEP * n);
            reading.temperature_valid = flag;
        }
        if self.light_mode == ChannelMode::Mock {
            reading.light_lux = MOCK_LUX_BASE + MOCK_LUX_SWING * libm::sinf(MOCK_LUX_STEP * n);
            reading.light_valid = flag;
        }
        debug!("synthesized sample {n}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ScriptedAnalog;

    const T_PIN: u8 = 35;
    const L_PIN: u8 = 34;

    fn manager(
        thermistor: &[u16],
        photoresistor: &[u16],
        config: SensorConfig,
    ) -> SensorManager<ScriptedAnalog> {
        // Scripted pins must match the default config pins
        let adc = ScriptedAnalog::new(&[(T_PIN, thermistor), (L_PIN, photoresistor)]);
        SensorManager::new(adc, config)
    }

    fn mock_temp(n: u32) -> f32 {
        MOCK_TEMP_BASE_C + MOCK_TEMP_SWING_C * libm::sinf(MOCK_TEMP_STEP * n as f32)
    }

    fn mock_lux(n: u32) -> f32 {
        MOCK_LUX_BASE + MOCK_LUX_SWING * libm::sinf(MOCK_LUX_STEP * n as f32)
    }

    #[test]
    fn healthy_probe_keeps_channels_real() {
        let t = [2048, 2048];
        let l = [2048, 2048];
        let mut sensors = manager(&t, &l, SensorConfig::default());
        sensors.init();
        assert_eq!(sensors.temperature_mode(), ChannelMode::Real);
        assert_eq!(sensors.light_mode(), ChannelMode::Real);

        let reading = sensors.read(1234);
        assert!(reading.temperature_valid);
        assert!(reading.light_valid);
        assert_eq!(reading.acquired_at_ms, 1234);
        assert!((reading.temperature_c - 25.0).abs() < 1.0);
    }

    #[test]
    fn rail_pinned_probe_starts_mocked() {
        let t = [0];
        let l = [2048, 2048];
        let mut sensors = manager(&t, &l, SensorConfig::default());
        sensors.init();
        assert_eq!(sensors.temperature_mode(), ChannelMode::Mock);
        assert_eq!(sensors.light_mode(), ChannelMode::Real);
    }

    #[test]
    fn failed_read_latches_mock_and_keeps_other_channel_real() {
        // Probe succeeds, first real read hits the rail
        let t = [2048, 0];
        let l = [2048, 2000, 2000];
        let mut sensors = manager(&t, &l, SensorConfig::default());
        sensors.init();

        let reading = sensors.read(10);
        assert_eq!(sensors.temperature_mode(), ChannelMode::Mock);
        assert_eq!(sensors.light_mode(), ChannelMode::Real);
        // Synthesized temperature, first waveform sample
        assert_eq!(reading.temperature_c, mock_temp(1));
        // The healthy channel keeps its real value and validity
        assert!(reading.light_valid);
        assert!(reading.light_lux > 10.0);
    }

    #[test]
    fn latch_is_one_way() {
        // The thermistor recovers after the failure but stays mocked
        let t = [2048, 0, 2048, 2048];
        let l = [2048, 2000, 2000, 2000];
        let mut sensors = manager(&t, &l, SensorConfig::default());
        sensors.init();

        sensors.read(1);
        let second = sensors.read(2);
        assert_eq!(sensors.temperature_mode(), ChannelMode::Mock);
        assert_eq!(second.temperature_c, mock_temp(2));
    }

    #[test]
    fn fresh_init_resets_the_latch() {
        let t = [2048, 0, 2048, 2048];
        let l = [2048, 2000, 2000, 2000];
        let mut sensors = manager(&t, &l, SensorConfig::default());
        sensors.init();
        sensors.read(1);
        assert_eq!(sensors.temperature_mode(), ChannelMode::Mock);

        sensors.init();
        assert_eq!(sensors.temperature_mode(), ChannelMode::Real);
    }

    #[test]
    fn fallback_disabled_keeps_channel_real_and_invalid() {
        let t = [2048, 0, 0];
        let l = [2048, 2000, 2000];
        let config = SensorConfig::default().with_mock_fallback(false);
        let mut sensors = manager(&t, &l, config);
        sensors.init();

        let reading = sensors.read(5);
        assert_eq!(sensors.temperature_mode(), ChannelMode::Real);
        assert!(!reading.temperature_valid);
        assert_eq!(reading.temperature_c, 0.0);
        assert!(reading.light_valid);
    }

    #[test]
    fn mock_validity_policy_is_honored() {
        let t = [0];
        let l = [0];
        let config = SensorConfig::default().with_mock_validity(MockValidity::TreatAsInvalid);
        let mut sensors = manager(&t, &l, config);
        sensors.init();

        let reading = sensors.read(1);
        assert!(!reading.temperature_valid);
        assert!(!reading.light_valid);
        assert_eq!(reading.temperature_c, mock_temp(1));
        assert_eq!(reading.light_lux, mock_lux(1));

        let config = SensorConfig::default();
        let t = [0];
        let l = [0];
        let mut sensors = manager(&t, &l, config);
        sensors.init();
        let reading = sensors.read(1);
        assert!(reading.temperature_valid);
        assert!(reading.light_valid);
    }

    #[test]
    fn counter_advances_once_per_synthesizing_read() {
        let t = [0];
        let l = [0];
        let mut sensors = manager(&t, &l, SensorConfig::default());
        sensors.init();

        let first = sensors.read(1);
        let second = sensors.read(2);
        assert_eq!(first.temperature_c, mock_temp(1));
        assert_eq!(first.light_lux, mock_lux(1));
        assert_eq!(second.temperature_c, mock_temp(2));
        assert_eq!(second.light_lux, mock_lux(2));
    }

    #[test]
    fn read_before_init_probes_automatically() {
        let t = [2048, 2048];
        let l = [2048, 2048];
        let mut sensors = manager(&t, &l, SensorConfig::default());
        let reading = sensors.read(1);
        assert!(reading.temperature_valid);
    }
}
