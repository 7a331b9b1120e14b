//! Raw-code to engineering-unit conversion
//!
//! Pure functions, no state and no allocation, safe to call from any
//! context. Each conversion rejects rail-pinned codes first, then applies
//! the divider math, then clamps against the plausible physical band for
//! the channel. A value outside the band is a malfunction verdict, not an
//! environmental extreme.
//!
//! Float math goes through `libm` so the same code runs without `std`.

use crate::{
    config::SensorConfig,
    constants::{
        ADC_COUNTS, ADC_GUARD_HIGH_CODE, ADC_GUARD_LOW_CODE, ADC_MAX_CODE, ADC_VREF_VOLTS,
        KELVIN_OFFSET, LDR_DIVIDER_OHMS, LUX_PLAUSIBLE_MAX, LUX_PLAUSIBLE_MIN,
        TEMP_PLAUSIBLE_MAX_C, TEMP_PLAUSIBLE_MIN_C,
    },
    errors::SensorError,
};

/// Reject codes pinned to either ADC rail
///
/// The guards are asymmetric (10 counts low, 5 counts high) to match the
/// converter's observed offset behavior near the top rail.
pub fn rail_guard(raw: u16) -> Result<(), SensorError> {
    if raw <= ADC_GUARD_LOW_CODE || raw > ADC_GUARD_HIGH_CODE {
        return Err(SensorError::NotResponding { raw });
    }
    Ok(())
}

/// Convert a thermistor-divider code to degrees Celsius
///
/// Divider resistance first, then the Beta-parameter thermistor equation
/// `T_K = 1 / (ln(R/R0)/Beta + 1/T0)`.
pub fn thermistor_celsius(raw: u16, config: &SensorConfig) -> Result<f32, SensorError> {
    rail_guard(raw)?;

    let resistance = config.r0_ohms / (f32::from(ADC_MAX_CODE) / f32::from(raw) - 1.0);
    let kelvin =
        1.0 / (libm::logf(resistance / config.r0_ohms) / config.beta + 1.0 / config.t0_kelvin);
    let celsius = kelvin - KELVIN_OFFSET;

    if !(TEMP_PLAUSIBLE_MIN_C..=TEMP_PLAUSIBLE_MAX_C).contains(&celsius) {
        return Err(SensorError::OutOfBounds {
            value: celsius,
            min: TEMP_PLAUSIBLE_MIN_C,
            max: TEMP_PLAUSIBLE_MAX_C,
        });
    }
    Ok(celsius)
}

/// Convert a photoresistor-divider code to lux
///
/// Code to volts, volts to LDR resistance, then the datasheet power law
/// `lux = (RL10 · 1000 · 10^Γ / R)^(1/Γ)`.
pub fn photoresistor_lux(raw: u16, config: &SensorConfig) -> Result<f32, SensorError> {
    rail_guard(raw)?;

    let volts = f32::from(raw) / f32::from(ADC_COUNTS) * ADC_VREF_VOLTS;
    let resistance = LDR_DIVIDER_OHMS * volts / (1.0 - volts / ADC_VREF_VOLTS);
    if resistance <= 0.0 {
        return Err(SensorError::NotResponding { raw });
    }

    let lux = libm::powf(
        config.rl10_kohm * 1000.0 * libm::powf(10.0, config.gamma) / resistance,
        1.0 / config.gamma,
    );

    if !(LUX_PLAUSIBLE_MIN..=LUX_PLAUSIBLE_MAX).contains(&lux) {
        return Err(SensorError::OutOfBounds {
            value: lux,
            min: LUX_PLAUSIBLE_MIN,
            max: LUX_PLAUSIBLE_MAX,
        });
    }
    Ok(lux)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rail_guard_boundaries() {
        // 0 and 10 sit at or below the low guard, 4095 above the high one
        assert!(matches!(
            rail_guard(0),
            Err(SensorError::NotResponding { raw: 0 })
        ));
        assert!(matches!(
            rail_guard(10),
            Err(SensorError::NotResponding { raw: 10 })
        ));
        assert!(rail_guard(11).is_ok());
        assert!(rail_guard(4090).is_ok());
        assert!(matches!(
            rail_guard(4095),
            Err(SensorError::NotResponding { raw: 4095 })
        ));
    }

    #[test]
    fn mid_range_code_is_room_temperature() {
        let config = SensorConfig::default();
        // 2048 puts the divider almost exactly at R0, which is 25 °C
        let celsius = thermistor_celsius(2048, &config).unwrap();
        assert!((celsius - 25.0).abs() < 1.0, "got {celsius}");
    }

    #[test]
    fn near_rail_code_fails_plausibility() {
        let config = SensorConfig::default();
        // 4090 passes the rail guard but converts to well below -50 °C
        let result = thermistor_celsius(4090, &config);
        assert!(matches!(result, Err(SensorError::OutOfBounds { .. })));
    }

    #[test]
    fn temperature_stays_in_band_or_errors() {
        let config = SensorConfig::default();
        for raw in (0..=4095).step_by(7) {
            if let Ok(celsius) = thermistor_celsius(raw, &config) {
                assert!((TEMP_PLAUSIBLE_MIN_C..=TEMP_PLAUSIBLE_MAX_C).contains(&celsius));
            }
        }
    }

    #[test]
    fn mid_range_light_is_indoor_level() {
        let config = SensorConfig::default();
        let lux = photoresistor_lux(2048, &config).unwrap();
        assert!(lux > 10.0 && lux < 1000.0, "got {lux}");
    }

    #[test]
    fn light_stays_in_band_or_errors() {
        let config = SensorConfig::default();
        for raw in (0..=4095).step_by(7) {
            if let Ok(lux) = photoresistor_lux(raw, &config) {
                assert!((LUX_PLAUSIBLE_MIN..=LUX_PLAUSIBLE_MAX).contains(&lux));
            }
        }
    }
}
