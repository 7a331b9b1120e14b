//! Property tests for record serialization and integrity
//!
//! Values are generated on the centi-unit grid the on-disk format can
//! represent (two decimal places), so serialize → parse must be exactly
//! lossless for every generated record.

use proptest::prelude::*;

use ecolog_core::sensors::SensorReading;
use ecolog_core::storage::LogRecord;
use ecolog_core::time::TimeSample;

fn record(
    epoch: u64,
    temperature_c: f32,
    light_lux: f32,
    acquired_at_ms: u32,
    temperature_valid: bool,
    light_valid: bool,
) -> LogRecord {
    let mut formatted = heapless::String::new();
    let _ = formatted.push_str("2024-01-15 14:30:25");
    LogRecord::new(
        &TimeSample {
            epoch,
            monotonic_ms: 0,
            synced: true,
            formatted,
        },
        &SensorReading {
            temperature_c,
            light_lux,
            temperature_valid,
            light_valid,
            acquired_at_ms,
        },
    )
}

proptest! {
    #[test]
    fn serialize_parse_is_lossless(
        epoch in 0u64..=4_102_444_800,
        temp_centi in -5_000i32..=10_000,
        lux_centi in 10i64..=10_000_000,
        acquired_at_ms in any::<u32>(),
        temperature_valid in any::<bool>(),
        light_valid in any::<bool>(),
    ) {
        let original = record(
            epoch,
            temp_centi as f32 / 100.0,
            lux_centi as f32 / 100.0,
            acquired_at_ms,
            temperature_valid,
            light_valid,
        );
        prop_assert!(original.verify());

        let parsed = LogRecord::parse(&original.to_csv()).unwrap();
        prop_assert!(parsed.verify());
        prop_assert_eq!(parsed.checksum, original.checksum);
        prop_assert_eq!(parsed.time.epoch, epoch);
        prop_assert_eq!(parsed.sensors.acquired_at_ms, acquired_at_ms);
        prop_assert_eq!(parsed.sensors.temperature_valid, temperature_valid);
        prop_assert_eq!(parsed.sensors.light_valid, light_valid);
        prop_assert!((parsed.sensors.temperature_c - original.sensors.temperature_c).abs() < 0.005);
        prop_assert!((parsed.sensors.light_lux - original.sensors.light_lux).abs() < 0.5);
    }

    #[test]
    fn tampered_numeric_fields_fail_verification(
        epoch in 0u64..=4_102_444_800,
        temp_centi in -5_000i32..=10_000,
        lux_centi in 10i64..=10_000_000,
        acquired_at_ms in any::<u32>(),
        nudge in 1u32..=1_000,
    ) {
        let pristine = record(
            epoch,
            temp_centi as f32 / 100.0,
            lux_centi as f32 / 100.0,
            acquired_at_ms,
            true,
            true,
        );

        let mut tampered = pristine.clone();
        tampered.time.epoch = tampered.time.epoch.wrapping_add(u64::from(nudge));
        prop_assert!(!tampered.verify());

        let mut tampered = pristine.clone();
        tampered.sensors.acquired_at_ms = tampered.sensors.acquired_at_ms.wrapping_add(nudge);
        prop_assert!(!tampered.verify());

        let mut tampered = pristine.clone();
        tampered.checksum = tampered.checksum.wrapping_add(nudge);
        prop_assert!(!tampered.verify());

        // A full degree of temperature shifts the sum by 100 centi-units
        let mut tampered = pristine;
        tampered.sensors.temperature_c += nudge as f32;
        prop_assert!(!tampered.verify());
    }
}
