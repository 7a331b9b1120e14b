//! Analog sampling abstraction
//!
//! Wraps whatever ADC the platform offers behind one call. The sensor
//! manager interprets rail-pinned codes as "sensor absent", so simulated
//! sources script exact codes to exercise both the conversion math and the
//! fallback latch.

/// Source of raw ADC codes
///
/// `read_raw` blocks for the conversion and returns the 12-bit code for the
/// given pin. Reading an unwired pin returns a rail value, exactly as the
/// hardware would.
pub trait AnalogSource {
    /// Sample one pin and return its raw code
    fn read_raw(&mut self, pin: u8) -> u16;
}

/// Maximum number of scripted pins
const MAX_PINS: usize = 8;

/// Maximum scripted codes per pin
const MAX_CODES: usize = 32;

/// Scripted analog source for tests and host-side runs
///
/// Each pin carries a sequence of codes handed out one per read; after the
/// sequence is exhausted the last code repeats, which models a sensor that
/// settled at a value. Unknown pins read as grounded. The codes are copied
/// in, so the source has no lifetime ties.
///
/// ```
/// use ecolog_core::traits::{AnalogSource, ScriptedAnalog};
///
/// let mut adc = ScriptedAnalog::new(&[(35, &[2048, 2060])]);
/// assert_eq!(adc.read_raw(35), 2048);
/// assert_eq!(adc.read_raw(35), 2060);
/// assert_eq!(adc.read_raw(35), 2060); // last code repeats
/// assert_eq!(adc.read_raw(7), 0);     // unwired pin
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnalog {
    pins: heapless::Vec<(u8, heapless::Vec<u16, MAX_CODES>), MAX_PINS>,
    cursors: [usize; MAX_PINS],
}

impl ScriptedAnalog {
    /// Create a scripted source from `(pin, codes)` pairs
    ///
    /// At most eight pins and thirty-two codes per pin are honored; the
    /// excess is dropped.
    pub fn new(pins: &[(u8, &[u16])]) -> Self {
        let mut owned: heapless::Vec<(u8, heapless::Vec<u16, MAX_CODES>), MAX_PINS> =
            heapless::Vec::new();
        for (pin, codes) in pins.iter().take(MAX_PINS) {
            let mut sequence = heapless::Vec::new();
            for &code in codes.iter().take(MAX_CODES) {
                let _ = sequence.push(code);
            }
            let _ = owned.push((*pin, sequence));
        }
        Self {
            pins: owned,
            cursors: [0; MAX_PINS],
        }
    }
}

impl AnalogSource for ScriptedAnalog {
    fn read_raw(&mut self, pin: u8) -> u16 {
        for (slot, (scripted_pin, codes)) in self.pins.iter().enumerate() {
            if *scripted_pin != pin {
                continue;
            }
            if codes.is_empty() {
                return 0;
            }
            let cursor = self.cursors[slot];
            let code = codes[cursor.min(codes.len() - 1)];
            if cursor < codes.len() {
                self.cursors[slot] = cursor + 1;
            }
            return code;
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_sequence_then_repeat() {
        let mut adc = ScriptedAnalog::new(&[(35, &[100, 200]), (34, &[300])]);
        assert_eq!(adc.read_raw(35), 100);
        assert_eq!(adc.read_raw(34), 300);
        assert_eq!(adc.read_raw(35), 200);
        assert_eq!(adc.read_raw(35), 200);
        assert_eq!(adc.read_raw(34), 300);
    }

    #[test]
    fn unknown_pin_reads_grounded() {
        let mut adc = ScriptedAnalog::new(&[(35, &[100])]);
        assert_eq!(adc.read_raw(2), 0);
    }
}
