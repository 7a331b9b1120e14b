//! Low-power suspend abstraction
//!
//! One call that parks the system and comes back with the wake cause. On
//! real hardware this is a deep-sleep primitive armed with a timer and an
//! external wake line; on a host it degrades to a plain sleep.

use crate::power::WakeReason;

/// Suspend-and-wake primitive
pub trait PowerControl {
    /// Block in the low-power state until the timer expires or an external
    /// signal arrives, and report which one it was
    fn suspend(&mut self, duration_ms: u64) -> WakeReason;
}

/// Maximum number of scripted wakes
const MAX_WAKES: usize = 16;

/// Power control that replays scripted wake causes without sleeping
///
/// After the script runs out, every suspend wakes by timer.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPower {
    script: heapless::Vec<WakeReason, MAX_WAKES>,
    cursor: usize,
    suspends: u32,
}

impl ScriptedPower {
    /// Create a power control replaying `script`
    ///
    /// At most sixteen wakes are honored; the excess is dropped.
    pub fn new(script: &[WakeReason]) -> Self {
        let mut owned = heapless::Vec::new();
        for reason in script.iter().take(MAX_WAKES) {
            let _ = owned.push(*reason);
        }
        Self {
            script: owned,
            cursor: 0,
            suspends: 0,
        }
    }

    /// Power control that always wakes by timer
    pub fn timer_only() -> Self {
        Self::new(&[])
    }

    /// Number of suspensions so far
    pub fn suspends(&self) -> u32 {
        self.suspends
    }
}

impl PowerControl for ScriptedPower {
    fn suspend(&mut self, _duration_ms: u64) -> WakeReason {
        self.suspends += 1;
        if self.cursor < self.script.len() {
            let reason = self.script[self.cursor];
            self.cursor += 1;
            reason
        } else {
            WakeReason::Timer
        }
    }
}

/// Power control backed by the OS scheduler
///
/// Sleeps the full interval and always reports a timer wake; hosts have no
/// external wake line.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPower;

#[cfg(feature = "std")]
impl PowerControl for SystemPower {
    fn suspend(&mut self, duration_ms: u64) -> WakeReason {
        std::thread::sleep(std::time::Duration::from_millis(duration_ms));
        WakeReason::Timer
    }
}
