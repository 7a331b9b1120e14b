//! Capability-provider traits for the logger's external collaborators
//!
//! The pipeline never touches hardware or the OS directly. Every external
//! dependency of the cycle is a small trait injected at composition time:
//!
//! - [`AnalogSource`] — raw ADC sampling
//! - [`MonotonicClock`], [`WallClock`], [`Delay`] — time and blocking waits
//! - [`Transport`], [`NetworkLink`] — collector delivery and link status
//! - [`PowerControl`] — the low-power suspend primitive
//!
//! Each trait ships with a simulated implementation next to it, so the same
//! component code runs against scripted inputs in tests, against the host
//! OS on a workbench, or against board support code in the field. Component
//! logic itself carries no environment conditionals.
//!
//! The durable store capability lives with the storage module; see
//! `storage::DurableStore`.

pub mod analog;
pub mod power;
pub mod time;
pub mod transport;

pub use analog::{AnalogSource, ScriptedAnalog};
pub use power::{PowerControl, ScriptedPower};
pub use time::{CountingDelay, Delay, FixedClock, FixedWallClock, MonotonicClock, NoopDelay, SteppingClock, WallClock};
pub use transport::{FixedLink, NetworkLink, ScriptedTransport, Transport};

#[cfg(feature = "std")]
pub use power::SystemPower;
#[cfg(feature = "std")]
pub use time::{SystemClock, SystemDelay, SystemWallClock};
