//! Collector transports for the ecolog data logger
//!
//! Implementations of `ecolog_core::Transport` for environments that have
//! an operating system underneath. The core crate never talks to a network
//! stack directly; it hands the upload envelope to one of these.
//!
//! ## Why HTTP only
//!
//! The collector ingests one JSON POST per batch and answers 200. That
//! contract needs nothing beyond a plain HTTP client, and on a logger that
//! wakes every few minutes, posts once and goes back to sleep there is no
//! connection state worth keeping warm. Heavier protocol stacks earn their
//! footprint only with persistent sessions, which this system never has.
//!
//! Embedded targets implement `Transport` against their own network stack
//! instead of using this crate.
//!
//! ## Example
//!
//! ```no_run
//! use ecolog_connectors::http::{HttpConfig, HttpTransport};
//! use ecolog_core::Transport;
//!
//! let mut transport = HttpTransport::new(
//!     HttpConfig::new().timeout_secs(10).header("X-Device", "logger-01"),
//! )?;
//! let _status = transport.post(
//!     "http://collector.example.com/api/readings",
//!     br#"{"dados": "..."}"#,
//! );
//! # Ok::<(), ecolog_connectors::ConnectorError>(())
//! ```

use thiserror::Error;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ConnectionStats, HttpConfig, HttpTransport};

/// Connector construction and configuration errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A configured value cannot be used
    #[error("configuration error: {0}")]
    Config(String),
}

/// Link status for hosts with managed connectivity
///
/// Workstations and gateways keep their own link up; the logger just
/// assumes it. Battery-powered targets report real radio state through
/// their own `NetworkLink` implementation instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ecolog_core::NetworkLink for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolog_core::NetworkLink;

    #[test]
    fn hosts_are_assumed_online() {
        assert!(AlwaysOnline.is_online());
    }
}
