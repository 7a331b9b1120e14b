//! HTTP transport backed by `ureq`
//!
//! One blocking POST per call, `Content-Type: application/json`, no
//! connection reuse worth engineering for a device that sleeps minutes
//! between batches. The agent still pools within a process, which is
//! enough for the retry loop's back-to-back attempts.
//!
//! Status codes pass through to the upload layer untouched; only the
//! absence of a status (DNS failure, refused connection, timeout) maps to
//! a transport error.

use std::time::Duration;

use log::{debug, warn};

use ecolog_core::{Transport, TransportError};

use crate::ConnectorError;

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl HttpConfig {
    /// Default configuration: 30 s timeout, crate user agent
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("ecolog/{}", ecolog_core::VERSION),
            headers: Vec::new(),
        }
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters kept across the transport's lifetime
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Posts that came back with a status code
    pub requests_completed: u64,
    /// Posts that produced no status at all
    pub requests_failed: u64,
    /// Total body bytes posted
    pub bytes_sent: u64,
}

/// HTTP implementation of the core `Transport` capability
pub struct HttpTransport {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpTransport {
    /// Build a transport, validating the configuration
    pub fn new(config: HttpConfig) -> Result<Self, ConnectorError> {
        for (name, value) in &config.headers {
            if name.is_empty() || name.contains([':', '\r', '\n']) || value.contains(['\r', '\n']) {
                return Err(ConnectorError::Config(format!(
                    "invalid header {name:?}"
                )));
            }
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// Counters since construction
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }
}

impl Transport for HttpTransport {
    fn post(&mut self, url: &str, body: &[u8]) -> Result<u16, TransportError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            warn!("refusing to post to non-http url {url:?}");
            return Err(TransportError::Unreachable);
        }

        let mut request = self
            .agent
            .post(url)
            .set("Content-Type", "application/json");
        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        match request.send_bytes(body) {
            Ok(response) => {
                self.stats.requests_completed += 1;
                self.stats.bytes_sent += body.len() as u64;
                debug!("collector answered {}", response.status());
                Ok(response.status())
            }
            // A status came back; the exchange itself worked
            Err(ureq::Error::Status(code, _)) => {
                self.stats.requests_completed += 1;
                self.stats.bytes_sent += body.len() as u64;
                debug!("collector answered {code}");
                Ok(code)
            }
            Err(ureq::Error::Transport(e)) => {
                self.stats.requests_failed += 1;
                warn!("transport failure posting to {url}: {e}");
                Err(TransportError::Unreachable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = HttpConfig::new()
            .timeout_secs(10)
            .user_agent("test-agent")
            .header("X-Device", "logger-01");

        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn invalid_headers_are_rejected() {
        let result = HttpTransport::new(HttpConfig::new().header("X-Bad:", "value"));
        assert!(result.is_err());

        let result = HttpTransport::new(HttpConfig::new().header("X-Ok", "line\nbreak"));
        assert!(result.is_err());

        assert!(HttpTransport::new(HttpConfig::new()).is_ok());
    }

    #[test]
    fn non_http_urls_are_refused() {
        let mut transport = HttpTransport::new(HttpConfig::new()).unwrap();
        let result = transport.post("ftp://collector", b"{}");
        assert_eq!(result, Err(TransportError::Unreachable));
        assert_eq!(transport.stats().requests_failed, 0);
    }
}
