//! Collector transport and link-status abstractions
//!
//! [`Transport`] is one HTTP-style POST: bytes out, status code back. The
//! upload service decides what a status means; the transport only reports
//! what happened on the wire. [`NetworkLink`] answers the single question
//! the orchestrator asks before attempting an upload.

use crate::errors::TransportError;

/// Byte-oriented delivery to the collector
pub trait Transport {
    /// POST `body` to `url` and return the response status code
    ///
    /// Returns `Err` only when no status came back at all; a non-success
    /// status is a successful exchange and is returned as `Ok`.
    fn post(&mut self, url: &str, body: &[u8]) -> Result<u16, TransportError>;
}

/// Connectivity status of the uplink
pub trait NetworkLink {
    /// Whether the link is usable right now
    fn is_online(&self) -> bool;
}

/// Link with a fixed, settable status
#[derive(Debug, Clone, Copy)]
pub struct FixedLink {
    online: bool,
}

impl FixedLink {
    /// Create a link in the given state
    pub fn new(online: bool) -> Self {
        Self { online }
    }

    /// Flip the link state
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }
}

impl NetworkLink for FixedLink {
    fn is_online(&self) -> bool {
        self.online
    }
}

/// Maximum number of scripted outcomes
const MAX_OUTCOMES: usize = 16;

/// Transport that replays a scripted sequence of outcomes
///
/// Each `post` consumes the next outcome; after the script runs out every
/// further post succeeds with status 200. The number of posts made is
/// recorded for assertions.
///
/// ```
/// use ecolog_core::errors::TransportError;
/// use ecolog_core::traits::{ScriptedTransport, Transport};
///
/// let mut transport = ScriptedTransport::new(&[
///     Err(TransportError::Unreachable),
///     Ok(500),
///     Ok(200),
/// ]);
/// assert!(transport.post("http://c", b"x").is_err());
/// assert_eq!(transport.post("http://c", b"x"), Ok(500));
/// assert_eq!(transport.post("http://c", b"x"), Ok(200));
/// assert_eq!(transport.posts(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: heapless::Vec<Result<u16, TransportError>, MAX_OUTCOMES>,
    cursor: usize,
    posts: u32,
    last_body_len: usize,
}

impl ScriptedTransport {
    /// Create a transport replaying `script`
    ///
    /// At most sixteen outcomes are honored; the excess is dropped.
    pub fn new(script: &[Result<u16, TransportError>]) -> Self {
        let mut owned = heapless::Vec::new();
        for outcome in script.iter().take(MAX_OUTCOMES) {
            let _ = owned.push(*outcome);
        }
        Self {
            script: owned,
            cursor: 0,
            posts: 0,
            last_body_len: 0,
        }
    }

    /// Transport that always succeeds with status 200
    pub fn always_ok() -> Self {
        Self::new(&[])
    }

    /// Number of posts attempted so far
    pub fn posts(&self) -> u32 {
        self.posts
    }

    /// Byte length of the most recent body
    pub fn last_body_len(&self) -> usize {
        self.last_body_len
    }
}

impl Transport for ScriptedTransport {
    fn post(&mut self, _url: &str, body: &[u8]) -> Result<u16, TransportError> {
        self.posts += 1;
        self.last_body_len = body.len();
        if self.cursor < self.script.len() {
            let outcome = self.script[self.cursor];
            self.cursor += 1;
            outcome
        } else {
            Ok(200)
        }
    }
}
