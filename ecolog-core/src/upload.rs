//! Batched delivery of pending records to the collector
//!
//! The uploader reads whatever the log holds, wraps it in the collector's
//! JSON envelope and POSTs it through the [`Transport`] capability. The
//! contract with the log is strict: the pending/sent watermark advances
//! only after the transport confirms delivery with a success status. A
//! failed attempt leaves the log byte-for-byte untouched, so data survives
//! any number of failed cycles and goes out on the next good link.
//!
//! Retries are bounded and spaced by a fixed delay. Exhausting them is not
//! an error condition worth escalating; the records simply stay pending
//! and the cycle goes back to sleep.
//!
//! ## Envelope
//!
//! ```json
//! {"dados": "<record>;<record>;..."}
//! ```
//!
//! One string field holding the `;`-joined CSV records, posted with
//! `Content-Type: application/json`. The field name is the collector's
//! ingestion contract.

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::UploadConfig,
    errors::UploadError,
    storage::{DataLog, DurableStore},
    traits::{Delay, Transport},
};

/// The only status the collector answers on success
const STATUS_OK: u16 = 200;

/// Collector ingestion envelope
#[derive(Serialize)]
struct UploadEnvelope<'a> {
    dados: &'a str,
}

/// Delivers pending batches and owns the retry policy
pub struct Uploader<T: Transport, D: Delay> {
    transport: T,
    delay: D,
    config: UploadConfig,
    enabled: bool,
    batches_sent: u64,
    batches_failed: u64,
}

impl<T: Transport, D: Delay> Uploader<T, D> {
    /// Create an uploader over a transport
    pub fn new(transport: T, delay: D, config: UploadConfig) -> Self {
        Self {
            transport,
            delay,
            config,
            enabled: true,
            batches_sent: 0,
            batches_failed: 0,
        }
    }

    /// Administratively enable or disable uploads
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        info!("upload {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Batches delivered since construction
    pub fn batches_sent(&self) -> u64 {
        self.batches_sent
    }

    /// Delivery attempts that failed since construction
    pub fn batches_failed(&self) -> u64 {
        self.batches_failed
    }

    /// Wrap `payload` in the collector envelope and deliver it
    ///
    /// Success means the transport returned status 200. Network failures
    /// come back as `Err` for the retry layer; nothing here panics on an
    /// unreachable collector.
    pub fn send_batch(&mut self, payload: &str) -> Result<(), UploadError> {
        if !self.enabled {
            return Err(UploadError::Disabled);
        }

        let envelope = UploadEnvelope { dados: payload };
        let body = serde_json::to_string(&envelope).map_err(|_| UploadError::Envelope)?;

        info!(
            "posting {} bytes to {}",
            body.len(),
            self.config.collector_url
        );
        let status = self
            .transport
            .post(self.config.collector_url, body.as_bytes())
            .map_err(|e| {
                self.batches_failed += 1;
                warn!("transport failure: {e}");
                UploadError::Transport(e)
            })?;

        if status == STATUS_OK {
            self.batches_sent += 1;
            debug!("collector accepted the batch");
            Ok(())
        } else {
            self.batches_failed += 1;
            warn!("collector answered status {status}");
            Err(UploadError::Status(status))
        }
    }

    /// Deliver everything pending and advance the watermark on success
    ///
    /// Nothing pending is success. A pending log that produces an empty
    /// payload is a read inconsistency; the log is left untouched rather
    /// than risk marking unread data as sent.
    pub fn drain_pending<S: DurableStore>(
        &mut self,
        log: &mut DataLog<S>,
    ) -> Result<(), UploadError> {
        if !log.has_pending() {
            debug!("nothing pending, skipping upload");
            return Ok(());
        }

        let payload = log.read_pending();
        if payload.is_empty() {
            warn!("log reports pending data but produced no payload");
            return Err(UploadError::ReadInconsistency);
        }

        self.send_batch(&payload)?;

        if let Err(e) = log.mark_sent() {
            // Delivered but not reset: the records go out again next
            // cycle rather than being lost
            warn!("delivered, but watermark advance failed: {e}");
        }
        Ok(())
    }

    /// Drain with bounded retries and fixed spacing
    ///
    /// Re-reads the pending payload fresh on every attempt and stops at
    /// the first success. No delay after the last attempt. Returns whether
    /// the log was drained.
    pub fn send_with_retries<S: DurableStore>(&mut self, log: &mut DataLog<S>) -> bool {
        let attempts = self.config.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.drain_pending(log) {
                Ok(()) => return true,
                Err(e) => {
                    warn!("upload attempt {attempt}/{attempts} failed: {e}");
                    if attempt < attempts {
                        self.delay.delay_ms(self.config.retry_delay_ms);
                    }
                }
            }
        }
        warn!("upload attempts exhausted, records stay pending");
        false
    }

    /// Access to the transport, for simulated providers
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Access to the delay provider, for simulated providers
    pub fn delay(&self) -> &D {
        &self.delay
    }
}
