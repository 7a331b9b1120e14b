//! Checksummed append-only record log with a pending/sent watermark
//!
//! ## On-disk format
//!
//! One CSV line per record, header first:
//!
//! ```csv
//! timestamp,data_hora,temperatura,luminosidade,temp_valida,lux_valida,checksum
//! 1705339825,2024-01-15 14:30:25,22.50,550.00,1,1,1710395007
//! ```
//!
//! Integer epoch, calendar text, two floats at two decimals, two `1`/`0`
//! validity flags, then an unsigned 32-bit checksum. The header names are
//! the collector's ingestion contract and must not change.
//!
//! ## Watermark
//!
//! Every data line currently in the store is pending upload. `mark_sent`
//! resets the store to header-only in one step; there is no partial-sent
//! state. The caller must not invoke it without a confirmed delivery,
//! since a speculative reset is silent data loss. That rule is the single
//! most safety-critical invariant in this crate.
//!
//! ## Corruption detection
//!
//! The checksum is a wrapping sum of the numeric fields, a cheap detector
//! for bit rot and truncated writes, not authentication. A record whose
//! recomputed checksum disagrees with the stored one is reported as
//! corrupted and is never silently accepted or silently dropped.
//!
//! The persisted line does not carry the acquisition millis that the
//! checksum includes, so `parse` recovers that term by subtraction; see
//! [`LogRecord::parse`].

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::{errors::StorageError, sensors::SensorReading, time::TimeSample};

/// Header line of the record log (collector ingestion contract)
pub const CSV_HEADER: &str =
    "timestamp,data_hora,temperatura,luminosidade,temp_valida,lux_valida,checksum";

/// Durable append-only byte store
///
/// The log needs very little from its backing store: open it, append a
/// line, read everything back, start over. Implementations decide where
/// the bytes live.
pub trait DurableStore {
    /// Open or create the backing store
    fn open(&mut self) -> Result<(), StorageError>;

    /// Whether the store currently holds no bytes
    fn is_empty(&self) -> Result<bool, StorageError>;

    /// Append one line, newline-terminated by the store
    fn append_line(&mut self, line: &str) -> Result<(), StorageError>;

    /// Read the entire store contents
    fn read_all(&self) -> Result<String, StorageError>;

    /// Discard all contents
    fn truncate(&mut self) -> Result<(), StorageError>;
}

/// Memory-backed store for tests and host-side runs
///
/// Optionally capacity-limited to exercise the store-full path, and able
/// to fail a scripted number of appends to exercise the retry path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    content: String,
    capacity: Option<usize>,
    opened: bool,
    fail_appends: u32,
}

impl MemoryStore {
    /// Unlimited memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory store that rejects growth beyond `bytes`
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            capacity: Some(bytes),
            ..Self::default()
        }
    }

    /// Make the next `n` appends fail with an I/O error
    pub fn fail_next_appends(&mut self, n: u32) {
        self.fail_appends = n;
    }

    /// Current contents
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl DurableStore for MemoryStore {
    fn open(&mut self) -> Result<(), StorageError> {
        self.opened = true;
        Ok(())
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        if !self.opened {
            return Err(StorageError::Unavailable("memory store not opened"));
        }
        Ok(self.content.is_empty())
    }

    fn append_line(&mut self, line: &str) -> Result<(), StorageError> {
        if !self.opened {
            return Err(StorageError::Unavailable("memory store not opened"));
        }
        if self.fail_appends > 0 {
            self.fail_appends -= 1;
            return Err(StorageError::Io("scripted append failure"));
        }
        if let Some(capacity) = self.capacity {
            if self.content.len() + line.len() + 1 > capacity {
                return Err(StorageError::StoreFull);
            }
        }
        self.content.push_str(line);
        self.content.push('\n');
        Ok(())
    }

    fn read_all(&self) -> Result<String, StorageError> {
        if !self.opened {
            return Err(StorageError::Unavailable("memory store not opened"));
        }
        Ok(self.content.clone())
    }

    fn truncate(&mut self) -> Result<(), StorageError> {
        if !self.opened {
            return Err(StorageError::Unavailable("memory store not opened"));
        }
        self.content.clear();
        Ok(())
    }
}

/// File-backed store
///
/// Plain append-only text file; every operation opens the file fresh, so
/// nothing is held across the long suspensions between cycles.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DurableStore for FileStore {
    fn open(&mut self) -> Result<(), StorageError> {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                warn!("cannot open {}: {e}", self.path.display());
                StorageError::Unavailable("cannot open backing file")
            })?;
        Ok(())
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .map_err(|e| {
                warn!("cannot stat {}: {e}", self.path.display());
                StorageError::Io("metadata query failed")
            })
    }

    fn append_line(&mut self, line: &str) -> Result<(), StorageError> {
        use std::io::Write as _;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                warn!("cannot open {} for append: {e}", self.path.display());
                StorageError::Io("open for append failed")
            })?;
        writeln!(file, "{line}").map_err(|e| {
            warn!("write to {} failed: {e}", self.path.display());
            StorageError::Io("write failed")
        })
    }

    fn read_all(&self) -> Result<String, StorageError> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            warn!("read of {} failed: {e}", self.path.display());
            StorageError::Io("read failed")
        })
    }

    fn truncate(&mut self) -> Result<(), StorageError> {
        std::fs::write(&self.path, b"").map_err(|e| {
            warn!("truncate of {} failed: {e}", self.path.display());
            StorageError::Io("truncate failed")
        })
    }
}

/// One persisted reading with its integrity checksum
///
/// Built at append time, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Timestamp of the reading
    pub time: TimeSample,
    /// The reading itself
    pub sensors: SensorReading,
    /// Wrapping sum over the numeric fields
    pub checksum: u32,
}

impl LogRecord {
    /// Build a record and compute its checksum
    pub fn new(time: &TimeSample, sensors: &SensorReading) -> Self {
        let mut record = Self {
            time: time.clone(),
            sensors: *sensors,
            checksum: 0,
        };
        record.checksum = record.compute_checksum();
        record
    }

    /// Wrapping checksum over epoch, scaled channel values and millis
    ///
    /// Overflow is accepted; this is a corruption detector, not a
    /// cryptographic digest, and the sum must stay stable across targets.
    pub fn compute_checksum(&self) -> u32 {
        let temp_centi = (self.sensors.temperature_c * 100.0).round() as i64 as u32;
        let lux_centi = (self.sensors.light_lux * 100.0).round() as i64 as u32;
        (self.time.epoch as u32)
            .wrapping_add(temp_centi)
            .wrapping_add(lux_centi)
            .wrapping_add(self.sensors.acquired_at_ms)
    }

    /// Recompute the checksum and compare with the stored one
    pub fn verify(&self) -> bool {
        self.compute_checksum() == self.checksum
    }

    /// Serialize to one CSV line in the on-disk format
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{:.2},{:.2},{},{},{}",
            self.time.epoch,
            self.time.formatted,
            self.sensors.temperature_c,
            self.sensors.light_lux,
            if self.sensors.temperature_valid { "1" } else { "0" },
            if self.sensors.light_valid { "1" } else { "0" },
            self.checksum,
        )
    }

    /// Parse one CSV line back into a record
    ///
    /// The line does not carry the acquisition millis, so that term is
    /// recovered from the checksum by subtraction; serialize → parse is
    /// lossless for well-formed lines. Fields the line does not carry at
    /// all (`monotonic_ms`, `synced`) come back zeroed.
    pub fn parse(line: &str) -> Result<Self, StorageError> {
        let fields: heapless::Vec<&str, 8> = line.split(',').map(str::trim).take(8).collect();
        if fields.len() != 7 {
            return Err(StorageError::Format("expected 7 fields"));
        }

        let epoch = fields[0]
            .parse::<u64>()
            .map_err(|_| StorageError::Format("bad epoch"))?;

        let mut formatted = heapless::String::new();
        formatted
            .push_str(fields[1])
            .map_err(|_| StorageError::Format("timestamp text too long"))?;

        let temperature_c = fields[2]
            .parse::<f32>()
            .map_err(|_| StorageError::Format("bad temperature"))?;
        let light_lux = fields[3]
            .parse::<f32>()
            .map_err(|_| StorageError::Format("bad illuminance"))?;

        let parse_flag = |field: &str| match field {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(StorageError::Format("bad validity flag")),
        };
        let temperature_valid = parse_flag(fields[4])?;
        let light_valid = parse_flag(fields[5])?;

        let checksum = fields[6]
            .parse::<u32>()
            .map_err(|_| StorageError::Format("bad checksum"))?;

        let temp_centi = (temperature_c * 100.0).round() as i64 as u32;
        let lux_centi = (light_lux * 100.0).round() as i64 as u32;
        let acquired_at_ms = checksum
            .wrapping_sub(epoch as u32)
            .wrapping_sub(temp_centi)
            .wrapping_sub(lux_centi);

        Ok(Self {
            time: TimeSample {
                epoch,
                monotonic_ms: 0,
                synced: false,
                formatted,
            },
            sensors: SensorReading {
                temperature_c,
                light_lux,
                temperature_valid,
                light_valid,
                acquired_at_ms,
            },
            checksum,
        })
    }
}

/// The append-only reading log
///
/// Single long-lived mutable resource of the system. Exactly one producer
/// (the cycle's append) and one consumer (the upload drain) take turns on
/// it within one thread of control; ordering is enforced by sequencing,
/// not locks.
pub struct DataLog<S: DurableStore> {
    store: S,
    initialized: bool,
}

impl<S: DurableStore> DataLog<S> {
    /// Create a log over a backing store
    pub fn new(store: S) -> Self {
        Self {
            store,
            initialized: false,
        }
    }

    /// Open the store and make sure the header exists
    ///
    /// The only fatal error in the pipeline: without a store there is no
    /// log. A failed header write is retried on the first append instead.
    pub fn init(&mut self) -> Result<(), StorageError> {
        self.store.open()?;
        match self.store.is_empty() {
            Ok(true) => {
                if let Err(e) = self.store.append_line(CSV_HEADER) {
                    warn!("header write failed ({e}), retrying on first append");
                } else {
                    info!("record log created");
                }
            }
            Ok(false) => debug!("record log already present"),
            Err(e) => warn!("cannot inspect store ({e})"),
        }
        self.initialized = true;
        Ok(())
    }

    /// Append one timestamped reading
    ///
    /// Never rejects valid input; errors only when the underlying store
    /// write fails, and the caller retries on the next cycle.
    pub fn append(
        &mut self,
        time: &TimeSample,
        sensors: &SensorReading,
    ) -> Result<(), StorageError> {
        if !self.initialized {
            return Err(StorageError::Unavailable("log not initialized"));
        }

        let record = LogRecord::new(time, sensors);
        let line = record.to_csv();
        if matches!(self.store.is_empty(), Ok(true)) {
            self.store.append_line(CSV_HEADER)?;
        }
        self.store.append_line(&line)?;
        debug!("record appended: {line}");
        Ok(())
    }

    /// Whether any record is waiting for upload
    pub fn has_pending(&self) -> bool {
        match self.store.read_all() {
            Ok(content) => content.lines().skip(1).any(|line| !line.trim().is_empty()),
            Err(_) => false,
        }
    }

    /// Number of records waiting for upload
    pub fn pending_count(&self) -> usize {
        match self.store.read_all() {
            Ok(content) => content
                .lines()
                .skip(1)
                .filter(|line| !line.trim().is_empty())
                .count(),
            Err(_) => 0,
        }
    }

    /// All pending records joined with `;`, header skipped
    ///
    /// Empty when nothing is pending or the store cannot be read.
    pub fn read_pending(&self) -> String {
        match self.store.read_all() {
            Ok(content) => {
                let lines: Vec<&str> = content
                    .lines()
                    .skip(1)
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect();
                lines.join(";")
            }
            Err(e) => {
                warn!("pending read failed: {e}");
                String::new()
            }
        }
    }

    /// Reset the log to header-only; everything pending becomes sent
    ///
    /// Idempotent. Callers must hold a confirmed delivery before invoking
    /// this; see the module docs.
    pub fn mark_sent(&mut self) -> Result<(), StorageError> {
        if !self.initialized {
            return Err(StorageError::Unavailable("log not initialized"));
        }
        self.store.truncate()?;
        self.store.append_line(CSV_HEADER)?;
        info!("log reset to header, pending records marked sent");
        Ok(())
    }

    /// Integrity check for a record read back from the log
    pub fn verify(&self, record: &LogRecord) -> bool {
        record.verify()
    }

    /// Mutable access to the backing store, for simulated providers
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeSample;

    fn sample_time(epoch: u64) -> TimeSample {
        let mut formatted = heapless::String::new();
        let _ = formatted.push_str("2024-01-15 14:30:25");
        TimeSample {
            epoch,
            monotonic_ms: 42_000,
            synced: true,
            formatted,
        }
    }

    fn sample_sensors(temperature_c: f32, light_lux: f32, acquired_at_ms: u32) -> SensorReading {
        SensorReading {
            temperature_c,
            light_lux,
            temperature_valid: true,
            light_valid: true,
            acquired_at_ms,
        }
    }

    fn opened_log() -> DataLog<MemoryStore> {
        let mut log = DataLog::new(MemoryStore::new());
        log.init().expect("memory store open cannot fail");
        log
    }

    #[test]
    fn serialize_parse_roundtrip_preserves_everything() {
        let time = sample_time(1_705_339_825);
        let sensors = sample_sensors(22.5, 550.0, 123_456);
        let record = LogRecord::new(&time, &sensors);
        assert!(record.verify());

        let line = record.to_csv();
        let parsed = LogRecord::parse(&line).unwrap();

        assert_eq!(parsed.checksum, record.checksum);
        assert!(parsed.verify());
        assert_eq!(parsed.time.epoch, record.time.epoch);
        assert_eq!(parsed.time.formatted, record.time.formatted);
        assert_eq!(parsed.sensors.acquired_at_ms, record.sensors.acquired_at_ms);
        assert!((parsed.sensors.temperature_c - record.sensors.temperature_c).abs() < 0.005);
        assert!((parsed.sensors.light_lux - record.sensors.light_lux).abs() < 0.005);
        assert!(parsed.sensors.temperature_valid);
        assert!(parsed.sensors.light_valid);
    }

    #[test]
    fn roundtrip_survives_negative_temperature_wraparound() {
        let time = sample_time(1_705_339_825);
        let sensors = sample_sensors(-12.34, 0.25, 7_890);
        let record = LogRecord::new(&time, &sensors);
        assert!(record.verify());

        let parsed = LogRecord::parse(&record.to_csv()).unwrap();
        assert_eq!(parsed.checksum, record.checksum);
        assert_eq!(parsed.sensors.acquired_at_ms, 7_890);
        assert!(parsed.verify());
    }

    #[test]
    fn corrupted_fields_fail_verification() {
        let time = sample_time(1_705_339_825);
        let sensors = sample_sensors(22.5, 550.0, 123_456);
        let pristine = LogRecord::new(&time, &sensors);

        let mut corrupted = pristine.clone();
        corrupted.sensors.temperature_c += 1.0;
        assert!(!corrupted.verify());

        let mut corrupted = pristine.clone();
        corrupted.sensors.light_lux -= 3.0;
        assert!(!corrupted.verify());

        let mut corrupted = pristine.clone();
        corrupted.time.epoch += 1;
        assert!(!corrupted.verify());

        let mut corrupted = pristine.clone();
        corrupted.sensors.acquired_at_ms ^= 0x40;
        assert!(!corrupted.verify());

        let mut corrupted = pristine.clone();
        corrupted.checksum ^= 1;
        assert!(!corrupted.verify());
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        assert!(matches!(
            LogRecord::parse("1,2,3"),
            Err(StorageError::Format(_))
        ));
        assert!(matches!(
            LogRecord::parse("x,2024-01-15 14:30:25,22.50,550.00,1,1,99"),
            Err(StorageError::Format(_))
        ));
        assert!(matches!(
            LogRecord::parse("1705339825,2024-01-15 14:30:25,warm,550.00,1,1,99"),
            Err(StorageError::Format(_))
        ));
        assert!(matches!(
            LogRecord::parse("1705339825,2024-01-15 14:30:25,22.50,550.00,yes,1,99"),
            Err(StorageError::Format(_))
        ));
    }

    #[test]
    fn init_writes_header_once() {
        let mut log = opened_log();
        assert!(log.store_mut().content().starts_with(CSV_HEADER));
        assert!(!log.has_pending());

        // Re-init on a populated store must not duplicate the header
        log.init().unwrap();
        assert_eq!(log.store_mut().content().matches(CSV_HEADER).count(), 1);
    }

    #[test]
    fn append_then_mark_sent_then_append_again() {
        let mut log = opened_log();
        let time = sample_time(1_705_339_825);

        for n in 0..3 {
            log.append(&time, &sample_sensors(20.0 + n as f32, 500.0, n))
                .unwrap();
        }
        assert!(log.has_pending());
        assert_eq!(log.pending_count(), 3);

        log.mark_sent().unwrap();
        assert!(!log.has_pending());
        assert_eq!(log.pending_count(), 0);

        log.append(&time, &sample_sensors(21.0, 480.0, 9)).unwrap();
        assert!(log.has_pending());
        assert_eq!(log.pending_count(), 1);
    }

    #[test]
    fn mark_sent_is_idempotent() {
        let mut log = opened_log();
        let time = sample_time(1_705_339_825);
        log.append(&time, &sample_sensors(22.0, 500.0, 1)).unwrap();

        log.mark_sent().unwrap();
        let after_first = log.store_mut().content().to_string();
        log.mark_sent().unwrap();
        assert_eq!(log.store_mut().content(), after_first);
        assert_eq!(after_first, format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn read_pending_joins_records_with_semicolons() {
        let mut log = opened_log();
        let time = sample_time(1_705_339_825);
        log.append(&time, &sample_sensors(22.0, 500.0, 1)).unwrap();
        log.append(&time, &sample_sensors(23.0, 510.0, 2)).unwrap();

        let payload = log.read_pending();
        assert_eq!(payload.matches(';').count(), 1);
        assert!(!payload.contains("timestamp,"));
        assert!(!payload.ends_with('\n'));

        // Every joined chunk parses back into a verifiable record
        for chunk in payload.split(';') {
            let record = LogRecord::parse(chunk).unwrap();
            assert!(record.verify());
        }
    }

    #[test]
    fn read_pending_empty_when_nothing_pending() {
        let log = opened_log();
        assert_eq!(log.read_pending(), "");
    }

    #[test]
    fn append_surfaces_store_failures() {
        let mut log = opened_log();
        let time = sample_time(1_705_339_825);
        log.store_mut().fail_next_appends(1);

        let result = log.append(&time, &sample_sensors(22.0, 500.0, 1));
        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(log.pending_count(), 0);

        // The store recovered, the next cycle's append succeeds
        log.append(&time, &sample_sensors(22.0, 500.0, 2)).unwrap();
        assert_eq!(log.pending_count(), 1);
    }

    #[test]
    fn capacity_exhaustion_is_an_explicit_error() {
        let mut log = DataLog::new(MemoryStore::with_capacity(CSV_HEADER.len() + 1));
        log.init().unwrap();
        let time = sample_time(1_705_339_825);

        let result = log.append(&time, &sample_sensors(22.0, 500.0, 1));
        assert!(matches!(result, Err(StorageError::StoreFull)));
    }

    #[test]
    fn uninitialized_log_refuses_operations() {
        let mut log: DataLog<MemoryStore> = DataLog::new(MemoryStore::new());
        let time = sample_time(1);
        assert!(matches!(
            log.append(&time, &sample_sensors(22.0, 500.0, 1)),
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            log.mark_sent(),
            Err(StorageError::Unavailable(_))
        ));
    }
}
