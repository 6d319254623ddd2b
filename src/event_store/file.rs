//! JSONL-backed event store
//!
//! Every recorded event is one line of `events.jsonl`. The file is replayed
//! into memory when the store opens.
//!
//! ```text
//! append_event ──► writer mutex: assign sequence ──► write_all(line) ──► fsync
//!                        │ on error: truncate back, sequence not consumed
//!                        └──► log write lock: publish ──► visible to queries
//! ```
//!
//! Queries only take the log's read lock, so a slow fsync never holds them up.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::log::EventLog;
use super::stats::EventLogStats;
use super::{validate_event, EventStore};
use crate::catalog::TourCatalog;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::{InteractionEvent, RecordedEvent, TimeRange};

/// Configuration for the file-backed store
#[derive(Debug, Clone)]
pub struct FileEventStoreConfig {
    /// Path to the data directory
    pub data_dir: PathBuf,
    /// fsync after every append
    pub sync_on_append: bool,
}

impl Default for FileEventStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            sync_on_append: true,
        }
    }
}

impl FileEventStoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Get path to events.jsonl
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }
}

/// File operations the appender needs
trait LogFile: Write {
    fn current_len(&mut self) -> io::Result<u64>;
    fn sync(&mut self) -> io::Result<()>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl LogFile for File {
    fn current_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Appending end of the log: the open file and the next sequence to assign
struct LogWriter<F = File> {
    file: F,
    next_sequence: u64,
}

impl<F: LogFile> LogWriter<F> {
    fn new(file: F, next_sequence: u64) -> Self {
        Self {
            file,
            next_sequence,
        }
    }

    /// Write one event as a single line
    ///
    /// Either the whole line is on disk and the sequence is consumed, or the
    /// file is cut back to its previous length and the sequence is reused.
    fn append(&mut self, event: InteractionEvent, sync: bool) -> AnalyticsResult<RecordedEvent> {
        let recorded = RecordedEvent {
            sequence: self.next_sequence,
            event,
        };
        let mut line = recorded.to_json_line()?;
        line.push('\n');

        let len_before = self.file.current_len()?;
        let written = self.file.write_all(line.as_bytes()).and_then(|()| {
            if sync {
                self.file.sync()
            } else {
                Ok(())
            }
        });

        if let Err(e) = written {
            if let Err(rollback) = self.file.truncate(len_before) {
                tracing::error!(
                    sequence = recorded.sequence,
                    error = %rollback,
                    "Failed to roll back partial event log append"
                );
            }
            return Err(e.into());
        }

        self.next_sequence += 1;
        Ok(recorded)
    }
}

/// Durable event store
pub struct FileEventStore {
    config: FileEventStoreConfig,
    catalog: Arc<TourCatalog>,
    log: RwLock<EventLog>,
    writer: Mutex<LogWriter>,
}

impl FileEventStore {
    /// Open the log, replaying every recorded event
    ///
    /// A line that does not parse is reported as a storage error rather than
    /// skipped: rates computed over a silently truncated log would be wrong.
    pub fn open(config: FileEventStoreConfig, catalog: Arc<TourCatalog>) -> AnalyticsResult<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let events_path = config.events_path();

        let recorded = Self::load_events(&events_path)?;
        tracing::info!(
            path = %events_path.display(),
            events = recorded.len(),
            "Event log replayed"
        );

        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&events_path)?;

        let log = EventLog::from_recorded(recorded);
        let writer = LogWriter::new(writer, log.next_sequence());

        Ok(Self {
            config,
            catalog,
            log: RwLock::new(log),
            writer: Mutex::new(writer),
        })
    }

    fn load_events(path: &Path) -> AnalyticsResult<Vec<RecordedEvent>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(path)?);
        let mut events = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            let recorded = RecordedEvent::from_json_line(&line).map_err(|e| {
                AnalyticsError::Storage(format!(
                    "Corrupt event log {} at line {}: {}",
                    path.display(),
                    line_num + 1,
                    e
                ))
            })?;
            events.push(recorded);
        }

        Ok(events)
    }

    pub fn config(&self) -> &FileEventStoreConfig {
        &self.config
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn append_event(&self, event: InteractionEvent) -> AnalyticsResult<RecordedEvent> {
        validate_event(&self.catalog, &event)?;

        // Publishing while still holding the writer keeps the log in sequence order
        let mut writer = self.writer.lock();
        let recorded = writer.append(event, self.config.sync_on_append)?;
        self.log.write().push(recorded.clone());
        Ok(recorded)
    }

    async fn query_events(
        &self,
        tour_id: &str,
        range: TimeRange,
    ) -> AnalyticsResult<Vec<InteractionEvent>> {
        Ok(self.log.read().select(tour_id, range))
    }

    async fn stats(&self) -> AnalyticsResult<EventLogStats> {
        let size = fs::metadata(self.config.events_path())
            .map(|m| m.len())
            .unwrap_or(0);
        Ok(EventLogStats::collect(self.log.read().recorded(), size))
    }
}
