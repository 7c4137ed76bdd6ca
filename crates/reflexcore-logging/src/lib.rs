#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Structured JSON logging, dual-emitted alongside `tracing` spans.
//!
//! Every orchestration call site in the controller and gateway crates
//! logs through both `tracing` (for live operator consoles) and a
//! [`JsonLogger`] (for the durable, greppable audit trail) via
//! [`dual_log`], rather than picking one. Call sites that want to
//! correlate a log line with a firing attach structured fields with
//! [`LogRecord::with_field`] instead of interpolating them into the
//! message string, so the audit trail stays greppable by field rather
//! than by substring.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Log severity level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational events.
    Info,
    /// Warning indicator.
    Warn,
    /// Error indicator.
    Error,
}

/// Structured log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Emitting crate/module, e.g. `"reflexcore_gateway"`.
    pub module: String,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Structured fields (correlation ids, origins, verdicts, ...)
    /// attached via [`LogRecord::with_field`], searchable independent
    /// of the free-text message.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl LogRecord {
    /// Creates a record with the provided info and no fields attached.
    #[must_use]
    pub fn new(module: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            module: module.into(),
            level,
            message: message.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Attaches one structured field, returning the record for chaining.
    ///
    /// Silently drops the field if `value` doesn't serialize to JSON
    /// (it always does for the `Display`/primitive values call sites
    /// pass), rather than making every call site handle a serialization
    /// error for what is, in practice, an infallible conversion.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), value);
        }
        self
    }
}

/// Thread-safe JSON logger with append-only semantics.
#[derive(Debug)]
pub struct JsonLogger {
    path: PathBuf,
    writer: Mutex<File>,
}

impl JsonLogger {
    /// Creates or opens a logger at the desired path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    /// Writes a log record as a JSON line.
    pub fn log(&self, record: &LogRecord) -> Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Returns the underlying file path (useful for tests).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Emits `record` through both `tracing` and `logger`.
///
/// `tracing`'s dispatcher swallows the event if nothing is subscribed;
/// `logger` always appends a line, so the durable trail survives even
/// when no subscriber is attached. Metadata fields ride along on the
/// `tracing` side as key-value pairs rather than being folded into the
/// formatted message.
pub fn dual_log(logger: &JsonLogger, record: &LogRecord) -> Result<()> {
    match record.level {
        LogLevel::Debug => tracing::debug!(module = %record.module, fields = ?record.metadata, "{}", record.message),
        LogLevel::Info => tracing::info!(module = %record.module, fields = ?record.metadata, "{}", record.message),
        LogLevel::Warn => tracing::warn!(module = %record.module, fields = ?record.metadata, "{}", record.message),
        LogLevel::Error => tracing::error!(module = %record.module, fields = ?record.metadata, "{}", record.message),
    }
    logger.log(record)
}
