//! # Telemetry Module
//!
//! Records decoded sensor events as JSON Lines.
//!
//! This module handles:
//! - Timestamping events as they leave the gateway
//! - Formatting as JSONL (one JSON object per line)
//! - Counting records written per sink

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::error::Result;
use crate::gateway::events::DeviceEvent;
use crate::sensor::protocol::{DeviceVariant, SemanticEvent};

/// One logged event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    pub port: u8,
    pub variant: DeviceVariant,
    pub event: SemanticEvent,
}

impl EventRecord {
    /// Stamp an event with the current time
    pub fn now(event: DeviceEvent) -> Self {
        Self::at(Utc::now(), event)
    }

    pub fn at(timestamp: DateTime<Utc>, event: DeviceEvent) -> Self {
        Self {
            timestamp,
            port: event.port,
            variant: event.variant,
            event: event.event,
        }
    }

    /// Serialize as a single JSON line, without the trailing newline
    pub fn to_jsonl(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Writes event records to any byte sink, one per line
#[derive(Debug)]
pub struct JsonlWriter<W: Write> {
    sink: W,
    records_written: u64,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            records_written: 0,
        }
    }

    /// Append one record
    pub fn write_record(&mut self, record: &EventRecord) -> Result<()> {
        let line = record.to_jsonl()?;
        self.sink.write_all(line.as_bytes())?;
        self.sink.write_all(b"\n")?;
        self.records_written += 1;

        trace!("Logged {} event from port {}", record.event.kind(), record.port);
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
