//! Event stream writer: JSONL for files, symbolic text for terminals.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use touchslot_common::TouchslotResult;
use touchslot_event_model::codes::{EV_SYN, SYN_REPORT};
use touchslot_event_model::{InputEvent, StreamHeader};

/// Line format of a written stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON object per line, readable by `parse_events`.
    Jsonl,
    /// `seconds EV_ABS ABS_MT_POSITION_X 120`, frames separated by a rule.
    Text,
}

/// Writes events one per line.
pub struct EventWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    events_written: u64,
}

impl EventWriter<BufWriter<File>> {
    /// Create (or truncate) a JSONL file, writing the header as the first line.
    pub fn create(path: &Path, header: &StreamHeader) -> TouchslotResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = Self::new(BufWriter::new(file), OutputFormat::Jsonl);
        writer.write_header(header)?;
        Ok(writer)
    }
}

impl<W: Write> EventWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            events_written: 0,
        }
    }

    /// Write the stream header as a `#` comment line.
    pub fn write_header(&mut self, header: &StreamHeader) -> TouchslotResult<()> {
        let json = serde_json::to_string(header)?;
        writeln!(self.writer, "# {json}")?;
        Ok(())
    }

    pub fn write_event(&mut self, event: &InputEvent) -> TouchslotResult<()> {
        match self.format {
            OutputFormat::Jsonl => {
                let json = serde_json::to_string(event)?;
                writeln!(self.writer, "{json}")?;
            }
            OutputFormat::Text => {
                writeln!(self.writer, "{:>12.6} {event}", event.timestamp_secs())?;
                if event.is(EV_SYN, SYN_REPORT) {
                    writeln!(self.writer, "{}", "-".repeat(40))?;
                }
            }
        }
        self.events_written += 1;

        if self.events_written % 1000 == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> TouchslotResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> TouchslotResult<W> {
        self.flush()?;
        Ok(self.writer)
    }
}
