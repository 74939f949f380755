//! Raw event sources.
//!
//! Recorded streams come from JSONL files or memory; live streams come from
//! an evdev node on Linux.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use touchslot_common::{TouchslotError, TouchslotResult};
use touchslot_event_model::{parse_header, InputEvent, StreamHeader};

use crate::EventSource;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::{discover_touch_devices, EvdevSource};

#[cfg(not(target_os = "linux"))]
mod non_linux;
#[cfg(not(target_os = "linux"))]
pub use non_linux::{discover_touch_devices, EvdevSource};

/// Reads a recorded JSONL stream line by line.
pub struct JsonlSource<R: BufRead> {
    reader: R,
    name: String,
    header: Option<StreamHeader>,
    /// First line, when it was not a header.
    pending: Option<String>,
    /// Lines consumed so far.
    line_no: usize,
}

impl JsonlSource<BufReader<File>> {
    pub fn open(path: &Path) -> TouchslotResult<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TouchslotError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => TouchslotError::Io(e),
        })?;
        Self::from_reader(BufReader::new(file), path.display().to_string())
    }
}

impl<R: BufRead> JsonlSource<R> {
    pub fn from_reader(mut reader: R, name: impl Into<String>) -> TouchslotResult<Self> {
        let mut first = String::new();
        reader.read_line(&mut first)?;
        let header = parse_header(&first);
        let (pending, line_no) = if first.trim_start().starts_with('#') {
            (None, 1)
        } else {
            (Some(first), 0)
        };

        Ok(Self {
            reader,
            name: name.into(),
            header,
            pending,
            line_no,
        })
    }

    /// Header of the stream, if it had one.
    pub fn header(&self) -> Option<&StreamHeader> {
        self.header.as_ref()
    }
}

impl<R: BufRead> EventSource for JsonlSource<R> {
    fn poll(&mut self) -> TouchslotResult<Option<InputEvent>> {
        loop {
            let line = match self.pending.take() {
                Some(line) => line,
                None => {
                    let mut line = String::new();
                    if self.reader.read_line(&mut line)? == 0 {
                        return Ok(None);
                    }
                    line
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let event = serde_json::from_str(trimmed).map_err(|e| {
                TouchslotError::protocol(format!("{}:{}: {e}", self.name, self.line_no))
            })?;
            return Ok(Some(event));
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Serves a fixed list of events.
pub struct VecSource {
    events: std::vec::IntoIter<InputEvent>,
}

impl VecSource {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl EventSource for VecSource {
    fn poll(&mut self) -> TouchslotResult<Option<InputEvent>> {
        Ok(self.events.next())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use touchslot_event_model::codes::ABS_MT_SLOT;

    fn drain(source: &mut dyn EventSource) -> Vec<InputEvent> {
        let mut events = Vec::new();
        while let Some(event) = source.poll().unwrap() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_jsonl_source_reads_header_and_events() {
        let content = concat!(
            "# {\"schema_version\":\"1.0\",\"device\":\"pad\",\"max_slots\":4}\n",
            "{\"t\":5,\"type\":3,\"code\":47,\"value\":1}\n",
            "\n",
            "{\"t\":6,\"type\":0,\"code\":0,\"value\":0}\n",
        );
        let mut source = JsonlSource::from_reader(Cursor::new(content), "inline").unwrap();
        assert_eq!(source.header().map(|h| h.max_slots), Some(4));

        let events = drain(&mut source);
        assert_eq!(
            events,
            vec![
                InputEvent::abs(ABS_MT_SLOT, 1).at(5),
                InputEvent::syn_report().at(6),
            ]
        );
    }

    #[test]
    fn test_jsonl_source_without_header() {
        let content = "{\"type\":3,\"code\":47,\"value\":2}\n";
        let mut source = JsonlSource::from_reader(Cursor::new(content), "inline").unwrap();
        assert!(source.header().is_none());
        assert_eq!(drain(&mut source), vec![InputEvent::abs(ABS_MT_SLOT, 2)]);
    }

    #[test]
    fn test_jsonl_source_reports_bad_line() {
        let content = "{\"type\":3,\"code\":47,\"value\":2}\nnot json\n";
        let mut source = JsonlSource::from_reader(Cursor::new(content), "inline").unwrap();
        assert!(source.poll().unwrap().is_some());
        let err = source.poll().unwrap_err();
        assert!(err.to_string().contains("inline:2"));
    }

    #[test]
    fn test_missing_file() {
        let err = JsonlSource::open(Path::new("/nonexistent/touchslot.jsonl"))
            .err()
            .unwrap();
        assert!(matches!(err, TouchslotError::FileNotFound { .. }));
    }
}
