//! Low-level input event records.
//!
//! Raw driver output and engine output share one record shape: an event
//! type, a code within that type, and a signed value. Streams are stored as
//! append-only JSONL, optionally preceded by a `# {header}` comment line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codes::{self, EV_ABS, EV_KEY, EV_SYN, SYN_MT_REPORT, SYN_REPORT};

/// Microseconds since the start of the stream.
pub type TimestampUs = u64;

/// A single evdev-style event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputEvent {
    /// Timestamp, microseconds since stream start.
    #[serde(rename = "t", default)]
    pub time_us: TimestampUs,

    /// Event type (`EV_SYN`, `EV_KEY`, `EV_ABS`, ...).
    #[serde(rename = "type")]
    pub event_type: u16,

    /// Code within the event type.
    pub code: u16,

    pub value: i32,
}

/// Metadata written at the top of an event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Device the stream was produced for.
    #[serde(default)]
    pub device: String,

    /// Reporting convention of the events that follow (`type_a`/`type_b`).
    #[serde(default)]
    pub protocol: String,

    /// Slot count of the producing device.
    #[serde(default)]
    pub max_slots: usize,

    /// Wall-clock time the stream was written (RFC 3339).
    #[serde(default)]
    pub recorded_at: String,
}

impl InputEvent {
    pub const fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            time_us: 0,
            event_type,
            code,
            value,
        }
    }

    /// An `EV_ABS` event.
    pub const fn abs(code: u16, value: i32) -> Self {
        Self::new(EV_ABS, code, value)
    }

    /// An `EV_KEY` event.
    pub const fn key(code: u16, pressed: bool) -> Self {
        Self::new(EV_KEY, code, pressed as i32)
    }

    /// End of a hardware report.
    pub const fn syn_report() -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0)
    }

    /// End of one anonymous contact (MT protocol type A).
    pub const fn syn_mt_report() -> Self {
        Self::new(EV_SYN, SYN_MT_REPORT, 0)
    }

    pub fn at(mut self, time_us: TimestampUs) -> Self {
        self.time_us = time_us;
        self
    }

    pub fn is(&self, event_type: u16, code: u16) -> bool {
        self.event_type == event_type && self.code == code
    }

    /// Timestamp as fractional seconds.
    pub fn timestamp_secs(&self) -> f64 {
        self.time_us as f64 / 1_000_000.0
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match codes::type_name(self.event_type) {
            Some(name) => write!(f, "{name}")?,
            None => write!(f, "EV_{:#04x}", self.event_type)?,
        }
        match codes::code_name(self.event_type, self.code) {
            Some(name) => write!(f, " {name}")?,
            None => write!(f, " {:#06x}", self.code)?,
        }
        write!(f, " {}", self.value)
    }
}

impl StreamHeader {
    /// A header stamped with the current wall-clock time.
    pub fn now(device: impl Into<String>, protocol: impl Into<String>, max_slots: usize) -> Self {
        Self {
            schema_version: "1.0".to_string(),
            device: device.into(),
            protocol: protocol.into(),
            max_slots,
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<InputEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Extract the `# {header}` line of a JSONL stream, if present.
pub fn parse_header(jsonl: &str) -> Option<StreamHeader> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let body = first.strip_prefix('#')?;
    serde_json::from_str(body.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::*;

    #[test]
    fn test_json_format_uses_short_keys() {
        let event = InputEvent::abs(ABS_MT_POSITION_X, 120).at(1500);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"t":1500,"type":3,"code":53,"value":120}"#);
    }

    #[test]
    fn test_timestamp_defaults_to_zero() {
        let parsed: InputEvent = serde_json::from_str(r#"{"type":0,"code":2,"value":0}"#).unwrap();
        assert_eq!(parsed, InputEvent::syn_mt_report());
    }

    #[test]
    fn test_display_uses_symbolic_names() {
        assert_eq!(
            InputEvent::abs(ABS_MT_TRACKING_ID, -1).to_string(),
            "EV_ABS ABS_MT_TRACKING_ID -1"
        );
        assert_eq!(InputEvent::key(BTN_TOUCH, true).to_string(), "EV_KEY BTN_TOUCH 1");
        assert_eq!(InputEvent::new(0x05, 0x01, 3).to_string(), "EV_0x05 0x0001 3");
    }

    #[test]
    fn test_parse_events_skips_header_comment() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"device\":\"pad\"}\n\
                     {\"t\":0,\"type\":3,\"code\":47,\"value\":1}\n\
                     \n\
                     {\"t\":0,\"type\":0,\"code\":0,\"value\":0}\n";
        let parsed = parse_events(jsonl).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].is(EV_ABS, ABS_MT_SLOT));
        assert!(parsed[1].is(EV_SYN, SYN_REPORT));

        let header = parse_header(jsonl).unwrap();
        assert_eq!(header.device, "pad");
        assert_eq!(header.max_slots, 0);
    }

    #[test]
    fn test_parse_header_absent() {
        assert!(parse_header("{\"type\":0,\"code\":0,\"value\":0}\n").is_none());
    }
}
