//! Touchslot Event Model
//!
//! Defines the data contracts shared by the engine and its tooling:
//! - **Codes:** evdev event type/code constants and the MT property vocabulary
//! - **Events:** the `(type, code, value)` record and its JSONL stream format

pub mod codes;
pub mod event;

pub use codes::MtAxis;
pub use event::*;

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[InputEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::*;

    #[test]
    fn test_jsonl_roundtrip() {
        let events = vec![
            InputEvent::abs(ABS_MT_SLOT, 0).at(10),
            InputEvent::abs(ABS_MT_TRACKING_ID, 4).at(10),
            InputEvent::abs(ABS_MT_POSITION_X, 300).at(10),
            InputEvent::syn_report().at(10),
        ];
        let jsonl = serialize_events(&events).unwrap();
        let parsed = parse_events(&jsonl).unwrap();
        assert_eq!(events, parsed);
    }
}
