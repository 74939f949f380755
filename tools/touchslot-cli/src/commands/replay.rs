//! Replay a recorded raw stream.

use std::path::PathBuf;

use touchslot_common::{AppConfig, DeviceConfig, MtProtocol};
use touchslot_event_model::StreamHeader;
use touchslot_replay::backends::JsonlSource;
use touchslot_replay::{OutputFormat, Pipeline, Replayer};

pub fn run(
    config: AppConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    frames: Option<u64>,
) -> anyhow::Result<()> {
    let source = JsonlSource::open(&input)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", input.display()))?;

    let device = match source.header() {
        Some(header) => {
            tracing::info!(
                device = %header.device,
                protocol = %header.protocol,
                slots = header.max_slots,
                recorded_at = %header.recorded_at,
                "Stream header"
            );
            apply_header(config.device, header)
        }
        None => config.device,
    };

    let pipeline = Pipeline::from_device_config(&device)
        .map_err(|e| anyhow::anyhow!("Invalid device configuration: {e}"))?;
    let writer = super::open_output(output.clone(), format, &device)?;

    let mut replayer = Replayer::new(Box::new(source), pipeline, writer);
    if let Some(frames) = frames {
        replayer = replayer.with_frame_limit(frames);
    }
    let stats = replayer.run()?;
    replayer.into_writer()?;

    if let Some(path) = output {
        println!("Replayed {}", input.display());
        println!("  Events in:  {}", stats.events_in);
        println!("  Events out: {}", stats.events_out);
        println!("  Frames:     {}", stats.frames);
        if stats.rejected > 0 {
            println!("  Rejected:   {}", stats.rejected);
        }
        println!("  Output:     {}", path.display());
    }
    Ok(())
}

/// The recording knows which device and protocol its driver spoke.
fn apply_header(mut device: DeviceConfig, header: &StreamHeader) -> DeviceConfig {
    match header.protocol.as_str() {
        "type_a" => device.protocol = MtProtocol::TypeA,
        "type_b" => device.protocol = MtProtocol::TypeB,
        "" => {}
        other => tracing::warn!(protocol = other, "Unknown protocol in stream header"),
    }
    if header.max_slots > 0 {
        device.max_slots = header.max_slots;
    }
    if !header.device.is_empty() {
        device.name = header.device.clone();
    }
    // Anonymous contacts only become slots through re-matching.
    if device.protocol == MtProtocol::TypeA && !device.track {
        tracing::info!("Type A stream, enabling contact re-matching");
        device.track = true;
    }
    device
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchslot_event_model::codes::{ABS_MT_SLOT, EV_ABS};
    use touchslot_event_model::parse_events;
    use touchslot_mt::MtEngine;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures/type-a-two-finger.jsonl")
    }

    #[test]
    fn test_type_a_header_enables_tracking() {
        let header = StreamHeader::now("pad", "type_a", 5);
        let device = apply_header(DeviceConfig::default(), &header);
        assert_eq!(device.protocol, MtProtocol::TypeA);
        assert_eq!(device.max_slots, 5);
        assert!(device.track);
        assert!(MtEngine::from_device_config(&device).is_ok());
    }

    #[test]
    fn test_type_b_header_keeps_configured_policy() {
        let header = StreamHeader::now("pad", "type_b", 0);
        let device = apply_header(DeviceConfig::default(), &header);
        assert_eq!(device.protocol, MtProtocol::TypeB);
        assert_eq!(device.max_slots, DeviceConfig::default().max_slots);
        assert!(!device.track);
    }

    #[test]
    fn test_fixture_replays_with_default_config() {
        let output = std::env::temp_dir().join(format!(
            "touchslot-replay-{}.jsonl",
            std::process::id()
        ));
        run(
            AppConfig::default(),
            fixture(),
            Some(output.clone()),
            OutputFormat::Jsonl,
            None,
        )
        .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&output).ok();
        let events = parse_events(&written).unwrap();
        assert!(events.iter().any(|e| e.is(EV_ABS, ABS_MT_SLOT)));
        assert!(written.starts_with("# "));
    }
}
