//! Track a live evdev device.

use std::path::PathBuf;

use touchslot_common::AppConfig;
use touchslot_replay::backends::{discover_touch_devices, EvdevSource};
use touchslot_replay::{OutputFormat, Pipeline, Replayer};

pub fn list() -> anyhow::Result<()> {
    let devices = discover_touch_devices();
    if devices.is_empty() {
        println!("No touch devices found (is the user in the 'input' group?)");
        return Ok(());
    }
    for (path, name) in devices {
        println!("{}  {name}", path.display());
    }
    Ok(())
}

pub fn run(
    config: AppConfig,
    device: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    frames: Option<u64>,
) -> anyhow::Result<()> {
    let path = match device {
        Some(path) => path,
        None => discover_touch_devices()
            .into_iter()
            .next()
            .map(|(path, _)| path)
            .ok_or_else(|| anyhow::anyhow!("No touch device found; pass a device path"))?,
    };

    let source = EvdevSource::open(&path)?;
    let mut device = source.probe_device_config()?;
    device.keep_tracking_ids = config.device.keep_tracking_ids;
    device.st_compat = config.device.st_compat;
    tracing::info!(
        path = %path.display(),
        name = %device.name,
        protocol = super::protocol_name(device.protocol),
        slots = device.max_slots,
        "Watching device"
    );

    let pipeline = Pipeline::from_device_config(&device)
        .map_err(|e| anyhow::anyhow!("Device cannot be normalized: {e}"))?;
    let writer = super::open_output(output, format, &device)?;

    let mut replayer = Replayer::new(Box::new(source), pipeline, writer);
    if let Some(frames) = frames {
        replayer = replayer.with_frame_limit(frames);
    }
    replayer.run()?;
    replayer.into_writer()?;
    Ok(())
}
