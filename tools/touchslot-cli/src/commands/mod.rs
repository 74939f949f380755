pub mod check;
pub mod replay;
pub mod solve;
pub mod watch;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use touchslot_common::{AppConfig, DeviceConfig, MtProtocol};
use touchslot_event_model::StreamHeader;
use touchslot_replay::{EventWriter, OutputFormat};

/// Load the explicit config file, or the standard one if present.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

pub fn protocol_name(protocol: MtProtocol) -> &'static str {
    match protocol {
        MtProtocol::TypeA => "type_a",
        MtProtocol::TypeB => "type_b",
    }
}

/// Open the output stream. JSONL files start with a header line describing
/// the canonical output.
pub fn open_output(
    path: Option<PathBuf>,
    format: OutputFormat,
    device: &DeviceConfig,
) -> anyhow::Result<EventWriter<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match &path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(std::io::stdout().lock()),
    };

    let mut writer = EventWriter::new(writer, format);
    if path.is_some() && format == OutputFormat::Jsonl {
        // Tracking always produces slotted output.
        let protocol = if device.track {
            MtProtocol::TypeB
        } else {
            device.protocol
        };
        writer.write_header(&StreamHeader::now(
            device.name.clone(),
            protocol_name(protocol),
            device.max_slots,
        ))?;
    }
    Ok(writer)
}
