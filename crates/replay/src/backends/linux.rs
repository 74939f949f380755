//! Live evdev devices.

use std::collections::VecDeque;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use evdev::{AbsoluteAxisType, Device, PropType};
use touchslot_common::{AxisConfig, DeviceConfig, MtProtocol, TouchslotError, TouchslotResult};
use touchslot_event_model::codes::{self, ABS_MT_SLOT};
use touchslot_event_model::InputEvent;
use touchslot_mt::SlotSet;

use crate::EventSource;

/// Reads raw events from a `/dev/input/event*` node.
pub struct EvdevSource {
    device: Device,
    name: String,
    pending: VecDeque<InputEvent>,
    /// Kernel time of the first event; stream timestamps count from it.
    epoch: Option<SystemTime>,
}

impl EvdevSource {
    pub fn open(path: &Path) -> TouchslotResult<Self> {
        let device = Device::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TouchslotError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => {
                TouchslotError::permission_denied(device_diagnostic(path))
            }
            _ => TouchslotError::device(format!("failed to open {}: {e}", path.display())),
        })?;
        let name = device.name().unwrap_or("unknown device").to_string();
        tracing::debug!(path = %path.display(), %name, "evdev device opened");

        Ok(Self {
            device,
            name,
            pending: VecDeque::new(),
            epoch: None,
        })
    }

    /// Describe the device's multi-touch capabilities as engine
    /// configuration.
    pub fn probe_device_config(&self) -> TouchslotResult<DeviceConfig> {
        let axes = self
            .device
            .supported_absolute_axes()
            .filter(|axes| axes.contains(AbsoluteAxisType::ABS_MT_POSITION_X))
            .ok_or_else(|| {
                TouchslotError::unsupported(format!("{} is not a multi-touch device", self.name))
            })?;
        let state = self.device.get_abs_state()?;

        let protocol = if axes.contains(AbsoluteAxisType::ABS_MT_SLOT) {
            MtProtocol::TypeB
        } else {
            MtProtocol::TypeA
        };
        let mut max_slots = DeviceConfig::default().max_slots;
        if protocol == MtProtocol::TypeB {
            let reported = state[usize::from(ABS_MT_SLOT)].maximum + 1;
            max_slots = usize::try_from(reported).unwrap_or(1).max(1);
        }
        if max_slots > SlotSet::MAX_SLOTS {
            tracing::warn!(
                reported = max_slots,
                limit = SlotSet::MAX_SLOTS,
                "device reports more slots than supported, clamping"
            );
            max_slots = SlotSet::MAX_SLOTS;
        }

        let axes = axes
            .iter()
            .filter(|axis| axis.0 != ABS_MT_SLOT && codes::is_mt_code(axis.0))
            .filter_map(|axis| {
                let info = &state[usize::from(axis.0)];
                let name = codes::abs_name(axis.0)?;
                Some(AxisConfig {
                    name: name.to_string(),
                    min: info.minimum,
                    max: info.maximum,
                    resolution: info.resolution,
                })
            })
            .collect();

        Ok(DeviceConfig {
            name: self.name.clone(),
            max_slots,
            protocol,
            // Anonymous contacts only become slots through re-matching.
            track: protocol == MtProtocol::TypeA,
            direct: self.device.properties().contains(PropType::DIRECT),
            axes,
            ..DeviceConfig::default()
        })
    }
}

impl EventSource for EvdevSource {
    fn poll(&mut self) -> TouchslotResult<Option<InputEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        // Blocks until the kernel has a batch.
        let events = self.device.fetch_events()?;
        for raw in events {
            let time = raw.timestamp();
            let epoch = *self.epoch.get_or_insert(time);
            let time_us = time
                .duration_since(epoch)
                .map(|elapsed| u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
                .unwrap_or(0);
            self.pending.push_back(
                InputEvent::new(raw.event_type().0, raw.code(), raw.value()).at(time_us),
            );
        }
        Ok(self.pending.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Multi-touch capable evdev nodes as `(path, name)`, sorted by path.
pub fn discover_touch_devices() -> Vec<(PathBuf, String)> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir("/dev/input") else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_event_node = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("event"));
        if !is_event_node {
            continue;
        }
        let Ok(device) = Device::open(&path) else {
            continue;
        };
        let is_touch = device
            .supported_absolute_axes()
            .is_some_and(|axes| axes.contains(AbsoluteAxisType::ABS_MT_POSITION_X));
        if is_touch {
            let name = device.name().unwrap_or("unknown").to_string();
            found.push((path, name));
        }
    }
    found.sort();
    found
}

fn device_diagnostic(path: &Path) -> String {
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(path) {
        Ok(meta) => {
            let mode = meta.mode() & 0o777;
            format!(
                "device={} mode={mode:o} owner_uid={} owner_gid={} process_uid={uid} process_gid={gid}; likely missing 'input' group membership. Fix: sudo usermod -aG input $USER && log out/in",
                path.display(),
                meta.uid(),
                meta.gid(),
            )
        }
        Err(err) => format!(
            "device={} unavailable ({err}); ensure the node exists and permissions allow read access",
            path.display()
        ),
    }
}
