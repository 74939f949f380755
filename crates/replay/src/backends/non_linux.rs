//! Live devices are only readable through evdev on Linux.

use std::path::{Path, PathBuf};

use touchslot_common::{DeviceConfig, TouchslotError, TouchslotResult};
use touchslot_event_model::InputEvent;

use crate::EventSource;

pub struct EvdevSource {
    name: String,
}

impl EvdevSource {
    pub fn open(path: &Path) -> TouchslotResult<Self> {
        Err(TouchslotError::unsupported(format!(
            "cannot open {}: live evdev devices need Linux",
            path.display()
        )))
    }

    pub fn probe_device_config(&self) -> TouchslotResult<DeviceConfig> {
        Err(TouchslotError::unsupported(format!(
            "cannot probe {}: live evdev devices need Linux",
            self.name
        )))
    }
}

impl EventSource for EvdevSource {
    fn poll(&mut self) -> TouchslotResult<Option<InputEvent>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub fn discover_touch_devices() -> Vec<(PathBuf, String)> {
    tracing::warn!("Touch device discovery is only implemented for Linux");
    Vec::new()
}
