//! Engine policy and device capabilities.

use touchslot_common::{DeviceConfig, MtProtocol, TouchslotError, TouchslotResult};
use touchslot_event_model::{codes, MtAxis};

use crate::slot_set::SlotSet;
use crate::state::TRACKING_ID_MAX;

/// Value range of one absolute axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsRange {
    pub min: i32,
    pub max: i32,
    /// Units per millimetre; 0 when unknown.
    pub resolution: i32,
}

impl AbsRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            resolution: 0,
        }
    }

    pub const fn with_resolution(mut self, resolution: i32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// What the hardware can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtCaps {
    max_slots: usize,
    axes: [Option<AbsRange>; MtAxis::COUNT],
    direct: bool,
}

impl MtCaps {
    /// Capabilities with `max_slots` slots and only the tracking id axis.
    pub fn new(max_slots: usize) -> Self {
        let mut axes = [None; MtAxis::COUNT];
        axes[MtAxis::TrackingId.index()] = Some(AbsRange::new(0, TRACKING_ID_MAX));
        Self {
            max_slots,
            axes,
            direct: false,
        }
    }

    pub fn with_axis(mut self, axis: MtAxis, range: AbsRange) -> Self {
        self.axes[axis.index()] = Some(range);
        self
    }

    /// Mark the device as direct-touch (a touchscreen).
    pub fn with_direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn is_direct(&self) -> bool {
        self.direct
    }

    pub fn range(&self, axis: MtAxis) -> Option<AbsRange> {
        self.axes[axis.index()]
    }

    pub fn supports(&self, axis: MtAxis) -> bool {
        self.axes[axis.index()].is_some()
    }

    /// Supported properties in code order; the order they are emitted in.
    pub fn supported_axes(&self) -> impl Iterator<Item = MtAxis> + '_ {
        MtAxis::ALL
            .iter()
            .copied()
            .filter(move |&axis| self.supports(axis))
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> TouchslotResult<()> {
        if self.max_slots == 0 {
            return Err(TouchslotError::config("device must have at least one slot"));
        }
        if self.max_slots > SlotSet::MAX_SLOTS {
            return Err(TouchslotError::config(format!(
                "{} slots requested, at most {} are supported",
                self.max_slots,
                SlotSet::MAX_SLOTS
            )));
        }
        for axis in self.supported_axes() {
            if let Some(range) = self.range(axis) {
                if range.min > range.max {
                    return Err(TouchslotError::config(format!(
                        "{}: minimum {} exceeds maximum {}",
                        axis.name(),
                        range.min,
                        range.max
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Tracking policy applied on top of the hardware capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MtConfig {
    /// Reporting convention of the driver.
    pub protocol: MtProtocol,
    /// Pass driver tracking ids through instead of minting new ones.
    pub keep_tracking_ids: bool,
    /// Re-match anonymous contacts against active slots by distance.
    pub track: bool,
    /// Release slots that were not refreshed during a frame.
    pub autorelease: bool,
    /// Echo the first active contact as single-touch events.
    pub st_compat: bool,
}

impl MtConfig {
    /// Convention of the events the engine emits. Re-matching always
    /// produces slot-addressed output.
    pub fn output_protocol(&self) -> MtProtocol {
        if self.track {
            MtProtocol::TypeB
        } else {
            self.protocol
        }
    }

    /// Whether the engine keeps slot state at all. A type A device that is
    /// not re-matched is passed through untouched.
    pub fn keeps_slot_state(&self) -> bool {
        self.output_protocol() == MtProtocol::TypeB
    }

    /// Check the policy against the capabilities and apply implied options.
    pub fn normalize(mut self, caps: &MtCaps) -> TouchslotResult<Self> {
        if self.track {
            for axis in [MtAxis::PositionX, MtAxis::PositionY] {
                if !caps.supports(axis) {
                    return Err(TouchslotError::config(format!(
                        "contact re-matching needs {}",
                        axis.name()
                    )));
                }
            }
            if !self.autorelease {
                tracing::debug!("contact re-matching enables autorelease");
                self.autorelease = true;
            }
        }
        if !self.keeps_slot_state() && (self.autorelease || self.st_compat) {
            return Err(TouchslotError::config(
                "autorelease and single-touch echo need slot state; \
                 enable tracking for type A devices",
            ));
        }
        Ok(self)
    }
}

/// Derive engine policy and capabilities from a device description.
pub fn from_device_config(device: &DeviceConfig) -> TouchslotResult<(MtConfig, MtCaps)> {
    let mut caps = MtCaps::new(device.max_slots).with_direct(device.direct);
    for axis in &device.axes {
        let code = codes::abs_code(&axis.name).ok_or_else(|| {
            TouchslotError::config(format!("unknown axis name {:?}", axis.name))
        })?;
        if code == codes::ABS_MT_SLOT {
            // Implied by max_slots.
            continue;
        }
        let mt_axis = MtAxis::from_code(code).ok_or_else(|| {
            TouchslotError::config(format!("{} is not a per-contact axis", axis.name))
        })?;
        caps = caps.with_axis(
            mt_axis,
            AbsRange::new(axis.min, axis.max).with_resolution(axis.resolution),
        );
    }
    caps.validate()?;

    let config = MtConfig {
        protocol: device.protocol,
        keep_tracking_ids: device.keep_tracking_ids,
        track: device.track,
        autorelease: device.autorelease,
        st_compat: device.st_compat,
    }
    .normalize(&caps)?;
    Ok((config, caps))
}
