//! Single-touch compatibility echo.
//!
//! Older consumers only understand one contact. After every frame the
//! lowest active slot is projected onto the legacy `ABS_X`/`ABS_Y`/
//! `ABS_PRESSURE`/`ABS_TOOL_WIDTH` axes, together with `BTN_TOUCH` and the
//! finger-count keys.

use touchslot_event_model::codes::{
    ABS_PRESSURE, ABS_TOOL_WIDTH, ABS_X, ABS_Y, BTN_TOUCH, EV_ABS, EV_KEY, FINGER_COUNT_KEYS,
};
use touchslot_event_model::{InputEvent, MtAxis};

use crate::config::{AbsRange, MtCaps};
use crate::sink::EventSink;
use crate::store::SlotStore;

/// How one MT property maps onto a legacy axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatMapping {
    pub mt: MtAxis,
    pub st: u16,
    /// Fixed legacy range `0..=target_max`; `None` passes values through.
    pub target_max: Option<i32>,
}

pub const COMPAT_MAP: [CompatMapping; 4] = [
    CompatMapping {
        mt: MtAxis::PositionX,
        st: ABS_X,
        target_max: None,
    },
    CompatMapping {
        mt: MtAxis::PositionY,
        st: ABS_Y,
        target_max: None,
    },
    CompatMapping {
        mt: MtAxis::Pressure,
        st: ABS_PRESSURE,
        target_max: Some(255),
    },
    CompatMapping {
        mt: MtAxis::TouchMajor,
        st: ABS_TOOL_WIDTH,
        target_max: Some(15),
    },
];

/// Rescale `value` from `range` onto `0..=target_max`, rounding to nearest.
pub fn rescale(value: i32, range: AbsRange, target_max: i32) -> i32 {
    let span = i64::from(range.max) - i64::from(range.min);
    if span <= 0 {
        return 0;
    }
    let offset = i64::from(value) - i64::from(range.min);
    let scaled = (offset * i64::from(target_max) + span / 2).div_euclid(span);
    scaled.clamp(0, i64::from(target_max)) as i32
}

/// Legacy axes and ranges a device should advertise when the echo is on.
pub fn compat_axes(caps: &MtCaps) -> Vec<(u16, AbsRange)> {
    COMPAT_MAP
        .iter()
        .filter_map(|mapping| {
            let range = caps.range(mapping.mt)?;
            let range = match mapping.target_max {
                Some(max) => AbsRange::new(0, max),
                None => range,
            };
            Some((mapping.st, range))
        })
        .collect()
}

/// Whether `event` is one the echo regenerates. A device's own legacy
/// events are dropped while the echo is on.
pub fn is_compat_event(event: &InputEvent) -> bool {
    match event.event_type {
        EV_ABS => COMPAT_MAP.iter().any(|mapping| mapping.st == event.code),
        EV_KEY => event.code == BTN_TOUCH || FINGER_COUNT_KEYS.contains(&event.code),
        _ => false,
    }
}

/// Emit the legacy view of the current slot state.
pub fn send_st_compat(store: &SlotStore, caps: &MtCaps, sink: &mut dyn EventSink) {
    let touches = store.touches();
    let count = touches.len();

    sink.emit(InputEvent::key(BTN_TOUCH, count > 0));

    if let Some(slot) = touches.first() {
        let state = store.state(slot);
        for mapping in &COMPAT_MAP {
            let Some(range) = caps.range(mapping.mt) else {
                continue;
            };
            let value = state[mapping.mt];
            let value = match mapping.target_max {
                Some(max) => rescale(value, range, max),
                None => value,
            };
            sink.emit(InputEvent::abs(mapping.st, value));
        }
    }

    // Touchscreens do not report tool taps.
    if !caps.is_direct() {
        for (index, &key) in FINGER_COUNT_KEYS.iter().enumerate() {
            sink.emit(InputEvent::key(key, count == index + 1));
        }
    }

    if count == 0 && caps.supports(MtAxis::Pressure) {
        sink.emit(InputEvent::abs(ABS_PRESSURE, 0));
    }
}
