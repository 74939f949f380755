//! Event type and code constants.
//!
//! Values follow the Linux/FreeBSD evdev ABI (`input-event-codes.h`).

use serde::{Deserialize, Serialize};

// Event types
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;

// Synchronization codes
pub const SYN_REPORT: u16 = 0x00;
pub const SYN_CONFIG: u16 = 0x01;
pub const SYN_MT_REPORT: u16 = 0x02;
pub const SYN_DROPPED: u16 = 0x03;

// Single-touch absolute axes
pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_PRESSURE: u16 = 0x18;
pub const ABS_TOOL_WIDTH: u16 = 0x1c;

// Multi-touch absolute axes
pub const ABS_MT_SLOT: u16 = 0x2f;
pub const ABS_MT_TOUCH_MAJOR: u16 = 0x30;
pub const ABS_MT_TOUCH_MINOR: u16 = 0x31;
pub const ABS_MT_WIDTH_MAJOR: u16 = 0x32;
pub const ABS_MT_WIDTH_MINOR: u16 = 0x33;
pub const ABS_MT_ORIENTATION: u16 = 0x34;
pub const ABS_MT_POSITION_X: u16 = 0x35;
pub const ABS_MT_POSITION_Y: u16 = 0x36;
pub const ABS_MT_TOOL_TYPE: u16 = 0x37;
pub const ABS_MT_BLOB_ID: u16 = 0x38;
pub const ABS_MT_TRACKING_ID: u16 = 0x39;
pub const ABS_MT_PRESSURE: u16 = 0x3a;
pub const ABS_MT_DISTANCE: u16 = 0x3b;
pub const ABS_MT_TOOL_X: u16 = 0x3c;
pub const ABS_MT_TOOL_Y: u16 = 0x3d;

// Keys
pub const BTN_TOOL_FINGER: u16 = 0x145;
pub const BTN_TOOL_QUINTTAP: u16 = 0x148;
pub const BTN_TOUCH: u16 = 0x14a;
pub const BTN_TOOL_DOUBLETAP: u16 = 0x14d;
pub const BTN_TOOL_TRIPLETAP: u16 = 0x14e;
pub const BTN_TOOL_QUADTAP: u16 = 0x14f;

/// Finger-count keys, indexed by `contacts - 1`.
pub const FINGER_COUNT_KEYS: [u16; 5] = [
    BTN_TOOL_FINGER,
    BTN_TOOL_DOUBLETAP,
    BTN_TOOL_TRIPLETAP,
    BTN_TOOL_QUADTAP,
    BTN_TOOL_QUINTTAP,
];

/// Per-contact multi-touch property.
///
/// `ABS_MT_SLOT` is deliberately absent: it addresses a slot rather than
/// describing a contact. Variants are declared in code order, which is also
/// the order properties are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MtAxis {
    TouchMajor,
    TouchMinor,
    WidthMajor,
    WidthMinor,
    Orientation,
    PositionX,
    PositionY,
    ToolType,
    BlobId,
    TrackingId,
    Pressure,
    Distance,
    ToolX,
    ToolY,
}

impl MtAxis {
    /// Number of per-contact properties.
    pub const COUNT: usize = 14;

    /// All properties in code order.
    pub const ALL: [MtAxis; Self::COUNT] = [
        MtAxis::TouchMajor,
        MtAxis::TouchMinor,
        MtAxis::WidthMajor,
        MtAxis::WidthMinor,
        MtAxis::Orientation,
        MtAxis::PositionX,
        MtAxis::PositionY,
        MtAxis::ToolType,
        MtAxis::BlobId,
        MtAxis::TrackingId,
        MtAxis::Pressure,
        MtAxis::Distance,
        MtAxis::ToolX,
        MtAxis::ToolY,
    ];

    /// The `ABS_MT_*` code of this property.
    pub const fn code(self) -> u16 {
        ABS_MT_TOUCH_MAJOR + self as u16
    }

    /// Dense index in `0..COUNT`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Map an `ABS_MT_*` code back to a property. `ABS_MT_SLOT` and
    /// non-MT codes yield `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        let index = code.checked_sub(ABS_MT_TOUCH_MAJOR)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        abs_name(self.code()).unwrap_or("ABS_MT_?")
    }
}

/// Whether an absolute code belongs to the multi-touch range (slot included).
pub fn is_mt_code(code: u16) -> bool {
    (ABS_MT_SLOT..=ABS_MT_TOOL_Y).contains(&code)
}

const ABS_NAMES: &[(u16, &str)] = &[
    (ABS_X, "ABS_X"),
    (ABS_Y, "ABS_Y"),
    (ABS_PRESSURE, "ABS_PRESSURE"),
    (ABS_TOOL_WIDTH, "ABS_TOOL_WIDTH"),
    (ABS_MT_SLOT, "ABS_MT_SLOT"),
    (ABS_MT_TOUCH_MAJOR, "ABS_MT_TOUCH_MAJOR"),
    (ABS_MT_TOUCH_MINOR, "ABS_MT_TOUCH_MINOR"),
    (ABS_MT_WIDTH_MAJOR, "ABS_MT_WIDTH_MAJOR"),
    (ABS_MT_WIDTH_MINOR, "ABS_MT_WIDTH_MINOR"),
    (ABS_MT_ORIENTATION, "ABS_MT_ORIENTATION"),
    (ABS_MT_POSITION_X, "ABS_MT_POSITION_X"),
    (ABS_MT_POSITION_Y, "ABS_MT_POSITION_Y"),
    (ABS_MT_TOOL_TYPE, "ABS_MT_TOOL_TYPE"),
    (ABS_MT_BLOB_ID, "ABS_MT_BLOB_ID"),
    (ABS_MT_TRACKING_ID, "ABS_MT_TRACKING_ID"),
    (ABS_MT_PRESSURE, "ABS_MT_PRESSURE"),
    (ABS_MT_DISTANCE, "ABS_MT_DISTANCE"),
    (ABS_MT_TOOL_X, "ABS_MT_TOOL_X"),
    (ABS_MT_TOOL_Y, "ABS_MT_TOOL_Y"),
];

const KEY_NAMES: &[(u16, &str)] = &[
    (BTN_TOOL_FINGER, "BTN_TOOL_FINGER"),
    (BTN_TOOL_QUINTTAP, "BTN_TOOL_QUINTTAP"),
    (BTN_TOUCH, "BTN_TOUCH"),
    (BTN_TOOL_DOUBLETAP, "BTN_TOOL_DOUBLETAP"),
    (BTN_TOOL_TRIPLETAP, "BTN_TOOL_TRIPLETAP"),
    (BTN_TOOL_QUADTAP, "BTN_TOOL_QUADTAP"),
];

const SYN_NAMES: &[(u16, &str)] = &[
    (SYN_REPORT, "SYN_REPORT"),
    (SYN_CONFIG, "SYN_CONFIG"),
    (SYN_MT_REPORT, "SYN_MT_REPORT"),
    (SYN_DROPPED, "SYN_DROPPED"),
];

fn lookup(table: &[(u16, &'static str)], code: u16) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
}

/// Symbolic name of an absolute axis code.
pub fn abs_name(code: u16) -> Option<&'static str> {
    lookup(ABS_NAMES, code)
}

/// Absolute axis code for a symbolic name.
pub fn abs_code(name: &str) -> Option<u16> {
    ABS_NAMES.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
}

/// Symbolic name of an event type.
pub fn type_name(event_type: u16) -> Option<&'static str> {
    match event_type {
        EV_SYN => Some("EV_SYN"),
        EV_KEY => Some("EV_KEY"),
        EV_ABS => Some("EV_ABS"),
        _ => None,
    }
}

/// Symbolic name of a code within an event type.
pub fn code_name(event_type: u16, code: u16) -> Option<&'static str> {
    match event_type {
        EV_SYN => lookup(SYN_NAMES, code),
        EV_KEY => lookup(KEY_NAMES, code),
        EV_ABS => abs_name(code),
        _ => None,
    }
}
