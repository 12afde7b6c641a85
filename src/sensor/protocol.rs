//! # Sensor Protocol Constants and Types
//!
//! Mode codes, frame offsets and the event types produced by the decoder.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Color/distance sensor: color reading mode
pub const COLOR_DISTANCE_MODE_COLOR: u8 = 0x00;

/// Color/distance sensor: distance reading mode
pub const COLOR_DISTANCE_MODE_DISTANCE: u8 = 0x01;

/// Color/distance sensor: LED color output mode
pub const COLOR_DISTANCE_MODE_LED: u8 = 0x05;

/// Color/distance sensor: Power Functions IR transmit mode
pub const COLOR_DISTANCE_MODE_PF_IR: u8 = 0x07;

/// Color/distance sensor: combined color and distance mode
pub const COLOR_DISTANCE_MODE_COLOR_AND_DISTANCE: u8 = 0x08;

/// Tilt sensor: two-axis tilt mode
pub const TILT_MODE_TILT: u8 = 0x00;

/// Write opcode for setting the sensor LED color
pub const OPCODE_SET_LED: u8 = 0x05;

/// Write opcode for transmitting a Power Functions IR command
pub const OPCODE_PF_IR: u8 = 0x07;

/// Largest raw color/distance value that still means "object detected"
pub const MAX_DETECTED_VALUE: u8 = 10;

/// Device type id reported by the hub for the color/distance sensor
pub const DEVICE_TYPE_COLOR_DISTANCE_SENSOR: u16 = 37;

/// Device type id reported by the hub for the tilt sensor
pub const DEVICE_TYPE_TILT_SENSOR: u16 = 34;

/// Hub generation, which decides frame offsets and available capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubGeneration {
    /// WeDo 2.0 style hub: frames are two bytes shorter, no IR, LED or distance
    Legacy,
    /// LPF2 hubs
    Modern,
}

impl HubGeneration {
    /// Offset of the first data byte in an inbound notification
    pub fn data_offset(self) -> usize {
        match self {
            HubGeneration::Legacy => 2,
            HubGeneration::Modern => 4,
        }
    }

    pub fn is_legacy(self) -> bool {
        self == HubGeneration::Legacy
    }
}

/// Event kinds a device can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Color,
    Distance,
    ColorAndDistance,
    Tilt,
}

impl EventKind {
    /// Event name as used by hub listeners
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Color => "color",
            EventKind::Distance => "distance",
            EventKind::ColorAndDistance => "colorAndDistance",
            EventKind::Tilt => "tilt",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const COLOR_DISTANCE_MODE_MAP: &[(EventKind, u8)] = &[
    (EventKind::Color, COLOR_DISTANCE_MODE_COLOR),
    (EventKind::Distance, COLOR_DISTANCE_MODE_DISTANCE),
    (EventKind::ColorAndDistance, COLOR_DISTANCE_MODE_COLOR_AND_DISTANCE),
];

const TILT_MODE_MAP: &[(EventKind, u8)] = &[(EventKind::Tilt, TILT_MODE_TILT)];

/// Sensor variants with custom frame decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceVariant {
    ColorDistanceSensor,
    TiltSensor,
}

impl DeviceVariant {
    /// Fixed mapping from event kind to mode for this variant
    pub fn mode_map(self) -> &'static [(EventKind, u8)] {
        match self {
            DeviceVariant::ColorDistanceSensor => COLOR_DISTANCE_MODE_MAP,
            DeviceVariant::TiltSensor => TILT_MODE_MAP,
        }
    }

    /// Mode that produces `kind` events, if this variant emits them at all
    pub fn mode_for(self, kind: EventKind) -> Option<u8> {
        self.mode_map()
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, mode)| mode)
    }

    /// Device type id as reported by the hub
    pub fn type_id(self) -> u16 {
        match self {
            DeviceVariant::ColorDistanceSensor => DEVICE_TYPE_COLOR_DISTANCE_SENSOR,
            DeviceVariant::TiltSensor => DEVICE_TYPE_TILT_SENSOR,
        }
    }

    /// Look up a variant from a hub device type id
    pub fn from_type_id(type_id: u16) -> Option<Self> {
        match type_id {
            DEVICE_TYPE_COLOR_DISTANCE_SENSOR => Some(DeviceVariant::ColorDistanceSensor),
            DEVICE_TYPE_TILT_SENSOR => Some(DeviceVariant::TiltSensor),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceVariant::ColorDistanceSensor => f.write_str("color/distance sensor"),
            DeviceVariant::TiltSensor => f.write_str("tilt sensor"),
        }
    }
}

/// Color codes shared by sensor readings and the sensor LED
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black = 0,
    Pink = 1,
    Purple = 2,
    Blue = 3,
    LightBlue = 4,
    Cyan = 5,
    Green = 6,
    Yellow = 7,
    Orange = 8,
    Red = 9,
    White = 10,
    NoColor = 255,
}

/// A decoded sensor reading
///
/// At most one event is produced per inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SemanticEvent {
    /// Detected color code (0-10)
    Color { color: u8 },

    /// Distance to the detected object in millimeters
    Distance { millimeters: i32 },

    /// Combined reading from the color and distance mode
    ColorAndDistance { color: u8, millimeters: i32 },

    /// Two-axis tilt angle
    Tilt { x: i8, y: i8 },
}

impl SemanticEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SemanticEvent::Color { .. } => EventKind::Color,
            SemanticEvent::Distance { .. } => EventKind::Distance,
            SemanticEvent::ColorAndDistance { .. } => EventKind::ColorAndDistance,
            SemanticEvent::Tilt { .. } => EventKind::Tilt,
        }
    }

    /// Named color for events that carry one
    pub fn named_color(&self) -> Option<Color> {
        match *self {
            SemanticEvent::Color { color } | SemanticEvent::ColorAndDistance { color, .. } => {
                Color::try_from(color).ok()
            }
            _ => None,
        }
    }
}
