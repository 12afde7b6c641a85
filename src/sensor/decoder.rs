//! # Sensor Frame Decoder
//!
//! Turns an inbound notification for the active mode into at most one
//! [`SemanticEvent`].
//!
//! ## Frame Layouts
//!
//! | Mode | Generation | Field | Offset |
//! |------|------------|-------|--------|
//! | Color | Legacy | color | 2 |
//! | Color | Modern | color | 4 |
//! | Distance | Modern | distance | 4 |
//! | ColorAndDistance | Modern | color / distance / partial | 4 / 5 / 7 |
//! | Tilt | Legacy | x, y | 2, 3 |
//! | Tilt | Modern | x, y | 4, 5 |
//!
//! Legacy hubs never report distance or the combined mode.

use tracing::trace;

use super::protocol::*;
use super::scaler::raw_to_millimeters;
use crate::error::{HubSensorError, Result};

/// Decode a raw notification frame
///
/// # Arguments
///
/// * `variant` - Device the frame came from
/// * `generation` - Generation of the hub the device is attached to
/// * `mode` - Mode the frame was delivered for
/// * `frame` - Raw notification bytes
///
/// # Returns
///
/// * `Ok(Some(event))` - Frame decoded to an event
/// * `Ok(None)` - Reading suppressed (nothing detected) or mode not decoded
///
/// # Errors
///
/// Returns `FrameTooShort` if a decoded mode's fields lie past the end of
/// the frame.
///
/// # Examples
///
/// ```
/// use hub_sensors::sensor::decoder::decode_frame;
/// use hub_sensors::sensor::protocol::*;
///
/// let frame = [0x05, 0x00, 0x00, 0x00, 0x05];
/// let event = decode_frame(
///     DeviceVariant::ColorDistanceSensor,
///     HubGeneration::Modern,
///     COLOR_DISTANCE_MODE_DISTANCE,
///     &frame,
/// )?;
/// assert_eq!(event, Some(SemanticEvent::Distance { millimeters: 107 }));
/// # Ok::<(), hub_sensors::error::HubSensorError>(())
/// ```
pub fn decode_frame(
    variant: DeviceVariant,
    generation: HubGeneration,
    mode: u8,
    frame: &[u8],
) -> Result<Option<SemanticEvent>> {
    let event = match variant {
        DeviceVariant::ColorDistanceSensor => decode_color_distance(generation, mode, frame)?,
        DeviceVariant::TiltSensor => decode_tilt(generation, mode, frame)?,
    };

    if event.is_none() {
        trace!("No event for {} mode 0x{:02X} ({} bytes)", variant, mode, frame.len());
    }

    Ok(event)
}

fn decode_color_distance(
    generation: HubGeneration,
    mode: u8,
    frame: &[u8],
) -> Result<Option<SemanticEvent>> {
    match mode {
        COLOR_DISTANCE_MODE_COLOR => {
            let color = byte_at(frame, mode, generation.data_offset())?;
            Ok(is_detected(color).then_some(SemanticEvent::Color { color }))
        }

        COLOR_DISTANCE_MODE_DISTANCE => {
            if generation.is_legacy() {
                return Ok(None);
            }

            let raw = byte_at(frame, mode, 4)?;
            Ok(is_detected(raw).then(|| SemanticEvent::Distance {
                millimeters: raw_to_millimeters(raw as f64),
            }))
        }

        COLOR_DISTANCE_MODE_COLOR_AND_DISTANCE => {
            if generation.is_legacy() {
                return Ok(None);
            }

            let mut distance = byte_at(frame, mode, 5)? as f64;
            let partial = byte_at(frame, mode, 7)?;

            // Sub-unit precision arrives as the reciprocal of `partial`
            if partial > 0 {
                distance += 1.0 / partial as f64;
            }

            let millimeters = raw_to_millimeters(distance);

            // Emission is gated on the color byte, not on the distance
            let color = byte_at(frame, mode, 4)?;
            Ok(is_detected(color).then_some(SemanticEvent::ColorAndDistance { color, millimeters }))
        }

        _ => Ok(None),
    }
}

fn decode_tilt(
    generation: HubGeneration,
    mode: u8,
    frame: &[u8],
) -> Result<Option<SemanticEvent>> {
    match mode {
        TILT_MODE_TILT => {
            let offset = generation.data_offset();
            let x = byte_at(frame, mode, offset)? as i8;
            let y = byte_at(frame, mode, offset + 1)? as i8;
            Ok(Some(SemanticEvent::Tilt { x, y }))
        }
        _ => Ok(None),
    }
}

/// Values above 10 mean nothing is in front of the sensor
fn is_detected(raw: u8) -> bool {
    raw <= MAX_DETECTED_VALUE
}

fn byte_at(frame: &[u8], mode: u8, offset: usize) -> Result<u8> {
    frame
        .get(offset)
        .copied()
        .ok_or(HubSensorError::FrameTooShort {
            mode,
            needed: offset + 1,
            actual: frame.len(),
        })
}
