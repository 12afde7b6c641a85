//! # Value Scaler
//!
//! Pure conversions between raw protocol units and physical units.

/// Millimeters per raw distance unit (one inch)
const MILLIMETERS_PER_UNIT: f64 = 25.4;

/// Fixed offset subtracted after scaling a distance reading
const DISTANCE_OFFSET_MM: i32 = 20;

/// Mask selecting the low nibble of a byte
const NIBBLE_MASK: u8 = 0x0F;

/// Convert a raw distance reading to millimeters
///
/// `floor(raw * 25.4) - 20`. Fractional input comes from the combined
/// color and distance mode.
///
/// # Examples
///
/// ```
/// use hub_sensors::sensor::scaler::raw_to_millimeters;
///
/// assert_eq!(raw_to_millimeters(5.0), 107);
/// assert_eq!(raw_to_millimeters(5.25), 113);
/// ```
pub fn raw_to_millimeters(raw: f64) -> i32 {
    (raw * MILLIMETERS_PER_UNIT).floor() as i32 - DISTANCE_OFFSET_MM
}

/// Encode a Power Functions power level as a 4-bit field
///
/// Two's-complement truncation: `-7` becomes `0x9`, `8` (brake) stays `0x8`.
/// Only meaningful for `-8..=15`; other inputs silently wrap.
pub fn power_to_nibble(power: i8) -> u8 {
    (power as u8) & NIBBLE_MASK
}
