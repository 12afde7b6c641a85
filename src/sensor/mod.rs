//! # Sensor Telemetry Module
//!
//! Decoding of inbound notifications from hub-attached sensors.
//!
//! This module handles:
//! - Mode codes and event types for the color/distance and tilt sensors
//! - Generation-dependent frame offsets (legacy frames are two bytes shorter)
//! - Suppression of "nothing detected" readings
//! - Raw-unit to millimeter scaling

pub mod protocol;
pub mod decoder;
pub mod scaler;
