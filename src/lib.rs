//! # Hub Sensors Library
//!
//! Decodes telemetry from color/distance and tilt sensors attached to a
//! motor-and-sensor control hub, and encodes Power Functions infrared
//! commands for the color/distance sensor's IR transmitter.
//!
//! The Bluetooth link itself lives outside this crate: inbound notification
//! bytes are handed to [`gateway::Hub::deliver`], outbound writes go through
//! the [`transport::DeviceTransport`] trait.

pub mod config;
pub mod error;
pub mod gateway;
pub mod pf;
pub mod sensor;
pub mod telemetry;
pub mod transport;
