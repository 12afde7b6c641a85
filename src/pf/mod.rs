//! # Power Functions IR Module
//!
//! Encoding of Power Functions infrared commands sent through the
//! color/distance sensor's IR transmitter.
//!
//! This module handles:
//! - Extended channel select, single output and combo PWM commands
//! - Signed power levels packed into 4-bit fields
//! - Repacking logical commands into the transmitter's 2-byte payload

pub mod command;
pub mod packer;
