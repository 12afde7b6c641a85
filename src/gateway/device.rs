//! # Sensor Device Handle
//!
//! One attached sensor: decodes its inbound frames and issues its outbound
//! commands through the shared transport.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use super::events::{DeviceEvent, EventChannels};
use crate::error::{HubSensorError, Result};
use crate::pf::command::{self, PfCommand, PfOutput};
use crate::pf::packer::pack;
use crate::sensor::decoder::decode_frame;
use crate::sensor::protocol::*;
use crate::transport::DeviceTransport;

/// A sensor attached to a hub port
///
/// Variant, generation and port are fixed at construction.
pub struct SensorDevice<T> {
    port: u8,
    variant: DeviceVariant,
    generation: HubGeneration,
    transport: Arc<Mutex<T>>,
    events: EventChannels,
}

impl<T> std::fmt::Debug for SensorDevice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorDevice")
            .field("port", &self.port)
            .field("variant", &self.variant)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<T: DeviceTransport> SensorDevice<T> {
    pub fn new(
        port: u8,
        variant: DeviceVariant,
        generation: HubGeneration,
        transport: Arc<Mutex<T>>,
        events: EventChannels,
    ) -> Self {
        Self {
            port,
            variant,
            generation,
            transport,
            events,
        }
    }

    pub fn port(&self) -> u8 {
        self.port
    }

    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    pub fn generation(&self) -> HubGeneration {
        self.generation
    }

    /// Decode a frame delivered for `mode` and publish the resulting event
    ///
    /// # Returns
    ///
    /// * `Result<Option<SemanticEvent>>` - The published event, if any
    ///
    /// # Errors
    ///
    /// Returns `FrameTooShort` for malformed frames; nothing is published.
    pub fn deliver(&self, mode: u8, frame: &[u8]) -> Result<Option<SemanticEvent>> {
        let event = decode_frame(self.variant, self.generation, mode, frame)?;

        if let Some(event) = event {
            self.events.publish(DeviceEvent {
                port: self.port,
                variant: self.variant,
                event,
            });
        }

        Ok(event)
    }

    /// Arm the subscription for an event kind
    ///
    /// # Returns
    ///
    /// * `Result<u8>` - The mode that was armed
    ///
    /// # Errors
    ///
    /// Returns `UnknownEvent` if this variant never emits `kind`, or
    /// `Transport` if the subscribe request fails.
    pub async fn subscribe(&self, kind: EventKind) -> Result<u8> {
        let mode = self
            .variant
            .mode_for(kind)
            .ok_or_else(|| HubSensorError::UnknownEvent {
                variant: self.variant.to_string(),
                event: kind.to_string(),
            })?;

        let mut transport = self.transport.lock().await;
        self.arm(&mut *transport, mode).await?;
        Ok(mode)
    }

    /// Transmit a logical Power Functions command through the IR emitter
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on legacy hubs and on devices without
    /// an IR transmitter. No subscription is armed and nothing is written.
    pub async fn send_pf_ir_message(&self, cmd: PfCommand) -> Result<()> {
        self.require_modern("Power Functions IR")?;
        self.require_color_distance("Power Functions IR")?;

        let payload = pack(cmd);
        self.write(COLOR_DISTANCE_MODE_PF_IR, OPCODE_PF_IR, &payload).await
    }

    /// Switch the receiver on `channel` into extended channel mode
    ///
    /// Afterwards address that receiver with channels 5-8 instead of 1-4.
    /// Sending this for channels 5-8 switches extended mode off again.
    pub async fn set_pf_extended_channel(&self, channel: u8) -> Result<()> {
        self.send_pf_ir_message(command::extended_channel(channel)).await
    }

    /// Set the power of one output on a Power Functions receiver
    pub async fn set_pf_power(&self, channel: u8, output: PfOutput, power: i8) -> Result<()> {
        self.send_pf_ir_message(command::single_output(channel, output, power)).await
    }

    /// Run both outputs of a Power Functions receiver
    ///
    /// The receiver stops when the sensor leaves its line of sight, so this
    /// must be repeated to keep the motors running.
    pub async fn start_pf_motors(&self, channel: u8, power_a: i8, power_b: i8) -> Result<()> {
        self.send_pf_ir_message(command::combo_pwm(channel, power_a, power_b)).await
    }

    /// Set the sensor LED color, or turn it off with `None`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on legacy hubs and on devices without
    /// an LED. No subscription is armed and nothing is written.
    pub async fn set_color(&self, color: Option<Color>) -> Result<()> {
        self.require_modern("Setting LED color")?;
        self.require_color_distance("Setting LED color")?;

        let code = color.map(u8::from).unwrap_or(0);
        self.write(COLOR_DISTANCE_MODE_LED, OPCODE_SET_LED, &[code]).await
    }

    fn require_modern(&self, operation: &str) -> Result<()> {
        if self.generation.is_legacy() {
            return Err(HubSensorError::UnsupportedOperation(format!(
                "{} is not available on legacy hubs",
                operation
            )));
        }
        Ok(())
    }

    fn require_color_distance(&self, operation: &str) -> Result<()> {
        if self.variant != DeviceVariant::ColorDistanceSensor {
            return Err(HubSensorError::UnsupportedOperation(format!(
                "{} is not available on the {}",
                operation, self.variant
            )));
        }
        Ok(())
    }

    async fn arm(&self, transport: &mut T, mode: u8) -> Result<()> {
        transport.subscribe(self.port, mode).await.map_err(|e| {
            HubSensorError::Transport(format!(
                "Failed to subscribe port {} to mode 0x{:02X}: {}",
                self.port, mode, e
            ))
        })?;

        debug!("Armed port {} mode 0x{:02X}", self.port, mode);
        Ok(())
    }

    async fn write(&self, mode: u8, opcode: u8, payload: &[u8]) -> Result<()> {
        let mut transport = self.transport.lock().await;
        self.arm(&mut *transport, mode).await?;

        transport
            .write_direct(self.port, opcode, payload)
            .await
            .map_err(|e| {
                HubSensorError::Transport(format!(
                    "Failed to write opcode 0x{:02X} to port {}: {}",
                    opcode, self.port, e
                ))
            })?;

        debug!("Wrote opcode 0x{:02X} to port {}: {:02X?}", opcode, self.port, payload);
        Ok(())
    }
}
