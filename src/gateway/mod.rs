//! # Event/Command Gateway
//!
//! Glue between the hub connection and the sensor codecs.
//!
//! This module handles:
//! - Tracking which sensor sits on which port
//! - Routing inbound frames to the right device decoder
//! - Publishing decoded events on device-scoped and hub-scoped channels
//! - Routing outbound commands to the shared transport

pub mod device;
pub mod events;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{HubSensorError, Result};
use crate::sensor::protocol::{DeviceVariant, HubGeneration, SemanticEvent};
use crate::transport::DeviceTransport;
use device::SensorDevice;
use events::{DeviceEvent, EventChannels};

/// Sensors attached to one hub
pub struct Hub<T> {
    generation: HubGeneration,
    transport: Arc<Mutex<T>>,
    events: EventChannels,
    devices: HashMap<u8, SensorDevice<T>>,
}

impl<T> std::fmt::Debug for Hub<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("generation", &self.generation)
            .field("devices", &self.devices)
            .finish_non_exhaustive()
    }
}

impl<T: DeviceTransport> Hub<T> {
    /// Create a hub with no attached devices
    ///
    /// # Arguments
    ///
    /// * `generation` - Hub generation, fixed for the hub's lifetime
    /// * `transport` - Outbound transport shared by all devices
    /// * `event_capacity` - Events buffered per channel (must be non-zero)
    pub fn new(generation: HubGeneration, transport: T, event_capacity: usize) -> Self {
        Self {
            generation,
            transport: Arc::new(Mutex::new(transport)),
            events: EventChannels::new(event_capacity),
            devices: HashMap::new(),
        }
    }

    /// Create a hub and attach every device listed in `config`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hub_sensors::config::Config;
    /// use hub_sensors::gateway::Hub;
    /// use hub_sensors::transport::ChannelTransport;
    ///
    /// let config = Config::load("config/hub.toml")?;
    /// let (transport, _requests) = ChannelTransport::new(16);
    /// let hub = Hub::from_config(&config, transport);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_config(config: &Config, transport: T) -> Self {
        let mut hub = Self::new(config.hub.generation, transport, config.events.capacity);
        for device in &config.devices {
            hub.attach(device.port, device.variant);
        }
        info!(
            "Hub ready: {:?} generation, {} device(s)",
            hub.generation,
            hub.devices.len()
        );
        hub
    }

    pub fn generation(&self) -> HubGeneration {
        self.generation
    }

    /// Attach a sensor on `port`, replacing whatever was there
    pub fn attach(&mut self, port: u8, variant: DeviceVariant) -> &SensorDevice<T> {
        debug!("Attaching {} on port {}", variant, port);

        let device = SensorDevice::new(
            port,
            variant,
            self.generation,
            Arc::clone(&self.transport),
            self.events.clone(),
        );

        self.devices.insert(port, device);
        &self.devices[&port]
    }

    /// Detach the sensor on `port`
    pub fn detach(&mut self, port: u8) -> Option<SensorDevice<T>> {
        debug!("Detaching port {}", port);
        self.devices.remove(&port)
    }

    /// Look up the sensor on `port`
    ///
    /// # Errors
    ///
    /// Returns `UnknownDevice` if nothing is attached there.
    pub fn device(&self, port: u8) -> Result<&SensorDevice<T>> {
        self.devices.get(&port).ok_or(HubSensorError::UnknownDevice(port))
    }

    /// Route an inbound notification to the sensor on `port`
    ///
    /// # Returns
    ///
    /// * `Result<Option<SemanticEvent>>` - The published event, if any
    pub fn deliver(&self, port: u8, mode: u8, frame: &[u8]) -> Result<Option<SemanticEvent>> {
        let device = self.device(port)?;

        device.deliver(mode, frame).map_err(|e| {
            warn!("Dropping frame from port {}: {}", port, e);
            e
        })
    }

    /// Receive events published by individual devices
    pub fn subscribe_device_events(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe_device()
    }

    /// Receive hub-wide events
    pub fn subscribe_hub_events(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe_hub()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeviceConfig, EventsConfig, HubConfig};
    use crate::pf::command::PfOutput;
    use crate::sensor::protocol::*;
    use crate::transport::mocks::RecordingTransport;

    fn modern_hub() -> (Hub<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::new();
        let mut hub = Hub::new(HubGeneration::Modern, transport.clone(), 16);
        hub.attach(0, DeviceVariant::ColorDistanceSensor);
        hub.attach(1, DeviceVariant::TiltSensor);
        (hub, transport)
    }

    #[test]
    fn test_attach_and_lookup() {
        let (hub, _) = modern_hub();

        assert_eq!(hub.device(0).unwrap().variant(), DeviceVariant::ColorDistanceSensor);
        assert_eq!(hub.device(1).unwrap().variant(), DeviceVariant::TiltSensor);
        assert_eq!(hub.device(1).unwrap().generation(), HubGeneration::Modern);
    }

    #[test]
    fn test_unknown_port() {
        let (hub, _) = modern_hub();

        assert!(matches!(hub.device(7), Err(HubSensorError::UnknownDevice(7))));
        assert!(matches!(
            hub.deliver(7, 0x00, &[0; 8]),
            Err(HubSensorError::UnknownDevice(7))
        ));
    }

    #[test]
    fn test_detach() {
        let (mut hub, _) = modern_hub();

        let removed = hub.detach(1).unwrap();
        assert_eq!(removed.port(), 1);
        assert!(hub.device(1).is_err());
        assert!(hub.detach(1).is_none());
    }

    #[test]
    fn test_attach_replaces_existing_device() {
        let (mut hub, _) = modern_hub();

        hub.attach(0, DeviceVariant::TiltSensor);
        assert_eq!(hub.device(0).unwrap().variant(), DeviceVariant::TiltSensor);
    }

    #[test]
    fn test_deliver_routes_to_scoped_channels() {
        let (hub, _) = modern_hub();
        let mut device_rx = hub.subscribe_device_events();
        let mut hub_rx = hub.subscribe_hub_events();

        let color = hub.deliver(0, COLOR_DISTANCE_MODE_COLOR, &[0, 0, 0, 0, 7]).unwrap();
        let tilt = hub.deliver(1, TILT_MODE_TILT, &[0, 0, 0, 0, 0x05, 0xFB]).unwrap();

        assert_eq!(color, Some(SemanticEvent::Color { color: 7 }));
        assert_eq!(tilt, Some(SemanticEvent::Tilt { x: 5, y: -5 }));

        let device_event = device_rx.try_recv().unwrap();
        assert_eq!(device_event.port, 0);
        assert_eq!(device_event.event, SemanticEvent::Color { color: 7 });
        assert!(device_rx.try_recv().is_err());

        let hub_event = hub_rx.try_recv().unwrap();
        assert_eq!(hub_event.port, 1);
        assert_eq!(hub_event.event, SemanticEvent::Tilt { x: 5, y: -5 });
        assert!(hub_rx.try_recv().is_err());
    }

    #[test]
    fn test_deliver_malformed_frame() {
        let (hub, _) = modern_hub();
        let mut device_rx = hub.subscribe_device_events();

        let result = hub.deliver(0, COLOR_DISTANCE_MODE_COLOR_AND_DISTANCE, &[0, 0, 0, 0, 1]);

        assert!(matches!(result, Err(HubSensorError::FrameTooShort { .. })));
        assert!(device_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_devices_share_transport() {
        let (hub, transport) = modern_hub();

        hub.device(0).unwrap().set_pf_power(2, PfOutput::Blue, 3).await.unwrap();
        hub.device(1).unwrap().subscribe(EventKind::Tilt).await.unwrap();

        assert_eq!(transport.writes(), vec![(0, OPCODE_PF_IR, vec![0x53, 0x01])]);
        assert_eq!(transport.operations().len(), 3);
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            hub: HubConfig { generation: HubGeneration::Legacy },
            events: EventsConfig { capacity: 4 },
            devices: vec![
                DeviceConfig { port: 1, variant: DeviceVariant::ColorDistanceSensor },
                DeviceConfig { port: 2, variant: DeviceVariant::TiltSensor },
            ],
        };

        let hub = Hub::from_config(&config, RecordingTransport::new());

        assert_eq!(hub.generation(), HubGeneration::Legacy);
        assert_eq!(hub.device(1).unwrap().generation(), HubGeneration::Legacy);
        assert_eq!(hub.device(2).unwrap().variant(), DeviceVariant::TiltSensor);
        assert!(hub.device(0).is_err());
    }

    #[tokio::test]
    async fn test_legacy_hub_from_config_rejects_ir() {
        let config = Config {
            hub: HubConfig { generation: HubGeneration::Legacy },
            events: EventsConfig::default(),
            devices: vec![DeviceConfig { port: 1, variant: DeviceVariant::ColorDistanceSensor }],
        };
        let transport = RecordingTransport::new();
        let hub = Hub::from_config(&config, transport.clone());

        let result = hub.device(1).unwrap().start_pf_motors(1, 7, 7).await;

        assert!(matches!(result, Err(HubSensorError::UnsupportedOperation(_))));
        assert!(transport.operations().is_empty());
    }
}
