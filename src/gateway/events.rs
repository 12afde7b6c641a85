//! # Event Channels
//!
//! Two explicit output channels for decoded events: one for device-scoped
//! listeners and one for hub-wide listeners.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::sensor::protocol::{DeviceVariant, SemanticEvent};

/// Default number of events buffered per channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Which channel an event is published on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Listeners attached to the individual device
    Device,
    /// Listeners attached to the hub as a whole
    Hub,
}

impl EventScope {
    /// Tilt readings are hub-wide; every other reading belongs to its device
    pub fn of(event: &SemanticEvent) -> Self {
        match event {
            SemanticEvent::Tilt { .. } => EventScope::Hub,
            _ => EventScope::Device,
        }
    }
}

/// A decoded event tagged with its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceEvent {
    pub port: u8,
    pub variant: DeviceVariant,
    pub event: SemanticEvent,
}

/// Broadcast senders for both scopes
#[derive(Debug, Clone)]
pub struct EventChannels {
    device_tx: broadcast::Sender<DeviceEvent>,
    hub_tx: broadcast::Sender<DeviceEvent>,
}

impl EventChannels {
    /// Create both channels with room for `capacity` events each
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (validated by the config loader).
    pub fn new(capacity: usize) -> Self {
        let (device_tx, _) = broadcast::channel(capacity);
        let (hub_tx, _) = broadcast::channel(capacity);
        Self { device_tx, hub_tx }
    }

    pub fn subscribe_device(&self) -> broadcast::Receiver<DeviceEvent> {
        self.device_tx.subscribe()
    }

    pub fn subscribe_hub(&self) -> broadcast::Receiver<DeviceEvent> {
        self.hub_tx.subscribe()
    }

    /// Publish an event on the channel for its scope
    ///
    /// Having no listeners is not an error.
    pub fn publish(&self, event: DeviceEvent) -> EventScope {
        let scope = EventScope::of(&event.event);
        let tx = match scope {
            EventScope::Device => &self.device_tx,
            EventScope::Hub => &self.hub_tx,
        };

        if tx.send(event).is_err() {
            trace!("No {:?} listeners for {} on port {}", scope, event.event.kind(), event.port);
        }

        scope
    }
}

impl Default for EventChannels {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_event() -> DeviceEvent {
        DeviceEvent {
            port: 1,
            variant: DeviceVariant::ColorDistanceSensor,
            event: SemanticEvent::Color { color: 9 },
        }
    }

    fn tilt_event() -> DeviceEvent {
        DeviceEvent {
            port: 0,
            variant: DeviceVariant::TiltSensor,
            event: SemanticEvent::Tilt { x: 1, y: -1 },
        }
    }

    #[test]
    fn test_scope_of_events() {
        assert_eq!(EventScope::of(&SemanticEvent::Color { color: 0 }), EventScope::Device);
        assert_eq!(EventScope::of(&SemanticEvent::Distance { millimeters: 5 }), EventScope::Device);
        assert_eq!(
            EventScope::of(&SemanticEvent::ColorAndDistance { color: 0, millimeters: 5 }),
            EventScope::Device
        );
        assert_eq!(EventScope::of(&SemanticEvent::Tilt { x: 0, y: 0 }), EventScope::Hub);
    }

    #[test]
    fn test_publish_routes_by_scope() {
        let channels = EventChannels::new(8);
        let mut device_rx = channels.subscribe_device();
        let mut hub_rx = channels.subscribe_hub();

        assert_eq!(channels.publish(color_event()), EventScope::Device);
        assert_eq!(channels.publish(tilt_event()), EventScope::Hub);

        assert_eq!(device_rx.try_recv().unwrap(), color_event());
        assert!(device_rx.try_recv().is_err());
        assert_eq!(hub_rx.try_recv().unwrap(), tilt_event());
        assert!(hub_rx.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_listeners() {
        let channels = EventChannels::default();
        assert_eq!(channels.publish(color_event()), EventScope::Device);
    }
}
