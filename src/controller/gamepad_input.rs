use super::device::{DeviceSource, DiscoveredDevice};
use super::device_registry::DeviceRegistry;
use crate::bridge::input::{axis_code, key_code};
use crate::bridge::{ButtonState, NativeBridge};
use chrono::{DateTime, Local};
use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

// Forwarder settings
#[derive(Clone, Debug)]
pub struct ForwarderSettings {
    /// Seconds between throughput log lines
    pub stats_interval_secs: i64,
}

impl Default for ForwarderSettings {
    fn default() -> Self {
        Self {
            stats_interval_secs: 10,
        }
    }
}

// Forwarder errors
#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    #[error("Failed to initialize gamepad input: {0}")]
    InitializationError(String),
}

/// Connection changes the caller should answer with a device rebuild
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadNotice {
    Connected(usize),
    Disconnected(usize),
}

#[state]
#[derive(Debug, Clone)]
pub enum InputState {
    Initializing,
    Forwarding,
}

#[machine]
pub struct GamepadInput<S: InputState> {
    // Gilrs context
    gilrs: Gilrs,

    settings: ForwarderSettings,

    // Throughput bookkeeping
    forwarded: u64,
    last_stats: DateTime<Local>,
}

impl<S: InputState> GamepadInput<S> {
    pub fn settings(&self) -> &ForwarderSettings {
        &self.settings
    }
}

impl GamepadInput<Initializing> {
    pub fn create(settings: Option<ForwarderSettings>) -> Result<Self, ForwarderError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating gamepad input with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(ForwarderError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, settings, 0, Local::now()))
    }

    pub fn initialize(self) -> GamepadInput<Forwarding> {
        let pads = self.enumerate();
        if pads.is_empty() {
            warn!("No gamepad connected, only the overlay will be available");
        } else {
            info!("Found {} gamepads:", pads.len());
            for pad in &pads {
                info!(
                    "  ID: {}, Name: {}, GUID: {}, Force feedback: {}",
                    pad.source_id,
                    pad.name,
                    pad.guid(),
                    pad.has_vibration
                );
            }
        }

        info!("Gamepad input initialized, transitioning to Forwarding state");
        self.transition()
    }
}

impl GamepadInput<Forwarding> {
    /// Drains pending gilrs events into `bridge`. Events from pads without a port are dropped.
    pub fn pump(&mut self, registry: &DeviceRegistry, bridge: &dyn NativeBridge) -> Vec<PadNotice> {
        let mut notices = Vec::new();

        while let Some(Event { id, event, time, .. }) = self.gilrs.next_event() {
            debug!("Processing gilrs event: {:?} at time: {:?}", event, time);

            match event {
                EventType::Connected => {
                    info!("Gamepad {} connected", id);
                    notices.push(PadNotice::Connected(source_id(id)));
                    continue;
                }
                EventType::Disconnected => {
                    info!("Gamepad {} disconnected", id);
                    notices.push(PadNotice::Disconnected(source_id(id)));
                    continue;
                }
                _ => {}
            }

            let Some(device) = registry.device_for_source(source_id(id)) else {
                debug!("Skipping event from unregistered gamepad {}", id);
                continue;
            };

            match event {
                EventType::ButtonPressed(button, _) => {
                    if let Some(code) = map_button(button) {
                        bridge.on_gamepad_button_event(
                            &device.guid,
                            device.port,
                            code,
                            ButtonState::Pressed,
                        );
                        self.forwarded += 1;
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(code) = map_button(button) {
                        bridge.on_gamepad_button_event(
                            &device.guid,
                            device.port,
                            code,
                            ButtonState::Released,
                        );
                        self.forwarded += 1;
                    }
                }
                EventType::ButtonChanged(button, value, _) => {
                    // Analog triggers also arrive as axes
                    let axis = match button {
                        Button::LeftTrigger2 => Some(axis_code::LTRIGGER),
                        Button::RightTrigger2 => Some(axis_code::RTRIGGER),
                        _ => None,
                    };
                    if let Some(axis) = axis {
                        bridge.on_gamepad_axis_event(&device.guid, device.port, axis, value);
                        self.forwarded += 1;
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    if let Some((code, value)) = map_axis(axis, value) {
                        bridge.on_gamepad_axis_event(&device.guid, device.port, code, value);
                        self.forwarded += 1;
                    }
                }
                _ => {}
            }
        }

        self.log_stats();
        notices
    }

    fn log_stats(&mut self) {
        let interval = chrono::Duration::seconds(self.settings.stats_interval_secs);
        let now = Local::now();
        if now - self.last_stats > interval {
            info!(
                "Gamepad input stats: forwarded {} events in last {} seconds (avg {:.2}/sec)",
                self.forwarded,
                interval.num_seconds(),
                self.forwarded as f64 / interval.num_seconds().max(1) as f64
            );
            self.forwarded = 0;
            self.last_stats = now;
        }
    }
}

impl<S: InputState> DeviceSource for GamepadInput<S> {
    fn enumerate(&self) -> Vec<DiscoveredDevice> {
        self.gilrs
            .gamepads()
            .map(|(id, gamepad)| DiscoveredDevice {
                source_id: source_id(id),
                name: gamepad.name().to_string(),
                vendor_id: gamepad.vendor_id().unwrap_or(0),
                product_id: gamepad.product_id().unwrap_or(0),
                is_gamepad: true,
                is_joystick: false,
                has_vibration: gamepad.is_ff_supported(),
            })
            .collect()
    }
}

fn source_id(id: GamepadId) -> usize {
    usize::from(id)
}

// Helper function to map gilrs Button to Android key codes
fn map_button(button: Button) -> Option<i32> {
    match button {
        Button::South => Some(key_code::BUTTON_A),
        Button::East => Some(key_code::BUTTON_B),
        Button::West => Some(key_code::BUTTON_X),
        Button::North => Some(key_code::BUTTON_Y),
        Button::LeftTrigger => Some(key_code::BUTTON_L1),
        Button::RightTrigger => Some(key_code::BUTTON_R1),
        Button::LeftTrigger2 => Some(key_code::BUTTON_L2),
        Button::RightTrigger2 => Some(key_code::BUTTON_R2),
        Button::LeftThumb => Some(key_code::BUTTON_THUMBL),
        Button::RightThumb => Some(key_code::BUTTON_THUMBR),
        Button::Start => Some(key_code::BUTTON_START),
        Button::Select => Some(key_code::BUTTON_SELECT),
        Button::Mode => Some(key_code::BUTTON_MODE),
        Button::DPadUp => Some(key_code::DPAD_UP),
        Button::DPadDown => Some(key_code::DPAD_DOWN),
        Button::DPadLeft => Some(key_code::DPAD_LEFT),
        Button::DPadRight => Some(key_code::DPAD_RIGHT),
        _ => None,
    }
}

// gilrs reports up as positive, Android axes grow downwards
fn map_axis(axis: Axis, value: f32) -> Option<(i32, f32)> {
    match axis {
        Axis::LeftStickX => Some((axis_code::X, value)),
        Axis::LeftStickY => Some((axis_code::Y, -value)),
        Axis::RightStickX => Some((axis_code::Z, value)),
        Axis::RightStickY => Some((axis_code::RZ, -value)),
        Axis::LeftZ => Some((axis_code::LTRIGGER, value)),
        Axis::RightZ => Some((axis_code::RTRIGGER, value)),
        Axis::DPadX => Some((axis_code::HAT_X, value)),
        Axis::DPadY => Some((axis_code::HAT_Y, -value)),
        _ => None,
    }
}
