//! Physical and virtual input devices
//!
//! 1. [`device`] - device records, GUIDs and the [`device::DeviceSource`] seam
//! 2. [`device_registry`] - port assignment and core registration
//! 3. [`gamepad_input`] - gilrs backed source that forwards pad events into the core
//!
//! # Architecture
//!
//! ```text
//! gilrs ──► GamepadInput ──► DeviceRegistry ──► NativeBridge
//!               │                                   ▲
//!               └──────── button / axis events ─────┘
//! ```

pub mod device;
pub mod device_registry;
pub mod gamepad_input;

pub use device::{DeviceSource, DiscoveredDevice, InputDevice, OVERLAY_GUID, OVERLAY_PORT};
pub use device_registry::DeviceRegistry;
