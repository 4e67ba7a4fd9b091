//! Port assignment and registration of input devices
//!
//! Every rebuild discards the previous set. Physical controllers get ports in
//! discovery order, the overlay always sits at [`OVERLAY_PORT`]. Rebuilds must happen
//! at quiescent points, claims held by the touch dispatcher are not valid across them.

use super::device::{DeviceSource, InputDevice, OVERLAY_PORT, PHYSICAL_PORTS};
use crate::bridge::NativeBridge;
use crate::param_package::ParamPackage;
use tracing::{debug, info, warn};

pub struct DeviceRegistry {
    devices: Vec<InputDevice>,
    registered: Vec<ParamPackage>,
    generation: u64,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry {
    /// Registry holding only the overlay, nothing registered yet
    pub fn new() -> Self {
        Self {
            devices: vec![InputDevice::overlay()],
            registered: Vec::new(),
            generation: 0,
        }
    }

    /// Enumerates `source`, registers every device with the core and returns the
    /// core's controller list sorted by port.
    pub fn rebuild(
        &mut self,
        source: &dyn DeviceSource,
        bridge: &dyn NativeBridge,
    ) -> &[ParamPackage] {
        let mut devices = Vec::new();

        for discovered in source.enumerate() {
            if !discovered.is_controller() {
                debug!("Skipping non-controller device '{}'", discovered.name);
                continue;
            }
            if devices.len() == PHYSICAL_PORTS {
                warn!(
                    "All {} ports taken, ignoring '{}'",
                    PHYSICAL_PORTS, discovered.name
                );
                continue;
            }
            let port = devices.len();
            devices.push(InputDevice::physical(&discovered, port));
        }
        devices.push(InputDevice::overlay());

        for device in &devices {
            debug!(
                "Registering '{}' (guid {}) at port {}",
                device.name, device.guid, device.port
            );
            bridge.register_controller(&device.to_params());
        }

        let mut registered: Vec<ParamPackage> = bridge
            .input_devices()
            .iter()
            .map(|serialized| ParamPackage::parse(serialized))
            .collect();
        registered.sort_by_key(|params| params.get("port", usize::MAX));

        self.devices = devices;
        self.registered = registered;
        self.generation += 1;

        info!(
            "Device set rebuilt: {} physical, {} registered (generation {})",
            self.devices.len() - 1,
            self.registered.len(),
            self.generation
        );
        &self.registered
    }

    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    /// Controllers the core reported after the last rebuild
    pub fn registered(&self) -> &[ParamPackage] {
        &self.registered
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn overlay_port(&self) -> usize {
        OVERLAY_PORT
    }

    pub fn device_at(&self, port: usize) -> Option<&InputDevice> {
        self.devices.iter().find(|d| d.port == port)
    }

    pub fn device_for_source(&self, source_id: usize) -> Option<&InputDevice> {
        self.devices
            .iter()
            .find(|d| d.source_id == Some(source_id))
    }

    pub fn supports_vibration(&self, guid: &str, port: usize) -> bool {
        self.devices
            .iter()
            .find(|d| d.guid == guid && d.port == port)
            .is_some_and(|d| d.vibration_capable)
    }
}
