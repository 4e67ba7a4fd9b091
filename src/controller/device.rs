use crate::param_package::ParamPackage;

/// Ports available to physical pads, the overlay sits right after them
pub const PHYSICAL_PORTS: usize = 8;
pub const OVERLAY_PORT: usize = PHYSICAL_PORTS;
pub const OVERLAY_GUID: &str = "00000000000000000000000000000000";
pub const OVERLAY_NAME: &str = "On-screen controller";

pub const GAMEPAD_ENGINE: &str = "gamepad";
pub const OVERLAY_ENGINE: &str = "touch_overlay";

/// A device as reported by the OS, before a port is assigned
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// OS side identifier, only meaningful to the source that produced it
    pub source_id: usize,
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub is_gamepad: bool,
    pub is_joystick: bool,
    pub has_vibration: bool,
}

impl DiscoveredDevice {
    pub fn guid(&self) -> String {
        format_guid(self.vendor_id, self.product_id)
    }

    pub fn is_controller(&self) -> bool {
        self.is_gamepad || self.is_joystick
    }
}

/// 32 hex characters, vendor then product, each zero padded to 16
pub fn format_guid(vendor_id: u16, product_id: u16) -> String {
    format!("{:016x}{:016x}", vendor_id, product_id)
}

/// Anything that can list attached input devices
pub trait DeviceSource {
    fn enumerate(&self) -> Vec<DiscoveredDevice>;
}

/// Device with its assigned port
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputDevice {
    pub name: String,
    pub guid: String,
    pub port: usize,
    pub vibration_capable: bool,
    pub engine: String,
    pub source_id: Option<usize>,
}

impl InputDevice {
    pub fn overlay() -> Self {
        Self {
            name: OVERLAY_NAME.to_string(),
            guid: OVERLAY_GUID.to_string(),
            port: OVERLAY_PORT,
            vibration_capable: true,
            engine: OVERLAY_ENGINE.to_string(),
            source_id: None,
        }
    }

    pub fn physical(discovered: &DiscoveredDevice, port: usize) -> Self {
        Self {
            name: discovered.name.clone(),
            guid: discovered.guid(),
            port,
            vibration_capable: discovered.has_vibration,
            engine: GAMEPAD_ENGINE.to_string(),
            source_id: Some(discovered.source_id),
        }
    }

    /// Registration record handed to the core
    pub fn to_params(&self) -> ParamPackage {
        let mut params = ParamPackage::new();
        params.set("engine", self.engine.clone());
        params.set("display", self.name.clone());
        params.set("guid", self.guid.clone());
        params.set("port", self.port);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_is_vendor_then_product() {
        let guid = format_guid(0x045e, 0x02ea);
        assert_eq!(guid, "000000000000045e00000000000002ea");
        assert_eq!(guid.len(), 32);
    }

    #[test]
    fn overlay_params() {
        let params = InputDevice::overlay().to_params();
        assert_eq!(params.get_str("engine", ""), OVERLAY_ENGINE);
        assert_eq!(params.get_str("guid", ""), OVERLAY_GUID);
        assert_eq!(params.get("port", 0usize), OVERLAY_PORT);
    }
}
