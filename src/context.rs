//! Per-session wiring of the input layer
//!
//! [`InputContext`] owns the device registry and touch dispatcher of one emulation
//! session and applies dispatcher output to the core. Requests that need the host,
//! haptics and persistence, come back as [`HostRequests`].

use crate::bridge::{InputType, NativeBridge};
use crate::controller::{DeviceRegistry, DeviceSource};
use crate::mapping::{MappingSession, session::Listening};
use crate::overlay::{HapticEffect, OverlayAction, Screen, TouchDispatcher, TouchEvent};
use crate::param_package::ParamPackage;
use crate::persistence::{OverlayControlData, OverlaySettings};
use std::sync::Arc;
use tracing::debug;

/// Work the host has to do after an input call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostRequests {
    pub haptics: Vec<HapticEffect>,
    pub persist_overlay: bool,
}

impl HostRequests {
    pub fn is_empty(&self) -> bool {
        self.haptics.is_empty() && !self.persist_overlay
    }

    pub fn merge(&mut self, other: HostRequests) {
        self.haptics.extend(other.haptics);
        self.persist_overlay |= other.persist_overlay;
    }
}

pub struct InputContext {
    bridge: Arc<dyn NativeBridge>,
    devices: DeviceRegistry,
    dispatcher: TouchDispatcher,
}

impl InputContext {
    pub fn new(
        bridge: Arc<dyn NativeBridge>,
        screen: Screen,
        settings: OverlaySettings,
        controls: Vec<OverlayControlData>,
    ) -> Self {
        let devices = DeviceRegistry::new();
        let dispatcher = TouchDispatcher::new(screen, settings, controls, devices.overlay_port());
        Self {
            bridge,
            devices,
            dispatcher,
        }
    }

    pub fn bridge(&self) -> &Arc<dyn NativeBridge> {
        &self.bridge
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn dispatcher(&self) -> &TouchDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut TouchDispatcher {
        &mut self.dispatcher
    }

    /// Drops in-flight touch claims, then rebuilds the device set
    pub fn rebuild_devices(&mut self, source: &dyn DeviceSource) -> HostRequests {
        let released = self.dispatcher.invalidate_claims();
        let requests = self.apply(released);

        self.devices.rebuild(source, self.bridge.as_ref());
        self.dispatcher.set_port(self.devices.overlay_port());
        requests
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) -> HostRequests {
        let actions = self.dispatcher.process_event(event);
        self.apply(actions)
    }

    /// Controllers the core reported after the last rebuild
    pub fn registered_devices(&self) -> &[ParamPackage] {
        self.devices.registered()
    }

    pub fn begin_mapping(&self, input_type: InputType) -> MappingSession<Listening> {
        MappingSession::create(Arc::clone(&self.bridge)).begin(input_type)
    }

    /// Sends signal actions to the core and collects the rest for the host
    pub fn apply(&self, actions: Vec<OverlayAction>) -> HostRequests {
        let mut requests = HostRequests::default();

        for action in actions {
            match action {
                OverlayAction::Button {
                    port,
                    button,
                    state,
                } => self.bridge.on_overlay_button_event(port, button, state),
                OverlayAction::Joystick { port, stick, x, y } => {
                    self.bridge.on_overlay_joystick_event(port, stick, x, y)
                }
                OverlayAction::TouchPressed { finger_id, x, y } => {
                    self.bridge.on_touch_pressed(finger_id, x, y)
                }
                OverlayAction::TouchMoved { finger_id, x, y } => {
                    self.bridge.on_touch_moved(finger_id, x, y)
                }
                OverlayAction::TouchReleased { finger_id, x, y } => {
                    self.bridge.on_touch_released(finger_id, x, y)
                }
                OverlayAction::Haptic(effect) => requests.haptics.push(effect),
                OverlayAction::PersistControls => requests.persist_overlay = true,
            }
        }

        if !requests.is_empty() {
            debug!("Host requests: {:?}", requests);
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::loopback::{BridgeCall, LoopbackBridge};
    use crate::bridge::{ButtonState, NativeButton};
    use crate::controller::DiscoveredDevice;
    use crate::overlay::{ControlId, OverlayControlRegistry};

    struct NoDevices;

    impl DeviceSource for NoDevices {
        fn enumerate(&self) -> Vec<DiscoveredDevice> {
            Vec::new()
        }
    }

    fn context(bridge: Arc<LoopbackBridge>) -> InputContext {
        InputContext::new(
            bridge,
            Screen::new(2000.0, 1000.0),
            OverlaySettings {
                haptic_feedback: true,
                ..OverlaySettings::default()
            },
            OverlayControlRegistry::defaults(),
        )
    }

    fn center(context: &InputContext, id: ControlId) -> (f32, f32) {
        context
            .dispatcher()
            .targets()
            .iter()
            .find(|t| t.control == id)
            .map(|t| t.bounds.center())
            .expect("target present")
    }

    #[test]
    fn overlay_press_reaches_core_on_overlay_port() {
        let bridge = Arc::new(LoopbackBridge::new());
        let mut context = context(bridge.clone());
        let (x, y) = center(&context, ControlId::ButtonA);

        let requests = context.handle_touch(&TouchEvent::down(0, x, y));
        assert_eq!(requests.haptics, vec![HapticEffect::Press]);
        assert_eq!(
            bridge.calls(),
            vec![BridgeCall::OverlayButton {
                port: 8,
                button: NativeButton::A,
                state: ButtonState::Pressed
            }]
        );
    }

    #[test]
    fn rebuild_releases_held_controls_first() {
        let bridge = Arc::new(LoopbackBridge::new());
        let mut context = context(bridge.clone());
        let (x, y) = center(&context, ControlId::ButtonB);
        context.handle_touch(&TouchEvent::down(1, x, y));
        bridge.take_calls();

        let requests = context.rebuild_devices(&NoDevices);
        assert_eq!(requests.haptics, vec![HapticEffect::Release]);

        let calls = bridge.calls();
        assert_eq!(
            calls.first(),
            Some(&BridgeCall::OverlayButton {
                port: 8,
                button: NativeButton::B,
                state: ButtonState::Released
            })
        );
        assert!(matches!(calls.get(1), Some(BridgeCall::RegisterController(_))));
        assert_eq!(context.registered_devices().len(), 1);

        // The lifted finger does not leak to the touch panel
        context.handle_touch(&TouchEvent::up(1, x, y));
        assert_eq!(
            bridge.count_calls(|c| matches!(c, BridgeCall::TouchReleased { .. })),
            0
        );
    }
}
