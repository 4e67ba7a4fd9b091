use padbridge::bridge::loopback::LoopbackBridge;
use padbridge::bridge::{ButtonState, InputType, NativeBridge, NativeButton};
use padbridge::controller::{DeviceSource, DiscoveredDevice};
use padbridge::mapping::{BindingCapture, BindingTarget, CaptureOutcome};
use padbridge::overlay::{ControlId, OverlayControlRegistry, Screen, TouchEvent};
use padbridge::persistence::OverlaySettings;
use padbridge::{InputContext, ParamPackage};
use std::sync::Arc;

struct Pads(Vec<DiscoveredDevice>);

impl DeviceSource for Pads {
    fn enumerate(&self) -> Vec<DiscoveredDevice> {
        self.0.clone()
    }
}

fn pad() -> DiscoveredDevice {
    DiscoveredDevice {
        source_id: 0,
        name: "Pro Controller".to_string(),
        vendor_id: 0x057e,
        product_id: 0x2009,
        is_gamepad: true,
        is_joystick: false,
        has_vibration: true,
    }
}

fn context(bridge: Arc<LoopbackBridge>, source: &Pads) -> InputContext {
    let mut context = InputContext::new(
        bridge,
        Screen::new(1920.0, 1080.0),
        OverlaySettings::default(),
        OverlayControlRegistry::defaults(),
    );
    context.rebuild_devices(source);
    context
}

#[test]
fn single_registered_device_accepts_any_guid() {
    let bridge = Arc::new(LoopbackBridge::new());
    let context = context(bridge.clone(), &Pads(Vec::new()));
    assert_eq!(context.registered_devices().len(), 1);

    let mut expected = ParamPackage::new();
    expected.set("engine", "gamepad".to_string());
    expected.set("guid", "ffffffffffffffffffffffffffffffff".to_string());
    expected.set("port", 0);
    let mut capture = BindingCapture::new(
        BindingTarget::Button(NativeButton::X),
        expected,
        ParamPackage::new(),
    )
    .expect("expected device is valid");

    let session = context.begin_mapping(InputType::Button);
    bridge.on_gamepad_button_event("0123456789abcdef0123456789abcdef", 5, 99, ButtonState::Pressed);
    let candidate = session.poll();
    assert!(!candidate.is_empty());

    let outcome = capture
        .offer(&candidate, context.registered_devices())
        .expect("offer");
    assert!(matches!(outcome, CaptureOutcome::Accepted(_)));
    let _idle = session.stop();
}

#[test]
fn overlay_input_does_not_bind_to_physical_pad() {
    let bridge = Arc::new(LoopbackBridge::new());
    let mut context = context(bridge.clone(), &Pads(vec![pad()]));
    assert_eq!(context.registered_devices().len(), 2);

    let expected = context.registered_devices()[0].clone();
    assert_eq!(expected.get("port", usize::MAX), 0);
    let mut capture = BindingCapture::new(
        BindingTarget::Button(NativeButton::A),
        expected,
        ParamPackage::new(),
    )
    .expect("expected device is valid");

    let session = context.begin_mapping(InputType::Button);

    let (x, y) = context
        .dispatcher()
        .targets()
        .iter()
        .find(|t| t.control == ControlId::ButtonA)
        .map(|t| t.bounds.center())
        .expect("button A is shown");
    context.handle_touch(&TouchEvent::down(0, x, y));
    context.handle_touch(&TouchEvent::up(0, x, y));

    let from_overlay = session.poll();
    assert_eq!(
        capture
            .offer(&from_overlay, context.registered_devices())
            .expect("offer"),
        CaptureOutcome::Rejected
    );

    let guid = pad().guid();
    bridge.on_gamepad_button_event(&guid, 0, 96, ButtonState::Pressed);
    let from_pad = session.poll();
    let CaptureOutcome::Accepted(binding) = capture
        .offer(&from_pad, context.registered_devices())
        .expect("offer")
    else {
        panic!("pad press should be accepted");
    };
    assert_eq!(binding.get_str("guid", ""), guid);
    assert_eq!(binding.get_str("display", ""), "Pro Controller 0");
    assert!(capture.is_accepted());

    let _idle = session.stop();
}
