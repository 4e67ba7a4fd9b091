//! In-process core stand-in
//!
//! Keeps the controller table, runs the mapping poller over injected events and
//! records every call so hosts and tests can inspect what reached the core.

use super::{ButtonState, InputType, NativeAnalog, NativeBridge, NativeButton, Surface};
use crate::controller::device::{GAMEPAD_ENGINE, OVERLAY_ENGINE, OVERLAY_GUID};
use crate::param_package::{ParamPackage, EMPTY_PACKAGE};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Axis travel required before an axis becomes a mapping candidate
pub const MAPPING_AXIS_THRESHOLD: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub enum BridgeCall {
    BeginMapping(InputType),
    StopMapping,
    RegisterController(String),
    GamepadButton {
        guid: String,
        port: usize,
        key_code: i32,
        state: ButtonState,
    },
    GamepadAxis {
        guid: String,
        port: usize,
        axis: i32,
        value: f32,
    },
    GamepadMotion {
        guid: String,
        port: usize,
    },
    OverlayButton {
        port: usize,
        button: NativeButton,
        state: ButtonState,
    },
    OverlayJoystick {
        port: usize,
        stick: NativeAnalog,
        x: f32,
        y: f32,
    },
    TouchPressed {
        finger_id: i32,
        x: f32,
        y: f32,
    },
    TouchMoved {
        finger_id: i32,
        x: f32,
        y: f32,
    },
    TouchReleased {
        finger_id: i32,
        x: f32,
        y: f32,
    },
    Run {
        path: String,
        program_index: i32,
        fresh_start: bool,
    },
    Pause,
    Unpause,
    Stop,
    SurfaceChanged(Option<u64>),
}

// First stick axis seen while listening for a two-axis binding
#[derive(Clone, Debug)]
struct PendingStickAxis {
    guid: String,
    port: usize,
    axis: i32,
}

#[derive(Default)]
struct LoopbackState {
    controllers: Vec<ParamPackage>,
    listening: Option<InputType>,
    candidate: Option<ParamPackage>,
    pending_stick: Option<PendingStickAxis>,
    running: bool,
    paused: bool,
    calls: Vec<BridgeCall>,
}

impl LoopbackState {
    fn engine_for(&self, guid: &str, port: usize) -> String {
        self.controllers
            .iter()
            .find(|c| c.get_str("guid", "") == guid && c.get("port", -1i64) == port as i64)
            .map(|c| c.get_str("engine", GAMEPAD_ENGINE))
            .unwrap_or_else(|| GAMEPAD_ENGINE.to_string())
    }

    fn candidate_base(&self, guid: &str, port: usize) -> ParamPackage {
        let mut params = ParamPackage::new();
        params.set("engine", self.engine_for(guid, port));
        params.set("guid", guid.to_string());
        params.set("port", port);
        params
    }

    fn offer_button(&mut self, guid: &str, port: usize, code: i32) {
        if !matches!(self.listening, Some(InputType::Button | InputType::Stick)) {
            return;
        }
        let mut params = self.candidate_base(guid, port);
        params.set("button", code);
        debug!("Mapping candidate: {}", params);
        self.candidate = Some(params);
    }

    fn offer_axis(&mut self, guid: &str, port: usize, axis: i32, value: f32) {
        if value.abs() <= MAPPING_AXIS_THRESHOLD {
            return;
        }

        match self.listening {
            Some(InputType::Button) => {
                let mut params = self.candidate_base(guid, port);
                params.set("axis", axis);
                params.set("threshold", MAPPING_AXIS_THRESHOLD);
                params.set("invert", if value < 0.0 { "-" } else { "+" }.to_string());
                debug!("Mapping candidate: {}", params);
                self.candidate = Some(params);
            }
            Some(InputType::Stick) => {
                let first = self
                    .pending_stick
                    .as_ref()
                    .filter(|p| p.guid == guid && p.port == port && p.axis != axis)
                    .map(|p| p.axis);
                let Some(first) = first else {
                    self.pending_stick = Some(PendingStickAxis {
                        guid: guid.to_string(),
                        port,
                        axis,
                    });
                    return;
                };

                let (axis_x, axis_y) = if first < axis { (first, axis) } else { (axis, first) };
                let mut params = self.candidate_base(guid, port);
                params.set("axis_x", axis_x);
                params.set("axis_y", axis_y);
                params.set("invert_x", "+".to_string());
                params.set("invert_y", "-".to_string());
                debug!("Mapping candidate: {}", params);
                self.pending_stick = None;
                self.candidate = Some(params);
            }
            _ => {}
        }
    }

    fn offer_motion(&mut self, guid: &str, port: usize) {
        if self.listening != Some(InputType::Motion) {
            return;
        }
        let mut params = self.candidate_base(guid, port);
        params.set("motion", 0);
        self.candidate = Some(params);
    }

    fn overlay_identity(&self, port: usize) -> (String, String) {
        self.controllers
            .iter()
            .find(|c| c.get("port", -1i64) == port as i64)
            .map(|c| (c.get_str("guid", OVERLAY_GUID), c.get_str("engine", OVERLAY_ENGINE)))
            .unwrap_or_else(|| (OVERLAY_GUID.to_string(), OVERLAY_ENGINE.to_string()))
    }
}

#[derive(Default)]
pub struct LoopbackBridge {
    state: Mutex<LoopbackState>,
}

impl LoopbackBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.state().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<BridgeCall> {
        std::mem::take(&mut self.state().calls)
    }

    pub fn count_calls(&self, predicate: impl Fn(&BridgeCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn registered_controllers(&self) -> Vec<ParamPackage> {
        self.state().controllers.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    /// Marks the program as returned from its run call
    pub fn finish_run(&self) {
        let mut state = self.state();
        state.running = false;
        state.paused = false;
    }

    fn state(&self) -> MutexGuard<'_, LoopbackState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Loopback bridge state was poisoned, continuing with last state");
                poisoned.into_inner()
            }
        }
    }
}

impl NativeBridge for LoopbackBridge {
    fn begin_mapping(&self, input_type: InputType) {
        let mut state = self.state();
        debug!("Mapping armed for {:?}", input_type);
        state.listening = Some(input_type);
        state.candidate = None;
        state.pending_stick = None;
        state.calls.push(BridgeCall::BeginMapping(input_type));
    }

    fn next_input(&self) -> String {
        match self.state().candidate.take() {
            Some(params) => params.serialize(),
            None => EMPTY_PACKAGE.to_string(),
        }
    }

    fn stop_mapping(&self) {
        let mut state = self.state();
        state.listening = None;
        state.candidate = None;
        state.pending_stick = None;
        state.calls.push(BridgeCall::StopMapping);
    }

    fn register_controller(&self, device: &ParamPackage) {
        let mut state = self.state();
        let guid = device.get_str("guid", "");
        let port = device.get("port", -1i64);
        // Keyed by guid and port, re-registering the same pair replaces it
        match state
            .controllers
            .iter_mut()
            .find(|c| c.get_str("guid", "") == guid && c.get("port", -1i64) == port)
        {
            Some(existing) => *existing = device.clone(),
            None => state.controllers.push(device.clone()),
        }
        state
            .calls
            .push(BridgeCall::RegisterController(device.serialize()));
    }

    fn input_devices(&self) -> Vec<String> {
        self.state()
            .controllers
            .iter()
            .map(ParamPackage::serialize)
            .collect()
    }

    fn on_gamepad_button_event(&self, guid: &str, port: usize, key_code: i32, state: ButtonState) {
        let mut inner = self.state();
        if state == ButtonState::Pressed {
            inner.offer_button(guid, port, key_code);
        }
        inner.calls.push(BridgeCall::GamepadButton {
            guid: guid.to_string(),
            port,
            key_code,
            state,
        });
    }

    fn on_gamepad_axis_event(&self, guid: &str, port: usize, axis: i32, value: f32) {
        let mut inner = self.state();
        inner.offer_axis(guid, port, axis, value);
        inner.calls.push(BridgeCall::GamepadAxis {
            guid: guid.to_string(),
            port,
            axis,
            value,
        });
    }

    fn on_gamepad_motion_event(
        &self,
        guid: &str,
        port: usize,
        _delta_timestamp: u64,
        _gyro: [f32; 3],
        _accel: [f32; 3],
    ) {
        let mut inner = self.state();
        inner.offer_motion(guid, port);
        inner.calls.push(BridgeCall::GamepadMotion {
            guid: guid.to_string(),
            port,
        });
    }

    fn on_overlay_button_event(&self, port: usize, button: NativeButton, state: ButtonState) {
        let mut inner = self.state();
        if state == ButtonState::Pressed {
            let (guid, _) = inner.overlay_identity(port);
            inner.offer_button(&guid, port, button.id());
        }
        inner
            .calls
            .push(BridgeCall::OverlayButton { port, button, state });
    }

    fn on_overlay_joystick_event(&self, port: usize, stick: NativeAnalog, x: f32, y: f32) {
        self.state()
            .calls
            .push(BridgeCall::OverlayJoystick { port, stick, x, y });
    }

    fn on_touch_pressed(&self, finger_id: i32, x: f32, y: f32) {
        self.state()
            .calls
            .push(BridgeCall::TouchPressed { finger_id, x, y });
    }

    fn on_touch_moved(&self, finger_id: i32, x: f32, y: f32) {
        self.state()
            .calls
            .push(BridgeCall::TouchMoved { finger_id, x, y });
    }

    fn on_touch_released(&self, finger_id: i32, x: f32, y: f32) {
        self.state()
            .calls
            .push(BridgeCall::TouchReleased { finger_id, x, y });
    }

    fn run(&self, path: &str, program_index: i32, fresh_start: bool) {
        let mut state = self.state();
        info!(
            "Loopback core running '{}' (program {}, fresh start: {})",
            path, program_index, fresh_start
        );
        state.running = true;
        state.paused = false;
        state.calls.push(BridgeCall::Run {
            path: path.to_string(),
            program_index,
            fresh_start,
        });
    }

    fn pause_emulation(&self) {
        let mut state = self.state();
        state.paused = true;
        state.calls.push(BridgeCall::Pause);
    }

    fn unpause_emulation(&self) {
        let mut state = self.state();
        state.paused = false;
        state.calls.push(BridgeCall::Unpause);
    }

    fn stop_emulation(&self) {
        let mut state = self.state();
        state.running = false;
        state.paused = false;
        state.calls.push(BridgeCall::Stop);
    }

    fn is_running(&self) -> bool {
        self.state().running
    }

    fn surface_changed(&self, surface: Option<&Surface>) {
        self.state()
            .calls
            .push(BridgeCall::SurfaceChanged(surface.map(|s| s.id)));
    }
}
