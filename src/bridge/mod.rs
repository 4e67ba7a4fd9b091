//! Boundary to the native emulation core
//!
//! Everything the input layer and the emulation session need from the core goes
//! through [`NativeBridge`]. One adapter exists per binding mechanism:
//!
//! - [`loopback::LoopbackBridge`] - in-process core stand-in, records every call
//!
//! ```text
//! TouchDispatcher ──┐
//! GamepadInput ─────┼──► NativeBridge ──► core
//! EmulationSession ─┘
//! ```

pub mod input;
pub mod loopback;

pub use input::{ButtonState, InputType, NativeAnalog, NativeButton};

use crate::param_package::ParamPackage;

/// Rendering surface handed to the core
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

/// Calls into the native core. Implementations must tolerate calls from the
/// emulation worker thread and the input thread at the same time.
pub trait NativeBridge: Send + Sync {
    // Mapping capture
    fn begin_mapping(&self, input_type: InputType);
    /// Serialized candidate, `[empty]` while nothing qualifying was seen
    fn next_input(&self) -> String;
    fn stop_mapping(&self);

    // Devices
    fn register_controller(&self, device: &ParamPackage);
    fn input_devices(&self) -> Vec<String>;

    // Physical pads
    fn on_gamepad_button_event(&self, guid: &str, port: usize, key_code: i32, state: ButtonState);
    fn on_gamepad_axis_event(&self, guid: &str, port: usize, axis: i32, value: f32);
    fn on_gamepad_motion_event(
        &self,
        guid: &str,
        port: usize,
        delta_timestamp: u64,
        gyro: [f32; 3],
        accel: [f32; 3],
    );

    // On-screen overlay
    fn on_overlay_button_event(&self, port: usize, button: NativeButton, state: ButtonState);
    fn on_overlay_joystick_event(&self, port: usize, stick: NativeAnalog, x: f32, y: f32);

    // Touch panel
    fn on_touch_pressed(&self, finger_id: i32, x: f32, y: f32);
    fn on_touch_moved(&self, finger_id: i32, x: f32, y: f32);
    fn on_touch_released(&self, finger_id: i32, x: f32, y: f32);

    // Emulation lifecycle
    /// Runs the program until the core shuts down. Called on the emulation worker.
    fn run(&self, path: &str, program_index: i32, fresh_start: bool);
    fn pause_emulation(&self);
    fn unpause_emulation(&self);
    fn stop_emulation(&self);
    fn is_running(&self) -> bool;
    fn surface_changed(&self, surface: Option<&Surface>);
}
