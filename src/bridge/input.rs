use serde::{Deserialize, Serialize};

/// Buttons understood by the emulated controller, ids as the native core numbers them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeButton {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LStick = 4,
    RStick = 5,
    L = 6,
    R = 7,
    ZL = 8,
    ZR = 9,
    Plus = 10,
    Minus = 11,
    DLeft = 12,
    DUp = 13,
    DRight = 14,
    DDown = 15,
    SLLeft = 16,
    SRLeft = 17,
    Home = 18,
    Capture = 19,
    SLRight = 20,
    SRRight = 21,
}

impl NativeButton {
    pub fn id(self) -> i32 {
        self as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeAnalog {
    LStick = 0,
    RStick = 1,
}

impl NativeAnalog {
    pub fn id(self) -> i32 {
        self as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Released = 0,
    Pressed = 1,
}

impl From<bool> for ButtonState {
    fn from(pressed: bool) -> Self {
        if pressed {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }
}

/// Kind of input the mapping poller listens for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum InputType {
    #[default]
    None,
    Button,
    Stick,
    Motion,
    Touch,
}

/// Android key codes the gamepad forwarder reports
pub mod key_code {
    pub const DPAD_UP: i32 = 19;
    pub const DPAD_DOWN: i32 = 20;
    pub const DPAD_LEFT: i32 = 21;
    pub const DPAD_RIGHT: i32 = 22;
    pub const BUTTON_A: i32 = 96;
    pub const BUTTON_B: i32 = 97;
    pub const BUTTON_X: i32 = 99;
    pub const BUTTON_Y: i32 = 100;
    pub const BUTTON_L1: i32 = 102;
    pub const BUTTON_R1: i32 = 103;
    pub const BUTTON_L2: i32 = 104;
    pub const BUTTON_R2: i32 = 105;
    pub const BUTTON_THUMBL: i32 = 106;
    pub const BUTTON_THUMBR: i32 = 107;
    pub const BUTTON_START: i32 = 108;
    pub const BUTTON_SELECT: i32 = 109;
    pub const BUTTON_MODE: i32 = 110;
}

/// Android motion axis codes the gamepad forwarder reports
pub mod axis_code {
    pub const X: i32 = 0;
    pub const Y: i32 = 1;
    pub const Z: i32 = 11;
    pub const RZ: i32 = 14;
    pub const HAT_X: i32 = 15;
    pub const HAT_Y: i32 = 16;
    pub const LTRIGGER: i32 = 17;
    pub const RTRIGGER: i32 = 18;
}
