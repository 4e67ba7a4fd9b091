//! Touchable overlay controls and their per-pointer state

use super::control::{ControlId, ControlKind};
use super::geometry::Rect;
use crate::bridge::{NativeAnalog, NativeButton};

/// `track_id` of a target no pointer owns
pub const UNCLAIMED: i32 = -1;

/// Offset beyond which a d-pad direction counts as pressed
pub const DPAD_DEADZONE: f32 = 0.5;

/// The four independent d-pad directions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DpadState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DpadState {
    pub fn from_offset(dx: f32, dy: f32) -> Self {
        Self {
            up: dy < -DPAD_DEADZONE,
            down: dy > DPAD_DEADZONE,
            left: dx < -DPAD_DEADZONE,
            right: dx > DPAD_DEADZONE,
        }
    }

    /// Button and state pairs in the order the core expects them
    pub fn buttons(&self) -> [(NativeButton, bool); 4] {
        [
            (NativeButton::DUp, self.up),
            (NativeButton::DDown, self.down),
            (NativeButton::DLeft, self.left),
            (NativeButton::DRight, self.right),
        ]
    }

    pub fn sprite(&self) -> DpadSprite {
        match (self.up, self.right, self.down, self.left) {
            (true, false, false, true) => DpadSprite::Diagonal(0),
            (true, true, false, false) => DpadSprite::Diagonal(90),
            (false, true, true, false) => DpadSprite::Diagonal(180),
            (false, false, true, true) => DpadSprite::Diagonal(270),
            (true, _, _, _) => DpadSprite::Cardinal(0),
            (_, true, _, _) => DpadSprite::Cardinal(90),
            (_, _, true, _) => DpadSprite::Cardinal(180),
            (_, _, _, true) => DpadSprite::Cardinal(270),
            _ => DpadSprite::Idle,
        }
    }
}

/// Which d-pad art to draw and its rotation in degrees
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DpadSprite {
    Idle,
    Cardinal(u16),
    Diagonal(u16),
}

/// Polar clamp of a stick offset onto the unit disc
pub fn clamp_stick(x: f32, y: f32) -> (f32, f32) {
    let angle = y.atan2(x);
    let radius = (x * x + y * y).sqrt().min(1.0);
    (angle.cos() * radius, angle.sin() * radius)
}

#[derive(Clone, Debug, PartialEq)]
pub enum TargetKind {
    Button {
        button: NativeButton,
        pressed: bool,
    },
    Dpad(DpadState),
    Joystick {
        stick: NativeAnalog,
        click: NativeButton,
        /// Clamped axes, y pointing down
        x: f32,
        y: f32,
        /// Box the axes are computed against, moves with recentering
        virtual_bounds: Rect,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TouchTarget {
    pub control: ControlId,
    pub kind: TargetKind,
    /// Current drawn bounds
    pub bounds: Rect,
    /// Bounds derived from the persisted position
    pub origin_bounds: Rect,
    pub track_id: i32,
    pub opacity: u8,
}

impl TouchTarget {
    pub fn new(control: ControlId, bounds: Rect, opacity: u8) -> Self {
        let kind = match control.kind() {
            ControlKind::Button(button) => TargetKind::Button {
                button,
                pressed: false,
            },
            ControlKind::Dpad => TargetKind::Dpad(DpadState::default()),
            ControlKind::Joystick { stick, click } => TargetKind::Joystick {
                stick,
                click,
                x: 0.0,
                y: 0.0,
                virtual_bounds: bounds,
            },
        };

        Self {
            control,
            kind,
            bounds,
            origin_bounds: bounds,
            track_id: UNCLAIMED,
            opacity,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.track_id != UNCLAIMED
    }

    pub fn is_owned_by(&self, pointer: i32) -> bool {
        self.track_id != UNCLAIMED && self.track_id == pointer
    }

    pub fn dpad_sprite(&self) -> Option<DpadSprite> {
        match &self.kind {
            TargetKind::Dpad(state) => Some(state.sprite()),
            _ => None,
        }
    }

    /// Moves the drawn and persisted bounds together, used while editing
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.bounds = self.bounds.offset(dx, dy);
        self.origin_bounds = self.origin_bounds.offset(dx, dy);
        if let TargetKind::Joystick { virtual_bounds, .. } = &mut self.kind {
            *virtual_bounds = virtual_bounds.offset(dx, dy);
        }
    }
}
