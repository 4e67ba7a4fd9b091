//! Catalog of on-screen controls

use crate::bridge::{NativeAnalog, NativeButton};
use crate::persistence::OverlayControlData;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlId {
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,
    ButtonPlus,
    ButtonMinus,
    ButtonHome,
    ButtonCapture,
    ButtonL,
    ButtonR,
    ButtonZl,
    ButtonZr,
    ButtonStickL,
    ButtonStickR,
    StickL,
    StickR,
    CombinedDpad,
}

/// What a control turns touches into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Button(NativeButton),
    Dpad,
    Joystick {
        stick: NativeAnalog,
        click: NativeButton,
    },
}

struct CatalogEntry {
    id: ControlId,
    enabled: bool,
    landscape: (f64, f64),
    portrait: (f64, f64),
    foldable: (f64, f64),
}

const fn entry(
    id: ControlId,
    enabled: bool,
    landscape: (f64, f64),
    portrait: (f64, f64),
    foldable: (f64, f64),
) -> CatalogEntry {
    CatalogEntry {
        id,
        enabled,
        landscape,
        portrait,
        foldable,
    }
}

const CATALOG: [CatalogEntry; 17] = [
    entry(ControlId::ButtonA, true, (0.95, 0.61), (0.92, 0.73), (0.92, 0.79)),
    entry(ControlId::ButtonB, true, (0.89, 0.72), (0.84, 0.80), (0.84, 0.86)),
    entry(ControlId::ButtonX, true, (0.89, 0.50), (0.84, 0.66), (0.84, 0.72)),
    entry(ControlId::ButtonY, true, (0.83, 0.61), (0.76, 0.73), (0.76, 0.79)),
    entry(ControlId::ButtonPlus, true, (0.70, 0.08), (0.80, 0.58), (0.80, 0.62)),
    entry(ControlId::ButtonMinus, true, (0.30, 0.08), (0.20, 0.58), (0.20, 0.62)),
    entry(ControlId::ButtonHome, false, (0.67, 0.92), (0.62, 0.96), (0.62, 0.96)),
    entry(ControlId::ButtonCapture, false, (0.33, 0.92), (0.38, 0.96), (0.38, 0.96)),
    entry(ControlId::ButtonL, true, (0.12, 0.25), (0.14, 0.55), (0.14, 0.58)),
    entry(ControlId::ButtonR, true, (0.88, 0.25), (0.86, 0.55), (0.86, 0.58)),
    entry(ControlId::ButtonZl, true, (0.12, 0.09), (0.14, 0.48), (0.14, 0.52)),
    entry(ControlId::ButtonZr, true, (0.88, 0.09), (0.86, 0.48), (0.86, 0.52)),
    entry(ControlId::ButtonStickL, true, (0.08, 0.92), (0.12, 0.96), (0.12, 0.96)),
    entry(ControlId::ButtonStickR, true, (0.92, 0.92), (0.88, 0.96), (0.88, 0.96)),
    entry(ControlId::StickL, true, (0.14, 0.52), (0.22, 0.69), (0.22, 0.74)),
    entry(ControlId::StickR, true, (0.75, 0.80), (0.62, 0.86), (0.62, 0.90)),
    entry(ControlId::CombinedDpad, true, (0.26, 0.80), (0.24, 0.87), (0.24, 0.91)),
];

impl ControlId {
    pub const ALL: [ControlId; 17] = [
        ControlId::ButtonA,
        ControlId::ButtonB,
        ControlId::ButtonX,
        ControlId::ButtonY,
        ControlId::ButtonPlus,
        ControlId::ButtonMinus,
        ControlId::ButtonHome,
        ControlId::ButtonCapture,
        ControlId::ButtonL,
        ControlId::ButtonR,
        ControlId::ButtonZl,
        ControlId::ButtonZr,
        ControlId::ButtonStickL,
        ControlId::ButtonStickR,
        ControlId::StickL,
        ControlId::StickR,
        ControlId::CombinedDpad,
    ];

    /// Persisted id string
    pub fn as_str(self) -> &'static str {
        match self {
            ControlId::ButtonA => "button_a",
            ControlId::ButtonB => "button_b",
            ControlId::ButtonX => "button_x",
            ControlId::ButtonY => "button_y",
            ControlId::ButtonPlus => "button_plus",
            ControlId::ButtonMinus => "button_minus",
            ControlId::ButtonHome => "button_home",
            ControlId::ButtonCapture => "button_capture",
            ControlId::ButtonL => "button_l",
            ControlId::ButtonR => "button_r",
            ControlId::ButtonZl => "button_zl",
            ControlId::ButtonZr => "button_zr",
            ControlId::ButtonStickL => "button_stick_l",
            ControlId::ButtonStickR => "button_stick_r",
            ControlId::StickL => "stick_l",
            ControlId::StickR => "stick_r",
            ControlId::CombinedDpad => "combined_dpad",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }

    pub fn kind(self) -> ControlKind {
        match self {
            ControlId::ButtonA => ControlKind::Button(NativeButton::A),
            ControlId::ButtonB => ControlKind::Button(NativeButton::B),
            ControlId::ButtonX => ControlKind::Button(NativeButton::X),
            ControlId::ButtonY => ControlKind::Button(NativeButton::Y),
            ControlId::ButtonPlus => ControlKind::Button(NativeButton::Plus),
            ControlId::ButtonMinus => ControlKind::Button(NativeButton::Minus),
            ControlId::ButtonHome => ControlKind::Button(NativeButton::Home),
            ControlId::ButtonCapture => ControlKind::Button(NativeButton::Capture),
            ControlId::ButtonL => ControlKind::Button(NativeButton::L),
            ControlId::ButtonR => ControlKind::Button(NativeButton::R),
            ControlId::ButtonZl => ControlKind::Button(NativeButton::ZL),
            ControlId::ButtonZr => ControlKind::Button(NativeButton::ZR),
            ControlId::ButtonStickL => ControlKind::Button(NativeButton::LStick),
            ControlId::ButtonStickR => ControlKind::Button(NativeButton::RStick),
            ControlId::StickL => ControlKind::Joystick {
                stick: NativeAnalog::LStick,
                click: NativeButton::LStick,
            },
            ControlId::StickR => ControlKind::Joystick {
                stick: NativeAnalog::RStick,
                click: NativeButton::RStick,
            },
            ControlId::CombinedDpad => ControlKind::Dpad,
        }
    }

    /// Side length at scale 50 as a fraction of the shorter screen edge
    pub fn base_scale(self) -> f32 {
        match self {
            ControlId::ButtonHome
            | ControlId::ButtonCapture
            | ControlId::ButtonPlus
            | ControlId::ButtonMinus => 0.07,
            ControlId::ButtonL | ControlId::ButtonR | ControlId::ButtonZl | ControlId::ButtonZr => {
                0.26
            }
            ControlId::ButtonStickL | ControlId::ButtonStickR => 0.155,
            ControlId::ButtonA | ControlId::ButtonB | ControlId::ButtonX | ControlId::ButtonY => {
                0.11
            }
            ControlId::CombinedDpad => 0.25,
            ControlId::StickL | ControlId::StickR => 0.3,
        }
    }

    /// Square side in pixels for the given overlay scale percentage
    pub fn extent(self, overlay_scale: u8, min_screen_dimension: f32) -> f32 {
        let scale = (f32::from(overlay_scale) + 50.0) / 100.0;
        self.base_scale() * scale * min_screen_dimension
    }

    pub fn default_data(self) -> OverlayControlData {
        let entry = &CATALOG[self as usize];
        OverlayControlData {
            id: self.as_str().to_string(),
            enabled: entry.enabled,
            landscape_position: entry.landscape,
            portrait_position: entry.portrait,
            foldable_position: entry.foldable,
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
