//! Turning polled candidates into stored bindings
//!
//! A [`BindingCapture`] lives for one rebind dialog. It filters candidates that come
//! from other devices than the one being configured, accepts at most one of them and
//! shapes it into the parameter package stored for the target.

use super::error::MappingError;
use crate::bridge::{InputType, NativeAnalog, NativeButton};
use crate::param_package::ParamPackage;
use tracing::{debug, info};

/// Engine of composite sticks built from single inputs
pub const ANALOG_FROM_BUTTON: &str = "analog_from_button";
/// Engine of an expected device that accepts input from anywhere
pub const ANY_ENGINE: &str = "any";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickDirection {
    Up,
    Down,
    Left,
    Right,
    Modifier,
}

impl StickDirection {
    pub fn key(self) -> &'static str {
        match self {
            StickDirection::Up => "up",
            StickDirection::Down => "down",
            StickDirection::Left => "left",
            StickDirection::Right => "right",
            StickDirection::Modifier => "modifier",
        }
    }
}

/// What the dialog is binding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingTarget {
    Button(NativeButton),
    /// `direction` receives single-input candidates
    Stick {
        stick: NativeAnalog,
        direction: StickDirection,
    },
    Motion,
}

impl BindingTarget {
    pub fn input_type(&self) -> InputType {
        match self {
            BindingTarget::Button(_) => InputType::Button,
            BindingTarget::Stick { .. } => InputType::Stick,
            BindingTarget::Motion => InputType::Motion,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CaptureOutcome {
    Accepted(ParamPackage),
    /// Came from another device, keep listening
    Rejected,
    /// A candidate was already taken
    Latched,
}

pub struct BindingCapture {
    target: BindingTarget,
    expected: ParamPackage,
    current: ParamPackage,
    accepted: bool,
}

impl BindingCapture {
    /// `expected` describes the device being configured, `current` the stored binding.
    pub fn new(
        target: BindingTarget,
        expected: ParamPackage,
        current: ParamPackage,
    ) -> Result<Self, MappingError> {
        let engine = expected.get_str("engine", ANY_ENGINE);
        if engine != ANY_ENGINE && !expected.has("guid") {
            return Err(MappingError::InvalidExpectedDevice(format!(
                "engine '{}' without guid",
                engine
            )));
        }

        Ok(Self {
            target,
            expected,
            current,
            accepted: false,
        })
    }

    pub fn target(&self) -> BindingTarget {
        self.target
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Binding after the last accepted candidate
    pub fn binding(&self) -> &ParamPackage {
        &self.current
    }

    pub fn is_acceptable(&self, candidate: &ParamPackage, registered: &[ParamPackage]) -> bool {
        if registered.len() == 1 {
            return true;
        }
        if candidate.has("motion") {
            return true;
        }
        if self.expected.get_str("engine", ANY_ENGINE) == ANY_ENGINE {
            return true;
        }

        let guid = candidate.get_str("guid", "");
        let guid_match = guid == self.expected.get_str("guid", "")
            || (self.expected.has("guid2") && guid == self.expected.get_str("guid2", ""));

        candidate.get_str("engine", "") == self.expected.get_str("engine", "")
            && guid_match
            && candidate.get("port", -1i64) == self.expected.get("port", -1i64)
    }

    pub fn offer(
        &mut self,
        candidate: &ParamPackage,
        registered: &[ParamPackage],
    ) -> Result<CaptureOutcome, MappingError> {
        if self.accepted {
            debug!("Ignoring candidate {}, binding already captured", candidate);
            return Ok(CaptureOutcome::Latched);
        }
        if !candidate.has("engine") {
            return Err(MappingError::MalformedCandidate(candidate.serialize()));
        }
        if !self.is_acceptable(candidate, registered) {
            debug!("Rejecting candidate {} from another device", candidate);
            return Ok(CaptureOutcome::Rejected);
        }

        let mut input = candidate.clone();
        input.set("display", display_name(candidate, registered));

        let binding = match self.target {
            BindingTarget::Button(button) => {
                if matches!(button, NativeButton::DUp | NativeButton::DLeft) && input.has("axis") {
                    input.set("invert", "-".to_string());
                }
                input
            }
            BindingTarget::Stick { direction, .. } => {
                if input.has("motion") {
                    return Err(MappingError::UnsupportedBinding(
                        "motion input on a stick".to_string(),
                    ));
                }
                if input.has("axis_x") && input.has("axis_y") {
                    input.set("invert_y", "-".to_string());
                    input
                } else {
                    self.fold_into_analog(direction, &input)
                }
            }
            BindingTarget::Motion => input,
        };

        info!("Captured binding {} for {:?}", binding, self.target);
        self.accepted = true;
        self.current = binding.clone();
        Ok(CaptureOutcome::Accepted(binding))
    }

    // Keeps the other directions of an existing composite
    fn fold_into_analog(&self, direction: StickDirection, input: &ParamPackage) -> ParamPackage {
        let mut analog = if self.current.get_str("engine", "") == ANALOG_FROM_BUTTON {
            self.current.clone()
        } else {
            let mut fresh = ParamPackage::new();
            fresh.set("engine", ANALOG_FROM_BUTTON.to_string());
            fresh
        };
        analog.set(direction.key(), input.serialize());
        analog
    }
}

fn display_name(candidate: &ParamPackage, registered: &[ParamPackage]) -> String {
    let guid = candidate.get_str("guid", "");
    let port = candidate.get("port", 0usize);
    let name = registered
        .iter()
        .find(|d| d.get_str("guid", "") == guid && d.get("port", usize::MAX) == port)
        .map(|d| d.get_str("display", ""))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| candidate.get_str("engine", ""));
    format!("{} {}", name, port)
}
