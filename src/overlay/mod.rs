//! On-screen controller overlay
//!
//! 1. [`control`] - catalog of control identities and their defaults
//! 2. [`registry`] - reconciliation of the persisted control array
//! 3. [`target`] - touchable targets built from enabled controls
//! 4. [`dispatcher`] - pointer routing and edit mode
//!
//! ```text
//! OverlayControlData ──► TouchTarget ──► TouchDispatcher ──► OverlayAction
//! ```

pub mod control;
pub mod dispatcher;
pub mod geometry;
pub mod registry;
pub mod target;

pub use control::{ControlId, ControlKind};
pub use dispatcher::{HapticEffect, OverlayAction, TouchDispatcher, TouchEvent, TouchPhase};
pub use geometry::{Insets, Rect, Screen};
pub use registry::{LoadOutcome, OverlayControlRegistry};
pub use target::{DpadSprite, DpadState, TargetKind, TouchTarget};
