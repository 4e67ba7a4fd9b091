//! # Persistence Module
//!
//! Data models for the configuration that survives between runs, plus the
//! [`config_store::ConfigStore`] that reads and writes them as TOML.
//!
//! ## Key Abstractions
//! - **GlobalConfig**: root record written to `config.toml`
//! - **OverlayConfig**: overlay preferences and the per-control placement array
//! - **OverlayControlData**: one on-screen control, its visibility and a normalized
//!   position for each screen layout
//!
//! ## Error Handling Strategy
//! File operations return `color_eyre` results with context. Every record carries
//! defaults so a missing file or missing table degrades to a usable configuration.

pub mod config_store;

use serde::{Deserialize, Serialize};

/// Screen layout a control position belongs to
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OverlayLayout {
    #[default]
    Landscape,
    Portrait,
    Foldable,
}

impl OverlayLayout {
    pub const ALL: [OverlayLayout; 3] = [
        OverlayLayout::Landscape,
        OverlayLayout::Portrait,
        OverlayLayout::Foldable,
    ];
}

/// User preferences for the on-screen overlay.
///
/// ## Usage Context
/// Read by the touch dispatcher whenever targets are rebuilt. `overlay_scale` and
/// `overlay_opacity` are percentages in `0..=100`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OverlaySettings {
    /// Draw and dispatch the overlay at all
    pub show_overlay: bool,
    /// Control size, 50 is the reference size
    pub overlay_scale: u8,
    pub overlay_opacity: u8,
    /// Vibrate on press and release of any control
    pub haptic_feedback: bool,
    /// Let the d-pad follow a sliding finger
    pub dpad_slide: bool,
    /// Center joysticks on the touch-down point
    pub joystick_rel_center: bool,
    /// Forward unclaimed pointers to the emulated touch panel
    pub touchscreen: bool,
    pub layout: OverlayLayout,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_overlay: true,
            overlay_scale: 50,
            overlay_opacity: 100,
            haptic_feedback: false,
            dpad_slide: true,
            joystick_rel_center: true,
            touchscreen: true,
            layout: OverlayLayout::Landscape,
        }
    }
}

/// Persisted placement of one overlay control.
///
/// Positions are normalized to the safe drawing rectangle, `(0, 0)` top left and
/// `(1, 1)` bottom right. The id stays a plain string so entries written by a
/// newer catalog survive a round trip through an older one.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct OverlayControlData {
    pub id: String,
    pub enabled: bool,
    pub landscape_position: (f64, f64),
    pub portrait_position: (f64, f64),
    pub foldable_position: (f64, f64),
}

impl OverlayControlData {
    pub fn position(&self, layout: OverlayLayout) -> (f64, f64) {
        match layout {
            OverlayLayout::Landscape => self.landscape_position,
            OverlayLayout::Portrait => self.portrait_position,
            OverlayLayout::Foldable => self.foldable_position,
        }
    }

    pub fn set_position(&mut self, layout: OverlayLayout, position: (f64, f64)) {
        match layout {
            OverlayLayout::Landscape => self.landscape_position = position,
            OverlayLayout::Portrait => self.portrait_position = position,
            OverlayLayout::Foldable => self.foldable_position = position,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub settings: OverlaySettings,
    pub controls: Vec<OverlayControlData>,
}

/// Root configuration record
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    pub overlay: OverlayConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let config: GlobalConfig = toml::from_str(
            r#"
            [overlay.settings]
            haptic_feedback = true
            layout = "portrait"
            "#,
        )
        .expect("partial config should parse");

        assert!(config.overlay.settings.haptic_feedback);
        assert_eq!(config.overlay.settings.layout, OverlayLayout::Portrait);
        assert_eq!(config.overlay.settings.overlay_scale, 50);
        assert!(config.overlay.controls.is_empty());
    }

    #[test]
    fn position_slots_are_independent() {
        let mut data = OverlayControlData {
            id: "button_a".to_string(),
            enabled: true,
            landscape_position: (0.1, 0.2),
            portrait_position: (0.3, 0.4),
            foldable_position: (0.5, 0.6),
        };
        data.set_position(OverlayLayout::Portrait, (0.9, 0.9));
        assert_eq!(data.position(OverlayLayout::Portrait), (0.9, 0.9));
        assert_eq!(data.position(OverlayLayout::Landscape), (0.1, 0.2));
        assert_eq!(data.position(OverlayLayout::Foldable), (0.5, 0.6));
    }
}
