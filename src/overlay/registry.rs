//! Loading and maintenance of the persisted control array

use super::control::ControlId;
use crate::persistence::{OverlayControlData, OverlayLayout};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Result of reconciling a persisted control array with the catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every catalog id was present exactly once
    Unchanged,
    /// The array was empty and got filled from defaults
    Populated,
    /// Missing ids were appended and duplicates dropped
    Merged {
        appended: Vec<ControlId>,
        duplicates_removed: usize,
    },
}

impl LoadOutcome {
    pub fn needs_persist(&self) -> bool {
        !matches!(self, LoadOutcome::Unchanged)
    }
}

pub struct OverlayControlRegistry;

impl OverlayControlRegistry {
    pub fn defaults() -> Vec<OverlayControlData> {
        ControlId::ALL.iter().map(|id| id.default_data()).collect()
    }

    /// Brings `controls` in line with the catalog without touching existing entries.
    ///
    /// Ids the catalog does not know are kept as they are.
    pub fn load(controls: &mut Vec<OverlayControlData>) -> LoadOutcome {
        if controls.is_empty() {
            info!("No overlay controls persisted, populating defaults");
            *controls = Self::defaults();
            return LoadOutcome::Populated;
        }

        let mut seen = HashSet::new();
        let before = controls.len();
        controls.retain(|control| seen.insert(control.id.clone()));
        let duplicates_removed = before - controls.len();
        if duplicates_removed > 0 {
            warn!(
                "Dropped {} duplicate overlay control entries",
                duplicates_removed
            );
        }

        let appended: Vec<ControlId> = ControlId::ALL
            .into_iter()
            .filter(|id| !seen.contains(id.as_str()))
            .collect();
        for id in &appended {
            debug!("Appending new overlay control {}", id);
            controls.push(id.default_data());
        }

        if appended.is_empty() && duplicates_removed == 0 {
            LoadOutcome::Unchanged
        } else {
            LoadOutcome::Merged {
                appended,
                duplicates_removed,
            }
        }
    }

    /// Restores default positions for `layout` and default visibility for every control
    pub fn reset_layout(controls: &mut Vec<OverlayControlData>, layout: OverlayLayout) {
        info!("Resetting overlay layout {:?}", layout);
        for control in controls.iter_mut() {
            if let Some(id) = ControlId::from_id(&control.id) {
                let defaults = id.default_data();
                control.enabled = defaults.enabled;
                control.set_position(layout, defaults.position(layout));
            }
        }
        Self::load(controls);
    }

    pub fn set_position(
        controls: &mut [OverlayControlData],
        id: ControlId,
        layout: OverlayLayout,
        position: (f64, f64),
    ) -> bool {
        match controls.iter_mut().find(|c| c.id == id.as_str()) {
            Some(control) => {
                control.set_position(layout, position);
                true
            }
            None => {
                warn!("Overlay control {} is not registered", id);
                false
            }
        }
    }

    pub fn set_enabled(controls: &mut [OverlayControlData], id: ControlId, enabled: bool) -> bool {
        match controls.iter_mut().find(|c| c.id == id.as_str()) {
            Some(control) => {
                control.enabled = enabled;
                true
            }
            None => false,
        }
    }
}
