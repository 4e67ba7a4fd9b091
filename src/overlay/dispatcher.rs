//! Routing of multi-touch pointer events to overlay targets
//!
//! [`TouchDispatcher::process_event`] consumes one pointer event at a time and returns
//! the signals it produced. It never talks to the core itself, the caller applies the
//! returned [`OverlayAction`]s.
//!
//! # Ownership
//!
//! A target claims the first pointer that goes down inside its bounds while it is
//! unclaimed. Only the owning pointer moves or releases it. Pointers no target owns
//! are forwarded to the emulated touch panel.
//!
//! # Edit mode
//!
//! While editing, pointers drag controls instead of pressing them. Releasing a dragged
//! control writes its new normalized center into the active layout slot.

use super::control::ControlId;
use super::geometry::{Rect, Screen};
use super::registry::OverlayControlRegistry;
use super::target::{clamp_stick, DpadState, TargetKind, TouchTarget, UNCLAIMED};
use crate::bridge::{ButtonState, NativeAnalog, NativeButton};
use crate::persistence::{OverlayControlData, OverlaySettings};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One pointer event in screen pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub pointer: i32,
    pub x: f32,
    pub y: f32,
}

impl TouchEvent {
    pub fn down(pointer: i32, x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Down,
            pointer,
            x,
            y,
        }
    }

    pub fn moved(pointer: i32, x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Move,
            pointer,
            x,
            y,
        }
    }

    pub fn up(pointer: i32, x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Up,
            pointer,
            x,
            y,
        }
    }

    pub fn cancel(pointer: i32, x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Cancel,
            pointer,
            x,
            y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticEffect {
    Press,
    Release,
}

/// Signal produced by the dispatcher
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayAction {
    Button {
        port: usize,
        button: NativeButton,
        state: ButtonState,
    },
    /// Axes in core convention, y up
    Joystick {
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
    Haptic(HapticEffect),
    /// Control array changed and should be written out
    PersistControls,
}

#[derive(Clone, Copy, Debug)]
struct EditDrag {
    target: usize,
    pointer: i32,
    last_x: f32,
    last_y: f32,
}

pub struct TouchDispatcher {
    screen: Screen,
    settings: OverlaySettings,
    controls: Vec<OverlayControlData>,
    targets: Vec<TouchTarget>,
    port: usize,
    edit_mode: bool,
    drag: Option<EditDrag>,
    // Pointers whose claims were dropped, ignored until they lift
    invalidated: HashSet<i32>,
}

impl TouchDispatcher {
    pub fn new(
        screen: Screen,
        settings: OverlaySettings,
        controls: Vec<OverlayControlData>,
        port: usize,
    ) -> Self {
        let mut dispatcher = Self {
            screen,
            settings,
            controls,
            targets: Vec::new(),
            port,
            edit_mode: false,
            drag: None,
            invalidated: HashSet::new(),
        };
        dispatcher.rebuild_targets();
        dispatcher
    }

    pub fn targets(&self) -> &[TouchTarget] {
        &self.targets
    }

    pub fn controls(&self) -> &[OverlayControlData] {
        &self.controls
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn port(&self) -> usize {
        self.port
    }

    pub fn set_port(&mut self, port: usize) {
        self.port = port;
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn process_event(&mut self, event: &TouchEvent) -> Vec<OverlayAction> {
        let mut actions = Vec::new();

        if self.invalidated.contains(&event.pointer) {
            if matches!(event.phase, TouchPhase::Up | TouchPhase::Cancel) {
                self.invalidated.remove(&event.pointer);
            }
            return actions;
        }

        if self.edit_mode {
            self.process_edit(event, &mut actions);
            return actions;
        }

        let owner = self
            .targets
            .iter()
            .position(|t| t.is_owned_by(event.pointer));

        match event.phase {
            TouchPhase::Down => {
                let candidate = self
                    .targets
                    .iter()
                    .position(|t| !t.is_claimed() && t.bounds.contains(event.x, event.y));
                match (owner, candidate) {
                    (Some(_), _) => {
                        warn!("Pointer {} went down twice", event.pointer);
                    }
                    (None, Some(index)) => self.claim(index, event, &mut actions),
                    (None, None) => {
                        if self.settings.touchscreen {
                            actions.push(OverlayAction::TouchPressed {
                                finger_id: event.pointer,
                                x: event.x,
                                y: event.y,
                            });
                        }
                    }
                }
            }
            TouchPhase::Move => match owner {
                Some(index) => self.track(index, event, &mut actions),
                None => {
                    if self.settings.touchscreen {
                        actions.push(OverlayAction::TouchMoved {
                            finger_id: event.pointer,
                            x: event.x,
                            y: event.y,
                        });
                    }
                }
            },
            TouchPhase::Up | TouchPhase::Cancel => match owner {
                Some(index) => self.release(index, &mut actions),
                None => {
                    if self.settings.touchscreen {
                        actions.push(OverlayAction::TouchReleased {
                            finger_id: event.pointer,
                            x: event.x,
                            y: event.y,
                        });
                    }
                }
            },
        }

        actions
    }

    /// Releases every claimed target and cancels an edit drag.
    ///
    /// The affected pointers are ignored until they lift.
    pub fn invalidate_claims(&mut self) -> Vec<OverlayAction> {
        let mut actions = Vec::new();

        for index in 0..self.targets.len() {
            let pointer = self.targets[index].track_id;
            if pointer != UNCLAIMED {
                debug!(
                    "Invalidating claim of pointer {} on {}",
                    pointer, self.targets[index].control
                );
                self.invalidated.insert(pointer);
                self.release(index, &mut actions);
            }
        }

        if let Some(drag) = self.drag.take() {
            self.invalidated.insert(drag.pointer);
            // Put the dragged control back where it is persisted
            let restored = self
                .targets
                .get(drag.target)
                .and_then(|t| self.controls.iter().find(|c| c.id == t.control.as_str()))
                .and_then(|data| self.build_target(data));
            if let Some(target) = restored {
                self.targets[drag.target] = target;
            }
        }

        actions
    }

    /// Rebuilds all targets from the control array
    pub fn refresh_controls(&mut self) -> Vec<OverlayAction> {
        let actions = self.invalidate_claims();
        self.rebuild_targets();
        actions
    }

    pub fn set_settings(&mut self, settings: OverlaySettings) -> Vec<OverlayAction> {
        self.settings = settings;
        self.refresh_controls()
    }

    pub fn set_screen(&mut self, screen: Screen) -> Vec<OverlayAction> {
        self.screen = screen;
        self.refresh_controls()
    }

    pub fn set_edit_mode(&mut self, enabled: bool) -> Vec<OverlayAction> {
        if self.edit_mode == enabled {
            return Vec::new();
        }
        info!("Overlay edit mode {}", if enabled { "on" } else { "off" });
        let actions = self.invalidate_claims();
        self.edit_mode = enabled;
        actions
    }

    pub fn set_control_enabled(&mut self, id: ControlId, enabled: bool) -> Vec<OverlayAction> {
        if !OverlayControlRegistry::set_enabled(&mut self.controls, id, enabled) {
            return Vec::new();
        }
        let mut actions = self.refresh_controls();
        actions.push(OverlayAction::PersistControls);
        actions
    }

    /// Restores the defaults of the active layout
    pub fn reset_layout(&mut self) -> Vec<OverlayAction> {
        OverlayControlRegistry::reset_layout(&mut self.controls, self.settings.layout);
        let mut actions = self.refresh_controls();
        actions.push(OverlayAction::PersistControls);
        actions
    }

    fn rebuild_targets(&mut self) {
        if !self.settings.show_overlay {
            self.targets.clear();
            return;
        }

        let targets: Vec<TouchTarget> = self
            .controls
            .iter()
            .filter(|data| data.enabled)
            .filter_map(|data| self.build_target(data))
            .collect();
        debug!("Built {} overlay targets", targets.len());
        self.targets = targets;
    }

    fn build_target(&self, data: &OverlayControlData) -> Option<TouchTarget> {
        let id = ControlId::from_id(&data.id)?;
        let side = id.extent(self.settings.overlay_scale, self.screen.min_dimension());
        let (cx, cy) = self.screen.denormalize(data.position(self.settings.layout));
        Some(TouchTarget::new(
            id,
            Rect::square_at(cx, cy, side),
            self.settings.overlay_opacity,
        ))
    }

    fn haptic(&self, effect: HapticEffect, actions: &mut Vec<OverlayAction>) {
        if self.settings.haptic_feedback {
            actions.push(OverlayAction::Haptic(effect));
        }
    }

    fn push_dpad(&self, state: DpadState, actions: &mut Vec<OverlayAction>) {
        for (button, pressed) in state.buttons() {
            actions.push(OverlayAction::Button {
                port: self.port,
                button,
                state: ButtonState::from(pressed),
            });
        }
    }

    fn claim(&mut self, index: usize, event: &TouchEvent, actions: &mut Vec<OverlayAction>) {
        let port = self.port;
        let recenter = self.settings.joystick_rel_center;
        let target = &mut self.targets[index];
        target.track_id = event.pointer;
        debug!("Pointer {} claimed {}", event.pointer, target.control);

        match &mut target.kind {
            TargetKind::Button { button, pressed } => {
                *pressed = true;
                actions.push(OverlayAction::Button {
                    port,
                    button: *button,
                    state: ButtonState::Pressed,
                });
            }
            TargetKind::Dpad(state) => {
                let (dx, dy) = target.bounds.normalized_offset(event.x, event.y);
                *state = DpadState::from_offset(dx, dy);
                let state = *state;
                self.push_dpad(state, actions);
            }
            TargetKind::Joystick {
                stick,
                click,
                x,
                y,
                virtual_bounds,
            } => {
                if recenter {
                    *virtual_bounds = target.origin_bounds.recentered(event.x, event.y);
                    target.bounds = *virtual_bounds;
                }
                let (dx, dy) = virtual_bounds.normalized_offset(event.x, event.y);
                (*x, *y) = clamp_stick(dx, dy);
                push_joystick(port, *stick, *click, *x, *y, actions);
            }
        }

        self.haptic(HapticEffect::Press, actions);
    }

    fn track(&mut self, index: usize, event: &TouchEvent, actions: &mut Vec<OverlayAction>) {
        let port = self.port;
        let slide = self.settings.dpad_slide;
        let target = &mut self.targets[index];

        match &mut target.kind {
            TargetKind::Button { .. } => {}
            TargetKind::Dpad(state) => {
                if !slide {
                    return;
                }
                let (dx, dy) = target.bounds.normalized_offset(event.x, event.y);
                let next = DpadState::from_offset(dx, dy);
                if next != *state {
                    *state = next;
                    self.push_dpad(next, actions);
                }
            }
            TargetKind::Joystick {
                stick,
                click,
                x,
                y,
                virtual_bounds,
            } => {
                let (dx, dy) = virtual_bounds.normalized_offset(event.x, event.y);
                let (nx, ny) = clamp_stick(dx, dy);
                if nx != *x || ny != *y {
                    (*x, *y) = (nx, ny);
                    push_joystick(port, *stick, *click, nx, ny, actions);
                }
            }
        }
    }

    fn release(&mut self, index: usize, actions: &mut Vec<OverlayAction>) {
        let port = self.port;
        let target = &mut self.targets[index];
        debug!("Pointer {} released {}", target.track_id, target.control);
        target.track_id = UNCLAIMED;

        match &mut target.kind {
            TargetKind::Button { button, pressed } => {
                *pressed = false;
                actions.push(OverlayAction::Button {
                    port,
                    button: *button,
                    state: ButtonState::Released,
                });
            }
            TargetKind::Dpad(state) => {
                *state = DpadState::default();
                self.push_dpad(DpadState::default(), actions);
            }
            TargetKind::Joystick {
                stick,
                click,
                x,
                y,
                virtual_bounds,
            } => {
                (*x, *y) = (0.0, 0.0);
                *virtual_bounds = target.origin_bounds;
                target.bounds = target.origin_bounds;
                push_joystick(port, *stick, *click, 0.0, 0.0, actions);
            }
        }

        self.haptic(HapticEffect::Release, actions);
    }

    fn process_edit(&mut self, event: &TouchEvent, actions: &mut Vec<OverlayAction>) {
        match event.phase {
            TouchPhase::Down => {
                if self.drag.is_some() {
                    return;
                }
                if let Some(index) = self
                    .targets
                    .iter()
                    .position(|t| !t.is_claimed() && t.bounds.contains(event.x, event.y))
                {
                    debug!("Configuring {}", self.targets[index].control);
                    self.drag = Some(EditDrag {
                        target: index,
                        pointer: event.pointer,
                        last_x: event.x,
                        last_y: event.y,
                    });
                }
            }
            TouchPhase::Move => {
                if let Some(drag) = self.drag.as_mut().filter(|d| d.pointer == event.pointer) {
                    let (dx, dy) = (event.x - drag.last_x, event.y - drag.last_y);
                    drag.last_x = event.x;
                    drag.last_y = event.y;
                    let target = drag.target;
                    self.targets[target].translate(dx, dy);
                }
            }
            TouchPhase::Up | TouchPhase::Cancel => {
                let Some(drag) = self.drag.filter(|d| d.pointer == event.pointer) else {
                    return;
                };
                self.drag = None;

                let target = &self.targets[drag.target];
                let (cx, cy) = target.origin_bounds.center();
                let position = self.screen.normalize(cx, cy);
                info!(
                    "Saving {} at ({:.3}, {:.3}) for {:?}",
                    target.control, position.0, position.1, self.settings.layout
                );
                if OverlayControlRegistry::set_position(
                    &mut self.controls,
                    target.control,
                    self.settings.layout,
                    position,
                ) {
                    actions.push(OverlayAction::PersistControls);
                }
            }
        }
    }
}

// Stick clicks are not driven by the overlay, the button rides along released
fn push_joystick(
    port: usize,
    stick: NativeAnalog,
    click: NativeButton,
    x: f32,
    y: f32,
    actions: &mut Vec<OverlayAction>,
) {
    actions.push(OverlayAction::Joystick {
        port,
        stick,
        x,
        y: -y,
    });
    actions.push(OverlayAction::Button {
        port,
        button: click,
        state: ButtonState::Released,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::registry::OverlayControlRegistry;

    const PORT: usize = 8;

    fn dispatcher(settings: OverlaySettings) -> TouchDispatcher {
        TouchDispatcher::new(
            Screen::new(2000.0, 1000.0),
            settings,
            OverlayControlRegistry::defaults(),
            PORT,
        )
    }

    fn center_of(dispatcher: &TouchDispatcher, id: ControlId) -> (f32, f32) {
        dispatcher
            .targets()
            .iter()
            .find(|t| t.control == id)
            .map(|t| t.bounds.center())
            .expect("target present")
    }

    fn target(dispatcher: &TouchDispatcher, id: ControlId) -> &TouchTarget {
        dispatcher
            .targets()
            .iter()
            .find(|t| t.control == id)
            .expect("target present")
    }

    #[test]
    fn hidden_controls_have_no_target() {
        let dispatcher = dispatcher(OverlaySettings::default());
        assert!(dispatcher
            .targets()
            .iter()
            .all(|t| t.control != ControlId::ButtonHome));
        assert_eq!(dispatcher.targets().len(), ControlId::ALL.len() - 2);
    }

    #[test]
    fn button_press_and_release() {
        let mut dispatcher = dispatcher(OverlaySettings::default());
        let (x, y) = center_of(&dispatcher, ControlId::ButtonA);

        let down = dispatcher.process_event(&TouchEvent::down(3, x, y));
        assert_eq!(
            down,
            vec![OverlayAction::Button {
                port: PORT,
                button: NativeButton::A,
                state: ButtonState::Pressed
            }]
        );
        assert_eq!(target(&dispatcher, ControlId::ButtonA).track_id, 3);

        // Moves of a button owner report nothing
        assert!(dispatcher
            .process_event(&TouchEvent::moved(3, x + 5.0, y))
            .is_empty());

        let up = dispatcher.process_event(&TouchEvent::up(3, x, y));
        assert_eq!(
            up,
            vec![OverlayAction::Button {
                port: PORT,
                button: NativeButton::A,
                state: ButtonState::Released
            }]
        );
        assert_eq!(target(&dispatcher, ControlId::ButtonA).track_id, UNCLAIMED);
    }

    #[test]
    fn unclaimed_pointers_pass_through() {
        let mut dispatcher = dispatcher(OverlaySettings::default());
        let actions = dispatcher.process_event(&TouchEvent::down(0, 1000.0, 400.0));
        assert_eq!(
            actions,
            vec![OverlayAction::TouchPressed {
                finger_id: 0,
                x: 1000.0,
                y: 400.0
            }]
        );
        let actions = dispatcher.process_event(&TouchEvent::up(0, 1000.0, 400.0));
        assert!(matches!(
            actions[..],
            [OverlayAction::TouchReleased { finger_id: 0, .. }]
        ));
    }

    #[test]
    fn touchscreen_off_drops_passthrough() {
        let settings = OverlaySettings {
            touchscreen: false,
            ..OverlaySettings::default()
        };
        let mut dispatcher = dispatcher(settings);
        assert!(dispatcher
            .process_event(&TouchEvent::down(0, 1000.0, 400.0))
            .is_empty());
    }

    #[test]
    fn owned_release_does_not_reach_touch_panel() {
        let mut dispatcher = dispatcher(OverlaySettings::default());
        let (x, y) = center_of(&dispatcher, ControlId::ButtonB);
        dispatcher.process_event(&TouchEvent::down(1, x, y));
        let up = dispatcher.process_event(&TouchEvent::up(1, x, y));
        assert!(up
            .iter()
            .all(|a| !matches!(a, OverlayAction::TouchReleased { .. })));
    }

    #[test]
    fn dpad_reports_all_directions_and_slides() {
        let mut dispatcher = dispatcher(OverlaySettings::default());
        let dpad = target(&dispatcher, ControlId::CombinedDpad).bounds;
        let (cx, cy) = dpad.center();
        let half = dpad.width() / 2.0;

        let down = dispatcher.process_event(&TouchEvent::down(2, cx, cy - half * 0.9));
        assert_eq!(down.len(), 4);
        assert!(down.contains(&OverlayAction::Button {
            port: PORT,
            button: NativeButton::DUp,
            state: ButtonState::Pressed
        }));

        // Same direction, no report
        assert!(dispatcher
            .process_event(&TouchEvent::moved(2, cx, cy - half * 0.8))
            .is_empty());

        let slide = dispatcher.process_event(&TouchEvent::moved(2, cx - half * 0.9, cy - half * 0.9));
        assert!(slide.contains(&OverlayAction::Button {
            port: PORT,
            button: NativeButton::DLeft,
            state: ButtonState::Pressed
        }));
        assert_eq!(
            target(&dispatcher, ControlId::CombinedDpad).dpad_sprite(),
            Some(crate::overlay::target::DpadSprite::Diagonal(0))
        );
    }

    #[test]
    fn dpad_without_slide_ignores_moves() {
        let settings = OverlaySettings {
            dpad_slide: false,
            ..OverlaySettings::default()
        };
        let mut dispatcher = dispatcher(settings);
        let dpad = target(&dispatcher, ControlId::CombinedDpad).bounds;
        let (cx, cy) = dpad.center();
        let half = dpad.width() / 2.0;

        dispatcher.process_event(&TouchEvent::down(2, cx, cy));
        assert!(dispatcher
            .process_event(&TouchEvent::moved(2, cx + half * 0.9, cy))
            .is_empty());
    }

    #[test]
    fn joystick_recenters_and_inverts_y() {
        let settings = OverlaySettings {
            haptic_feedback: true,
            ..OverlaySettings::default()
        };
        let mut dispatcher = dispatcher(settings);
        let stick = target(&dispatcher, ControlId::StickR).bounds;
        let (cx, cy) = stick.center();
        let half = stick.width() / 2.0;
        let (down_x, down_y) = (cx + half * 0.5, cy);

        let down = dispatcher.process_event(&TouchEvent::down(4, down_x, down_y));
        assert_eq!(
            down,
            vec![
                OverlayAction::Joystick {
                    port: PORT,
                    stick: NativeAnalog::RStick,
                    x: 0.0,
                    y: -0.0
                },
                OverlayAction::Button {
                    port: PORT,
                    button: NativeButton::RStick,
                    state: ButtonState::Released
                },
                OverlayAction::Haptic(HapticEffect::Press),
            ]
        );

        // Straight up from the recentered point, past the rim
        let moved = dispatcher.process_event(&TouchEvent::moved(4, down_x, down_y - half * 2.0));
        match moved[..] {
            [OverlayAction::Joystick { x, y, .. }, OverlayAction::Button { button, state, .. }] => {
                assert_eq!(button, NativeButton::RStick);
                assert_eq!(state, ButtonState::Released);
                assert!(x.abs() < 1e-5);
                assert!((y - 1.0).abs() < 1e-5);
            }
            _ => panic!("unexpected actions {:?}", moved),
        }

        let up = dispatcher.process_event(&TouchEvent::up(4, down_x, down_y));
        assert_eq!(
            up,
            vec![
                OverlayAction::Joystick {
                    port: PORT,
                    stick: NativeAnalog::RStick,
                    x: 0.0,
                    y: 0.0
                },
                OverlayAction::Button {
                    port: PORT,
                    button: NativeButton::RStick,
                    state: ButtonState::Released
                },
                OverlayAction::Haptic(HapticEffect::Release),
            ]
        );
        assert_eq!(target(&dispatcher, ControlId::StickR).bounds, stick);
    }

    #[test]
    fn edit_drag_persists_new_position() {
        let mut dispatcher = dispatcher(OverlaySettings::default());
        dispatcher.set_edit_mode(true);
        let (x, y) = center_of(&dispatcher, ControlId::ButtonX);

        assert!(dispatcher.process_event(&TouchEvent::down(0, x, y)).is_empty());
        assert!(dispatcher
            .process_event(&TouchEvent::moved(0, x - 100.0, y + 50.0))
            .is_empty());
        let up = dispatcher.process_event(&TouchEvent::up(0, x - 100.0, y + 50.0));
        assert_eq!(up, vec![OverlayAction::PersistControls]);

        let saved = dispatcher
            .controls()
            .iter()
            .find(|c| c.id == "button_x")
            .expect("button_x present")
            .landscape_position;
        let expected = ControlId::ButtonX.default_data().landscape_position;
        assert!((saved.0 - (expected.0 - 0.05)).abs() < 1e-4);
        assert!((saved.1 - (expected.1 + 0.05)).abs() < 1e-4);
    }

    #[test]
    fn invalidated_pointer_is_ignored_until_up() {
        let mut dispatcher = dispatcher(OverlaySettings::default());
        let (x, y) = center_of(&dispatcher, ControlId::ButtonY);
        dispatcher.process_event(&TouchEvent::down(5, x, y));

        let released = dispatcher.invalidate_claims();
        assert_eq!(
            released,
            vec![OverlayAction::Button {
                port: PORT,
                button: NativeButton::Y,
                state: ButtonState::Released
            }]
        );

        assert!(dispatcher
            .process_event(&TouchEvent::moved(5, 1000.0, 500.0))
            .is_empty());
        assert!(dispatcher.process_event(&TouchEvent::up(5, x, y)).is_empty());

        // The id is usable again afterwards
        assert!(!dispatcher
            .process_event(&TouchEvent::down(5, x, y))
            .is_empty());
    }

    #[test]
    fn overlay_off_builds_nothing() {
        let settings = OverlaySettings {
            show_overlay: false,
            ..OverlaySettings::default()
        };
        let dispatcher = dispatcher(settings);
        assert!(dispatcher.targets().is_empty());
    }
}
