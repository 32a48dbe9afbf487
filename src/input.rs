//! Keyboard and pointer state feeding the camera.
//!
//! W/S/A/D fly forward/back/left/right, Space and Left Control rise and sink along world up,
//! Left Shift multiplies the speed. The pointer only turns the camera while the right mouse
//! button is held. The scroll wheel zooms.

use std::collections::HashSet;

use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

use crate::camera::{CameraMovement, FreeFlyCamera};

/// Applied in this order so held-key movement is deterministic
const MOVEMENT_ORDER: [CameraMovement; 6] = [
    CameraMovement::Forward,
    CameraMovement::Backward,
    CameraMovement::Left,
    CameraMovement::Right,
    CameraMovement::Up,
    CameraMovement::Down,
];

/// Pointer-look toggled by a mouse button edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookChange {
    /// Capture and hide the cursor
    Enabled,
    /// Release and show the cursor
    Disabled,
}

/// Touchpad pixels that count as one wheel notch
const PIXELS_PER_SCROLL_LINE: f64 = 40.0;

/// Wheel notches in a scroll event, positive away from the user
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_SCROLL_LINE) as f32,
    }
}

fn movement_for(code: KeyCode) -> Option<CameraMovement> {
    match code {
        KeyCode::KeyW => Some(CameraMovement::Forward),
        KeyCode::KeyS => Some(CameraMovement::Backward),
        KeyCode::KeyA => Some(CameraMovement::Left),
        KeyCode::KeyD => Some(CameraMovement::Right),
        KeyCode::Space => Some(CameraMovement::Up),
        KeyCode::ControlLeft => Some(CameraMovement::Down),
        _ => None,
    }
}

#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<CameraMovement>,
    boost: bool,
    look_enabled: bool,
    quit_requested: bool,
}

impl InputState {
    pub fn on_key(&mut self, code: KeyCode, state: ElementState) {
        let pressed = state.is_pressed();
        match code {
            KeyCode::Escape if pressed => self.quit_requested = true,
            KeyCode::ShiftLeft => self.boost = pressed,
            _ => {
                if let Some(direction) = movement_for(code) {
                    if pressed {
                        self.held.insert(direction);
                    } else {
                        self.held.remove(&direction);
                    }
                }
            }
        }
    }

    /// Track the look button; returns a change only on an actual transition
    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<LookChange> {
        if button != MouseButton::Right {
            return None;
        }
        match (state, self.look_enabled) {
            (ElementState::Pressed, false) => {
                self.look_enabled = true;
                Some(LookChange::Enabled)
            }
            (ElementState::Released, true) => {
                self.look_enabled = false;
                Some(LookChange::Disabled)
            }
            _ => None,
        }
    }

    /// Turn a raw pointer delta into a camera rotation, if looking is enabled
    ///
    /// Screen y grows downwards, so it is flipped to make upward motion pitch up.
    pub fn pointer_delta(&self, delta: (f64, f64)) -> Option<(f32, f32)> {
        self.look_enabled
            .then(|| (delta.0 as f32, -(delta.1 as f32)))
    }

    /// Forget held keys, e.g. when the window loses focus
    ///
    /// Returns [`LookChange::Disabled`] if pointer-look was active.
    pub fn release_all(&mut self) -> Option<LookChange> {
        self.held.clear();
        self.boost = false;
        if std::mem::take(&mut self.look_enabled) {
            Some(LookChange::Disabled)
        } else {
            None
        }
    }

    /// Move the camera for every held direction
    pub fn apply(
        &self,
        camera: &mut FreeFlyCamera,
        dt: f32,
        base_speed: f32,
        boost_multiplier: f32,
    ) {
        let speed = if self.boost {
            base_speed * boost_multiplier
        } else {
            base_speed
        };
        camera.set_movement_speed(speed);

        for direction in MOVEMENT_ORDER {
            if self.held.contains(&direction) {
                camera.process_keyboard(direction, dt);
            }
        }
    }

    pub fn is_held(&self, direction: CameraMovement) -> bool {
        self.held.contains(&direction)
    }

    pub fn boost(&self) -> bool {
        self.boost
    }

    pub fn look_enabled(&self) -> bool {
        self.look_enabled
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const PRESSED: ElementState = ElementState::Pressed;
    const RELEASED: ElementState = ElementState::Released;

    #[test]
    fn test_keys_map_to_directions() {
        let mut input = InputState::default();
        for (code, direction) in [
            (KeyCode::KeyW, CameraMovement::Forward),
            (KeyCode::KeyS, CameraMovement::Backward),
            (KeyCode::KeyA, CameraMovement::Left),
            (KeyCode::KeyD, CameraMovement::Right),
            (KeyCode::Space, CameraMovement::Up),
            (KeyCode::ControlLeft, CameraMovement::Down),
        ] {
            input.on_key(code, PRESSED);
            assert!(input.is_held(direction), "{code:?}");
            input.on_key(code, RELEASED);
            assert!(!input.is_held(direction), "{code:?}");
        }
    }

    #[test]
    fn test_shift_is_held_boost() {
        let mut input = InputState::default();
        input.on_key(KeyCode::ShiftLeft, PRESSED);
        assert!(input.boost());
        input.on_key(KeyCode::ShiftLeft, RELEASED);
        assert!(!input.boost());
    }

    #[test]
    fn test_escape_requests_quit() {
        let mut input = InputState::default();
        input.on_key(KeyCode::Escape, RELEASED);
        assert!(!input.quit_requested());
        input.on_key(KeyCode::Escape, PRESSED);
        assert!(input.quit_requested());
    }

    #[test]
    fn test_right_button_toggles_look_on_edges() {
        let mut input = InputState::default();

        assert_eq!(input.on_mouse_button(MouseButton::Left, PRESSED), None);
        assert_eq!(
            input.on_mouse_button(MouseButton::Right, PRESSED),
            Some(LookChange::Enabled)
        );
        // Repeated press is not a transition
        assert_eq!(input.on_mouse_button(MouseButton::Right, PRESSED), None);
        assert_eq!(
            input.on_mouse_button(MouseButton::Right, RELEASED),
            Some(LookChange::Disabled)
        );
        assert_eq!(input.on_mouse_button(MouseButton::Right, RELEASED), None);
    }

    #[test]
    fn test_pointer_delta_gated_and_flipped() {
        let mut input = InputState::default();
        assert_eq!(input.pointer_delta((4.0, 2.0)), None);

        input.on_mouse_button(MouseButton::Right, PRESSED);
        assert_eq!(input.pointer_delta((4.0, 2.0)), Some((4.0, -2.0)));
    }

    #[test]
    fn test_release_all_clears_everything() {
        let mut input = InputState::default();
        input.on_key(KeyCode::KeyW, PRESSED);
        input.on_key(KeyCode::ShiftLeft, PRESSED);
        input.on_mouse_button(MouseButton::Right, PRESSED);

        assert_eq!(input.release_all(), Some(LookChange::Disabled));
        assert!(!input.is_held(CameraMovement::Forward));
        assert!(!input.boost());
        assert!(!input.look_enabled());
        assert_eq!(input.release_all(), None);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::default();
        let mut camera = FreeFlyCamera::new(Vec3::ZERO, Vec3::Y, 30.0, 10.0);
        input.on_key(KeyCode::KeyW, PRESSED);
        input.on_key(KeyCode::KeyS, PRESSED);

        input.apply(&mut camera, 1.0, 10.0, 3.0);

        assert!(camera.position().abs_diff_eq(Vec3::ZERO, 1e-4));
    }

    #[test]
    fn test_apply_sets_speed_even_without_keys() {
        let mut input = InputState::default();
        let mut camera = FreeFlyCamera::default();

        input.on_key(KeyCode::ShiftLeft, PRESSED);
        input.apply(&mut camera, 0.1, 25.0, 3.0);
        assert_eq!(camera.movement_speed(), 75.0);

        input.on_key(KeyCode::ShiftLeft, RELEASED);
        input.apply(&mut camera, 0.1, 25.0, 3.0);
        assert_eq!(camera.movement_speed(), 25.0);
    }

    #[test]
    fn test_scroll_zooms_in_by_notches() {
        let mut camera = FreeFlyCamera::default();
        let start = camera.zoom();

        camera.process_scroll(scroll_lines(MouseScrollDelta::LineDelta(0.0, 2.0)));
        assert_eq!(camera.zoom(), start - 2.0);

        let pixels = winit::dpi::PhysicalPosition::new(0.0, -80.0);
        assert_eq!(scroll_lines(MouseScrollDelta::PixelDelta(pixels)), -2.0);
        camera.process_scroll(scroll_lines(MouseScrollDelta::PixelDelta(pixels)));
        assert_eq!(camera.zoom(), start);
    }
}
