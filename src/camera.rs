//! Free-fly camera driven by keyboard directions and pointer deltas.

use glam::{Mat3, Mat4, Vec3};

use crate::params::CameraConfig;

/// Pitch stays in the closed range [-89°, 89°], so the basis never degenerates
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Zoom (vertical field of view) bounds in degrees
pub const MIN_ZOOM_DEG: f32 = 1.0;
pub const MAX_ZOOM_DEG: f32 = 45.0;

/// Discrete movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    /// Along world up, not camera up
    Up,
    /// Along world down, not camera down
    Down,
}

/// Yaw/pitch camera with a derived orthonormal basis
#[derive(Debug, Clone)]
pub struct FreeFlyCamera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,

    /// Degrees, unbounded
    yaw: f32,
    /// Degrees, within ±PITCH_LIMIT_DEG
    pitch: f32,

    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
}

impl FreeFlyCamera {
    /// Create a camera with default speed, sensitivity and zoom
    ///
    /// # Arguments
    /// * `position` - Eye position
    /// * `world_up` - World up direction
    /// * `yaw` - Heading in degrees (0° looks down +X, -90° down -Z)
    /// * `pitch` - Elevation in degrees, clamped to the stable range
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let defaults = CameraConfig::default();
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            movement_speed: defaults.movement_speed,
            mouse_sensitivity: defaults.mouse_sensitivity,
            zoom: defaults.zoom_deg,
        };
        camera.update_camera_vectors();
        camera
    }

    /// Create a camera from a full configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            config.position,
            config.world_up,
            config.yaw_deg,
            config.pitch_deg,
        );
        camera.movement_speed = config.movement_speed;
        camera.mouse_sensitivity = config.mouse_sensitivity;
        camera.zoom = config.zoom_deg.clamp(MIN_ZOOM_DEG, MAX_ZOOM_DEG);
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// Overwrite the movement speed (used for the boost modifier)
    pub fn set_movement_speed(&mut self, speed: f32) {
        self.movement_speed = speed;
    }

    /// Look-at transform from the current position and orientation
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// View matrix without translation, so the skybox stays infinitely far away
    pub fn skybox_view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }

    /// Perspective projection using the current zoom as vertical field of view
    pub fn projection_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect_ratio, near, far)
    }

    /// Move along the camera basis by `movement_speed * elapsed_s`
    pub fn process_keyboard(&mut self, direction: CameraMovement, elapsed_s: f32) {
        let velocity = self.movement_speed * elapsed_s;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.world_up * velocity,
            CameraMovement::Down => self.position -= self.world_up * velocity,
        }
    }

    /// Rotate by a pointer delta (already oriented so +dy looks up)
    pub fn process_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

        self.update_camera_vectors();
    }

    /// Narrow or widen the field of view by a scroll offset
    pub fn process_scroll(&mut self, offset: f32) {
        self.zoom = (self.zoom - offset).clamp(MIN_ZOOM_DEG, MAX_ZOOM_DEG);
    }

    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FreeFlyCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = FreeFlyCamera::new(Vec3::ZERO, Vec3::Y, 37.0, -22.0);

        assert!((camera.front().length() - 1.0).abs() < EPS);
        assert!((camera.right().length() - 1.0).abs() < EPS);
        assert!((camera.up().length() - 1.0).abs() < EPS);
        assert!(camera.front().dot(camera.right()).abs() < EPS);
        assert!(camera.front().dot(camera.up()).abs() < EPS);
        assert!(camera.right().dot(camera.up()).abs() < EPS);
    }

    #[test]
    fn test_view_matrix_looking_down_negative_z_is_identity() {
        let camera = FreeFlyCamera::new(Vec3::ZERO, Vec3::Y, -90.0, 0.0);

        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(camera.view_matrix().abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn test_pitch_saturates_at_inclusive_limit() {
        let mut camera = FreeFlyCamera::default();

        // The limit itself is reachable; only values past it are cut off
        for _ in 0..1000 {
            camera.process_pointer_delta(3.0, 250.0);
            assert!(camera.pitch() <= PITCH_LIMIT_DEG);
        }
        assert_eq!(camera.pitch(), PITCH_LIMIT_DEG);
        assert!(camera.front().is_finite());

        for _ in 0..1000 {
            camera.process_pointer_delta(-3.0, -1.0e6);
            assert!(camera.pitch() >= -PITCH_LIMIT_DEG);
        }
        assert_eq!(camera.pitch(), -PITCH_LIMIT_DEG);
        assert!(camera.right().is_finite());
        assert!(camera.up().y > 0.0);
    }

    #[test]
    fn test_yaw_is_unbounded() {
        let mut camera = FreeFlyCamera::new(Vec3::ZERO, Vec3::Y, 0.0, 0.0);
        let initial_front = camera.front();

        // Sensitivity 0.1 → 3600 units is one full turn
        camera.process_pointer_delta(3600.0, 0.0);

        assert!((camera.yaw() - 360.0).abs() < 1e-3);
        assert!(camera.front().abs_diff_eq(initial_front, 1e-4));
    }

    #[test]
    fn test_forward_moves_along_initial_front() {
        let mut camera = FreeFlyCamera::new(Vec3::new(0.0, 50.0, 140.0), Vec3::Y, 0.0, -15.0);
        let start = camera.position();
        let front = camera.front();
        let speed = camera.movement_speed();

        camera.process_keyboard(CameraMovement::Forward, 1.0);

        let moved = camera.position() - start;
        assert!((moved.length() - speed).abs() < 1e-3);
        assert!(moved.normalize().abs_diff_eq(front, EPS));
    }

    #[test]
    fn test_vertical_movement_uses_world_up() {
        let mut camera = FreeFlyCamera::new(Vec3::ZERO, Vec3::Y, 0.0, -45.0);
        camera.set_movement_speed(2.0);

        camera.process_keyboard(CameraMovement::Up, 0.5);
        assert!(camera.position().abs_diff_eq(Vec3::Y, EPS));

        camera.process_keyboard(CameraMovement::Down, 1.0);
        assert!(camera.position().abs_diff_eq(-Vec3::Y, EPS));
    }

    #[test]
    fn test_left_and_right_cancel() {
        let mut camera = FreeFlyCamera::default();
        let start = camera.position();

        camera.process_keyboard(CameraMovement::Left, 0.25);
        camera.process_keyboard(CameraMovement::Right, 0.25);

        assert!(camera.position().abs_diff_eq(start, 1e-3));
    }

    #[test]
    fn test_scroll_clamps_zoom() {
        let mut camera = FreeFlyCamera::default();

        camera.process_scroll(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM_DEG);

        camera.process_scroll(-100.0);
        assert_eq!(camera.zoom(), MAX_ZOOM_DEG);
    }

    #[test]
    fn test_skybox_view_has_no_translation() {
        let camera = FreeFlyCamera::new(Vec3::new(10.0, 20.0, 30.0), Vec3::Y, 12.0, 5.0);
        let skybox_view = camera.skybox_view_matrix();

        assert_eq!(skybox_view.w_axis, glam::Vec4::W);
        assert!(Mat3::from_mat4(skybox_view)
            .abs_diff_eq(Mat3::from_mat4(camera.view_matrix()), EPS));
    }

    #[test]
    fn test_from_config_applies_tuning() {
        let config = CameraConfig {
            movement_speed: 7.0,
            zoom_deg: 30.0,
            ..CameraConfig::default()
        };
        let camera = FreeFlyCamera::from_config(&config);

        assert_eq!(camera.movement_speed(), 7.0);
        assert_eq!(camera.zoom(), 30.0);
        assert_eq!(camera.position(), config.position);
    }
}
