//! Free-fly camera configuration.

use glam::Vec3;

/// Camera start pose and motion tuning
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Initial eye position (world units)
    pub position: Vec3,

    /// World up direction, also the axis for vertical movement
    pub world_up: Vec3,

    /// Initial yaw (degrees); -90° looks down -Z
    pub yaw_deg: f32,

    /// Initial pitch (degrees)
    pub pitch_deg: f32,

    /// Base movement speed (world units per second)
    pub movement_speed: f32,

    /// Speed multiplier while the boost modifier is held
    pub boost_multiplier: f32,

    /// Pointer sensitivity (degrees per pointer unit)
    pub mouse_sensitivity: f32,

    /// Initial vertical field of view (degrees)
    pub zoom_deg: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 50.0, 140.0), // Above the water, back from the centre
            world_up: Vec3::Y,
            yaw_deg: -90.0,
            pitch_deg: -15.0, // Tilted down towards the surface
            movement_speed: 25.0,
            boost_multiplier: 3.0,
            mouse_sensitivity: 0.1,
            zoom_deg: 45.0,
        }
    }
}
