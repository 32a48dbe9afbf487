//! Window, grid and asset configuration.

use std::path::PathBuf;

/// What to do when a shader program fails to load, compile or link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ShaderFailurePolicy {
    /// Propagate the error and stop
    Abort,

    /// Log the error and render with the built-in error-indicator program
    #[default]
    Fallback,
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    /// Far enough that the whole grid is visible from any point above it
    pub far_plane: f32,

    /// Clear colour (linear RGBA); only visible where the skybox is missing
    pub clear_color: [f64; 4],

    /// Grid extent along X and Z (world units)
    pub side_length: f64,

    /// Grid subdivisions per side
    /// 2000 keeps the index buffer (96 MB) under the default wgpu buffer limit
    pub edges_per_side: u32,

    /// Constant Y of the undisplaced grid
    pub grid_height: f64,

    /// Directory holding wave.vert.wgsl, wave.frag.wgsl, skybox.vert.wgsl, skybox.frag.wgsl
    pub shader_dir: PathBuf,

    /// Directory holding the six skybox faces
    pub skybox_dir: PathBuf,

    /// Shader load failure handling
    pub shader_failure: ShaderFailurePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 900,
            near_plane: 0.1,
            far_plane: 100_000.0,
            clear_color: [210.0 / 255.0, 180.0 / 255.0, 140.0 / 255.0, 1.0],
            side_length: 2000.0,
            edges_per_side: 2000,
            grid_height: 0.0,
            shader_dir: PathBuf::from("assets/shaders"),
            skybox_dir: PathBuf::from("assets/skybox"),
            shader_failure: ShaderFailurePolicy::Fallback,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    pub fn wave_shader_paths(&self) -> (PathBuf, PathBuf) {
        (
            self.shader_dir.join("wave.vert.wgsl"),
            self.shader_dir.join("wave.frag.wgsl"),
        )
    }

    pub fn skybox_shader_paths(&self) -> (PathBuf, PathBuf) {
        (
            self.shader_dir.join("skybox.vert.wgsl"),
            self.shader_dir.join("skybox.frag.wgsl"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aspect_ratio() {
        let config = RenderConfig::default();
        assert!((config.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_shader_paths_follow_shader_dir() {
        let config = RenderConfig {
            shader_dir: PathBuf::from("custom"),
            ..RenderConfig::default()
        };
        let (vert, frag) = config.wave_shader_paths();
        assert_eq!(vert, PathBuf::from("custom/wave.vert.wgsl"));
        assert_eq!(frag, PathBuf::from("custom/wave.frag.wgsl"));
    }
}
