//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{ranges, RenderConfig, ShaderFailurePolicy, WaveParameterSet};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "swell")]
#[command(about = "Real-time procedural ocean surface viewer", long_about = None)]
pub struct Args {
    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1200)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 900)]
    pub height: u32,

    /// Grid extent along X and Z (world units)
    #[arg(long, value_name = "UNITS", default_value_t = 2000.0)]
    pub side_length: f64,

    /// Grid subdivisions per side
    #[arg(long, value_name = "N", default_value_t = 2000)]
    pub edges: u32,

    /// Height of the undisplaced grid
    #[arg(long, value_name = "UNITS", default_value_t = 0.0, allow_hyphen_values = true)]
    pub grid_height: f64,

    /// Directory with wave.{vert,frag}.wgsl and skybox.{vert,frag}.wgsl
    #[arg(long, value_name = "DIR", default_value = "assets/shaders")]
    pub shader_dir: PathBuf,

    /// Directory with right/left/top/bottom/front/back.bmp
    #[arg(long, value_name = "DIR", default_value = "assets/skybox")]
    pub skybox_dir: PathBuf,

    /// What to do when a shader fails to build
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = ShaderFailurePolicy::Fallback)]
    pub on_shader_error: ShaderFailurePolicy,

    /// Number of summed waves (1-128)
    #[arg(long, value_name = "COUNT")]
    pub wave_count: Option<u32>,
}

impl Args {
    /// Rendering configuration with command-line overrides applied
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            side_length: self.side_length,
            edges_per_side: self.edges,
            grid_height: self.grid_height,
            shader_dir: self.shader_dir.clone(),
            skybox_dir: self.skybox_dir.clone(),
            shader_failure: self.on_shader_error,
            ..RenderConfig::default()
        }
    }

    /// Default wave parameters with command-line overrides applied
    pub fn wave_params(&self) -> WaveParameterSet {
        let mut params = WaveParameterSet::default();
        if let Some(count) = self.wave_count {
            if !ranges::WAVE_COUNT.contains(&count) {
                log::warn!(
                    "Wave count {count} outside {}..={}, clamping",
                    ranges::WAVE_COUNT.start(),
                    ranges::WAVE_COUNT.end()
                );
            }
            params.shape.wave_count = count;
        }
        params.clamp_to_ranges();
        params
    }
}
