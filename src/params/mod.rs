//! Parameter definitions with units and documented semantics.
//!
//! Every tunable of the viewer lives here:
//! - Wave shape/seed/decay scalars and lighting (pushed to the wave shader each frame)
//! - Camera start pose and motion tuning
//! - Window, grid and asset configuration

mod camera;
mod render;
mod wave;

// Re-export all types
pub use camera::CameraConfig;
pub use render::{RenderConfig, ShaderFailurePolicy};
pub use wave::{
    ranges, rgb, LightIntensities, Lighting, WaveDecay, WaveParameterSet, WaveSeed, WaveShape,
};
