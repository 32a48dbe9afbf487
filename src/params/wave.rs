//! Wave synthesis parameters and lighting.
//!
//! The wave shader sums `wave_count` exponential-sine waves. The first wave uses the seed
//! values, each following wave scales them by the decay factors and advances the direction
//! seed by `delta_seed`. The final height is normalized to `desired_amplitude`.

use std::ops::RangeInclusive;

use glam::Vec3;

/// Colour from 8-bit channels
pub fn rgb(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// Overall shape of the summed height field
#[derive(Debug, Clone, PartialEq)]
pub struct WaveShape {
    /// Number of summed waves
    pub wave_count: u32,

    /// Peak displacement after normalization (world units)
    pub desired_amplitude: f32,

    /// Sharpness of the crests (exponent scale on the sine)
    pub peak_height: f32,

    /// Exponent bias, lowers troughs relative to crests
    pub peak_offset: f32,
}

/// Values for the first wave
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSeed {
    pub start_amplitude: f32,

    /// Spatial frequency (radians per world unit)
    pub start_frequency: f32,

    /// Phase speed (radians per second)
    pub start_speed: f32,
}

/// Per-wave multipliers applied after each wave
#[derive(Debug, Clone, PartialEq)]
pub struct WaveDecay {
    pub decay_amplitude: f32,
    pub decay_frequency: f32,
    pub decay_speed: f32,

    /// Added to the direction seed between waves
    pub delta_seed: f32,
}

/// Phong surface coefficients and sun placement
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    /// Ambient reflectance `ka`
    pub ambient: Vec3,

    /// Diffuse reflectance `kd`
    pub diffuse: Vec3,

    /// Specular reflectance `ks`
    pub specular: Vec3,

    pub shininess: f32,

    /// Sun elevation in the XY plane (degrees, 90° = zenith)
    pub sun_angle_deg: f32,
}

/// Complete set of tunables read by the renderer every frame
#[derive(Debug, Clone, PartialEq)]
pub struct WaveParameterSet {
    pub shape: WaveShape,
    pub seed: WaveSeed,
    pub decay: WaveDecay,
    pub lighting: Lighting,
}

impl Default for WaveParameterSet {
    fn default() -> Self {
        Self {
            shape: WaveShape {
                wave_count: 64,
                desired_amplitude: 4.693,
                peak_height: 2.785,
                peak_offset: -1.246,
            },
            seed: WaveSeed {
                start_amplitude: 0.1,
                start_frequency: 0.015,
                start_speed: 27.974,
            },
            decay: WaveDecay {
                decay_amplitude: 0.893,
                decay_frequency: 1.078,
                decay_speed: 0.963,
                delta_seed: 5762.923,
            },
            lighting: Lighting {
                ambient: rgb(0, 26, 51),
                diffuse: rgb(24, 70, 117),
                specular: rgb(244, 214, 118),
                shininess: 5.0,
                sun_angle_deg: 90.0,
            },
        }
    }
}

/// Editing ranges for every scalar in [`WaveParameterSet`]
pub mod ranges {
    use super::RangeInclusive;

    pub const WAVE_COUNT: RangeInclusive<u32> = 1..=128;
    pub const DESIRED_AMPLITUDE: RangeInclusive<f32> = 0.5..=100.0;
    pub const PEAK_HEIGHT: RangeInclusive<f32> = 0.0..=10.0;
    pub const PEAK_OFFSET: RangeInclusive<f32> = -10.0..=10.0;

    pub const START_AMPLITUDE: RangeInclusive<f32> = 0.1..=10.0;
    pub const START_FREQUENCY: RangeInclusive<f32> = 0.0..=0.1;
    pub const START_SPEED: RangeInclusive<f32> = 0.5..=100.0;

    pub const DECAY_AMPLITUDE: RangeInclusive<f32> = 0.0..=1.0;
    pub const DECAY_FREQUENCY: RangeInclusive<f32> = 1.0..=2.0;
    pub const DECAY_SPEED: RangeInclusive<f32> = 0.0..=2.0;
    pub const DELTA_SEED: RangeInclusive<f32> = 0.0..=10000.0;

    pub const SUN_ANGLE_DEG: RangeInclusive<f32> = 0.0..=359.99;
    pub const SHININESS: RangeInclusive<f32> = 0.0..=100.0;
    pub const COLOR_CHANNEL: RangeInclusive<f32> = 0.0..=1.0;
}

fn clamp_to<T: PartialOrd + Copy>(value: &mut T, range: RangeInclusive<T>) {
    if *value < *range.start() {
        *value = *range.start();
    } else if *value > *range.end() {
        *value = *range.end();
    }
}

fn clamp_color(color: &mut Vec3) {
    *color = color.clamp(
        Vec3::splat(*ranges::COLOR_CHANNEL.start()),
        Vec3::splat(*ranges::COLOR_CHANNEL.end()),
    );
}

impl WaveParameterSet {
    /// Pull every value back into its editing range
    pub fn clamp_to_ranges(&mut self) {
        clamp_to(&mut self.shape.wave_count, ranges::WAVE_COUNT);
        clamp_to(&mut self.shape.desired_amplitude, ranges::DESIRED_AMPLITUDE);
        clamp_to(&mut self.shape.peak_height, ranges::PEAK_HEIGHT);
        clamp_to(&mut self.shape.peak_offset, ranges::PEAK_OFFSET);

        clamp_to(&mut self.seed.start_amplitude, ranges::START_AMPLITUDE);
        clamp_to(&mut self.seed.start_frequency, ranges::START_FREQUENCY);
        clamp_to(&mut self.seed.start_speed, ranges::START_SPEED);

        clamp_to(&mut self.decay.decay_amplitude, ranges::DECAY_AMPLITUDE);
        clamp_to(&mut self.decay.decay_frequency, ranges::DECAY_FREQUENCY);
        clamp_to(&mut self.decay.decay_speed, ranges::DECAY_SPEED);
        clamp_to(&mut self.decay.delta_seed, ranges::DELTA_SEED);

        clamp_to(&mut self.lighting.sun_angle_deg, ranges::SUN_ANGLE_DEG);
        clamp_to(&mut self.lighting.shininess, ranges::SHININESS);
        clamp_color(&mut self.lighting.ambient);
        clamp_color(&mut self.lighting.diffuse);
        clamp_color(&mut self.lighting.specular);
    }

    /// Unit vector pointing towards the sun
    pub fn sun_direction(&self) -> Vec3 {
        let angle = self.lighting.sun_angle_deg.to_radians();
        Vec3::new(angle.cos(), angle.sin(), 0.0)
    }
}

/// Light source intensities, uploaded once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct LightIntensities {
    /// Ambient intensity `Ia`
    pub ambient: Vec3,

    /// Diffuse intensity `Id`
    pub diffuse: Vec3,

    /// Specular intensity `Is`
    pub specular: Vec3,
}

impl Default for LightIntensities {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
        }
    }
}
