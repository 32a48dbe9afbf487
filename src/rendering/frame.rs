//! Per-frame uniform upload.
//!
//! The wave program is fed one fixed set of names every frame. Programs that do not
//! declare a name ignore it, which is what lets the fallback program take the same push.

use glam::{Mat4, Vec3};

use crate::params::{LightIntensities, WaveParameterSet};

use super::uniforms::UniformSink;

/// Uniform names the wave program may declare
pub mod names {
    pub const PROJECTION: &str = "projection";
    pub const VIEW: &str = "view";
    pub const MODEL: &str = "model";
    pub const TIME: &str = "iTime";
    pub const CAMERA_POSITION: &str = "cameraPosition";
    pub const SUN_DIRECTION: &str = "sunDirection";

    pub const KA: &str = "ka";
    pub const KD: &str = "kd";
    pub const KS: &str = "ks";
    pub const SHININESS: &str = "shininess";

    pub const DESIRED_AMPLITUDE: &str = "desired_amplitude";
    pub const WAVE_COUNT: &str = "wave_count";
    pub const PEAK_HEIGHT: &str = "peak_height";
    pub const PEAK_OFFSET: &str = "peak_offset";
    pub const START_AMPLITUDE: &str = "start_amplitude";
    pub const START_FREQUENCY: &str = "start_frequency";
    pub const START_SPEED: &str = "start_speed";
    pub const DECAY_AMPLITUDE: &str = "decay_amplitude";
    pub const DECAY_FREQUENCY: &str = "decay_frequency";
    pub const DECAY_SPEED: &str = "decay_speed";
    pub const DELTA_SEED: &str = "delta_seed";

    pub const IA: &str = "Ia";
    pub const ID: &str = "Id";
    pub const IS: &str = "Is";
}

/// Everything pushed by [`push_frame_uniforms`], in push order
pub const FRAME_UNIFORMS: [&str; 21] = [
    names::PROJECTION,
    names::VIEW,
    names::MODEL,
    names::TIME,
    names::CAMERA_POSITION,
    names::SUN_DIRECTION,
    names::KA,
    names::KD,
    names::KS,
    names::SHININESS,
    names::DESIRED_AMPLITUDE,
    names::WAVE_COUNT,
    names::PEAK_HEIGHT,
    names::PEAK_OFFSET,
    names::START_AMPLITUDE,
    names::START_FREQUENCY,
    names::START_SPEED,
    names::DECAY_AMPLITUDE,
    names::DECAY_FREQUENCY,
    names::DECAY_SPEED,
    names::DELTA_SEED,
];

/// Pushed once after the wave program is created
pub const LIGHT_UNIFORMS: [&str; 3] = [names::IA, names::ID, names::IS];

/// Camera and clock state for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameGlobals<'a> {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    /// Seconds since startup
    pub time_s: f32,
    pub camera_position: Vec3,
    pub params: &'a WaveParameterSet,
}

pub fn push_frame_uniforms<S: UniformSink>(sink: &mut S, frame: &FrameGlobals<'_>) {
    let params = frame.params;

    sink.set(names::PROJECTION, frame.projection);
    sink.set(names::VIEW, frame.view);
    sink.set(names::MODEL, frame.model);
    sink.set(names::TIME, frame.time_s);
    sink.set(names::CAMERA_POSITION, frame.camera_position);
    sink.set(names::SUN_DIRECTION, params.sun_direction());

    sink.set(names::KA, params.lighting.ambient);
    sink.set(names::KD, params.lighting.diffuse);
    sink.set(names::KS, params.lighting.specular);
    sink.set(names::SHININESS, params.lighting.shininess);

    sink.set(names::DESIRED_AMPLITUDE, params.shape.desired_amplitude);
    sink.set(names::WAVE_COUNT, params.shape.wave_count);
    sink.set(names::PEAK_HEIGHT, params.shape.peak_height);
    sink.set(names::PEAK_OFFSET, params.shape.peak_offset);
    sink.set(names::START_AMPLITUDE, params.seed.start_amplitude);
    sink.set(names::START_FREQUENCY, params.seed.start_frequency);
    sink.set(names::START_SPEED, params.seed.start_speed);
    sink.set(names::DECAY_AMPLITUDE, params.decay.decay_amplitude);
    sink.set(names::DECAY_FREQUENCY, params.decay.decay_frequency);
    sink.set(names::DECAY_SPEED, params.decay.decay_speed);
    sink.set(names::DELTA_SEED, params.decay.delta_seed);
}

pub fn push_light_intensities<S: UniformSink>(sink: &mut S, light: &LightIntensities) {
    sink.set(names::IA, light.ambient);
    sink.set(names::ID, light.diffuse);
    sink.set(names::IS, light.specular);
}

/// Skybox takes the projection and a view with translation stripped
pub fn push_skybox_uniforms<S: UniformSink>(sink: &mut S, projection: Mat4, skybox_view: Mat4) {
    sink.set(names::PROJECTION, projection);
    sink.set(names::VIEW, skybox_view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::uniforms::UniformValue;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(String, UniformValue)>,
    }

    impl UniformSink for Recorder {
        fn set<V: Into<UniformValue>>(&mut self, name: &str, value: V) {
            self.calls.push((name.to_string(), value.into()));
        }
    }

    impl Recorder {
        fn get(&self, name: &str) -> Option<UniformValue> {
            self.calls
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, value)| *value)
        }
    }

    fn frame(params: &WaveParameterSet) -> FrameGlobals<'_> {
        FrameGlobals {
            projection: Mat4::from_scale(Vec3::splat(2.0)),
            view: Mat4::from_translation(Vec3::X),
            model: Mat4::IDENTITY,
            time_s: 12.5,
            camera_position: Vec3::new(0.0, 50.0, 140.0),
            params,
        }
    }

    #[test]
    fn test_pushes_every_frame_uniform_once_in_order() {
        let params = WaveParameterSet::default();
        let mut recorder = Recorder::default();

        push_frame_uniforms(&mut recorder, &frame(&params));

        let pushed: Vec<&str> = recorder.calls.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(pushed, FRAME_UNIFORMS);
    }

    #[test]
    fn test_values_come_from_frame_and_params() {
        let mut params = WaveParameterSet::default();
        params.shape.wave_count = 17;
        params.decay.delta_seed = 42.0;
        let mut recorder = Recorder::default();

        push_frame_uniforms(&mut recorder, &frame(&params));

        assert_eq!(recorder.get("wave_count"), Some(UniformValue::Uint(17)));
        assert_eq!(recorder.get("delta_seed"), Some(UniformValue::Float(42.0)));
        assert_eq!(recorder.get("iTime"), Some(UniformValue::Float(12.5)));
        assert_eq!(recorder.get("model"), Some(UniformValue::Mat4(Mat4::IDENTITY)));
        assert_eq!(
            recorder.get("cameraPosition"),
            Some(UniformValue::Vec3(Vec3::new(0.0, 50.0, 140.0)))
        );
        assert_eq!(
            recorder.get("sunDirection"),
            Some(UniformValue::Vec3(params.sun_direction()))
        );
        assert_eq!(
            recorder.get("ka"),
            Some(UniformValue::Vec3(params.lighting.ambient))
        );
    }

    #[test]
    fn test_light_intensities() {
        let mut recorder = Recorder::default();

        push_light_intensities(&mut recorder, &LightIntensities::default());

        assert_eq!(recorder.calls.len(), 3);
        assert_eq!(recorder.get("Ia"), Some(UniformValue::Vec3(Vec3::splat(0.2))));
        assert_eq!(recorder.get("Id"), Some(UniformValue::Vec3(Vec3::splat(0.8))));
        assert_eq!(recorder.get("Is"), Some(UniformValue::Vec3(Vec3::ONE)));
    }

    #[test]
    fn test_frame_push_into_smaller_program_is_harmless() {
        use crate::rendering::uniforms::{UniformBlock, UniformLayout};

        let src = r#"
            struct U { projection: mat4x4<f32>, view: mat4x4<f32>, model: mat4x4<f32> }
            @group(0) @binding(0) var<uniform> u: U;
            @vertex
            fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
                return u.projection * u.view * u.model * vec4<f32>(p, 1.0);
            }
        "#;
        let module = naga::front::wgsl::parse_str(src).unwrap();
        let mut block = UniformBlock::new(UniformLayout::from_module(&module));
        let params = WaveParameterSet::default();

        push_frame_uniforms(&mut block, &frame(&params));

        assert_eq!(block.bytes().len(), 192);
        let first: f32 = bytemuck::pod_read_unaligned(&block.bytes()[0..4]);
        assert_eq!(first, 2.0);
    }
}
