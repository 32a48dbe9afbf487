//! Per-frame scene state: camera, parameters, held input and timing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::camera::FreeFlyCamera;
use crate::input::InputState;
use crate::params::{CameraConfig, LightIntensities, WaveParameterSet};

/// Frame timing with a rolling average for the debug log
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_times: VecDeque<Duration>,
    last_report: Instant,
}

impl FrameClock {
    const WINDOW: usize = 60;

    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_times: VecDeque::with_capacity(Self::WINDOW),
            last_report: now,
        }
    }

    /// Start a new frame and return the seconds since the previous one
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        self.frame_times.push_back(self.delta);
        if self.frame_times.len() > Self::WINDOW {
            self.frame_times.pop_front();
        }

        if now.saturating_duration_since(self.last_report) >= Duration::from_secs(1) {
            log::debug!("FPS: {:.1}", self.average_fps());
            self.last_report = now;
        }

        self.delta.as_secs_f32()
    }

    /// Seconds between the last two ticks
    pub fn delta(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds from creation to the last tick
    pub fn elapsed(&self) -> f32 {
        self.last_frame
            .saturating_duration_since(self.start)
            .as_secs_f32()
    }

    pub fn average_fps(&self) -> f32 {
        let total: Duration = self.frame_times.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.frame_times.len() as f32 / total.as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the renderer reads each frame
pub struct SceneState {
    pub camera: FreeFlyCamera,
    pub params: WaveParameterSet,
    pub light: LightIntensities,
    pub clock: FrameClock,
    pub input: InputState,
    base_speed: f32,
    boost_multiplier: f32,
}

impl SceneState {
    pub fn new(camera: &CameraConfig, params: WaveParameterSet) -> Self {
        Self {
            camera: FreeFlyCamera::from_config(camera),
            params,
            light: LightIntensities::default(),
            clock: FrameClock::new(),
            input: InputState::default(),
            base_speed: camera.movement_speed,
            boost_multiplier: camera.boost_multiplier,
        }
    }

    /// Advance the clock and move the camera by the held keys
    ///
    /// Returns the frame delta in seconds.
    pub fn update(&mut self) -> f32 {
        let dt = self.clock.tick();
        self.step(dt);
        dt
    }

    fn step(&mut self, dt: f32) {
        self.input
            .apply(&mut self.camera, dt, self.base_speed, self.boost_multiplier);
    }
}
