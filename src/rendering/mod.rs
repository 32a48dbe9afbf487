//! Rendering: shader programs, the sky, and the per-frame draw.

mod frame;
mod gpu;
mod shader;
mod skybox;
mod uniforms;

use std::path::Path;
use std::sync::Arc;

use glam::Mat4;
use winit::window::Window;

use crate::error::Result;
use crate::ocean::{GridMesh, Vertex};
use crate::params::{LightIntensities, RenderConfig, ShaderFailurePolicy};
use crate::scene::SceneState;

pub use frame::{
    names, push_frame_uniforms, push_light_intensities, push_skybox_uniforms, FrameGlobals,
    FRAME_UNIFORMS, LIGHT_UNIFORMS,
};
pub use gpu::{GpuContext, DEPTH_FORMAT};
pub use shader::{
    capabilities_for, compile_stage, link, read_source, ExtraBindGroup, LinkedStages,
    ProgramDescriptor, ShaderError, ShaderProgram, ShaderStage,
};
pub use skybox::{CubemapFaces, Skybox, FACE_FILES, PLACEHOLDER_RGBA};
pub use uniforms::{
    UniformBlock, UniformError, UniformKind, UniformLayout, UniformSink, UniformSlot,
    UniformValue,
};

/// Owns every GPU resource and draws one frame per call
pub struct Renderer {
    wave_program: ShaderProgram,
    skybox_program: ShaderProgram,
    skybox: Skybox,
    grid: GridMesh,
    clear_color: [f64; 4],
    near_plane: f32,
    far_plane: f32,
    gpu: GpuContext,
}

impl Renderer {
    /// Set up the device, both programs, the sky and the grid
    ///
    /// Light intensities are constant, so they are uploaded here and never again.
    pub async fn new(
        window: Arc<Window>,
        config: &RenderConfig,
        light: &LightIntensities,
    ) -> Result<Self> {
        let gpu = GpuContext::new(window).await?;
        let vertex_buffers = [Vertex::layout()];

        let skybox_layout = Skybox::bind_group_layout(&gpu.device);
        let (vertex_path, fragment_path) = config.skybox_shader_paths();
        // Sky is drawn first at the far plane and leaves depth untouched
        let mut skybox_program = load_program(
            &gpu.device,
            &ProgramDescriptor {
                label: "Skybox",
                vertex_buffers: &vertex_buffers,
                color_format: gpu.color_format(),
                depth_format: DEPTH_FORMAT,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                cull_mode: None,
                extra_bind_groups: &[ExtraBindGroup {
                    layout: &skybox_layout,
                    bindings: &Skybox::BINDINGS,
                }],
            },
            &vertex_path,
            &fragment_path,
            config.shader_failure,
        )?;
        // Fallback draws the cube in world space
        skybox_program.set(names::MODEL, Mat4::IDENTITY);

        let (vertex_path, fragment_path) = config.wave_shader_paths();
        let mut wave_program = load_program(
            &gpu.device,
            &ProgramDescriptor {
                label: "Wave",
                vertex_buffers: &vertex_buffers,
                color_format: gpu.color_format(),
                depth_format: DEPTH_FORMAT,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
                cull_mode: None,
                extra_bind_groups: &[],
            },
            &vertex_path,
            &fragment_path,
            config.shader_failure,
        )?;
        push_light_intensities(&mut wave_program, light);

        let faces = CubemapFaces::load(&config.skybox_dir);
        let skybox = Skybox::new(&gpu.device, &gpu.queue, &faces, &skybox_layout);

        let grid = GridMesh::new(
            &gpu.device,
            config.side_length,
            config.edges_per_side,
            config.grid_height,
        )?;

        let fallbacks = [&skybox_program, &wave_program]
            .into_iter()
            .filter(|program| program.is_fallback())
            .count();
        if fallbacks > 0 {
            log::warn!("{fallbacks} of 2 programs are drawing with the fallback shader");
        }
        log::info!("Renderer ready: grid draws {} indices", grid.index_count());

        Ok(Self {
            wave_program,
            skybox_program,
            skybox,
            grid,
            clear_color: config.clear_color,
            near_plane: config.near_plane,
            far_plane: config.far_plane,
            gpu,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Reconfigure the surface after it was lost or went out of date
    pub fn reconfigure(&self) {
        self.gpu.reconfigure();
    }

    /// Draw the sky then the waves for the current scene state
    pub fn render(&mut self, scene: &SceneState) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let camera = &scene.camera;
        let projection =
            camera.projection_matrix(self.gpu.aspect_ratio(), self.near_plane, self.far_plane);

        push_skybox_uniforms(
            &mut self.skybox_program,
            projection,
            camera.skybox_view_matrix(),
        );
        push_frame_uniforms(
            &mut self.wave_program,
            &FrameGlobals {
                projection,
                view: camera.view_matrix(),
                model: Mat4::IDENTITY,
                time_s: scene.clock.elapsed(),
                camera_position: camera.position(),
                params: &scene.params,
            },
        );
        self.skybox_program.flush(&self.gpu.queue);
        self.wave_program.flush(&self.gpu.queue);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.gpu.clear_color(self.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Render skybox first
            self.skybox_program.use_program(&mut render_pass);
            self.skybox.draw(&mut render_pass);

            self.wave_program.use_program(&mut render_pass);
            self.grid.draw(&mut render_pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Build a program, applying `policy` if it fails
fn load_program(
    device: &wgpu::Device,
    desc: &ProgramDescriptor<'_>,
    vertex_path: &Path,
    fragment_path: &Path,
    policy: ShaderFailurePolicy,
) -> Result<ShaderProgram> {
    match ShaderProgram::create(device, desc, vertex_path, fragment_path) {
        Ok(program) => Ok(program),
        Err(err) => match policy {
            ShaderFailurePolicy::Abort => Err(err.into()),
            ShaderFailurePolicy::Fallback => {
                log::error!("{err}");
                log::warn!("Drawing {} with the fallback program", desc.label);
                Ok(ShaderProgram::fallback(device, desc)?)
            }
        },
    }
}
