//! Shader programs: a vertex and fragment WGSL pair compiled into one render pipeline.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use naga::valid::Capabilities;
use naga::{Binding, Handle, Module, Type, TypeInner};
use thiserror::Error;
use wgpu::util::DeviceExt;

use super::uniforms::{UniformBlock, UniformError, UniformLayout, UniformSink, UniformValue};

/// Source used when a program cannot be built from its files
const FALLBACK_SOURCE: &str = include_str!("fallback.wgsl");

/// Label reported as the source path of the embedded fallback
const FALLBACK_PATH: &str = "<embedded fallback>";

/// The uniform block's only binding in group 0
const UNIFORM_BINDING: [u32; 1] = [0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader {}: {source}", path.display())]
    Read {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader {} failed to compile:\n{diagnostic}", path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        diagnostic: String,
    },

    #[error("program ({}, {}) failed to link: {message}", vertex.display(), fragment.display())]
    Link {
        vertex: PathBuf,
        fragment: PathBuf,
        message: String,
    },
}

/// Read one stage's source text
pub fn read_source(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

/// Shader capabilities the device can run
///
/// Validating against these rejects shaders that would only fail later, at pipeline creation.
pub fn capabilities_for(features: wgpu::Features) -> Capabilities {
    let mut capabilities = Capabilities::default();
    for (feature, capability) in [
        (wgpu::Features::PUSH_CONSTANTS, Capabilities::PUSH_CONSTANT),
        (wgpu::Features::SHADER_F64, Capabilities::FLOAT64),
        (wgpu::Features::SHADER_PRIMITIVE_INDEX, Capabilities::PRIMITIVE_INDEX),
        (wgpu::Features::MULTIVIEW, Capabilities::MULTIVIEW),
        (wgpu::Features::SHADER_EARLY_DEPTH_TEST, Capabilities::EARLY_DEPTH_TEST),
        (wgpu::Features::DUAL_SOURCE_BLENDING, Capabilities::DUAL_SOURCE_BLENDING),
    ] {
        if features.contains(feature) {
            capabilities |= capability;
        }
    }
    capabilities
}

/// Parse and validate one stage, requiring an entry point for that stage
///
/// The diagnostic in the error is the full annotated compiler output.
pub fn compile_stage(
    stage: ShaderStage,
    path: &Path,
    source: &str,
    capabilities: Capabilities,
) -> Result<Module, ShaderError> {
    let compile_error = |diagnostic: String| ShaderError::Compile {
        stage,
        path: path.to_path_buf(),
        diagnostic,
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), capabilities)
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    if entry_point(&module, stage).is_none() {
        return Err(compile_error(format!("no @{stage} entry point")));
    }
    Ok(module)
}

fn entry_point(module: &Module, stage: ShaderStage) -> Option<&naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga())
}

/// Result of checking that two compiled stages form a program
#[derive(Debug, Clone)]
pub struct LinkedStages {
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub uniforms: UniformLayout,
    /// `@location`s read by the vertex entry point
    pub vertex_inputs: BTreeSet<u32>,
    /// `(group, binding)` of every resource either stage declares
    pub resources: BTreeSet<(u32, u32)>,
}

impl LinkedStages {
    /// Check the program against the vertex buffers and bind groups its pipeline will have
    ///
    /// `bind_groups[g]` lists the bindings of group `g`.
    pub fn check_interface(
        &self,
        vertex_buffers: &[wgpu::VertexBufferLayout<'_>],
        bind_groups: &[&[u32]],
    ) -> Result<(), String> {
        let provided: BTreeSet<u32> = vertex_buffers
            .iter()
            .flat_map(|buffer| buffer.attributes.iter().map(|a| a.shader_location))
            .collect();
        if let Some(missing) = self.vertex_inputs.difference(&provided).next() {
            return Err(format!(
                "vertex input @location({missing}) is not provided by any vertex buffer"
            ));
        }

        for &(group, binding) in &self.resources {
            let bound = bind_groups
                .get(group as usize)
                .is_some_and(|bindings| bindings.contains(&binding));
            if !bound {
                return Err(format!(
                    "@group({group}) @binding({binding}) is not part of the pipeline layout"
                ));
            }
        }
        Ok(())
    }
}

/// Match the stage interfaces and merge their uniform blocks
pub fn link(vertex: &Module, fragment: &Module) -> Result<LinkedStages, String> {
    let vertex_ep = entry_point(vertex, ShaderStage::Vertex)
        .ok_or_else(|| "vertex module has no @vertex entry point".to_string())?;
    let fragment_ep = entry_point(fragment, ShaderStage::Fragment)
        .ok_or_else(|| "fragment module has no @fragment entry point".to_string())?;

    let mut outputs = BTreeSet::new();
    if let Some(result) = &vertex_ep.function.result {
        collect_locations(vertex, result.ty, result.binding.as_ref(), &mut outputs);
    }
    let mut inputs = BTreeSet::new();
    for argument in &fragment_ep.function.arguments {
        collect_locations(fragment, argument.ty, argument.binding.as_ref(), &mut inputs);
    }
    if let Some(missing) = inputs.difference(&outputs).next() {
        return Err(format!(
            "fragment input @location({missing}) is not written by the vertex stage"
        ));
    }

    let mut vertex_inputs = BTreeSet::new();
    for argument in &vertex_ep.function.arguments {
        collect_locations(vertex, argument.ty, argument.binding.as_ref(), &mut vertex_inputs);
    }

    let resources = [vertex, fragment]
        .iter()
        .flat_map(|module| module.global_variables.iter())
        .filter_map(|(_, var)| var.binding.as_ref().map(|b| (b.group, b.binding)))
        .collect();

    let uniforms = UniformLayout::merge(
        UniformLayout::from_module(vertex),
        UniformLayout::from_module(fragment),
    )
    .map_err(|e: UniformError| e.to_string())?;

    Ok(LinkedStages {
        vertex_entry: vertex_ep.name.clone(),
        fragment_entry: fragment_ep.name.clone(),
        uniforms,
        vertex_inputs,
        resources,
    })
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut BTreeSet<u32>,
) {
    if let Some(Binding::Location { location, .. }) = binding {
        out.insert(*location);
        return;
    }
    if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
        for member in members {
            if let Some(Binding::Location { location, .. }) = &member.binding {
                out.insert(*location);
            }
        }
    }
}

/// A bind group set by the caller after the uniform block
pub struct ExtraBindGroup<'a> {
    pub layout: &'a wgpu::BindGroupLayout,
    /// Binding numbers present in `layout`
    pub bindings: &'a [u32],
}

/// Fixed-function state of a program's pipeline
pub struct ProgramDescriptor<'a> {
    pub label: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    pub depth_write: bool,
    pub depth_compare: wgpu::CompareFunction,
    pub cull_mode: Option<wgpu::Face>,
    /// Bound after the uniform block, starting at group 1
    pub extra_bind_groups: &'a [ExtraBindGroup<'a>],
}

impl ProgramDescriptor<'_> {
    /// Bindings per group, uniform block first
    fn bind_groups(&self) -> Vec<&[u32]> {
        let mut groups: Vec<&[u32]> = Vec::with_capacity(1 + self.extra_bind_groups.len());
        groups.push(&UNIFORM_BINDING);
        groups.extend(self.extra_bind_groups.iter().map(|group| group.bindings));
        groups
    }
}

/// A linked vertex/fragment pair with named uniforms
///
/// Uniform writes go to a CPU copy and are uploaded by [`ShaderProgram::flush`].
pub struct ShaderProgram {
    fallback: bool,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBlock,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    /// Read, compile and link a program from two WGSL files
    pub fn create(
        device: &wgpu::Device,
        desc: &ProgramDescriptor<'_>,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self, ShaderError> {
        let vertex_src = read_source(ShaderStage::Vertex, vertex_path)?;
        let fragment_src = read_source(ShaderStage::Fragment, fragment_path)?;
        Self::from_sources(
            device,
            desc,
            (vertex_path.to_path_buf(), vertex_src),
            (fragment_path.to_path_buf(), fragment_src),
        )
    }

    /// Solid magenta program used in place of one that failed to build
    ///
    /// Accepts `projection`, `view` and `model` so geometry still shows up in place.
    pub fn fallback(
        device: &wgpu::Device,
        desc: &ProgramDescriptor<'_>,
    ) -> Result<Self, ShaderError> {
        let path = PathBuf::from(FALLBACK_PATH);
        Self::from_sources(
            device,
            desc,
            (path.clone(), FALLBACK_SOURCE.to_string()),
            (path, FALLBACK_SOURCE.to_string()),
        )
    }

    fn from_sources(
        device: &wgpu::Device,
        desc: &ProgramDescriptor<'_>,
        (vertex_path, vertex_src): (PathBuf, String),
        (fragment_path, fragment_src): (PathBuf, String),
    ) -> Result<Self, ShaderError> {
        let capabilities = capabilities_for(device.features());
        let vertex = compile_stage(ShaderStage::Vertex, &vertex_path, &vertex_src, capabilities)?;
        let fragment =
            compile_stage(ShaderStage::Fragment, &fragment_path, &fragment_src, capabilities)?;

        let link_error = |message: String| ShaderError::Link {
            vertex: vertex_path.clone(),
            fragment: fragment_path.clone(),
            message,
        };
        let linked = link(&vertex, &fragment).map_err(link_error)?;
        linked
            .check_interface(desc.vertex_buffers, &desc.bind_groups())
            .map_err(link_error)?;

        // Validation errors past this point would otherwise go to the uncaptured handler
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let program = Self::build(device, desc, &vertex_src, &fragment_src, &linked);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(link_error(err.to_string()));
        }

        log::info!(
            "Linked {} program from {} + {} ({} uniforms)",
            desc.label,
            vertex_path.display(),
            fragment_path.display(),
            linked.uniforms.len()
        );

        let (pipeline, uniforms, uniform_buffer, bind_group) = program;
        Ok(Self {
            fallback: vertex_path == Path::new(FALLBACK_PATH),
            pipeline,
            uniforms,
            uniform_buffer,
            bind_group,
        })
    }

    fn build(
        device: &wgpu::Device,
        desc: &ProgramDescriptor<'_>,
        vertex_src: &str,
        fragment_src: &str,
        linked: &LinkedStages,
    ) -> (wgpu::RenderPipeline, UniformBlock, wgpu::Buffer, wgpu::BindGroup) {
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Vertex Shader", desc.label)),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Fragment Shader", desc.label)),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });

        let uniforms = UniformBlock::new(linked.uniforms.clone());
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Uniform Buffer", desc.label)),
            contents: uniforms.bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} Uniform Layout", desc.label)),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: UNIFORM_BINDING[0],
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Uniform Bind Group", desc.label)),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: UNIFORM_BINDING[0],
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut bind_group_layouts = vec![&uniform_layout];
        bind_group_layouts.extend(desc.extra_bind_groups.iter().map(|group| group.layout));
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} Pipeline", desc.label)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(&linked.vertex_entry),
                buffers: desc.vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(&linked.fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: desc.depth_format,
                depth_write_enabled: desc.depth_write,
                depth_compare: desc.depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, uniforms, uniform_buffer, bind_group)
    }

    /// Whether this is the embedded error-indicator program
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Upload pending uniform writes
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if self.uniforms.is_dirty() {
            queue.write_buffer(&self.uniform_buffer, 0, self.uniforms.bytes());
            self.uniforms.mark_clean();
        }
    }

    /// Make this the active program for subsequent draws in `render_pass`
    pub fn use_program(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

impl UniformSink for ShaderProgram {
    fn set<V: Into<UniformValue>>(&mut self, name: &str, value: V) {
        self.uniforms.set(name, value);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.uniform_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
        struct Uniforms { mvp: mat4x4<f32>, tint: vec3<f32> }
        @group(0) @binding(0) var<uniform> u: Uniforms;

        struct VertexOutput {
            @builtin(position) clip: vec4<f32>,
            @location(0) color: vec3<f32>,
        }

        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
            var out: VertexOutput;
            out.clip = u.mvp * vec4<f32>(position, 1.0);
            out.color = u.tint;
            return out;
        }
    "#;

    const FRAGMENT: &str = r#"
        @fragment
        fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(color, 1.0);
        }
    "#;

    fn compile(stage: ShaderStage, src: &str) -> Result<Module, ShaderError> {
        compile_stage(stage, Path::new("test.wgsl"), src, Capabilities::default())
    }

    #[test]
    fn test_links_matching_stages() {
        let vertex = compile(ShaderStage::Vertex, VERTEX).unwrap();
        let fragment = compile(ShaderStage::Fragment, FRAGMENT).unwrap();

        let linked = link(&vertex, &fragment).unwrap();

        assert_eq!(linked.vertex_entry, "vs_main");
        assert_eq!(linked.fragment_entry, "fs_main");
        assert!(linked.uniforms.slot("mvp").is_some());
        assert!(linked.uniforms.slot("tint").is_some());
    }

    #[test]
    fn test_syntax_error_reports_diagnostic() {
        let broken = VERTEX.replace("out.color = u.tint;", "out.color = u.tint");

        let err = compile(ShaderStage::Vertex, &broken).unwrap_err();

        match &err {
            ShaderError::Compile {
                stage, diagnostic, ..
            } => {
                assert_eq!(*stage, ShaderStage::Vertex);
                assert!(!diagnostic.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
        assert!(err.to_string().contains("test.wgsl"));
    }

    #[test]
    fn test_type_error_is_caught_by_validation() {
        let broken = FRAGMENT.replace("vec4<f32>(color, 1.0)", "color");
        assert!(matches!(
            compile(ShaderStage::Fragment, &broken),
            Err(ShaderError::Compile { .. })
        ));
    }

    #[test]
    fn test_missing_entry_point_is_compile_error() {
        let err = compile(ShaderStage::Vertex, FRAGMENT).unwrap_err();
        assert!(err.to_string().contains("@vertex"), "{err}");
    }

    #[test]
    fn test_unmatched_fragment_input_fails_link() {
        let vertex = compile(ShaderStage::Vertex, VERTEX).unwrap();
        let fragment = compile(
            ShaderStage::Fragment,
            &FRAGMENT.replace("@location(0) color", "@location(3) color"),
        )
        .unwrap();

        let message = link(&vertex, &fragment).unwrap_err();
        assert!(message.contains("@location(3)"), "{message}");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = read_source(ShaderStage::Fragment, Path::new("does/not/exist.wgsl")).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Read {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn test_fallback_source_links_with_camera_uniforms() {
        let path = Path::new(FALLBACK_PATH);
        let caps = Capabilities::default();
        let vertex = compile_stage(ShaderStage::Vertex, path, FALLBACK_SOURCE, caps).unwrap();
        let fragment = compile_stage(ShaderStage::Fragment, path, FALLBACK_SOURCE, caps).unwrap();

        let linked = link(&vertex, &fragment).unwrap();

        for name in ["projection", "view", "model"] {
            assert!(linked.uniforms.slot(name).is_some(), "{name}");
        }
    }

    fn position_only() -> [wgpu::VertexBufferLayout<'static>; 1] {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        [wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }]
    }

    #[test]
    fn test_interface_accepts_matching_pipeline() {
        let vertex = compile(ShaderStage::Vertex, VERTEX).unwrap();
        let fragment = compile(ShaderStage::Fragment, FRAGMENT).unwrap();
        let linked = link(&vertex, &fragment).unwrap();

        assert_eq!(linked.vertex_inputs, BTreeSet::from([0]));
        assert_eq!(linked.resources, BTreeSet::from([(0, 0)]));
        linked
            .check_interface(&position_only(), &[&UNIFORM_BINDING])
            .unwrap();
    }

    #[test]
    fn test_vertex_input_without_attribute_fails_interface() {
        let with_uv = VERTEX.replace(
            "@location(0) position: vec3<f32>",
            "@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>",
        );
        let vertex = compile(ShaderStage::Vertex, &with_uv).unwrap();
        let fragment = compile(ShaderStage::Fragment, FRAGMENT).unwrap();
        let linked = link(&vertex, &fragment).unwrap();

        let message = linked
            .check_interface(&position_only(), &[&UNIFORM_BINDING])
            .unwrap_err();
        assert!(message.contains("@location(1)"), "{message}");
    }

    #[test]
    fn test_unbound_resource_fails_interface() {
        let with_extra = VERTEX.replace(
            "@group(0) @binding(0) var<uniform> u: Uniforms;",
            "@group(0) @binding(0) var<uniform> u: Uniforms;\n\
             @group(0) @binding(1) var<uniform> extra: vec4<f32>;",
        );
        let with_extra =
            with_extra.replace("out.color = u.tint;", "out.color = u.tint + extra.xyz;");
        let vertex = compile(ShaderStage::Vertex, &with_extra).unwrap();
        let fragment = compile(ShaderStage::Fragment, FRAGMENT).unwrap();
        let linked = link(&vertex, &fragment).unwrap();

        let message = linked
            .check_interface(&position_only(), &[&UNIFORM_BINDING])
            .unwrap_err();
        assert!(message.contains("@binding(1)"), "{message}");

        let message = linked.check_interface(&position_only(), &[]).unwrap_err();
        assert!(message.contains("@group(0)"), "{message}");
    }

    #[test]
    fn test_capabilities_follow_device_features() {
        assert_eq!(capabilities_for(wgpu::Features::empty()), Capabilities::default());

        let caps = capabilities_for(wgpu::Features::PUSH_CONSTANTS | wgpu::Features::SHADER_F64);
        assert!(caps.contains(Capabilities::PUSH_CONSTANT | Capabilities::FLOAT64));
        assert!(!caps.contains(Capabilities::MULTIVIEW));
    }

    #[test]
    fn test_unsupported_capability_is_compile_error() {
        let f64_fragment = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                let x: f64 = 1.0lf;
                return vec4<f32>(f32(x));
            }
        "#;

        assert!(matches!(
            compile(ShaderStage::Fragment, f64_fragment),
            Err(ShaderError::Compile { .. })
        ));
        let caps = capabilities_for(wgpu::Features::SHADER_F64);
        let path = Path::new("f64.wgsl");
        assert!(compile_stage(ShaderStage::Fragment, path, f64_fragment, caps).is_ok());
    }
}
