use anyhow::{bail, Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use std::num::NonZeroU64;
use std::path::Path;

/// Uniform block shared by both shader stages. Must match `Uniforms` in the WGSL sources.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Uniforms {
    pub projection: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// (name, byte offset, byte size) of each field in [`Uniforms`].
const UNIFORM_FIELDS: &[(&str, usize, usize)] = &[
    ("projection", 0, 64),
    ("color", 64, 16),
];

/// CPU-side copy of the uniform block, addressable by field name.
pub struct UniformBlock {
    data: Uniforms,
    changed: bool,
}

impl UniformBlock {
    pub fn new() -> Self {
        Self {
            data: Uniforms {
                projection: Mat4::IDENTITY.to_cols_array_2d(),
                color: [1.0; 4],
            },
            changed: true,
        }
    }

    /// Copy `bytes` into the field called `name`. Returns false, leaving the
    /// block untouched, if there is no such field or the size doesn't match.
    pub fn set(&mut self, name: &str, bytes: &[u8]) -> bool {
        let Some(&(_, offset, size)) = UNIFORM_FIELDS.iter().find(|(n, _, _)| *n == name) else {
            return false;
        };
        if bytes.len() != size {
            return false;
        }
        bytemuck::bytes_of_mut(&mut self.data)[offset..offset + size].copy_from_slice(bytes);
        self.changed = true;
        true
    }

    pub fn data(&self) -> &Uniforms {
        &self.data
    }

    /// Returns whether anything changed since the last call.
    fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }
}

impl Default for UniformBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Lines,
    Triangles,
}

/// Vertex and fragment stages linked into one pipeline per primitive type,
/// plus the uniform buffer they read from.
pub struct ShaderProgram {
    line_pipeline: wgpu::RenderPipeline,
    triangle_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniforms: UniformBlock,
}

impl ShaderProgram {
    /// Read, compile and link the two stages. Any failure is returned with the
    /// backend's diagnostic text.
    pub async fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        vertex_path: &Path,
        fragment_path: &Path,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
    ) -> Result<Self> {
        let vertex_source = std::fs::read_to_string(vertex_path)
            .with_context(|| format!("Failed to read vertex shader {}", vertex_path.display()))?;
        let fragment_source = std::fs::read_to_string(fragment_path)
            .with_context(|| format!("Failed to read fragment shader {}", fragment_path.display()))?;

        let vertex_module = compile(device, "Vertex Shader", &vertex_source).await?;
        let fragment_module = compile(device, "Fragment Shader", &fragment_source).await?;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shader Uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shader Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<Uniforms>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shader Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shader Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let stages = Stages {
            layout: &pipeline_layout,
            vertex: &vertex_module,
            fragment: &fragment_module,
            format,
            vertex_layout,
        };

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let line_pipeline = stages.link(device, "Line Pipeline", wgpu::PrimitiveTopology::LineList);
        let triangle_pipeline = stages.link(device, "Triangle Pipeline", wgpu::PrimitiveTopology::TriangleList);
        if let Some(err) = device.pop_error_scope().await {
            uniform_buffer.destroy();
            bail!("Program linking failed: {err}");
        }

        // The stage modules are no longer needed once the pipelines exist.
        drop(vertex_module);
        drop(fragment_module);

        log::info!("Shader program linked.");

        Ok(Self {
            line_pipeline,
            triangle_pipeline,
            uniform_buffer,
            bind_group,
            uniforms: UniformBlock::new(),
        })
    }

    pub fn set_matrix4(&mut self, name: &str, matrix: &Mat4) {
        if !self.uniforms.set(name, bytemuck::bytes_of(matrix)) {
            log::warn!("No mat4 uniform named {:?}", name);
        }
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        if !self.uniforms.set(name, bytemuck::bytes_of(&value)) {
            log::warn!("No vec4 uniform named {:?}", name);
        }
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.set_vec4("color", color);
    }

    /// Push staged uniform values to the GPU. Takes effect for the next submitted pass.
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if self.uniforms.take_changed() {
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(self.uniforms.data()));
        }
    }

    /// Make this program current for `pass`.
    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, primitive: Primitive) {
        let pipeline = match primitive {
            Primitive::Lines => &self.line_pipeline,
            Primitive::Triangles => &self.triangle_pipeline,
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }

    pub fn delete(self) {
        log::debug!("Deleting shader program");
        self.uniform_buffer.destroy();
    }
}

struct Stages<'a> {
    layout: &'a wgpu::PipelineLayout,
    vertex: &'a wgpu::ShaderModule,
    fragment: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    vertex_layout: wgpu::VertexBufferLayout<'a>,
}

impl Stages<'_> {
    fn link(&self, device: &wgpu::Device, label: &str, topology: wgpu::PrimitiveTopology) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(self.layout),
            vertex: wgpu::VertexState {
                module: self.vertex,
                entry_point: "vs_main",
                buffers: &[self.vertex_layout.clone()],
            },
            fragment: Some(wgpu::FragmentState {
                module: self.fragment,
                entry_point: "fs_main",
                targets: &[Some(self.format.into())],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }
}

async fn compile(device: &wgpu::Device, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
    log::info!("Compiling {}...", label);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = device.pop_error_scope().await {
        bail!("Shader compilation failed ({label}): {err}");
    }
    Ok(module)
}
