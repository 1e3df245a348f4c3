//! Celestial-body render pass with depth testing and per-body textures.
//!
//! The pass uses three bind groups:
//! - **Group 0**: camera uniforms (view-projection, camera position, time),
//!   written once per frame
//! - **Group 1**: model uniforms (model matrix, normal matrix, color,
//!   emissive flag) — every body owns its own uniform buffer, so the
//!   per-frame writes for different bodies never alias within a submit
//! - **Group 2**: the body's surface texture and sampler
//!
//! One WGSL shader covers both kinds of body: stars render emissive, planets
//! are lit by a point light at the origin. A second pipeline with line
//! rasterization backs the wireframe toggle where the adapter supports it.

use crate::body::{BodyKind, CelestialBody};
use crate::camera::Camera;
use crate::geometry::SphereGeometry;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use crate::texture::Texture;

/// Camera uniforms, uploaded once per frame.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space.
    pub camera_pos: [f32; 3],
    /// Elapsed time in seconds.
    pub time: f32,
}

/// Per-body model uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Model matrix (object to world space).
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals.
    pub normal_matrix: [[f32; 4]; 4],
    /// RGBA tint multiplied with the surface texture.
    pub color: [f32; 4],
    /// x: emissive flag (1 for stars). y, z, w unused.
    pub params: [f32; 4],
}

/// GPU-side state for one celestial body: its sphere mesh, its own model
/// uniform buffer, and its texture binding. Created once at startup by
/// [`BodyPass::instance`]; all resources are released when dropped.
pub struct BodyInstance {
    mesh: Mesh,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    emissive: f32,
}

/// Handles rendering of all celestial bodies.
pub struct BodyPass {
    pipeline: wgpu::RenderPipeline,
    line_pipeline: Option<wgpu::RenderPipeline>,
    wireframe: bool,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    #[allow(dead_code)]
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl BodyPass {
    /// Creates the pass: pipelines, camera buffer, bind group layouts, and a
    /// depth buffer sized to the current surface.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Body Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/body.wgsl").into()),
        });

        // Camera uniform buffer (group 0)
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Model uniforms (group 1) — layout only; each body gets its own buffer
        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        // Texture bind group layout (group 2)
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Body Pipeline Layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &model_bind_group_layout,
                &texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let build_pipeline = |polygon_mode: wgpu::PolygonMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Body Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    front_face: wgpu::FrontFace::Ccw,
                    polygon_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let pipeline = build_pipeline(wgpu::PolygonMode::Fill);
        let line_pipeline = gpu
            .wireframe_supported
            .then(|| build_pipeline(wgpu::PolygonMode::Line));

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        Self {
            pipeline,
            line_pipeline,
            wireframe: false,
            camera_buffer,
            camera_bind_group,
            model_bind_group_layout,
            texture_bind_group_layout,
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    /// Builds the GPU-side state for one body: generates and uploads its
    /// sphere mesh, allocates its model uniform buffer, and binds its
    /// surface texture.
    pub fn instance(&self, gpu: &GpuContext, body: &CelestialBody, texture: &Texture) -> BodyInstance {
        let mesh = SphereGeometry::generate(body.radius, body.resolution).upload(gpu);

        let model_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: std::mem::size_of::<ModelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let model_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &self.model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Body Texture Bind Group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        BodyInstance {
            mesh,
            model_buffer,
            model_bind_group,
            texture_bind_group,
            emissive: match body.kind {
                BodyKind::Star => 1.0,
                BodyKind::Planet => 0.0,
            },
        }
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Ensures the depth buffer matches the current surface size; call at
    /// the start of each frame in case the window was resized.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// The depth attachment view for this frame's render pass.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Toggle wireframe rasterization. Returns whether the mode is actually
    /// in effect (the adapter may not support line polygons).
    pub fn set_wireframe(&mut self, on: bool) -> bool {
        self.wireframe = on && self.line_pipeline.is_some();
        self.wireframe
    }

    /// Uploads this frame's camera uniforms.
    pub fn update_camera(&self, gpu: &GpuContext, camera: &Camera, time: f32) {
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let uniforms = CameraUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            time,
        };
        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Uploads one body's model uniforms for this frame. The body's center
    /// must already have been recomputed by `SolarSystem::update`.
    pub fn update_instance(
        &self,
        gpu: &GpuContext,
        instance: &BodyInstance,
        body: &CelestialBody,
        time: f32,
    ) {
        let model_matrix = body.transform(time).matrix();
        let normal_matrix = model_matrix.inverse().transpose();

        let uniforms = ModelUniforms {
            model: model_matrix.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: [body.color.x, body.color.y, body.color.z, 1.0],
            params: [instance.emissive, 0.0, 0.0, 0.0],
        };

        gpu.queue.write_buffer(
            &instance.model_buffer,
            0,
            bytemuck::cast_slice(&[uniforms]),
        );
    }

    /// Draws all body instances. The render pass must use
    /// [`BodyPass::depth_view`] as its depth attachment.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass, instances: &[BodyInstance]) {
        let pipeline = if self.wireframe {
            self.line_pipeline.as_ref().unwrap_or(&self.pipeline)
        } else {
            &self.pipeline
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for instance in instances {
            render_pass.set_bind_group(1, &instance.model_bind_group, &[]);
            render_pass.set_bind_group(2, &instance.texture_bind_group, &[]);
            render_pass.set_vertex_buffer(0, instance.mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                instance.mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..instance.mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_structs_match_wgsl_layout() {
        // mat4x4 + vec3 + f32
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 80);
        // mat4x4 + mat4x4 + vec4 + vec4
        assert_eq!(std::mem::size_of::<ModelUniforms>(), 160);
    }
}
