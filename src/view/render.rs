use std::ops::Range;

use tracing::{debug, info, warn};
use wgpu::util::DeviceExt;
use wgpu::*;

use crate::model::matcap::{self, MATCAP_COUNT, MATCAP_SIZE};
use crate::model::scene::MIRROR_SIZE;
use crate::model::shapes::{self, ShapeKind};
use crate::model::{BackgroundObject, Scene, Transform};
use crate::utils::{MeshBuffer, Vertex};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const CLEAR_COLOR: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MirrorUniform {
    pub model: [[f32; 4]; 4],
    /// rgb + transmission
    pub color: [f32; 4],
    /// metalness, roughness, ior, thickness
    pub params: [f32; 4],
}

/// Per-instance data for the matcap pipeline
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub matcap: u32,
    pub _pad: [u32; 3],
}

impl InstanceRaw {
    pub fn new(transform: &Transform, matcap: u8) -> Self {
        Self {
            model: transform.matrix().to_cols_array_2d(),
            matcap: matcap as u32,
            _pad: [0; 3],
        }
    }

    const ATTRIBUTES: [VertexAttribute; 5] = [
        VertexAttribute { offset: 0, shader_location: 2, format: VertexFormat::Float32x4 },
        VertexAttribute { offset: 16, shader_location: 3, format: VertexFormat::Float32x4 },
        VertexAttribute { offset: 32, shader_location: 4, format: VertexFormat::Float32x4 },
        VertexAttribute { offset: 48, shader_location: 5, format: VertexFormat::Float32x4 },
        VertexAttribute { offset: 64, shader_location: 6, format: VertexFormat::Uint32 },
    ];

    pub fn layout() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Background instances grouped by shape so each shape is one instanced draw
pub struct InstanceBatches {
    /// Object indices sorted by shape
    pub draw_order: Vec<usize>,
    /// Instance range per shape, indexed by `ShapeKind::index`
    pub ranges: [Range<u32>; 4],
}

impl InstanceBatches {
    pub fn new(objects: &[BackgroundObject]) -> Self {
        let mut draw_order: Vec<usize> = (0..objects.len()).collect();
        draw_order.sort_by_key(|&i| objects[i].shape.index());

        let mut ranges: [Range<u32>; 4] = Default::default();
        let mut start = 0u32;
        for kind in ShapeKind::ALL {
            let count = objects.iter().filter(|o| o.shape == kind).count() as u32;
            ranges[kind.index()] = start..start + count;
            start += count;
        }
        Self { draw_order, ranges }
    }

    pub fn fill(&self, objects: &[BackgroundObject], out: &mut Vec<InstanceRaw>) {
        out.clear();
        out.extend(self.draw_order.iter().map(|&i| InstanceRaw::new(&objects[i].transform, objects[i].matcap)));
    }
}

struct BackgroundResources {
    batches: InstanceBatches,
    instance_buffer: Buffer,
    staging: Vec<InstanceRaw>,
}

struct TitleResources {
    mesh: MeshBuffer,
    instance_buffer: Buffer,
}

pub struct CameraResources {
    pub camera_buffer: Buffer,
    pub lighting_buffer: Buffer,
    pub bind_group_layout: BindGroupLayout,
    pub camera_bind_group: BindGroup,
}

pub struct MatcapResources {
    pub bind_group_layout: BindGroupLayout,
    pub bind_group: BindGroup,
}

pub struct MirrorResources {
    pub buffer: Buffer,
    pub bind_group_layout: BindGroupLayout,
    pub bind_group: BindGroup,
}

pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let depth_texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_camera_resources(device: &Device) -> CameraResources {
    let camera_buffer = device.create_buffer(&BufferDescriptor {
        label: Some("camera_buffer"),
        size: std::mem::size_of::<CameraUniform>() as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer(&BufferDescriptor {
        label: Some("lighting_buffer"),
        size: std::mem::size_of::<LightingUniform>() as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: &[
            uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT),
            uniform_entry(1, ShaderStages::FRAGMENT),
        ],
    });

    let camera_bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("camera_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
        ],
    });

    CameraResources { camera_buffer, lighting_buffer, bind_group_layout, camera_bind_group }
}

/// Upload every matcap as one layer of a texture array
pub fn create_matcap_resources(device: &Device, queue: &Queue) -> MatcapResources {
    let size = Extent3d { width: MATCAP_SIZE, height: MATCAP_SIZE, depth_or_array_layers: MATCAP_COUNT };
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("matcap_array"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::Rgba8UnormSrgb,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, image) in matcap::layers(MATCAP_SIZE).iter().enumerate() {
        queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d { x: 0, y: 0, z: layer as u32 },
                aspect: TextureAspect::All,
            },
            image.as_raw(),
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * MATCAP_SIZE),
                rows_per_image: Some(MATCAP_SIZE),
            },
            Extent3d { width: MATCAP_SIZE, height: MATCAP_SIZE, depth_or_array_layers: 1 },
        );
    }

    let view = texture.create_view(&TextureViewDescriptor {
        label: Some("matcap_array_view"),
        dimension: Some(TextureViewDimension::D2Array),
        ..Default::default()
    });
    let sampler = device.create_sampler(&SamplerDescriptor {
        label: Some("matcap_sampler"),
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        ..Default::default()
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("matcap_bind_group_layout"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2Array,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("matcap_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            BindGroupEntry { binding: 0, resource: BindingResource::TextureView(&view) },
            BindGroupEntry { binding: 1, resource: BindingResource::Sampler(&sampler) },
        ],
    });

    MatcapResources { bind_group_layout, bind_group }
}

pub fn create_mirror_resources(device: &Device) -> MirrorResources {
    let buffer = device.create_buffer(&BufferDescriptor {
        label: Some("mirror_buffer"),
        size: std::mem::size_of::<MirrorUniform>() as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("mirror_bind_group_layout"),
        entries: &[uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT)],
    });
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("mirror_bind_group"),
        layout: &bind_group_layout,
        entries: &[BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    });
    MirrorResources { buffer, bind_group_layout, bind_group }
}

pub fn create_matcap_pipeline(
    device: &Device,
    format: TextureFormat,
    camera_layout: &BindGroupLayout,
    matcap_layout: &BindGroupLayout,
) -> RenderPipeline {
    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("matcap_shader"),
        source: ShaderSource::Wgsl(include_str!("../shaders/matcap.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("matcap_pipeline_layout"),
        bind_group_layouts: &[camera_layout, matcap_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("matcap_pipeline"),
        layout: Some(&layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout(), InstanceRaw::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState { format, blend: Some(BlendState::REPLACE), write_mask: ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: Some(Face::Back),
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// Double-sided, alpha blended, depth tested but not written
pub fn create_mirror_pipeline(
    device: &Device,
    format: TextureFormat,
    camera_layout: &BindGroupLayout,
    mirror_layout: &BindGroupLayout,
) -> RenderPipeline {
    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("mirror_shader"),
        source: ShaderSource::Wgsl(include_str!("../shaders/mirror.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("mirror_pipeline_layout"),
        bind_group_layouts: &[camera_layout, mirror_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("mirror_pipeline"),
        layout: Some(&layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState { format, blend: Some(BlendState::ALPHA_BLENDING), write_mask: ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

///////////////////////////////////////////////////////////////////////////////

/// Consolidated render state to avoid parameter explosion
pub struct RenderState {
    pub format: TextureFormat,
    pub alpha_mode: CompositeAlphaMode,
    pub width: u32,
    pub height: u32,
    depth_view: TextureView,

    // Uniforms
    camera: CameraResources,
    matcap: MatcapResources,
    mirror: MirrorResources,

    // Pipelines
    matcap_pipeline: RenderPipeline,
    mirror_pipeline: RenderPipeline,

    // Meshes
    shape_meshes: Vec<MeshBuffer>,
    mirror_mesh: MeshBuffer,
    title: Option<TitleResources>,
    background: Option<BackgroundResources>,

    // UI
    pub egui_renderer: egui_wgpu::Renderer,
    pub egui_primitives: Option<Vec<egui::ClippedPrimitive>>,
    pub egui_full_output: Option<egui::FullOutput>,
    pub egui_dpr: f32,
}

impl RenderState {
    pub fn new(device: &Device, queue: &Queue, config: &SurfaceConfiguration) -> Self {
        let (_, depth_view) = create_depth_texture(device, config.width, config.height);
        let camera = create_camera_resources(device);
        let matcap = create_matcap_resources(device, queue);
        let mirror = create_mirror_resources(device);

        let matcap_pipeline =
            create_matcap_pipeline(device, config.format, &camera.bind_group_layout, &matcap.bind_group_layout);
        let mirror_pipeline =
            create_mirror_pipeline(device, config.format, &camera.bind_group_layout, &mirror.bind_group_layout);

        let shape_meshes = ShapeKind::ALL.iter().map(|kind| kind.mesh().upload(device)).collect();
        let mirror_mesh = shapes::plane(MIRROR_SIZE, MIRROR_SIZE).upload(device);

        let egui_renderer = egui_wgpu::Renderer::new(device, config.format, egui_wgpu::RendererOptions::default());

        info!(width = config.width, height = config.height, format = ?config.format, "render state ready");

        Self {
            format: config.format,
            alpha_mode: config.alpha_mode,
            width: config.width,
            height: config.height,
            depth_view,
            camera,
            matcap,
            mirror,
            matcap_pipeline,
            mirror_pipeline,
            shape_meshes,
            mirror_mesh,
            title: None,
            background: None,
            egui_renderer,
            egui_primitives: None,
            egui_full_output: None,
            egui_dpr: 1.0,
        }
    }

    pub fn surface_config(&self) -> SurfaceConfiguration {
        SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: self.format,
            width: self.width,
            height: self.height,
            present_mode: PresentMode::Fifo,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    /// Reconfigure the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, device: &Device, surface: &Surface, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        surface.configure(device, &self.surface_config());
        let (_, depth_view) = create_depth_texture(device, width, height);
        self.depth_view = depth_view;
        debug!(width, height, "surface resized");
    }

    /// Upload meshes that became available since the last frame
    fn sync_scene(&mut self, device: &Device, scene: &Scene) {
        if self.title.is_none() {
            if let Some(mesh) = scene.title.as_ref().filter(|m| !m.is_empty()) {
                let instance = InstanceRaw::new(&Transform::default(), scene.title_matcap);
                let instance_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
                    label: Some("title_instance"),
                    contents: bytemuck::bytes_of(&instance),
                    usage: BufferUsages::VERTEX,
                });
                self.title = Some(TitleResources { mesh: mesh.upload(device), instance_buffer });
            }
        }

        if self.background.is_none() && scene.background.is_ready() {
            let objects = scene.background.objects();
            let instance_buffer = device.create_buffer(&BufferDescriptor {
                label: Some("background_instances"),
                size: (objects.len().max(1) * std::mem::size_of::<InstanceRaw>()) as u64,
                usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.background = Some(BackgroundResources {
                batches: InstanceBatches::new(objects),
                instance_buffer,
                staging: Vec::with_capacity(objects.len()),
            });
            info!(count = objects.len(), "background instances allocated");
        }
    }

    /// Write this frame's uniforms and instance data
    pub fn prepare(&mut self, device: &Device, queue: &Queue, scene: &Scene) {
        self.sync_scene(device, scene);

        let camera = &scene.camera;
        let camera_uniform = CameraUniform {
            view_proj: camera.view_proj().to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
        };
        queue.write_buffer(&self.camera.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));

        let light = &scene.light;
        let lighting_uniform = LightingUniform {
            position: light.position.to_array(),
            intensity: light.intensity,
            color: light.color.to_array(),
            _pad: 0.0,
        };
        queue.write_buffer(&self.camera.lighting_buffer, 0, bytemuck::bytes_of(&lighting_uniform));

        let mirror = &scene.mirror;
        let material = &mirror.material;
        let mirror_uniform = MirrorUniform {
            model: mirror.transform.matrix().to_cols_array_2d(),
            color: material.color.extend(material.transmission).to_array(),
            params: [material.metalness, material.roughness, material.ior, material.thickness],
        };
        queue.write_buffer(&self.mirror.buffer, 0, bytemuck::bytes_of(&mirror_uniform));

        if let Some(bg) = self.background.as_mut() {
            bg.batches.fill(scene.background.objects(), &mut bg.staging);
            queue.write_buffer(&bg.instance_buffer, 0, bytemuck::cast_slice(&bg.staging));
        }
    }

    pub fn set_ui(&mut self, primitives: Vec<egui::ClippedPrimitive>, full_output: egui::FullOutput, dpr: f32) {
        self.egui_primitives = Some(primitives);
        self.egui_full_output = Some(full_output);
        self.egui_dpr = dpr;
    }

    /// Render one frame. Surface loss reconfigures and skips the frame.
    pub fn draw_frame(&mut self, device: &Device, queue: &Queue, surface: &Surface) {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                surface.configure(device, &self.surface_config());
                return;
            }
            Err(SurfaceError::Timeout) => {
                debug!("surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                warn!("surface error: {e:?}");
                return;
            }
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // OPAQUE: title and background
            rp.set_pipeline(&self.matcap_pipeline);
            rp.set_bind_group(0, &self.camera.camera_bind_group, &[]);
            rp.set_bind_group(1, &self.matcap.bind_group, &[]);

            if let Some(title) = &self.title {
                rp.set_vertex_buffer(0, title.mesh.vertex_buffer.slice(..));
                rp.set_vertex_buffer(1, title.instance_buffer.slice(..));
                rp.set_index_buffer(title.mesh.index_buffer.slice(..), IndexFormat::Uint32);
                rp.draw_indexed(0..title.mesh.index_count, 0, 0..1);
            }

            if let Some(bg) = &self.background {
                rp.set_vertex_buffer(1, bg.instance_buffer.slice(..));
                for kind in ShapeKind::ALL {
                    let range = bg.batches.ranges[kind.index()].clone();
                    if range.is_empty() {
                        continue;
                    }
                    let mesh = &self.shape_meshes[kind.index()];
                    rp.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    rp.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
                    rp.draw_indexed(0..mesh.index_count, 0, range);
                }
            }

            // TRANSPARENT: mirror last
            rp.set_pipeline(&self.mirror_pipeline);
            rp.set_bind_group(1, &self.mirror.bind_group, &[]);
            rp.set_vertex_buffer(0, self.mirror_mesh.vertex_buffer.slice(..));
            rp.set_index_buffer(self.mirror_mesh.index_buffer.slice(..), IndexFormat::Uint32);
            rp.draw_indexed(0..self.mirror_mesh.index_count, 0, 0..1);
        }

        if let (Some(egui_primitives), Some(egui_full_output)) =
            (self.egui_primitives.take(), self.egui_full_output.take())
        {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.width, self.height],
                pixels_per_point: self.egui_dpr,
            };

            for (id, image_delta) in &egui_full_output.textures_delta.set {
                self.egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            self.egui_renderer
                .update_buffers(device, queue, &mut encoder, &egui_primitives, &screen_descriptor);

            {
                let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                    label: Some("egui_render_pass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                self.egui_renderer
                    .render(&mut egui_pass.forget_lifetime(), &egui_primitives, &screen_descriptor);
            }

            for id in &egui_full_output.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
