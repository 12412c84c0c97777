//! Rendering for the cannonball scene: billboard spheres for the ball and
//! cannon, instanced boxes for static objects, the ball's trail and a floor
//! grid at the bottom of the bounding volume.

use common::{create_uniform_buffer, GraphicsContext, Vertex};
use glam::{EulerRot, Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

use crate::controls::{Controls, StaticObject};
use crate::physics::Simulation;
use crate::scene::Scene;

/// Color the ball from its view-space normal
pub const MATERIAL_NORMAL: f32 = 0.0;
/// Diffuse lighting plus a small emissive term
pub const MATERIAL_LIT: f32 = 1.0;

pub const CANNON_COLOR: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
pub const TRAIL_COLOR: [f32; 4] = [0.25, 0.35, 0.6, 1.0];

/// Grid lines along each horizontal axis
pub const GRID_LINES: u32 = 21;

/// Uniforms shared by every pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// xyz toward the light, w intensity
    pub light_direction: [f32; 4],
    /// rgb light color, w ambient
    pub light_color: [f32; 4],
    /// floor height, half extent, line count, unused
    pub grid: [f32; 4],
}

impl SceneUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        let camera = &scene.camera;
        let light = &scene.light;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            light_direction: light.direction.extend(light.intensity).to_array(),
            light_color: [light.color[0], light.color[1], light.color[2], light.ambient],
            grid: [scene.floor_y, scene.floor_extent, GRID_LINES as f32, 0.0],
        }
    }
}

/// Billboard sphere instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
    pub material: f32,
}

impl SphereInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x3,
        3 => Float32,
        4 => Float32x4,
        5 => Float32,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Quad vertex for billboards
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Unit cube vertex with a face normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoxVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl BoxVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BoxVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-object model matrix and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoxInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl BoxInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BoxInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn from_object(object: &StaticObject) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            object.rotation.x,
            object.rotation.y,
            object.rotation.z,
        );
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(object.scale),
            rotation,
            object.position,
        );
        Self {
            model: model.to_cols_array_2d(),
            color: object.color,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Triangle list for a unit cube centered on the origin
pub fn box_vertices() -> Vec<BoxVertex> {
    // (normal, two in-face axes with right-handed winding)
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let center = normal * 0.5;
        let corner = |su: f32, sv: f32| BoxVertex {
            position: (center + u * 0.5 * su + v * 0.5 * sv).to_array(),
            normal: normal.to_array(),
        };
        vertices.extend_from_slice(&[
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ]);
    }
    vertices
}

/// Cannon first, then the ball; both read fresh every frame
pub fn sphere_instances(scene: &Scene, simulation: &Simulation, controls: &Controls) -> [SphereInstance; 2] {
    [
        SphereInstance {
            position: controls.cannon.position.to_array(),
            radius: scene.cannon_radius,
            color: CANNON_COLOR,
            material: MATERIAL_LIT,
        },
        SphereInstance {
            position: simulation.ball.position.to_array(),
            radius: scene.ball_radius,
            color: [1.0, 1.0, 1.0, 1.0],
            material: MATERIAL_NORMAL,
        },
    ]
}

pub fn object_instances(objects: &[StaticObject], max: usize) -> Vec<BoxInstance> {
    objects.iter().take(max).map(BoxInstance::from_object).collect()
}

/// Trail line strip fading in toward the ball
pub fn trail_vertices(trail: &[Vec3], color: [f32; 4], max: usize) -> Vec<Vertex> {
    if trail.len() < 2 {
        return Vec::new();
    }
    let skip = trail.len().saturating_sub(max);
    let visible = &trail[skip..];
    let len = visible.len();
    visible
        .iter()
        .enumerate()
        .map(|(i, pos)| {
            let alpha = ((i + 1) as f32 / len as f32) * color[3] * 0.8;
            Vertex::new(pos.to_array(), [color[0], color[1], color[2], alpha])
        })
        .collect()
}

/// How much of each buffer to draw this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounts {
    pub spheres: u32,
    pub boxes: u32,
    pub trail: u32,
}

pub struct Renderer {
    sphere_pipeline: wgpu::RenderPipeline,
    box_pipeline: wgpu::RenderPipeline,
    trail_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    box_vertex_buffer: wgpu::Buffer,
    box_vertex_count: u32,
    sphere_buffer: wgpu::Buffer,
    box_instance_buffer: wgpu::Buffer,
    trail_buffer: wgpu::Buffer,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    max_objects: usize,
    max_trail_vertices: usize,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, scene: &Scene, max_objects: usize, max_trail_vertices: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cannonball Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cannonball.wgsl").into()),
        });

        let scene_buffer = create_uniform_buffer(device, &SceneUniform::from_scene(scene));

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
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

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_texture = Self::create_depth_texture(device, ctx.size.width, ctx.size.height);

        let depth_stencil_state = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let targets = [Some(wgpu::ColorTargetState {
            format: ctx.config.format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let create_pipeline = |label: &str,
                               vs_entry: &str,
                               fs_entry: &str,
                               buffers: &[wgpu::VertexBufferLayout],
                               topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: vs_entry,
                    buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: fs_entry,
                    targets: &targets,
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state.clone()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let sphere_pipeline = create_pipeline(
            "Sphere Pipeline",
            "vs_sphere",
            "fs_sphere",
            &[QuadVertex::layout(), SphereInstance::layout()],
            wgpu::PrimitiveTopology::TriangleList,
        );
        let box_pipeline = create_pipeline(
            "Box Pipeline",
            "vs_box",
            "fs_box",
            &[BoxVertex::layout(), BoxInstance::layout()],
            wgpu::PrimitiveTopology::TriangleList,
        );
        let trail_pipeline = create_pipeline(
            "Trail Pipeline",
            "vs_trail",
            "fs_line",
            &[Vertex::LAYOUT],
            wgpu::PrimitiveTopology::LineStrip,
        );
        let grid_pipeline = create_pipeline(
            "Grid Pipeline",
            "vs_grid",
            "fs_line",
            &[],
            wgpu::PrimitiveTopology::LineList,
        );

        // Buffers
        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let box_vertices = box_vertices();
        let box_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Box Vertex Buffer"),
            contents: bytemuck::cast_slice(&box_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let sphere_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sphere Instance Buffer"),
            size: (std::mem::size_of::<SphereInstance>() * 2) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let box_instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Box Instance Buffer"),
            size: (std::mem::size_of::<BoxInstance>() * max_objects.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let trail_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Trail Buffer"),
            size: (std::mem::size_of::<Vertex>() * max_trail_vertices.max(2)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!(
            "Renderer ready: {} objects, {} trail vertices",
            max_objects,
            max_trail_vertices
        );

        Self {
            sphere_pipeline,
            box_pipeline,
            trail_pipeline,
            grid_pipeline,
            quad_buffer,
            box_vertex_buffer,
            box_vertex_count: box_vertices.len() as u32,
            sphere_buffer,
            box_instance_buffer,
            trail_buffer,
            scene_buffer,
            scene_bind_group,
            depth_texture,
            max_objects,
            max_trail_vertices,
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Upload this frame's uniforms and instances
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        scene: &Scene,
        simulation: &Simulation,
        controls: &Controls,
    ) -> FrameCounts {
        let uniform = SceneUniform::from_scene(scene);
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let spheres = sphere_instances(scene, simulation, controls);
        queue.write_buffer(&self.sphere_buffer, 0, bytemuck::cast_slice(&spheres));

        let boxes = object_instances(&controls.objects, self.max_objects);
        if !boxes.is_empty() {
            queue.write_buffer(&self.box_instance_buffer, 0, bytemuck::cast_slice(&boxes));
        }

        let trail = if scene.show_trail {
            trail_vertices(&simulation.ball.trail, TRAIL_COLOR, self.max_trail_vertices)
        } else {
            Vec::new()
        };
        if !trail.is_empty() {
            queue.write_buffer(&self.trail_buffer, 0, bytemuck::cast_slice(&trail));
        }

        FrameCounts {
            spheres: spheres.len() as u32,
            boxes: boxes.len() as u32,
            trail: trail.len() as u32,
        }
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        scene: &Scene,
        counts: FrameCounts,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main 3D Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(scene.clear_color()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

        if scene.show_grid {
            render_pass.set_pipeline(&self.grid_pipeline);
            render_pass.draw(0..GRID_LINES * 4, 0..1);
        }

        if counts.boxes > 0 {
            render_pass.set_pipeline(&self.box_pipeline);
            render_pass.set_vertex_buffer(0, self.box_vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.box_instance_buffer.slice(..));
            render_pass.draw(0..self.box_vertex_count, 0..counts.boxes);
        }

        if counts.trail > 1 {
            render_pass.set_pipeline(&self.trail_pipeline);
            render_pass.set_vertex_buffer(0, self.trail_buffer.slice(..));
            render_pass.draw(0..counts.trail, 0..1);
        }

        if counts.spheres > 0 {
            render_pass.set_pipeline(&self.sphere_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.sphere_buffer.slice(..));
            render_pass.draw(0..6, 0..counts.spheres);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::physics::Cannon;

    #[test]
    fn test_box_has_six_outward_faces() {
        let vertices = box_vertices();
        assert_eq!(vertices.len(), 36);

        for face in vertices.chunks(6) {
            let normal = Vec3::from_array(face[0].normal);
            assert!(face.iter().all(|v| v.normal == face[0].normal));
            for v in face {
                let p = Vec3::from_array(v.position);
                assert!((p.dot(normal) - 0.5).abs() < 1e-6);
                assert!(p.abs().max_element() <= 0.5 + 1e-6);
            }

            // Counter-clockwise seen from outside
            let a = Vec3::from_array(face[0].position);
            let b = Vec3::from_array(face[1].position);
            let c = Vec3::from_array(face[2].position);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_sphere_instances_follow_cannon_and_ball() {
        let config = SceneConfig::default();
        let scene = Scene::new(&config, 1.0);
        let mut controls = Controls::default();
        let simulation = Simulation::new(&controls.cannon);

        controls.cannon = Cannon::new(Vec3::X, Vec3::new(5.0, 6.0, 7.0));
        let [cannon, ball] = sphere_instances(&scene, &simulation, &controls);

        assert_eq!(cannon.position, [5.0, 6.0, 7.0]);
        assert_eq!(cannon.radius, 15.0);
        assert_eq!(cannon.material, MATERIAL_LIT);
        assert_eq!(ball.position, simulation.ball.position.to_array());
        assert_eq!(ball.radius, 10.0);
        assert_eq!(ball.material, MATERIAL_NORMAL);
    }

    #[test]
    fn test_object_instance_transform() {
        let object = StaticObject::new(Vec3::new(10.0, -20.0, 30.0))
            .with_scale(4.0)
            .with_color([0.1, 0.2, 0.3, 1.0]);
        let instance = BoxInstance::from_object(&object);
        let model = Mat4::from_cols_array_2d(&instance.model);

        let corner = model.transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(12.0, -18.0, 32.0)).length() < 1e-5);
        assert_eq!(instance.color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_object_instances_respect_capacity() {
        let objects = vec![StaticObject::default(); 5];
        assert_eq!(object_instances(&objects, 3).len(), 3);
        assert_eq!(object_instances(&objects, 10).len(), 5);
    }

    #[test]
    fn test_trail_vertices_fade_and_truncate() {
        let trail: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let vertices = trail_vertices(&trail, [1.0, 0.0, 0.0, 1.0], 4);

        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].position, [6.0, 0.0, 0.0]);
        assert_eq!(vertices[3].position, [9.0, 0.0, 0.0]);
        assert!(vertices.windows(2).all(|w| w[0].color[3] < w[1].color[3]));

        assert!(trail_vertices(&trail[..1], TRAIL_COLOR, 4).is_empty());
    }

    #[test]
    fn test_scene_uniform_packs_light_and_grid() {
        let scene = Scene::new(&SceneConfig::default(), 1.0);
        let uniform = SceneUniform::from_scene(&scene);

        assert_eq!(uniform.light_direction[3], 1.0);
        assert_eq!(uniform.light_color[3], 0.1);
        assert_eq!(uniform.grid, [-500.0, 1000.0, GRID_LINES as f32, 0.0]);
        assert_eq!(std::mem::size_of::<SceneUniform>(), 192);
    }
}
