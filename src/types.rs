use glam::{Mat4, Vec3};

use crate::scene::{Mesh, Node, NodeKind, SceneGraph};

/// Directional lights the shader accumulates; extras are ignored
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Light block for the Lambert shader. Colors are premultiplied by intensity.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 4],
    pub directional_color: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Unit vectors pointing towards each light
    pub directional_dir: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub count: [u32; 4],
}

impl LightsUniform {
    /// Gather every light node of the scene, in traversal order
    pub fn from_scene(scene: &SceneGraph) -> Self {
        let mut lights: Self = bytemuck::Zeroable::zeroed();
        let mut ambient = Vec3::ZERO;
        let mut directional = 0usize;

        for node in scene.all_nodes() {
            match &node.kind {
                NodeKind::AmbientLight(light) => {
                    ambient += Vec3::from_array(light.color.scaled(light.intensity).to_array());
                }
                NodeKind::DirectionalLight(light) if directional < MAX_DIRECTIONAL_LIGHTS => {
                    let color = light.color.scaled(light.intensity).to_array();
                    let dir = light.direction(node.transform.position);
                    lights.directional_color[directional] = [color[0], color[1], color[2], 0.0];
                    lights.directional_dir[directional] = dir.extend(0.0).to_array();
                    directional += 1;
                }
                NodeKind::DirectionalLight(_) => {
                    log::warn!("ignoring directional light {}: shader limit reached", node.id());
                }
                NodeKind::Mesh(_) => {}
            }
        }

        lights.ambient = ambient.extend(1.0).to_array();
        lights.count[0] = directional as u32;
        lights
    }
}

/// Per-mesh uniform: model matrix, normal matrix and base color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl MeshUniform {
    pub fn new(node: &Node, mesh: &Mesh) -> Self {
        let model = node.transform.matrix() * Mat4::from_scale(mesh.geometry.size());
        let normal = model.inverse().transpose();
        let c = mesh.color;
        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            color: [c.r, c.g, c.b, 1.0],
        }
    }
}

/// Mesh vertex: position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unit cube centred on the origin, four vertices per face, CCW from outside
pub fn unit_cube() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            vertices.push(Vertex {
                position: (normal * 0.5 + u * su + v * sv).to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}
