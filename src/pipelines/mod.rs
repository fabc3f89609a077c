//! Render pipelines, one per material kind.
//!
//! Every material pipeline uses the same group order: 0 is the material (a
//! [`MaterialUniform`] plus its textures), 1 is the camera and 2 the lights.
//! Opaque materials go through [`globe`] and [`marker`], the cloud shell through
//! [`transparent`].

use wgpu::util::DeviceExt;

use crate::data_structures::scene_graph::Material;

pub mod basic;
pub mod globe;
pub mod light;
pub mod marker;
pub mod transparent;

/// Per-node material parameters.
///
/// `params.x` holds the displacement scale and `params.y` the opacity.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl MaterialUniform {
    pub fn from_material(material: &Material) -> Self {
        match material {
            Material::Standard {
                displacement_scale, ..
            } => Self {
                color: [1.0; 4],
                params: [*displacement_scale, 1.0, 0.0, 0.0],
            },
            Material::Cloud { color, opacity, .. } => Self {
                color: [color[0], color[1], color[2], 1.0],
                params: [0.0, *opacity, 0.0, 0.0],
            },
            Material::Basic { color } => Self {
                color: [color[0], color[1], color[2], 1.0],
                params: [0.0, 1.0, 0.0, 0.0],
            },
        }
    }

    pub fn mk_buffer(&self, device: &wgpu::Device, label: &str) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }
}

/// Every pipeline together with the material layout it expects.
pub struct Pipelines {
    pub globe: wgpu::RenderPipeline,
    pub globe_layout: wgpu::BindGroupLayout,
    pub transparent: wgpu::RenderPipeline,
    pub transparent_layout: wgpu::BindGroupLayout,
    pub marker: wgpu::RenderPipeline,
    pub marker_layout: wgpu::BindGroupLayout,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        light_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let globe_layout = globe::mk_bind_group_layout(device);
        let transparent_layout = transparent::mk_bind_group_layout(device);
        let marker_layout = marker::mk_bind_group_layout(device);
        Self {
            globe: globe::mk_globe_pipeline(
                device,
                config,
                &globe_layout,
                light_bind_group_layout,
                camera_bind_group_layout,
            ),
            transparent: transparent::mk_transparent_pipeline(
                device,
                config,
                &transparent_layout,
                light_bind_group_layout,
                camera_bind_group_layout,
            ),
            marker: marker::mk_marker_pipeline(
                device,
                config,
                &marker_layout,
                light_bind_group_layout,
                camera_bind_group_layout,
            ),
            globe_layout,
            transparent_layout,
            marker_layout,
        }
    }

    pub fn for_material(&self, material: &Material) -> &wgpu::RenderPipeline {
        match material {
            Material::Standard { .. } => &self.globe,
            Material::Cloud { .. } => &self.transparent,
            Material::Basic { .. } => &self.marker,
        }
    }

    pub fn layout_for(&self, material: &Material) -> &wgpu::BindGroupLayout {
        match material {
            Material::Standard { .. } => &self.globe_layout,
            Material::Cloud { .. } => &self.transparent_layout,
            Material::Basic { .. } => &self.marker_layout,
        }
    }
}
