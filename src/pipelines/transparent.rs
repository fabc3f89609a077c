use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{
        mk_pipeline_layout, mk_render_pipeline, texture_bindings, texture_entries, uniform_entry,
    },
};

/// Material group for alpha-masked surfaces: uniform at 0, mask at 1/2.
pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let [alpha, alpha_sampler] = texture_entries(1, wgpu::ShaderStages::FRAGMENT);
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
            alpha,
            alpha_sampler,
        ],
        label: Some("transparent_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    material: &wgpu::Buffer,
    alpha_map: &Texture,
) -> Option<wgpu::BindGroup> {
    let [alpha, alpha_sampler] = texture_bindings(1, alpha_map)?;
    Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: material.as_entire_binding(),
            },
            alpha,
            alpha_sampler,
        ],
        label: Some("transparent_bind_group"),
    }))
}

/**
 * Pipeline for translucent shells such as the clouds.
 *
 * Blends over whatever the opaque pipelines drew, so nodes using it must be
 * drawn after them.
 */
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    material_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Transparent Pipeline Layout",
        material_layout,
        camera_bind_group_layout,
        light_bind_group_layout,
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Clouds Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("clouds.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
