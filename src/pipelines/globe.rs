use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{mk_pipeline_layout, mk_render_pipeline, texture_entries, uniform_entry},
};

/**
 * Material group for the lit Earth surface.
 *
 * 0: material uniform, 1/2: colour map, 3/4: normal map, 5/6: displacement map.
 * The displacement map is read in the vertex stage.
 */
pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let [color, color_sampler] = texture_entries(1, wgpu::ShaderStages::FRAGMENT);
    let [normal, normal_sampler] = texture_entries(3, wgpu::ShaderStages::FRAGMENT);
    let [displacement, displacement_sampler] = texture_entries(5, wgpu::ShaderStages::VERTEX);
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
            color,
            color_sampler,
            normal,
            normal_sampler,
            displacement,
            displacement_sampler,
        ],
        label: Some("globe_bind_group_layout"),
    })
}

/// Returns `None` if one of the textures has no sampler.
pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    material: &wgpu::Buffer,
    map: &Texture,
    normal_map: &Texture,
    displacement_map: &Texture,
) -> Option<wgpu::BindGroup> {
    use crate::pipelines::basic::texture_bindings;
    let [color, color_sampler] = texture_bindings(1, map)?;
    let [normal, normal_sampler] = texture_bindings(3, normal_map)?;
    let [displacement, displacement_sampler] = texture_bindings(5, displacement_map)?;
    Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: material.as_entire_binding(),
            },
            color,
            color_sampler,
            normal,
            normal_sampler,
            displacement,
            displacement_sampler,
        ],
        label: Some("globe_bind_group"),
    }))
}

pub fn mk_globe_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    material_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Globe Pipeline Layout",
        material_layout,
        camera_bind_group_layout,
        light_bind_group_layout,
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Globe Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("globe.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
