use wgpu::util::DeviceExt;

use crate::data_structures::scene_graph::Light;

/// Directional lights the shaders can take. The moonlight rig uses all of them.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    position: [f32; 3],
    intensity: f32,
    color: [f32; 3],
    // Uniform arrays need a 16 byte stride
    _padding: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient_color: [f32; 3],
    ambient_intensity: f32,
    directional: [DirectionalLightRaw; MAX_DIRECTIONAL_LIGHTS],
    count: u32,
    _padding: [u32; 3],
}

impl LightUniform {
    /// Pack a light list. Ambient lights add up; directional lights past
    /// [`MAX_DIRECTIONAL_LIGHTS`] are dropped with a warning.
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut uniform = Self {
            ambient_color: [1.0; 3],
            ambient_intensity: 0.0,
            directional: [DirectionalLightRaw::default(); MAX_DIRECTIONAL_LIGHTS],
            count: 0,
            _padding: [0; 3],
        };

        let mut ambient = [0.0_f32; 3];
        for light in lights {
            match light {
                Light::Ambient { color, intensity } => {
                    for (sum, c) in ambient.iter_mut().zip(color) {
                        *sum += c * intensity;
                    }
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                } => {
                    let index = uniform.count as usize;
                    if index >= MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("dropping directional light at {:?}", position);
                        continue;
                    }
                    uniform.directional[index] = DirectionalLightRaw {
                        position: (*position).into(),
                        intensity: *intensity,
                        color: *color,
                        _padding: 0,
                    };
                    uniform.count += 1;
                }
            }
        }

        // Stored as a unit colour plus intensity so the shader can scale it
        let strength = ambient.iter().cloned().fold(0.0_f32, f32::max);
        if strength > 0.0 {
            uniform.ambient_color = ambient.map(|c| c / strength);
            uniform.ambient_intensity = strength;
        }
        uniform
    }

    pub fn ambient(&self) -> ([f32; 3], f32) {
        (self.ambient_color, self.ambient_intensity)
    }

    pub fn directional_count(&self) -> u32 {
        self.count
    }

    /// (position, intensity, color) of the `index`th directional light.
    pub fn directional(&self, index: usize) -> Option<([f32; 3], f32, [f32; 3])> {
        if index >= self.count as usize {
            return None;
        }
        let raw = &self.directional[index];
        Some((raw.position, raw.intensity, raw.color))
    }
}

pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, lights: &[Light]) -> Self {
        let uniform = LightUniform::from_lights(lights);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Upload the light list if it changed since the last write.
    pub fn write(&mut self, queue: &wgpu::Queue, lights: &[Light]) {
        let uniform = LightUniform::from_lights(lights);
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[crate::pipelines::basic::uniform_entry(
            0,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        )],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
