//! GPU mirror of the scene graph and the per-frame draw.
//!
//! [`GpuScene`] uploads every node once (mesh, instance buffer, material
//! uniform and bind group) and keeps them in step with the CPU-side
//! [`GlobeScene`] through [`GpuScene::sync`]. Textures start as placeholders
//! and are swapped in by [`GpuScene::replace_texture`] when the loader delivers
//! them.
//!
//! Opaque nodes are drawn first and transparent ones last so the clouds blend
//! over the finished Earth and marker.

use std::collections::HashMap;

use crate::{
    camera::Camera,
    context::Context,
    data_structures::{
        model::{DrawMesh, Mesh},
        scene_graph::{GlobeScene, Material, Node},
        texture::Texture,
    },
    frame::DrawTarget,
    pipelines::{MaterialUniform, Pipelines, globe, marker, transparent},
    resources::texture::{TextureSlot, fit_to_limit},
};

struct GpuNode {
    mesh: Mesh,
    instance_buffer: wgpu::Buffer,
    material_uniform: MaterialUniform,
    material_buffer: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
    transparent: bool,
}

pub struct GpuScene {
    pipelines: Pipelines,
    textures: HashMap<TextureSlot, Texture>,
    nodes: Vec<GpuNode>,
}

impl GpuScene {
    pub fn new(ctx: &Context, scene: &GlobeScene) -> Self {
        use wgpu::util::DeviceExt;

        let device = &ctx.device;
        let pipelines = Pipelines::new(
            device,
            &ctx.config,
            &ctx.light.bind_group_layout,
            &ctx.camera.bind_group_layout,
        );

        let textures: HashMap<_, _> = scene
            .texture_slots()
            .into_iter()
            .map(|slot| (slot, slot.placeholder_texture(device, &ctx.queue)))
            .collect();

        let nodes = scene
            .nodes()
            .iter()
            .map(|node| {
                let label = format!("{:?}", node.kind);
                let data = node.geometry.tessellate();
                log::debug!(
                    "uploading {} with {} vertices",
                    label,
                    data.vertices.len()
                );
                let mesh = Mesh::from_data(device, &label, &data);
                let instance_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Instance Buffer", label)),
                        contents: bytemuck::cast_slice(&[node.transform.to_instance().to_raw()]),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    });
                let material_uniform = MaterialUniform::from_material(&node.material);
                let material_buffer =
                    material_uniform.mk_buffer(device, &format!("{} Material Buffer", label));
                let bind_group =
                    mk_material_bind_group(device, &pipelines, &textures, node, &material_buffer);
                GpuNode {
                    mesh,
                    instance_buffer,
                    material_uniform,
                    material_buffer,
                    bind_group,
                    transparent: node.material.is_transparent(),
                }
            })
            .collect();

        Self {
            pipelines,
            textures,
            nodes,
        }
    }

    /// Upload a loaded image into `slot` and rebuild the bind groups that use it.
    pub fn replace_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &GlobeScene,
        slot: TextureSlot,
        image: image::DynamicImage,
    ) {
        if !self.textures.contains_key(&slot) {
            log::debug!("no material uses {:?}, skipping upload", slot);
            return;
        }
        let image = fit_to_limit(image, device.limits().max_texture_dimension_2d);
        let texture = Texture::from_image(
            device,
            queue,
            &image,
            Some(&format!("{:?}", slot)),
            slot.is_linear(),
        );
        self.textures.insert(slot, texture);

        for (gpu, node) in self.nodes.iter_mut().zip(scene.nodes()) {
            if node.material.texture_slots().contains(&slot) {
                gpu.bind_group = mk_material_bind_group(
                    device,
                    &self.pipelines,
                    &self.textures,
                    node,
                    &gpu.material_buffer,
                );
            }
        }
        log::info!("{:?} texture ready", slot);
    }

    /// Push transforms and changed material parameters to the GPU.
    pub fn sync(&mut self, queue: &wgpu::Queue, scene: &GlobeScene) {
        for (gpu, node) in self.nodes.iter_mut().zip(scene.nodes()) {
            queue.write_buffer(
                &gpu.instance_buffer,
                0,
                bytemuck::cast_slice(&[node.transform.to_instance().to_raw()]),
            );
            let material_uniform = MaterialUniform::from_material(&node.material);
            if material_uniform != gpu.material_uniform {
                gpu.material_uniform = material_uniform;
                queue.write_buffer(
                    &gpu.material_buffer,
                    0,
                    bytemuck::cast_slice(&[material_uniform]),
                );
            }
        }
    }

    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        ctx: &'a Context,
        scene: &GlobeScene,
    ) {
        render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
        render_pass.set_bind_group(2, &ctx.light.bind_group, &[]);

        let opaque = self
            .nodes
            .iter()
            .zip(scene.nodes())
            .filter(|(gpu, _)| !gpu.transparent);
        let transparent = self
            .nodes
            .iter()
            .zip(scene.nodes())
            .filter(|(gpu, _)| gpu.transparent);

        for (gpu, node) in opaque.chain(transparent) {
            let Some(bind_group) = &gpu.bind_group else {
                continue;
            };
            render_pass.set_pipeline(self.pipelines.for_material(&node.material));
            render_pass.set_bind_group(0, bind_group, &[]);
            render_pass.draw_mesh_instanced(&gpu.mesh, &gpu.instance_buffer, 0..1);
        }
    }
}

fn mk_material_bind_group(
    device: &wgpu::Device,
    pipelines: &Pipelines,
    textures: &HashMap<TextureSlot, Texture>,
    node: &Node,
    material_buffer: &wgpu::Buffer,
) -> Option<wgpu::BindGroup> {
    let layout = pipelines.layout_for(&node.material);
    let bind_group = match &node.material {
        Material::Standard {
            map,
            normal_map,
            displacement_map,
            ..
        } => globe::mk_bind_group(
            device,
            layout,
            material_buffer,
            textures.get(map)?,
            textures.get(normal_map)?,
            textures.get(displacement_map)?,
        ),
        Material::Cloud { alpha_map, .. } => {
            transparent::mk_bind_group(device, layout, material_buffer, textures.get(alpha_map)?)
        }
        Material::Basic { .. } => Some(marker::mk_bind_group(device, layout, material_buffer)),
    };
    if bind_group.is_none() {
        log::warn!("{:?} has no usable textures and will not be drawn", node.kind);
    }
    bind_group
}

/// One frame's worth of GPU access, handed to the render loop as its draw target.
pub struct Frame<'a> {
    pub ctx: &'a mut Context,
    pub gpu: &'a mut GpuScene,
}

impl DrawTarget for Frame<'_> {
    type Error = wgpu::SurfaceError;

    fn draw(&mut self, scene: &GlobeScene, camera: &Camera) -> Result<(), Self::Error> {
        self.ctx.write_camera(camera);
        self.ctx.light.write(&self.ctx.queue, scene.lights());
        self.gpu.sync(&self.ctx.queue, scene);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let ctx: &Context = &*self.ctx;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.gpu.draw(&mut render_pass, ctx, scene);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }
}
