//! The globe scene graph.
//!
//! [`GlobeScene::build`] assembles the whole scene once from a [`SceneOptions`]
//! record: the Earth, a cloud shell slightly above it, a marker sphere at a
//! geographic location, and a light rig. Afterwards the only per-frame change
//! is the clouds' rotation (see [`GlobeScene::set_cloud_rotation`]); the debug
//! panel may also rewrite material and light parameters.

use cgmath::{Euler, Point3, Rad, Vector3};

use crate::{
    data_structures::instance::Instance,
    geo::{AxisConvention, GeoCoordinate, VANCOUVER},
    resources::{mesh::SphereGeometry, texture::TextureSlot},
};

/// Radius of the Earth sphere in world units.
pub const EARTH_RADIUS: f32 = 3.0;
/// Radius of the cloud shell, just above the displaced Earth surface.
pub const CLOUDS_RADIUS: f32 = 3.05;
pub const MARKER_RADIUS: f32 = 0.1;

/// Which lights the scene gets besides the ambient light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightRig {
    /// Ambient light only.
    Ambient,
    /// Ambient plus one directional key light.
    KeyLight,
    /// Ambient plus four dim directional lights around the globe.
    #[default]
    Moonlight,
}

impl LightRig {
    pub fn light_count(&self) -> usize {
        match self {
            LightRig::Ambient => 1,
            LightRig::KeyLight => 2,
            LightRig::Moonlight => 5,
        }
    }
}

/// Everything that differs between globe variants.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneOptions {
    pub light_rig: LightRig,
    /// Marks the clouds as shadow casters and the Earth as a receiver.
    pub shadows: bool,
    pub convention: AxisConvention,
    /// Where the marker goes.
    pub location: GeoCoordinate,
    /// Segments around and from pole to pole for the Earth and cloud spheres.
    pub earth_segments: u32,
    pub displacement_scale: f32,
    /// Expose the first directional light in the debug panel.
    pub tunable_lights: bool,
}

impl SceneOptions {
    /// Four moonlights, no shadows. The default globe.
    pub fn moonlit() -> Self {
        Self {
            light_rig: LightRig::Moonlight,
            shadows: false,
            convention: AxisConvention::YUp,
            location: VANCOUVER,
            earth_segments: 700,
            displacement_scale: 0.1,
            tunable_lights: false,
        }
    }

    /// One tunable key light with shadow flags set.
    pub fn key_lit() -> Self {
        Self {
            light_rig: LightRig::KeyLight,
            shadows: true,
            tunable_lights: true,
            ..Self::moonlit()
        }
    }

    pub fn ambient() -> Self {
        Self {
            light_rig: LightRig::Ambient,
            ..Self::moonlit()
        }
    }

    pub fn with_location(mut self, location: GeoCoordinate) -> Self {
        self.location = location;
        self
    }

    pub fn with_convention(mut self, convention: AxisConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_segments(mut self, segments: u32) -> Self {
        self.earth_segments = segments;
        self
    }
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self::moonlit()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Earth,
    Clouds,
    Marker,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Lit surface with colour, normal and displacement maps.
    Standard {
        map: TextureSlot,
        normal_map: TextureSlot,
        displacement_map: TextureSlot,
        displacement_scale: f32,
    },
    /// Lit, alpha-blended surface whose coverage comes from `alpha_map`.
    Cloud {
        color: [f32; 3],
        alpha_map: TextureSlot,
        opacity: f32,
    },
    /// Unlit flat colour.
    Basic { color: [f32; 3] },
}

impl Material {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Material::Cloud { .. })
    }

    pub fn texture_slots(&self) -> Vec<TextureSlot> {
        match self {
            Material::Standard {
                map,
                normal_map,
                displacement_map,
                ..
            } => vec![*map, *normal_map, *displacement_map],
            Material::Cloud { alpha_map, .. } => vec![*alpha_map],
            Material::Basic { .. } => vec![],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Applied in X, Y, Z order.
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn to_instance(&self) -> Instance {
        Instance::from_euler_xyz(self.position, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub geometry: SphereGeometry,
    pub material: Material,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    /// Shines from `position` toward the origin.
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Vector3<f32>,
    },
}

/// Index of a node inside [`GlobeScene::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub struct GlobeScene {
    nodes: Vec<Node>,
    lights: Vec<Light>,
    earth: NodeId,
    clouds: NodeId,
    marker: NodeId,
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const MARKER_GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const MOONLIGHT_POSITIONS: [[f32; 3]; 4] = [
    [4.0, 5.0, 5.0],
    [-4.0, -5.0, -5.0],
    [-4.0, -5.0, 5.0],
    [4.0, -5.0, 5.0],
];

impl GlobeScene {
    pub fn build(options: &SceneOptions) -> Self {
        let segments = options.earth_segments;
        let mut nodes = Vec::with_capacity(3);

        let earth = NodeId(nodes.len());
        nodes.push(Node {
            kind: NodeKind::Earth,
            geometry: SphereGeometry::new(EARTH_RADIUS, segments, segments),
            material: Material::Standard {
                map: TextureSlot::EarthColor,
                normal_map: TextureSlot::EarthNormal,
                displacement_map: TextureSlot::EarthDisplacement,
                displacement_scale: options.displacement_scale,
            },
            // Brings longitude 0 of the texture around to +Z
            transform: Transform {
                rotation: Euler::new(Rad(0.0), Rad(-std::f32::consts::FRAC_PI_2), Rad(0.0)),
                ..Default::default()
            },
            cast_shadow: false,
            receive_shadow: options.shadows,
        });

        let clouds = NodeId(nodes.len());
        nodes.push(Node {
            kind: NodeKind::Clouds,
            geometry: SphereGeometry::new(CLOUDS_RADIUS, segments, segments),
            material: Material::Cloud {
                color: WHITE,
                alpha_map: TextureSlot::CloudAlpha,
                opacity: 1.0,
            },
            transform: Transform::default(),
            cast_shadow: options.shadows,
            receive_shadow: false,
        });

        let marker_position = options
            .location
            .to_cartesian(EARTH_RADIUS, options.convention);
        let marker = NodeId(nodes.len());
        nodes.push(Node {
            kind: NodeKind::Marker,
            geometry: SphereGeometry::new(MARKER_RADIUS, 32, 32),
            material: Material::Basic {
                color: MARKER_GREEN,
            },
            transform: Transform {
                position: Vector3::new(marker_position.x, marker_position.y, marker_position.z),
                ..Default::default()
            },
            cast_shadow: false,
            receive_shadow: false,
        });

        let mut lights = vec![Light::Ambient {
            color: WHITE,
            intensity: 0.7,
        }];
        match options.light_rig {
            LightRig::Ambient => (),
            LightRig::KeyLight => lights.push(Light::Directional {
                color: WHITE,
                intensity: 0.6,
                position: Vector3::new(5.0, 3.0, 5.0),
            }),
            LightRig::Moonlight => {
                lights.extend(MOONLIGHT_POSITIONS.iter().map(|&position| {
                    Light::Directional {
                        color: WHITE,
                        intensity: 0.3,
                        position: position.into(),
                    }
                }))
            }
        }

        log::info!(
            "built globe scene: {} nodes, {} lights, marker at ({:.3}, {:.3}, {:.3})",
            nodes.len(),
            lights.len(),
            marker_position.x,
            marker_position.y,
            marker_position.z
        );

        Self {
            nodes,
            lights,
            earth,
            clouds,
            marker,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn earth(&self) -> &Node {
        self.node(self.earth)
    }

    pub fn earth_mut(&mut self) -> &mut Node {
        self.node_mut(self.earth)
    }

    pub fn clouds(&self) -> &Node {
        self.node(self.clouds)
    }

    pub fn marker(&self) -> &Node {
        self.node(self.marker)
    }

    pub fn marker_position(&self) -> Point3<f32> {
        let p = self.marker().transform.position;
        Point3::new(p.x, p.y, p.z)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind == kind).count()
    }

    /// Texture slots referenced by any material, in first-use order and without duplicates.
    pub fn texture_slots(&self) -> Vec<TextureSlot> {
        let mut slots = Vec::new();
        for slot in self
            .nodes
            .iter()
            .flat_map(|node| node.material.texture_slots())
        {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        slots
    }

    /// Set the clouds' drift for `elapsed` seconds since start.
    pub fn set_cloud_rotation(&mut self, elapsed: f32) {
        let clouds = self.clouds;
        self.node_mut(clouds).transform.rotation = cloud_rotation(elapsed);
    }
}

/// Slow spin around the vertical axis with a wobble around the lateral one.
pub fn cloud_rotation(elapsed: f32) -> Euler<Rad<f32>> {
    Euler::new(Rad((elapsed / 30.0).sin()), Rad(elapsed / 40.0), Rad(0.0))
}
