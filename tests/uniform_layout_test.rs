use approx::assert_relative_eq;
use globe_flow::{
    SceneOptions,
    data_structures::scene_graph::{Light, Material},
    pipelines::{
        MaterialUniform,
        light::{LightUniform, MAX_DIRECTIONAL_LIGHTS},
    },
};

use crate::common::test_utils::small_scene;

mod common;

#[test]
fn light_uniform_matches_the_shader_layout() {
    // vec3 + f32, four 32 byte lights, a u32 count padded to 16
    assert_eq!(std::mem::size_of::<LightUniform>(), 160);
    assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
}

#[test]
fn moonlit_rig_fills_every_slot() {
    let scene = small_scene(SceneOptions::moonlit());
    let uniform = LightUniform::from_lights(scene.lights());

    assert_eq!(uniform.directional_count() as usize, MAX_DIRECTIONAL_LIGHTS);
    let (color, intensity) = uniform.ambient();
    assert_eq!(color, [1.0, 1.0, 1.0]);
    assert_relative_eq!(intensity, 0.7);

    let (position, intensity, color) = uniform.directional(1).unwrap();
    assert_eq!(position, [-4.0, -5.0, -5.0]);
    assert_relative_eq!(intensity, 0.3);
    assert_eq!(color, [1.0, 1.0, 1.0]);
    assert_eq!(uniform.directional(4), None);
}

#[test]
fn ambient_rig_has_no_directional_lights() {
    let scene = small_scene(SceneOptions::ambient());
    let uniform = LightUniform::from_lights(scene.lights());
    assert_eq!(uniform.directional_count(), 0);
    assert_eq!(uniform.directional(0), None);
}

#[test]
fn extra_directional_lights_are_dropped() {
    let lights: Vec<_> = (0..6)
        .map(|i| Light::Directional {
            color: [1.0, 1.0, 1.0],
            intensity: i as f32,
            position: [i as f32, 1.0, 0.0].into(),
        })
        .collect();
    let uniform = LightUniform::from_lights(&lights);
    assert_eq!(uniform.directional_count() as usize, MAX_DIRECTIONAL_LIGHTS);
    assert_relative_eq!(uniform.directional(3).unwrap().1, 3.0);
}

#[test]
fn ambient_lights_add_up() {
    let lights = [
        Light::Ambient {
            color: [1.0, 0.0, 0.0],
            intensity: 0.5,
        },
        Light::Ambient {
            color: [0.0, 0.0, 1.0],
            intensity: 0.25,
        },
    ];
    let (color, intensity) = LightUniform::from_lights(&lights).ambient();
    assert_relative_eq!(intensity, 0.5);
    assert_relative_eq!(color[0], 1.0);
    assert_relative_eq!(color[1], 0.0);
    assert_relative_eq!(color[2], 0.5);
}

#[test]
fn material_parameters_are_packed() {
    let scene = small_scene(SceneOptions::moonlit());

    let earth = MaterialUniform::from_material(&scene.earth().material);
    assert_relative_eq!(earth.params[0], 0.1);

    let clouds = MaterialUniform::from_material(&scene.clouds().material);
    assert_eq!(clouds.color, [1.0, 1.0, 1.0, 1.0]);
    assert_relative_eq!(clouds.params[1], 1.0);

    let marker = MaterialUniform::from_material(&Material::Basic {
        color: [0.0, 1.0, 0.0],
    });
    assert_eq!(marker.color, [0.0, 1.0, 0.0, 1.0]);
}
