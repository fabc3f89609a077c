use approx::assert_relative_eq;
use globe_flow::{
    SceneOptions,
    cgmath::Vector3,
    data_structures::scene_graph::{Light, Material},
    debug::{DebugPanel, Param},
};
use winit::keyboard::KeyCode;

use crate::common::test_utils::small_scene;

mod common;

fn build(options: SceneOptions) -> (DebugPanel, globe_flow::GlobeScene) {
    let scene = small_scene(options.clone());
    (DebugPanel::for_options(&options, &scene), scene)
}

#[test]
fn moonlit_globe_only_tunes_displacement() {
    let (panel, _) = build(SceneOptions::moonlit());
    let params: Vec<_> = panel.tunables().iter().map(|t| t.param).collect();
    assert_eq!(params, vec![Param::DisplacementScale]);

    let displacement = panel.tunables()[0];
    assert_relative_eq!(displacement.value, 0.1);
    assert_relative_eq!(displacement.min, 0.0);
    assert_relative_eq!(displacement.max, 1.0);
    assert_relative_eq!(displacement.step, 0.01);
}

#[test]
fn key_lit_globe_exposes_the_key_light() {
    let (panel, _) = build(SceneOptions::key_lit());
    let params: Vec<_> = panel.tunables().iter().map(|t| t.param).collect();
    assert_eq!(
        params,
        vec![
            Param::DisplacementScale,
            Param::LightIntensity,
            Param::LightX,
            Param::LightY,
            Param::LightZ,
        ]
    );
    assert_relative_eq!(panel.get(Param::LightIntensity).unwrap(), 0.6);
    assert_relative_eq!(panel.get(Param::LightX).unwrap(), 5.0);
    assert_relative_eq!(panel.get(Param::LightY).unwrap(), 3.0);
    assert_relative_eq!(panel.get(Param::LightZ).unwrap(), 5.0);

    let intensity = panel.tunables()[1];
    assert_relative_eq!(intensity.max, 10.0);
    assert_relative_eq!(intensity.step, 0.1);
    let x = panel.tunables()[2];
    assert_relative_eq!(x.min, -10.0);
    assert_relative_eq!(x.max, 10.0);
}

#[test]
fn tunable_lights_need_a_directional_light() {
    let options = SceneOptions {
        tunable_lights: true,
        ..SceneOptions::ambient()
    };
    let (panel, _) = build(options);
    assert_eq!(panel.tunables().len(), 1);
    assert_eq!(panel.get(Param::LightIntensity), None);
}

#[test]
fn values_are_clamped_to_their_range() {
    let (mut panel, _) = build(SceneOptions::key_lit());
    assert_eq!(panel.set(Param::DisplacementScale, 3.0), Some(1.0));
    assert_eq!(panel.set(Param::DisplacementScale, -1.0), Some(0.0));
    assert_eq!(panel.set(Param::LightX, -42.0), Some(-10.0));
    assert_eq!(panel.set(Param::LightIntensity, 11.0), Some(10.0));

    let (mut moonlit, _) = build(SceneOptions::moonlit());
    assert_eq!(moonlit.set(Param::LightX, 1.0), None);
}

#[test]
fn keys_select_and_step_parameters() {
    let (mut panel, _) = build(SceneOptions::key_lit());
    assert_eq!(panel.selected(), Param::DisplacementScale);

    let (param, value) = panel.handle_key(KeyCode::ArrowUp).unwrap();
    assert_eq!(param, Param::DisplacementScale);
    assert_relative_eq!(value, 0.11, epsilon = 1e-6);

    panel.handle_key(KeyCode::Minus);
    panel.handle_key(KeyCode::Minus);
    assert_relative_eq!(panel.get(Param::DisplacementScale).unwrap(), 0.09, epsilon = 1e-6);

    assert_eq!(panel.handle_key(KeyCode::Tab), None);
    assert_eq!(panel.selected(), Param::LightIntensity);
    let (param, value) = panel.handle_key(KeyCode::Equal).unwrap();
    assert_eq!(param, Param::LightIntensity);
    assert_relative_eq!(value, 0.7, epsilon = 1e-6);

    assert_eq!(panel.handle_key(KeyCode::KeyQ), None);
}

#[test]
fn selection_wraps_around() {
    let (mut panel, _) = build(SceneOptions::key_lit());
    for _ in 0..5 {
        panel.select_next();
    }
    assert_eq!(panel.selected(), Param::DisplacementScale);

    let (mut single, _) = build(SceneOptions::moonlit());
    single.select_next();
    assert_eq!(single.selected(), Param::DisplacementScale);
}

#[test]
fn stepping_stops_at_the_bounds() {
    let (mut panel, _) = build(SceneOptions::moonlit());
    for _ in 0..200 {
        panel.nudge(1.0);
    }
    assert_relative_eq!(panel.get(Param::DisplacementScale).unwrap(), 1.0);
}

#[test]
fn apply_writes_into_the_scene() {
    let (mut panel, mut scene) = build(SceneOptions::key_lit());
    panel.set(Param::DisplacementScale, 0.5);
    panel.set(Param::LightIntensity, 2.0);
    panel.set(Param::LightX, -1.0);
    panel.set(Param::LightY, 0.5);
    panel.set(Param::LightZ, 8.0);

    panel.apply(&mut scene);

    assert!(matches!(
        scene.earth().material,
        Material::Standard { displacement_scale, .. } if displacement_scale == 0.5
    ));
    match &scene.lights()[1] {
        Light::Directional {
            intensity,
            position,
            ..
        } => {
            assert_relative_eq!(*intensity, 2.0);
            assert_eq!(*position, Vector3::new(-1.0, 0.5, 8.0));
        }
        other => panic!("expected a directional light, got {:?}", other),
    }
    assert!(matches!(
        scene.lights()[0],
        Light::Ambient { intensity, .. } if intensity == 0.7
    ));
}

#[test]
fn apply_without_changes_keeps_the_scene() {
    let (panel, mut scene) = build(SceneOptions::key_lit());
    let before = scene.clone();
    panel.apply(&mut scene);
    assert_eq!(scene.earth(), before.earth());
    assert_eq!(scene.lights(), before.lights());
}
