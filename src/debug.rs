//! Keyboard-driven tuning of a handful of scene parameters.
//!
//! `Tab` cycles the selected parameter, `ArrowUp`/`=` and `ArrowDown`/`-` step
//! it. Values stay inside their declared range.

use winit::keyboard::KeyCode;

use crate::data_structures::scene_graph::{GlobeScene, Light, Material, SceneOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    DisplacementScale,
    LightIntensity,
    LightX,
    LightY,
    LightZ,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tunable {
    pub param: Param,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Tunable {
    fn new(param: Param, value: f32, min: f32, max: f32, step: f32) -> Self {
        Self {
            param,
            value: value.clamp(min, max),
            min,
            max,
            step,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DebugPanel {
    tunables: Vec<Tunable>,
    selected: usize,
}

impl DebugPanel {
    /// Collect the tunables the scene supports, seeded with its current values.
    pub fn for_options(options: &SceneOptions, scene: &GlobeScene) -> Self {
        let displacement = match &scene.earth().material {
            Material::Standard {
                displacement_scale, ..
            } => *displacement_scale,
            _ => options.displacement_scale,
        };
        let mut tunables = vec![Tunable::new(
            Param::DisplacementScale,
            displacement,
            0.0,
            1.0,
            0.01,
        )];

        if options.tunable_lights {
            if let Some((intensity, position)) = first_directional(scene.lights()) {
                tunables.push(Tunable::new(Param::LightIntensity, intensity, 0.0, 10.0, 0.1));
                tunables.push(Tunable::new(Param::LightX, position[0], -10.0, 10.0, 0.1));
                tunables.push(Tunable::new(Param::LightY, position[1], -10.0, 10.0, 0.1));
                tunables.push(Tunable::new(Param::LightZ, position[2], -10.0, 10.0, 0.1));
            }
        }

        log::debug!("debug panel with {} parameters", tunables.len());
        Self {
            tunables,
            selected: 0,
        }
    }

    pub fn tunables(&self) -> &[Tunable] {
        &self.tunables
    }

    pub fn get(&self, param: Param) -> Option<f32> {
        self.tunables
            .iter()
            .find(|t| t.param == param)
            .map(|t| t.value)
    }

    pub fn selected(&self) -> Param {
        self.tunables[self.selected].param
    }

    pub fn select_next(&mut self) -> Param {
        self.selected = (self.selected + 1) % self.tunables.len();
        let param = self.selected();
        log::info!("debug: selected {:?}", param);
        param
    }

    /// Clamp and store a value. Returns the stored value, or `None` for a
    /// parameter this panel does not carry.
    pub fn set(&mut self, param: Param, value: f32) -> Option<f32> {
        let tunable = self.tunables.iter_mut().find(|t| t.param == param)?;
        tunable.value = value.clamp(tunable.min, tunable.max);
        log::info!("debug: {:?} = {:.2}", param, tunable.value);
        Some(tunable.value)
    }

    /// Move the selected parameter by `steps` increments.
    pub fn nudge(&mut self, steps: f32) -> (Param, f32) {
        let Tunable {
            param, value, step, ..
        } = self.tunables[self.selected];
        let value = self.set(param, value + steps * step).unwrap_or(value);
        (param, value)
    }

    /// Returns the changed parameter, if the key changed one.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<(Param, f32)> {
        match key {
            KeyCode::Tab => {
                self.select_next();
                None
            }
            KeyCode::ArrowUp | KeyCode::Equal | KeyCode::NumpadAdd => Some(self.nudge(1.0)),
            KeyCode::ArrowDown | KeyCode::Minus | KeyCode::NumpadSubtract => {
                Some(self.nudge(-1.0))
            }
            _ => None,
        }
    }

    /// Write every tunable into the scene graph.
    pub fn apply(&self, scene: &mut GlobeScene) {
        for tunable in &self.tunables {
            match tunable.param {
                Param::DisplacementScale => {
                    if let Material::Standard {
                        displacement_scale, ..
                    } = &mut scene.earth_mut().material
                    {
                        *displacement_scale = tunable.value;
                    }
                }
                Param::LightIntensity => {
                    if let Some(Light::Directional { intensity, .. }) =
                        first_directional_mut(scene.lights_mut())
                    {
                        *intensity = tunable.value;
                    }
                }
                Param::LightX | Param::LightY | Param::LightZ => {
                    if let Some(Light::Directional { position, .. }) =
                        first_directional_mut(scene.lights_mut())
                    {
                        match tunable.param {
                            Param::LightX => position.x = tunable.value,
                            Param::LightY => position.y = tunable.value,
                            _ => position.z = tunable.value,
                        }
                    }
                }
            }
        }
    }
}

fn first_directional(lights: &[Light]) -> Option<(f32, [f32; 3])> {
    lights.iter().find_map(|light| match light {
        Light::Directional {
            intensity,
            position,
            ..
        } => Some((*intensity, (*position).into())),
        Light::Ambient { .. } => None,
    })
}

fn first_directional_mut(lights: &mut [Light]) -> Option<&mut Light> {
    lights
        .iter_mut()
        .find(|light| matches!(light, Light::Directional { .. }))
}
