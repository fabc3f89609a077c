use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use globe_flow::{
    camera::Camera,
    cgmath::{Euler, Rad},
    data_structures::scene_graph::{GlobeScene, SceneOptions},
    frame::{Clock, Controls, DrawTarget, FrameScheduler},
};

/// Which port the render loop touched, in call order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Controls,
    Draw,
    Schedule,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// A small scene that is cheap to build in every test.
pub fn small_scene(options: SceneOptions) -> GlobeScene {
    GlobeScene::build(&options.with_segments(8))
}

/// Clock whose time the test sets by hand.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f32>>,
}

impl ManualClock {
    pub fn set(&self, secs: f32) {
        self.now.set(secs);
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> f32 {
        self.now.get()
    }
}

pub struct RecordingScheduler {
    log: CallLog,
}

impl RecordingScheduler {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl FrameScheduler for RecordingScheduler {
    fn schedule_next(&self) {
        self.log.borrow_mut().push(Call::Schedule);
    }
}

/// Moves the camera up by `step` on every update.
pub struct RecordingControls {
    log: CallLog,
    pub step: f32,
}

impl RecordingControls {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            step: 0.0,
        }
    }
}

impl Controls for RecordingControls {
    fn update(&mut self, camera: &mut Camera) {
        self.log.borrow_mut().push(Call::Controls);
        camera.position.y += self.step;
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DrawFailed;

/// Remembers what it was asked to draw.
pub struct RecordingTarget {
    log: CallLog,
    pub fail: bool,
    pub cloud_rotations: Vec<Euler<Rad<f32>>>,
    pub camera_heights: Vec<f32>,
}

impl RecordingTarget {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
            cloud_rotations: Vec::new(),
            camera_heights: Vec::new(),
        }
    }
}

impl DrawTarget for RecordingTarget {
    type Error = DrawFailed;

    fn draw(&mut self, scene: &GlobeScene, camera: &Camera) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Call::Draw);
        self.cloud_rotations.push(scene.clouds().transform.rotation);
        self.camera_heights.push(camera.position.y);
        if self.fail { Err(DrawFailed) } else { Ok(()) }
    }
}
