//! The per-frame render loop.
//!
//! [`RenderLoop::tick`] runs one cycle: read the clock, update the camera
//! controls, drift the clouds, draw once, and ask for the next frame. Every
//! collaborator is passed in through a small trait so the cycle runs the same
//! against winit/wgpu or against test doubles.
//!
//! # Ports
//!
//! - [`Clock`] provides monotonic seconds since start
//! - [`Controls`] moves the camera (damped orbit motion)
//! - [`DrawTarget`] turns the scene into pixels
//! - [`FrameScheduler`] requests the next cycle from the host

use instant::Instant;
use winit::window::Window;

use crate::{camera::Camera, data_structures::scene_graph::GlobeScene};

pub trait Clock {
    /// Seconds since the clock started. Never decreases.
    fn elapsed_secs(&self) -> f32;
}

/// Wall clock that starts when it is created.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

pub trait Controls {
    fn update(&mut self, camera: &mut Camera);
}

pub trait DrawTarget {
    type Error;

    fn draw(&mut self, scene: &GlobeScene, camera: &Camera) -> Result<(), Self::Error>;
}

pub trait FrameScheduler {
    fn schedule_next(&self);
}

impl FrameScheduler for Window {
    fn schedule_next(&self) {
        self.request_redraw();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Nothing drawn yet.
    Idle,
    Running { frames: u64 },
}

#[derive(Debug)]
pub struct RenderLoop<C: Clock> {
    clock: C,
    state: LoopState,
    elapsed: f32,
    stalled: bool,
}

impl<C: Clock> RenderLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: LoopState::Idle,
            elapsed: 0.0,
            stalled: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Seconds read by the latest tick.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Kick off the first cycle.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) {
        if self.state == LoopState::Idle {
            log::info!("render loop starting");
        }
        scheduler.schedule_next();
    }

    /// Note a requested frame that was dropped without a tick, so nothing is
    /// scheduled behind it.
    pub fn skip(&mut self) {
        self.stalled = true;
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Request a frame again after [`skip`](Self::skip). Returns whether one was requested.
    pub fn resume<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) -> bool {
        if !self.stalled {
            return false;
        }
        self.stalled = false;
        log::debug!("render loop resuming");
        scheduler.schedule_next();
        true
    }

    /**
     * Run one cycle.
     *
     * The next frame is requested even when drawing fails; the draw error is
     * handed back so the host can decide whether the surface needs attention.
     */
    pub fn tick<K, D, S>(
        &mut self,
        scene: &mut GlobeScene,
        camera: &mut Camera,
        controls: &mut K,
        target: &mut D,
        scheduler: &S,
    ) -> Result<(), D::Error>
    where
        K: Controls + ?Sized,
        D: DrawTarget + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.stalled = false;
        self.elapsed = self.clock.elapsed_secs();

        controls.update(camera);
        scene.set_cloud_rotation(self.elapsed);

        let drawn = target.draw(scene, camera);

        self.state = match self.state {
            LoopState::Idle => LoopState::Running { frames: 1 },
            LoopState::Running { frames } => LoopState::Running { frames: frames + 1 },
        };
        scheduler.schedule_next();

        drawn
    }
}
