use approx::assert_relative_eq;
use globe_flow::{
    SceneOptions,
    camera::Camera,
    frame::{LoopState, RenderLoop},
};

use crate::common::test_utils::{
    Call, DrawFailed, ManualClock, RecordingControls, RecordingScheduler, RecordingTarget,
    call_log, small_scene,
};

mod common;

#[test]
fn start_requests_exactly_one_frame() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut render_loop = RenderLoop::new(ManualClock::default());

    render_loop.start(&scheduler);

    assert_eq!(*log.borrow(), vec![Call::Schedule]);
    assert_eq!(render_loop.state(), LoopState::Idle);
}

#[test]
fn tick_updates_controls_then_draws_then_schedules() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut controls = RecordingControls::new(&log);
    let mut target = RecordingTarget::new(&log);
    let mut scene = small_scene(SceneOptions::moonlit());
    let mut camera = Camera::default();
    let mut render_loop = RenderLoop::new(ManualClock::default());

    for _ in 0..3 {
        render_loop
            .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
            .unwrap();
    }

    let expected: Vec<_> = std::iter::repeat([Call::Controls, Call::Draw, Call::Schedule])
        .take(3)
        .flatten()
        .collect();
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn first_tick_leaves_idle_and_frames_are_counted() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut controls = RecordingControls::new(&log);
    let mut target = RecordingTarget::new(&log);
    let mut scene = small_scene(SceneOptions::moonlit());
    let mut camera = Camera::default();
    let mut render_loop = RenderLoop::new(ManualClock::default());

    assert_eq!(render_loop.state(), LoopState::Idle);
    render_loop
        .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
        .unwrap();
    assert_eq!(render_loop.state(), LoopState::Running { frames: 1 });

    for _ in 0..4 {
        render_loop
            .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
            .unwrap();
    }
    assert_eq!(render_loop.state(), LoopState::Running { frames: 5 });
}

#[test]
fn camera_moves_before_it_is_drawn() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut controls = RecordingControls::new(&log);
    controls.step = 1.0;
    let mut target = RecordingTarget::new(&log);
    let mut scene = small_scene(SceneOptions::moonlit());
    let mut camera = Camera::default();
    let mut render_loop = RenderLoop::new(ManualClock::default());

    render_loop
        .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
        .unwrap();
    render_loop
        .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
        .unwrap();

    assert_eq!(target.camera_heights, vec![1.0, 2.0]);
}

#[test]
fn clouds_follow_the_clock() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut controls = RecordingControls::new(&log);
    let mut target = RecordingTarget::new(&log);
    let mut scene = small_scene(SceneOptions::moonlit());
    let mut camera = Camera::default();
    let clock = ManualClock::default();
    let mut render_loop = RenderLoop::new(clock.clone());

    clock.set(12.0);
    render_loop
        .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
        .unwrap();

    assert_relative_eq!(render_loop.elapsed(), 12.0);
    let drawn = target.cloud_rotations[0];
    assert_relative_eq!(drawn.x.0, (12.0_f32 / 30.0).sin());
    assert_relative_eq!(drawn.y.0, 12.0 / 40.0);
    assert_relative_eq!(drawn.z.0, 0.0);
}

#[test]
fn only_the_clouds_change_per_frame() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut controls = RecordingControls::new(&log);
    let mut target = RecordingTarget::new(&log);
    let mut scene = small_scene(SceneOptions::moonlit());
    let before = scene.clone();
    let mut camera = Camera::default();
    let clock = ManualClock::default();
    let mut render_loop = RenderLoop::new(clock.clone());

    clock.set(7.5);
    render_loop
        .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
        .unwrap();

    assert_eq!(scene.earth(), before.earth());
    assert_eq!(scene.marker(), before.marker());
    assert_eq!(scene.lights(), before.lights());
    assert_ne!(scene.clouds(), before.clouds());
}

#[test]
fn failed_draw_still_schedules_and_reports() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut controls = RecordingControls::new(&log);
    let mut target = RecordingTarget::new(&log);
    target.fail = true;
    let mut scene = small_scene(SceneOptions::moonlit());
    let mut camera = Camera::default();
    let mut render_loop = RenderLoop::new(ManualClock::default());

    let result = render_loop.tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler);

    assert_eq!(result, Err(DrawFailed));
    assert_eq!(
        *log.borrow(),
        vec![Call::Controls, Call::Draw, Call::Schedule]
    );
    assert_eq!(render_loop.state(), LoopState::Running { frames: 1 });
}

#[test]
fn skipped_frame_is_requested_again_on_resume() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut render_loop = RenderLoop::new(ManualClock::default());

    render_loop.start(&scheduler);
    // The surface had no size yet, so the frame is dropped
    render_loop.skip();
    assert!(render_loop.is_stalled());

    assert!(render_loop.resume(&scheduler));
    assert!(!render_loop.is_stalled());
    assert_eq!(*log.borrow(), vec![Call::Schedule, Call::Schedule]);

    // Later resizes must not pile up extra frames
    assert!(!render_loop.resume(&scheduler));
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn tick_clears_a_stall() {
    let log = call_log();
    let scheduler = RecordingScheduler::new(&log);
    let mut controls = RecordingControls::new(&log);
    let mut target = RecordingTarget::new(&log);
    let mut scene = small_scene(SceneOptions::moonlit());
    let mut camera = Camera::default();
    let mut render_loop = RenderLoop::new(ManualClock::default());

    render_loop.skip();
    render_loop
        .tick(&mut scene, &mut camera, &mut controls, &mut target, &scheduler)
        .unwrap();

    assert!(!render_loop.is_stalled());
    assert!(!render_loop.resume(&scheduler));
}
