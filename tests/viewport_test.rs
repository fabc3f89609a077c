use approx::assert_relative_eq;
use globe_flow::{
    camera::Projection,
    cgmath::Deg,
    viewport::{MAX_PIXEL_RATIO, ViewportState},
};
use winit::dpi::PhysicalSize;

#[test]
fn buffer_size_uses_the_clamped_pixel_ratio() {
    let standard = ViewportState::new(800, 600, 1.0);
    assert_eq!(standard.buffer_size(), (800, 600));

    let retina = ViewportState::new(800, 600, 2.0);
    assert_eq!(retina.buffer_size(), (1600, 1200));

    let dense = ViewportState::new(800, 600, 3.0);
    assert_relative_eq!(dense.pixel_ratio(), MAX_PIXEL_RATIO);
    assert_eq!(dense.buffer_size(), (1600, 1200));

    let fractional = ViewportState::new(1000, 500, 1.25);
    assert_eq!(fractional.buffer_size(), (1250, 625));
}

#[test]
fn aspect_is_width_over_height() {
    let viewport = ViewportState::new(1920, 1080, 1.0);
    assert_relative_eq!(viewport.aspect(), 1920.0 / 1080.0);
}

#[test]
fn zero_sized_windows_are_ignored() {
    let mut viewport = ViewportState::new(800, 600, 1.0);
    assert!(!viewport.resize(0, 600, 2.0));
    assert!(!viewport.resize(800, 0, 2.0));
    assert_eq!(viewport, ViewportState::new(800, 600, 1.0));
}

#[test]
fn resize_is_idempotent() {
    let mut viewport = ViewportState::new(800, 600, 1.0);
    let mut projection = Projection::new(800, 600, Deg(75.0), 0.1, 100.0);

    assert!(viewport.resize(1024, 768, 1.5));
    projection.set_aspect(viewport.aspect());
    let once = (viewport, projection.clone());

    assert!(viewport.resize(1024, 768, 1.5));
    projection.set_aspect(viewport.aspect());

    assert_eq!((viewport, projection), once);
}

#[test]
fn physical_sizes_are_converted_to_logical() {
    let viewport = ViewportState::from_physical(PhysicalSize::new(1600, 1200), 2.0);
    assert_eq!(viewport.width(), 800);
    assert_eq!(viewport.height(), 600);
    assert_eq!(viewport.buffer_size(), (1600, 1200));

    // Past the clamp the buffer is smaller than the physical window
    let dense = ViewportState::from_physical(PhysicalSize::new(2400, 1800), 3.0);
    assert_eq!(dense.buffer_size(), (1600, 1200));
}

#[test]
fn projection_follows_the_viewport_aspect() {
    let mut projection = Projection::new(800, 600, Deg(75.0), 0.1, 100.0);
    projection.resize(500, 1000);
    assert_relative_eq!(projection.aspect(), 0.5);
    projection.set_aspect(ViewportState::new(300, 100, 2.0).aspect());
    assert_relative_eq!(projection.aspect(), 3.0);
}

#[test]
fn buffer_never_outgrows_the_physical_window() {
    // 1003x601 at 1.5 rounds to a 669x401 logical size
    let viewport = ViewportState::from_physical(PhysicalSize::new(1003, 601), 1.5);
    assert_eq!(viewport.width(), 669);
    assert_eq!(viewport.height(), 401);
    assert_eq!(viewport.buffer_size(), (1003, 601));

    let odd_dense = ViewportState::from_physical(PhysicalSize::new(1001, 751), 3.0);
    assert_eq!(odd_dense.buffer_size(), (667, 500));
}
