//! Window size bookkeeping.
//!
//! Sizes are kept in logical pixels together with the host's device pixel
//! ratio. The render buffer uses at most [`MAX_PIXEL_RATIO`] physical pixels per
//! logical pixel, which keeps high-density displays from paying for 3x or 4x
//! resolution.

use winit::dpi::PhysicalSize;

pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    width: u32,
    height: u32,
    device_pixel_ratio: f64,
    buffer: (u32, u32),
}

fn scaled(logical: u32, ratio: f64) -> u32 {
    ((logical as f64 * ratio).round() as u32).max(1)
}

impl ViewportState {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        let ratio = device_pixel_ratio.min(MAX_PIXEL_RATIO);
        Self {
            width,
            height,
            device_pixel_ratio,
            buffer: (scaled(width, ratio), scaled(height, ratio)),
        }
    }

    /// Build from a physical window size as reported by winit.
    ///
    /// Up to [`MAX_PIXEL_RATIO`] the buffer is the physical size itself, so
    /// rounding through logical pixels never grows it past the window.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = size.to_logical::<f64>(scale_factor);
        let mut viewport = Self::new(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale_factor,
        );
        if scale_factor <= MAX_PIXEL_RATIO {
            viewport.buffer = (size.width.max(1), size.height.max(1));
        } else {
            let shrink = |physical: u32| {
                ((physical as f64 * MAX_PIXEL_RATIO / scale_factor).floor() as u32).max(1)
            };
            viewport.buffer = (shrink(size.width), shrink(size.height));
        }
        viewport
    }

    /// Apply a size-change notification. Returns `false` (and keeps the old
    /// state) for zero-sized windows, which happen while minimized.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        *self = Self::new(width, height, device_pixel_ratio);
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Size of the surface the renderer draws into.
    pub fn buffer_size(&self) -> (u32, u32) {
        self.buffer
    }
}
