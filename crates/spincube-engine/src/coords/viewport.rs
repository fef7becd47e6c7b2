/// Drawable area in physical pixels, anchored at `(0, 0)`.
///
/// Renderers use it both for the render-pass viewport rect and for the
/// projection aspect ratio.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, with both clamped to at least one pixel.
    ///
    /// Minimized windows report zero sizes; the clamp keeps the projection finite.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }

    /// Clamps the viewport to a render target of `target_w` x `target_h` pixels.
    ///
    /// Returns `None` when the clamped area is empty.
    pub fn clamped_to(self, target_w: u32, target_h: u32) -> Option<(f32, f32)> {
        if !self.is_valid() {
            return None;
        }
        let w = self.width.min(target_w as f32);
        let h = self.height.min(target_h as f32);
        if w > 0.0 && h > 0.0 { Some((w, h)) } else { None }
    }
}
