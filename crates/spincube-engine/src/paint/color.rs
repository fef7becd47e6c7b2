/// Straight-alpha RGBA color in linear space.
///
/// Channels are expected in `[0, 1]`. Use [`Color::clamped`] for values that
/// come from user configuration.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    #[inline]
    pub const fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Converts to the `f64` color used by `wgpu::LoadOp::Clear`.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.0, 0.0, 0.1).a, 1.0);
    }

    #[test]
    fn clamped_limits_channels() {
        let c = Color::new(-0.5, 2.0, 0.25, 1.5).clamped();
        assert_eq!(c, Color::new(0.0, 1.0, 0.25, 1.0));
    }

    #[test]
    fn to_wgpu_widens_channels() {
        let c = Color::new(0.0, 0.0, 0.5, 1.0).to_wgpu();
        assert_eq!(c.b, 0.5);
        assert_eq!(c.a, 1.0);
    }
}
