use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::coords::Viewport;

/// Fixed camera and perspective parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(3.0, 3.0, 3.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 45.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    /// Perspective projection for `viewport` (depth mapped to `[0, 1]`).
    pub fn projection_matrix(&self, viewport: Viewport) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            viewport.aspect_ratio(),
            self.near,
            self.far,
        )
    }
}

/// Rotation about +Y by `degrees`.
#[inline]
pub fn rotation(degrees: f32) -> Mat4 {
    Mat4::from_rotation_y(degrees.to_radians())
}

/// Model, view and projection matrices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl Transforms {
    /// Recomputes all three matrices. Deterministic for equal inputs.
    pub fn update(&mut self, camera: &Camera, viewport: Viewport) {
        self.model = Mat4::IDENTITY;
        self.view = camera.view_matrix();
        self.projection = camera.projection_matrix(viewport);
    }

    /// `projection * view * rotation * model` for a spin of `degrees`.
    pub fn mvp(&self, degrees: f32) -> Mat4 {
        self.projection * self.view * rotation(degrees) * self.model
    }
}

/// Spin angle in degrees, kept in `[0, 360)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spin {
    degrees: f32,
    step: f32,
}

impl Spin {
    pub fn new(step: f32) -> Self {
        Self { degrees: 0.0, step }
    }

    #[inline]
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    pub fn advance(&mut self) {
        self.degrees = (self.degrees + self.step).rem_euclid(360.0);
    }
}

/// Uniform block matching `var<uniform> MVP: mat4x4<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MvpUniform {
    pub mvp: [[f32; 4]; 4],
}

impl From<Mat4> for MvpUniform {
    fn from(m: Mat4) -> Self {
        Self { mvp: m.to_cols_array_2d() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn transforms_for(w: u32, h: u32) -> Transforms {
        let mut t = Transforms::default();
        t.update(&Camera::default(), Viewport::from_physical(w, h));
        t
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn rotations_compose() {
        for (theta, delta) in [(0.0, 1.0), (37.0, 23.0), (359.0, 2.0), (-90.0, 450.0)] {
            let composed = rotation(theta) * rotation(delta);
            assert!(
                composed.abs_diff_eq(rotation(theta + delta), EPS),
                "rotation({theta}) * rotation({delta})"
            );
        }
    }

    #[test]
    fn rotation_keeps_y_axis() {
        let v = rotation(73.0).transform_vector3(Vec3::Y);
        assert!(v.abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn quarter_turn_maps_x_to_minus_z() {
        let v = rotation(90.0).transform_vector3(Vec3::X);
        assert!(v.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    // ── view / projection ─────────────────────────────────────────────────

    #[test]
    fn update_is_idempotent() {
        let mut t = transforms_for(800, 600);
        let first = t;
        t.update(&Camera::default(), Viewport::from_physical(800, 600));
        assert_eq!(t, first);
    }

    #[test]
    fn model_is_identity() {
        assert_eq!(transforms_for(640, 480).model, Mat4::IDENTITY);
    }

    #[test]
    fn view_looks_at_origin_from_eye() {
        let t = transforms_for(800, 600);
        assert!(t.view.transform_point3(Vec3::splat(3.0)).abs_diff_eq(Vec3::ZERO, EPS));
        let origin = t.view.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, -(27.0f32).sqrt()), 1e-4));
    }

    #[test]
    fn same_aspect_gives_same_projection() {
        let a = transforms_for(800, 600).projection;
        let b = transforms_for(400, 300).projection;
        assert!(a.abs_diff_eq(b, EPS));
    }

    #[test]
    fn projection_keeps_fov_and_planes() {
        let (near, far) = (0.01f32, 100.0f32);
        let f = 1.0 / (45.0f32.to_radians() / 2.0).tan();
        for (w, h) in [(800, 600), (400, 300), (1920, 600)] {
            let p = transforms_for(w, h).projection;
            assert!((p.y_axis.y - f).abs() < EPS);
            assert!((p.x_axis.x - f / (w as f32 / h as f32)).abs() < EPS);
            assert!((p.z_axis.z - far / (near - far)).abs() < EPS);
            assert!((p.w_axis.z - near * far / (near - far)).abs() < EPS);
            assert_eq!(p.z_axis.w, -1.0);
        }
    }

    #[test]
    fn aspect_change_only_touches_x_scale() {
        let a = transforms_for(800, 600).projection.to_cols_array();
        let b = transforms_for(1600, 600).projection.to_cols_array();
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            if i == 0 {
                assert!((x - 2.0 * y).abs() < EPS);
            } else {
                assert_eq!(x, y, "element {i}");
            }
        }
    }

    #[test]
    fn zero_height_projection_is_finite() {
        let t = transforms_for(100, 0);
        assert!(t.projection.is_finite());
        assert!((t.projection.x_axis.x - t.projection.y_axis.y / 100.0).abs() < EPS);
    }

    #[test]
    fn mvp_with_zero_spin_is_projection_view() {
        let t = transforms_for(800, 600);
        assert!(t.mvp(0.0).abs_diff_eq(t.projection * t.view, EPS));
    }

    // ── spin ──────────────────────────────────────────────────────────────

    #[test]
    fn thirty_six_ticks_is_thirty_six_degrees() {
        let mut spin = Spin::new(1.0);
        for _ in 0..36 {
            spin.advance();
        }
        assert_eq!(spin.degrees(), 36.0);
    }

    #[test]
    fn spin_wraps_at_full_turn() {
        let mut spin = Spin::new(1.0);
        for _ in 0..361 {
            spin.advance();
        }
        assert_eq!(spin.degrees(), 1.0);
    }

    #[test]
    fn uniform_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = MvpUniform::from(m);
        assert_eq!(u.mvp[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(std::mem::size_of::<MvpUniform>(), 64);
    }
}
