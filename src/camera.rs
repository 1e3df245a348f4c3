//! A free-rotating camera aimed at the solar system's origin.
//!
//! The camera stores an eye position and lens parameters; view and
//! projection matrices are derived on demand. Rotation commands swing the
//! position around the origin, with the vertical angle clamped short of the
//! poles, and zooming adjusts the field of view within a fixed range.

use glam::{Mat4, Quat, Vec3};

/// Widest permitted field of view, in degrees.
pub const FOV_MAX_DEGREES: f32 = 80.0;
/// Narrowest permitted field of view, in degrees.
pub const FOV_MIN_DEGREES: f32 = 1.0;
/// Maximum elevation above/below the horizontal plane, in radians.
pub const MAX_ELEVATION: f32 = 80.0 * std::f32::consts::PI / 180.0;

/// A camera looking at the origin with world up +Y.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Field of view in degrees, kept within [1°, 80°].
    fov_degrees: f32,
    /// Ratio between the width and the height of the image.
    pub aspect: f32,
    /// Distance before which geometry is excluded from rasterization.
    pub near: f32,
    /// Distance after which geometry is excluded from rasterization.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            fov_degrees: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the eye position.
    pub fn at(mut self, position: impl Into<Vec3>) -> Self {
        self.position = position.into();
        self
    }

    /// Set the field of view in degrees (clamped to the permitted range).
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees.clamp(FOV_MIN_DEGREES, FOV_MAX_DEGREES);
        self
    }

    /// Set the near and far clip distances.
    ///
    /// # Panics
    ///
    /// Panics if `near >= far` or `near <= 0`.
    pub fn clip(mut self, near: f32, far: f32) -> Self {
        assert!(near > 0.0 && near < far, "invalid clip range {near}..{far}");
        self.near = near;
        self.far = far;
        self
    }

    /// Current field of view in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Update the aspect ratio, typically after a window resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// The view matrix: look-at from the eye toward the origin.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    /// The projection matrix stemming from the camera lens parameters.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Elevation of the eye above the horizontal plane, in radians.
    pub fn elevation(&self) -> f32 {
        let distance = self.position.length();
        if distance <= f32::EPSILON {
            0.0
        } else {
            (self.position.y / distance).clamp(-1.0, 1.0).asin()
        }
    }

    /// Rotate the eye horizontally around world up. Positive is
    /// counterclockwise seen from above.
    pub fn yaw(&mut self, delta: f32) {
        self.position = Quat::from_rotation_y(delta) * self.position;
    }

    /// Rotate the eye vertically around the axis `view_dir × world_up`.
    ///
    /// Positive raises the eye. The elevation is clamped to ±80° so the
    /// camera never flips over the poles.
    pub fn pitch(&mut self, delta: f32) {
        let distance = self.position.length();
        if distance <= f32::EPSILON {
            return;
        }

        let elevation = self.elevation();
        let applied = (elevation + delta).clamp(-MAX_ELEVATION, MAX_ELEVATION) - elevation;
        if applied == 0.0 {
            return;
        }

        let view_dir = -self.position / distance;
        let right = view_dir.cross(Vec3::Y).normalize_or(Vec3::X);
        self.position = Quat::from_axis_angle(right, -applied) * self.position;
    }

    /// Zoom by adjusting the field of view. Positive deltas (scrolling up)
    /// narrow the view; the result stays within [1°, 80°].
    pub fn zoom(&mut self, delta: f32) {
        self.fov_degrees = (self.fov_degrees - delta).clamp(FOV_MIN_DEGREES, FOV_MAX_DEGREES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fov_never_leaves_permitted_range() {
        let mut camera = Camera::new().fov(45.0);

        for _ in 0..1000 {
            camera.zoom(3.7);
            let fov = camera.fov_degrees();
            assert!((FOV_MIN_DEGREES..=FOV_MAX_DEGREES).contains(&fov), "{fov}");
        }
        assert_eq!(camera.fov_degrees(), FOV_MIN_DEGREES);

        for _ in 0..1000 {
            camera.zoom(-2.1);
            let fov = camera.fov_degrees();
            assert!((FOV_MIN_DEGREES..=FOV_MAX_DEGREES).contains(&fov), "{fov}");
        }
        assert_eq!(camera.fov_degrees(), FOV_MAX_DEGREES);
    }

    #[test]
    fn pitch_clamps_elevation_at_80_degrees() {
        let mut camera = Camera::new().at([0.0, 0.0, 20.0]);

        for _ in 0..200 {
            camera.pitch(0.1);
            assert!(camera.elevation() <= MAX_ELEVATION + 1e-4);
        }
        assert!((camera.elevation() - MAX_ELEVATION).abs() < 1e-3);

        for _ in 0..400 {
            camera.pitch(-0.1);
            assert!(camera.elevation() >= -MAX_ELEVATION - 1e-4);
        }
        assert!((camera.elevation() + MAX_ELEVATION).abs() < 1e-3);
    }

    #[test]
    fn pitch_raises_the_eye() {
        let mut camera = Camera::new().at([0.0, 0.0, 20.0]);
        camera.pitch(0.2);
        assert!(camera.position.y > 0.0);
        assert!((camera.elevation() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn rotation_preserves_distance_to_origin() {
        let mut camera = Camera::new().at([3.0, 4.0, 12.0]);
        let distance = camera.position.length();

        camera.yaw(0.7);
        camera.pitch(0.3);
        camera.yaw(-1.9);
        camera.pitch(-0.8);

        assert!((camera.position.length() - distance).abs() < 1e-3);
    }

    #[test]
    fn view_matrix_looks_at_the_origin() {
        let camera = Camera::new().at([5.0, 3.0, 8.0]);
        let origin_in_view = camera.view_matrix().transform_point3(Vec3::ZERO);

        // The origin sits straight ahead of the eye, down -Z in view space.
        let distance = camera.position.length();
        assert!(origin_in_view.x.abs() < 1e-4);
        assert!(origin_in_view.y.abs() < 1e-4);
        assert!((origin_in_view.z + distance).abs() < 1e-3);
    }

    #[test]
    #[should_panic]
    fn rejects_inverted_clip_range() {
        let _ = Camera::new().clip(10.0, 1.0);
    }
}
