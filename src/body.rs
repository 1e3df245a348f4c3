//! Celestial bodies and the system hierarchy.
//!
//! Bodies live in a [`SolarSystem`] arena and are addressed by copyable
//! [`BodyId`] handles; a child stores its parent's id rather than a
//! reference, so the hierarchy carries no lifetimes. A body's world position
//! is a derived quantity: [`SolarSystem::update`] recomputes every center
//! from the elapsed time before each frame's draw calls read it.

use glam::{Quat, Vec3};

/// Handle to a body inside a [`SolarSystem`].
///
/// Ids are assigned in insertion order; since a parent must exist before its
/// children can reference it, a parent's id is always smaller than its
/// children's, which is what lets [`SolarSystem::update`] run in a single
/// forward pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(usize);

impl BodyId {
    /// Index of this body in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a body is, which decides how it is shaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Self-luminous; rendered emissive and lights the planets.
    Star,
    /// Lit by the star at the origin. Moons are planets orbiting planets.
    Planet,
}

/// Orbital parameters of a non-root body, relative to its parent.
#[derive(Clone, Copy, Debug)]
pub struct Orbit {
    /// The body this one revolves around.
    pub parent: BodyId,
    /// Distance from the parent's center.
    pub radius: f32,
    /// Time for one full revolution, in seconds.
    pub period: f32,
}

/// A star, planet, or moon.
///
/// Constructed with the fluent builders [`CelestialBody::star`] and
/// [`CelestialBody::planet`]:
///
/// ```
/// use orrery::{CelestialBody, SolarSystem, Vec3};
///
/// let mut system = SolarSystem::new();
/// let sun = system.add(CelestialBody::star(3.0, 64));
/// let earth = system.add(
///     CelestialBody::planet(1.0, 48, sun, 10.0, 12.0)
///         .rotation_period(4.0)
///         .axial_tilt(23.4_f32.to_radians())
///         .color(Vec3::new(0.3, 0.5, 0.9))
///         .texture("assets/earth.png"),
/// );
/// system.add(CelestialBody::planet(0.3, 32, earth, 2.0, 3.0));
/// ```
#[derive(Clone, Debug)]
pub struct CelestialBody {
    /// Star or planet.
    pub kind: BodyKind,
    /// Sphere radius in world units.
    pub radius: f32,
    /// Angular resolution of the generated sphere mesh.
    pub resolution: u32,
    /// Orbital parameters; `None` for root bodies, which stay at the origin.
    pub orbit: Option<Orbit>,
    /// Time for one full spin around the body's own axis, in seconds.
    /// Zero disables spinning.
    pub rotation_period: f32,
    /// Axial tilt in radians, applied to the spin axis.
    pub axial_tilt: f32,
    /// Surface tint; also the base color of the procedural fallback texture.
    pub color: Vec3,
    /// Path to the surface texture image, if any.
    pub texture_path: Option<String>,
    /// World-space center, recomputed by [`SolarSystem::update`].
    center: Vec3,
}

impl CelestialBody {
    /// Create a root body fixed at the origin.
    pub fn star(radius: f32, resolution: u32) -> Self {
        Self {
            kind: BodyKind::Star,
            radius,
            resolution,
            orbit: None,
            rotation_period: 0.0,
            axial_tilt: 0.0,
            color: Vec3::ONE,
            texture_path: None,
            center: Vec3::ZERO,
        }
    }

    /// Create a body orbiting `parent` at `orbit_radius`, completing one
    /// revolution every `orbit_period` seconds.
    pub fn planet(
        radius: f32,
        resolution: u32,
        parent: BodyId,
        orbit_radius: f32,
        orbit_period: f32,
    ) -> Self {
        Self {
            kind: BodyKind::Planet,
            radius,
            resolution,
            orbit: Some(Orbit {
                parent,
                radius: orbit_radius,
                period: orbit_period,
            }),
            rotation_period: 0.0,
            axial_tilt: 0.0,
            color: Vec3::ONE,
            texture_path: None,
            center: Vec3::ZERO,
        }
    }

    /// Set the spin period in seconds (zero disables spinning).
    pub fn rotation_period(mut self, period: f32) -> Self {
        self.rotation_period = period;
        self
    }

    /// Set the axial tilt in radians.
    pub fn axial_tilt(mut self, tilt: f32) -> Self {
        self.axial_tilt = tilt;
        self
    }

    /// Set the surface tint color.
    pub fn color(mut self, color: impl Into<Vec3>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the surface texture image path.
    pub fn texture(mut self, path: impl Into<String>) -> Self {
        self.texture_path = Some(path.into());
        self
    }

    /// World-space center as of the last [`SolarSystem::update`].
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Orientation at the given time: spin about the body's own axis,
    /// tilted by the axial tilt.
    pub fn orientation(&self, time: f32) -> Quat {
        let spin = if self.rotation_period.abs() > f32::EPSILON {
            std::f32::consts::TAU * time / self.rotation_period
        } else {
            0.0
        };
        Quat::from_rotation_z(self.axial_tilt) * Quat::from_rotation_y(spin)
    }

    /// Model transform at the given time, from the current center and spin.
    pub fn transform(&self, time: f32) -> crate::mesh::Transform {
        crate::mesh::Transform::new()
            .position(self.center)
            .rotation(self.orientation(time))
    }

    /// Center position for a body orbiting `parent_center` at `time`.
    ///
    /// The orbit is planar in the parent's frame: the angle advances by 2π
    /// per period, so the position at `t` equals the position at
    /// `t + period`.
    fn orbital_center(orbit: &Orbit, parent_center: Vec3, time: f32) -> Vec3 {
        if orbit.period.abs() <= f32::EPSILON {
            return parent_center + Vec3::new(orbit.radius, 0.0, 0.0);
        }
        let angle = std::f32::consts::TAU * time / orbit.period;
        parent_center + orbit.radius * Vec3::new(angle.cos(), 0.0, angle.sin())
    }
}

/// Arena of celestial bodies forming the scene hierarchy.
#[derive(Clone, Debug, Default)]
pub struct SolarSystem {
    bodies: Vec<CelestialBody>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if the body's orbit references a parent that is not in this
    /// system yet; a parent handle always comes from an earlier `add`.
    pub fn add(&mut self, body: CelestialBody) -> BodyId {
        if let Some(orbit) = &body.orbit {
            assert!(
                orbit.parent.0 < self.bodies.len(),
                "orbit parent {:?} not in system",
                orbit.parent
            );
        }
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    /// Recompute every body's center from the elapsed time.
    ///
    /// Must run before the frame's draw calls read the transforms: positions
    /// are derived from time, not persisted state. Parents are updated
    /// before children because a parent's id is always smaller.
    pub fn update(&mut self, time: f32) {
        for i in 0..self.bodies.len() {
            let center = match self.bodies[i].orbit {
                None => Vec3::ZERO,
                Some(orbit) => {
                    let parent_center = self.bodies[orbit.parent.0].center;
                    CelestialBody::orbital_center(&orbit, parent_center, time)
                }
            };
            self.bodies[i].center = center;
        }
    }

    pub fn get(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_system() -> (SolarSystem, BodyId, BodyId, BodyId) {
        let mut system = SolarSystem::new();
        let sun = system.add(CelestialBody::star(3.0, 16));
        let earth = system.add(CelestialBody::planet(1.0, 16, sun, 10.0, 12.0));
        let moon = system.add(CelestialBody::planet(0.3, 16, earth, 2.0, 3.0));
        (system, sun, earth, moon)
    }

    #[test]
    fn root_body_stays_at_origin() {
        let (mut system, sun, ..) = test_system();
        for t in [0.0, 1.5, 100.0] {
            system.update(t);
            assert_eq!(system.get(sun).center(), Vec3::ZERO);
        }
    }

    #[test]
    fn orbit_keeps_distance_from_parent() {
        let (mut system, _, earth, moon) = test_system();
        for i in 0..50 {
            let t = i as f32 * 0.37;
            system.update(t);
            let earth_center = system.get(earth).center();
            let moon_center = system.get(moon).center();
            assert!((earth_center.length() - 10.0).abs() < 1e-4, "t = {t}");
            assert!(
                ((moon_center - earth_center).length() - 2.0).abs() < 1e-4,
                "t = {t}"
            );
        }
    }

    #[test]
    fn orbit_is_periodic() {
        let (mut system, _, earth, _) = test_system();
        let t = 4.3;
        system.update(t);
        let before = system.get(earth).center();
        system.update(t + 12.0);
        let after = system.get(earth).center();
        assert!((after - before).length() < 1e-3, "{before:?} vs {after:?}");
    }

    #[test]
    fn orbit_stays_in_parents_plane() {
        let (mut system, _, earth, moon) = test_system();
        for i in 0..20 {
            system.update(i as f32 * 0.91);
            assert_eq!(system.get(earth).center().y, 0.0);
            assert_eq!(system.get(moon).center().y, 0.0);
        }
    }

    #[test]
    fn moon_follows_its_planet() {
        let (mut system, _, _, moon) = test_system();
        // The moon's orbit is centered on the planet, not the star, so its
        // distance from the origin sweeps the whole band around the
        // planet's orbit over time.
        let mut min_distance = f32::INFINITY;
        let mut max_distance = 0.0f32;
        for i in 0..200 {
            system.update(i as f32 * 0.13);
            let d = system.get(moon).center().length();
            min_distance = min_distance.min(d);
            max_distance = max_distance.max(d);
        }
        assert!(min_distance < 8.5, "min {min_distance}");
        assert!(max_distance > 11.5, "max {max_distance}");
    }

    #[test]
    fn quarter_period_is_a_quarter_turn() {
        let mut system = SolarSystem::new();
        let sun = system.add(CelestialBody::star(1.0, 8));
        let planet = system.add(CelestialBody::planet(0.5, 8, sun, 4.0, 8.0));

        system.update(0.0);
        let start = system.get(planet).center();
        assert!((start - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-5);

        system.update(2.0);
        let quarter = system.get(planet).center();
        assert!((quarter - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn spin_completes_a_revolution_per_period() {
        let body = CelestialBody::star(1.0, 8).rotation_period(5.0);
        let start = body.orientation(0.0);
        let full = body.orientation(5.0);
        // Same orientation after one full spin (quaternion or its negation).
        assert!(start.dot(full).abs() > 1.0 - 1e-4);

        let half = body.orientation(2.5);
        let spun = half * Vec3::X;
        assert!((spun - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn tilt_leans_the_spin_axis() {
        let tilt = 0.4;
        let body = CelestialBody::star(1.0, 8)
            .rotation_period(5.0)
            .axial_tilt(tilt);
        // The spin axis is +Y leaned by the tilt, regardless of spin phase.
        for t in [0.0, 1.3, 4.9] {
            let axis = body.orientation(t) * Vec3::Y;
            assert!((axis.dot(Vec3::Y) - tilt.cos()).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_periods_do_not_produce_nan() {
        let mut system = SolarSystem::new();
        let sun = system.add(CelestialBody::star(1.0, 8));
        let stuck = system.add(CelestialBody::planet(0.5, 8, sun, 4.0, 0.0));
        system.update(3.0);
        let center = system.get(stuck).center();
        assert!(center.is_finite());
        assert_eq!(center, Vec3::new(4.0, 0.0, 0.0));

        let body = CelestialBody::star(1.0, 8);
        assert!(body.orientation(2.0).is_finite());
    }

    #[test]
    #[should_panic]
    fn rejects_foreign_parent_handle() {
        let mut a = SolarSystem::new();
        let sun = a.add(CelestialBody::star(1.0, 8));
        let _earth = a.add(CelestialBody::planet(1.0, 8, sun, 5.0, 4.0));

        let mut b = SolarSystem::new();
        // `earth`'s id does not exist in system `b`.
        let foreign = BodyId(1);
        b.add(CelestialBody::planet(0.3, 8, foreign, 2.0, 3.0));
    }
}
