//! # Orrery
//!
//! **An interactive solar-system viewer built on wgpu.**
//!
//! A star, orbiting planets, a moon, and a cubemap starfield, rendered with
//! procedurally generated UV-sphere meshes and driven by a free-rotating,
//! zoomable camera.
//!
//! ## Quick Start
//!
//! ```no_run
//! use orrery::*;
//!
//! fn main() {
//!     let mut system = SolarSystem::new();
//!     let sun = system.add(CelestialBody::star(3.0, 64).rotation_period(24.0));
//!     system.add(
//!         CelestialBody::planet(1.0, 48, sun, 10.0, 12.0)
//!             .axial_tilt(23.4_f32.to_radians())
//!             .color(Vec3::new(0.3, 0.5, 0.9)),
//!     );
//!
//!     run(AppConfig::new().title("Orrery"), system);
//! }
//! ```
//!
//! ## Structure
//!
//! - Geometry is generated on the CPU ([`SphereGeometry`]) and uploaded once
//!   as an immutable [`Mesh`].
//! - Bodies live in a [`SolarSystem`] arena and are addressed by [`BodyId`]
//!   handles; positions are recomputed from elapsed time every frame.
//! - Rendering is two passes: [`Skybox`] first (depth relaxed), then
//!   [`BodyPass`] with depth testing and per-body uniforms.

mod app;
mod body;
mod body_pass;
mod camera;
mod geometry;
mod gpu;
mod input;
mod mesh;
mod skybox;
mod texture;

pub use app::{AppConfig, run};
pub use body::{BodyId, BodyKind, CelestialBody, Orbit, SolarSystem};
pub use body_pass::{BodyInstance, BodyPass};
pub use camera::Camera;
pub use geometry::{SKYBOX_VERTEX_COUNT, SphereGeometry, skybox_cube_positions};
pub use gpu::GpuContext;
pub use input::Input;
pub use mesh::{Mesh, Transform, Vertex3d};
pub use skybox::Skybox;
pub use texture::{Cubemap, CubemapError, Texture};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
