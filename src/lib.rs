//! Raycast-driven movement resolution for axis-aligned 2D bodies against static geometry.
//!
//! A [`Controller2D`] takes a requested per-step displacement, samples the world with
//! parallel rays cast from the body's skin-inset corners, and clamps the displacement so the
//! body never enters solid geometry. Horizontal motion is resolved first; vertical rays are
//! then cast from where the body will be after the horizontal clamp.
//!
//! ```
//! use raystep::*;
//!
//! fn main() -> Result<(), InvalidConfiguration> {
//!     let mut world = CollisionWorld::new(1.0);
//!     world.insert(Aabb::new(2.0, -5.0, 3.0, 5.0), LayerMask::ALL);
//!
//!     let mut body = Body::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
//!     let mut controller = Controller2D::new(RaycastConfig::default())?;
//!     let movement = controller.move_by(&mut body, &world, Vec2::new(3.0, 0.0));
//!     assert!(movement.collisions.right);
//!     Ok(())
//! }
//! ```

pub mod broad;
pub mod controller;
pub mod error;
pub mod narrow;
pub mod raycast;

#[cfg(not(feature = "f64"))]
pub type Fp = f32;
#[cfg(not(feature = "f64"))]
pub type Vec2 = glam::Vec2;

#[cfg(feature = "f64")]
pub type Fp = f64;
#[cfg(feature = "f64")]
pub type Vec2 = glam::DVec2;

pub use broad::{Collider, ColliderHandle, CollisionSurface, CollisionWorld, LayerMask, RayHit};
pub use controller::{resolve, Body, CollisionInfo, Controller2D, Movement};
pub use error::InvalidConfiguration;
pub use narrow::{Aabb, Circle, Poly, RayQuery, Shape};
pub use raycast::{Axis, RaySpacing, RaycastConfig, RaycastController, RaycastOrigins};
