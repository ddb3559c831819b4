//! Displacement resolution for a box body against a `CollisionSurface`.
//!
//! Each step resets the collision flags, sweeps the horizontal component, then sweeps the
//! vertical component from origins offset by the already-clamped horizontal component. The
//! vertical pass depends on the horizontal result, so the two passes for one body must run in
//! that order; separate bodies are independent.

use crate::{
    broad::CollisionSurface,
    error::InvalidConfiguration,
    narrow::Aabb,
    raycast::{RaySpacing, RaycastConfig, RaycastController, RaycastOrigins},
    Fp, Vec2,
};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Which sides of a body were blocked during the latest step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct CollisionInfo {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,

    /// Sign of the last nonzero requested x displacement. Starts facing right.
    pub horizontal_face_dir: i8,
    /// Sign of the last nonzero requested y displacement.
    pub vertical_face_dir: i8,
    /// The displacement requested for the step, before clamping.
    pub move_amount_old: Vec2,
}
impl Default for CollisionInfo {
    fn default() -> Self {
        CollisionInfo {
            above: false,
            below: false,
            left: false,
            right: false,
            horizontal_face_dir: 1,
            vertical_face_dir: 0,
            move_amount_old: Vec2::ZERO,
        }
    }
}
impl CollisionInfo {
    /// Clears the side flags. Facing and the previous displacement are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.above = false;
        self.below = false;
        self.left = false;
        self.right = false;
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.below
    }

    pub fn constrain_velocity(&self, mut vel: Vec2) -> Vec2 {
        //! Zeroes the velocity components of blocked axes.
        if self.above || self.below {
            vel.y = 0.0;
        }
        if self.left || self.right {
            vel.x = 0.0;
        }
        vel
    }
}

/// An axis-aligned box body, centred on `pos`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}
impl Body {
    #[inline]
    pub fn new(pos: Vec2, size: Vec2) -> Body {
        Body { pos, size }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    #[inline]
    pub fn translate(&mut self, offset: Vec2) {
        self.pos += offset;
    }
}

/// The outcome of resolving one requested displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// The displacement after clamping against geometry.
    pub amount: Vec2,
    pub collisions: CollisionInfo,
}

struct Sweep<'a, S: CollisionSurface + ?Sized> {
    config: &'a RaycastConfig,
    origins: RaycastOrigins,
    spacing: RaySpacing,
    surface: &'a S,
}

#[inline]
fn sign(v: Fp) -> i8 {
    if v < 0.0 { -1 } else { 1 }
}

fn horizontal_collisions<S: CollisionSurface + ?Sized>(sweep: &Sweep<S>, amount: &mut Vec2, collisions: &mut CollisionInfo) {
    let skin = sweep.config.skin_width;
    let dir_x = collisions.horizontal_face_dir as Fp;
    let dir = Vec2::new(dir_x, 0.0);

    let mut ray_length = amount.x.abs() + skin;
    if amount.x.abs() < skin {
        // keep probing past the skin so resting contact with a wall is still reported
        ray_length = 2.0 * skin;
    }

    let base = if dir_x < 0.0 { sweep.origins.bottom_left } else { sweep.origins.bottom_right };
    for i in 0..sweep.config.horizontal_ray_count {
        let origin = base + Vec2::new(0.0, sweep.spacing.horizontal * i as Fp);
        if let Some(hit) = sweep.surface.raycast(origin, dir, ray_length, sweep.config.collision_mask) {
            if hit.distance == 0.0 {
                continue; // started inside; this ray can't tell which way is out
            }

            amount.x = (hit.distance - skin) * dir_x;
            ray_length = hit.distance;

            collisions.left = dir_x < 0.0;
            collisions.right = dir_x > 0.0;
            tracing::trace!(ray = i, distance = hit.distance, handle = ?hit.handle, "horizontal hit");
        }
    }
}

fn vertical_collisions<S: CollisionSurface + ?Sized>(sweep: &Sweep<S>, amount: &mut Vec2, collisions: &mut CollisionInfo) {
    let skin = sweep.config.skin_width;
    let dir_y = collisions.vertical_face_dir as Fp;
    let dir = Vec2::new(0.0, dir_y);

    // no minimum ray length here, unlike the horizontal sweep
    let mut ray_length = amount.y.abs() + skin;

    let base = if dir_y < 0.0 { sweep.origins.bottom_left } else { sweep.origins.top_left };
    for i in 0..sweep.config.vertical_ray_count {
        // cast from where the horizontal clamp leaves the body
        let origin = base + Vec2::new(sweep.spacing.vertical * i as Fp + amount.x, 0.0);
        if let Some(hit) = sweep.surface.raycast(origin, dir, ray_length, sweep.config.collision_mask) {
            if hit.distance == 0.0 {
                continue;
            }

            amount.y = (hit.distance - skin) * dir_y;
            ray_length = hit.distance;

            collisions.below = dir_y < 0.0;
            collisions.above = dir_y > 0.0;
            tracing::trace!(ray = i, distance = hit.distance, handle = ?hit.handle, "vertical hit");
        }
    }
}

/// Clamps `amount` so that a body occupying `bounds` does not move into `surface`.
///
/// `previous` supplies the facing directions carried over from the last step; its side flags
/// are ignored. Pure: the same inputs always produce the same `Movement`.
pub fn resolve<S: CollisionSurface + ?Sized>(
    raycaster: &RaycastController,
    bounds: &Aabb,
    surface: &S,
    amount: Vec2,
    previous: &CollisionInfo,
) -> Movement {
    let mut collisions = *previous;
    collisions.reset();
    collisions.move_amount_old = amount;

    let sweep = Sweep {
        config: raycaster.config(),
        origins: raycaster.raycast_origins(bounds),
        spacing: raycaster.ray_spacing(bounds),
        surface,
    };

    let mut amount = amount;
    if amount.x != 0.0 {
        collisions.horizontal_face_dir = sign(amount.x);
        horizontal_collisions(&sweep, &mut amount, &mut collisions);
    }
    if amount.y != 0.0 {
        collisions.vertical_face_dir = sign(amount.y);
        vertical_collisions(&sweep, &mut amount, &mut collisions);
    }

    Movement { amount, collisions }
}

/// Moves a `Body` through static geometry, one requested displacement per step.
///
/// Holds the latest `CollisionInfo` so facing survives steps without movement on that axis.
#[derive(Debug, Clone)]
pub struct Controller2D {
    raycaster: RaycastController,
    collisions: CollisionInfo,
    input: Vec2,
}

impl Controller2D {
    pub fn new(config: RaycastConfig) -> Result<Controller2D, InvalidConfiguration> {
        Ok(Controller2D {
            raycaster: RaycastController::new(config)?,
            collisions: CollisionInfo::default(),
            input: Vec2::ZERO,
        })
    }

    #[inline]
    pub fn raycaster(&self) -> &RaycastController {
        &self.raycaster
    }
    pub fn set_config(&mut self, config: RaycastConfig) -> Result<(), InvalidConfiguration> {
        self.raycaster.set_config(config)
    }

    /// The result of the latest step.
    #[inline]
    pub fn collisions(&self) -> &CollisionInfo {
        &self.collisions
    }
    /// The input vector passed to the latest step. Stored for facing/animation logic, not interpreted.
    #[inline]
    pub fn input(&self) -> Vec2 {
        self.input
    }

    pub fn move_by<S: CollisionSurface + ?Sized>(&mut self, body: &mut Body, surface: &S, amount: Vec2) -> Movement {
        self.move_by_with_input(body, surface, amount, Vec2::ZERO)
    }

    pub fn move_by_with_input<S: CollisionSurface + ?Sized>(
        &mut self,
        body: &mut Body,
        surface: &S,
        amount: Vec2,
        input: Vec2,
    ) -> Movement {
        self.input = input;

        let movement = resolve(&self.raycaster, &body.bounds(), surface, amount, &self.collisions);
        body.translate(movement.amount);

        self.collisions = movement.collisions;
        movement
    }
}
