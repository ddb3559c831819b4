//! Ray origin and spacing derivation from a body's bounding box.

use crate::{broad::LayerMask, error::InvalidConfiguration, narrow::Aabb, Fp, Vec2};
use std::fmt::{Display, Formatter};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}
impl Display for Axis {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

/// Ray layout configuration for a `RaycastController`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct RaycastConfig {
    /// Inset of the ray origins from the bounding box, kept between the body and anything it rests against.
    pub skin_width: Fp,
    /// Rays cast along x, spread over the box height. At least 2.
    pub horizontal_ray_count: usize,
    /// Rays cast along y, spread over the box width. At least 2.
    pub vertical_ray_count: usize,
    /// Layers the rays can hit.
    pub collision_mask: LayerMask,
}
impl Default for RaycastConfig {
    fn default() -> Self {
        RaycastConfig {
            skin_width: 0.015,
            horizontal_ray_count: 4,
            vertical_ray_count: 4,
            collision_mask: LayerMask::ALL,
        }
    }
}
impl RaycastConfig {
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if !self.skin_width.is_finite() || self.skin_width <= 0.0 {
            return Err(InvalidConfiguration::SkinWidth(self.skin_width));
        }
        if self.horizontal_ray_count < 2 {
            return Err(InvalidConfiguration::RayCount { axis: Axis::Horizontal, count: self.horizontal_ray_count });
        }
        if self.vertical_ray_count < 2 {
            return Err(InvalidConfiguration::RayCount { axis: Axis::Vertical, count: self.vertical_ray_count });
        }
        Ok(())
    }
}

/// Corners of a bounding box after insetting each edge by the skin width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastOrigins {
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
}

/// Distance between neighbouring parallel rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySpacing {
    /// Vertical gap between horizontal rays.
    pub horizontal: Fp,
    /// Horizontal gap between vertical rays.
    pub vertical: Fp,
}

/// Derives ray origins and spacing for any bounding box under a validated `RaycastConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastController {
    config: RaycastConfig,
}

impl RaycastController {
    pub fn new(config: RaycastConfig) -> Result<RaycastController, InvalidConfiguration> {
        config.validate()?;
        tracing::debug!(?config, "raycast controller configured");
        Ok(RaycastController { config })
    }

    #[inline]
    pub fn config(&self) -> &RaycastConfig {
        &self.config
    }
    pub fn set_config(&mut self, config: RaycastConfig) -> Result<(), InvalidConfiguration> {
        config.validate()?;
        tracing::debug!(?config, "raycast controller reconfigured");
        self.config = config;
        Ok(())
    }

    /// The skin-inset box that both origins and spacing are measured on.
    #[inline]
    fn inset(&self, bounds: &Aabb) -> Aabb {
        bounds.shrink(self.config.skin_width)
    }

    pub fn raycast_origins(&self, bounds: &Aabb) -> RaycastOrigins {
        let inset = self.inset(bounds);
        if inset.min.x > inset.max.x || inset.min.y > inset.max.y {
            // origins cross over; rays still fire but start from the wrong sides
            tracing::warn!(?bounds, skin_width = self.config.skin_width, "bounds smaller than twice the skin width");
        }
        RaycastOrigins {
            top_left: inset.minx_maxy(),
            top_right: inset.max,
            bottom_left: inset.min,
            bottom_right: inset.maxx_miny(),
        }
    }

    pub fn ray_spacing(&self, bounds: &Aabb) -> RaySpacing {
        let inset = self.inset(bounds);
        RaySpacing {
            horizontal: inset.height() / (self.config.horizontal_ray_count - 1) as Fp,
            vertical: inset.width() / (self.config.vertical_ray_count - 1) as Fp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_bad_config() {
        let base = RaycastConfig::default();
        assert!(base.validate().is_ok());

        let one_ray = RaycastConfig { horizontal_ray_count: 1, ..base };
        assert_eq!(
            RaycastController::new(one_ray),
            Err(InvalidConfiguration::RayCount { axis: Axis::Horizontal, count: 1 })
        );
        let no_rays = RaycastConfig { vertical_ray_count: 0, ..base };
        assert_eq!(no_rays.validate(), Err(InvalidConfiguration::RayCount { axis: Axis::Vertical, count: 0 }));

        let negative = RaycastConfig { skin_width: -0.1, ..base };
        assert_eq!(negative.validate(), Err(InvalidConfiguration::SkinWidth(-0.1)));
        assert!(RaycastConfig { skin_width: Fp::NAN, ..base }.validate().is_err());
        assert_eq!(RaycastConfig { skin_width: 0.0, ..base }.validate(), Err(InvalidConfiguration::SkinWidth(0.0)));
        assert!(RaycastConfig { skin_width: 1e-4, ..base }.validate().is_ok());
    }

    #[test]
    fn set_config_keeps_old_on_error() {
        let mut controller = RaycastController::new(RaycastConfig::default()).unwrap();
        let bad = RaycastConfig { vertical_ray_count: 1, ..RaycastConfig::default() };

        assert!(controller.set_config(bad).is_err());
        assert_eq!(controller.config(), &RaycastConfig::default());

        let good = RaycastConfig { horizontal_ray_count: 8, ..RaycastConfig::default() };
        controller.set_config(good).unwrap();
        assert_eq!(controller.config().horizontal_ray_count, 8);
    }

    #[test]
    fn origins_are_inset() {
        let config = RaycastConfig { skin_width: 0.25, ..RaycastConfig::default() };
        let controller = RaycastController::new(config).unwrap();
        let origins = controller.raycast_origins(&Aabb::new(0.0, 0.0, 2.0, 1.0));

        assert_eq!(origins.bottom_left, Vec2::new(0.25, 0.25));
        assert_eq!(origins.bottom_right, Vec2::new(1.75, 0.25));
        assert_eq!(origins.top_left, Vec2::new(0.25, 0.75));
        assert_eq!(origins.top_right, Vec2::new(1.75, 0.75));
    }

    #[test]
    fn spacing_spans_inset_box() {
        let config = RaycastConfig {
            skin_width: 0.25,
            horizontal_ray_count: 3,
            vertical_ray_count: 4,
            collision_mask: LayerMask::ALL,
        };
        let controller = RaycastController::new(config).unwrap();
        let spacing = controller.ray_spacing(&Aabb::new(0.0, 0.0, 2.0, 1.0));

        assert_relative_eq!(spacing.horizontal, 0.25);
        assert_relative_eq!(spacing.vertical, 0.5);
    }
}
