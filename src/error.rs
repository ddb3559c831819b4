use crate::{raycast::Axis, Fp};
use thiserror::Error;

/// Rejected `RaycastConfig` values. Returned when a controller is built or reconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidConfiguration {
    /// Ray spacing divides by `count - 1`, so each axis needs at least two rays.
    #[error("{axis} ray count must be at least 2, got {count}")]
    RayCount { axis: Axis, count: usize },
    #[error("skin width must be finite and positive, got {0}")]
    SkinWidth(Fp),
}
