//! Static collision world and its ray queries.

mod mask;

pub use mask::LayerMask;

use crate::{narrow::{Aabb, RayQuery, Shape}, Fp, Vec2};
use fnv::FnvHashMap;
use indexmap::{IndexMap, IndexSet};
use std::ops::RangeInclusive;

/// Identifies a collider within a `CollisionWorld`. Handles increase in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(pub u32);

/// A piece of static geometry and the layers it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub layers: LayerMask,
}

/// The nearest surface found by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin. `0.0` when the origin starts inside geometry.
    pub distance: Fp,
    pub point: Vec2,
    pub handle: ColliderHandle,
}

/// Static geometry that movement rays are cast against.
///
/// Implementations must be read-only during a query: casting the same ray against the same
/// surface returns the same hit.
pub trait CollisionSurface {
    /// Returns the nearest hit along the unit direction `dir` within `max_dist`,
    /// considering only geometry whose layers intersect `mask`.
    fn raycast(&self, origin: Vec2, dir: Vec2, max_dist: Fp, mask: LayerMask) -> Option<RayHit>;
}

/// Colliders spanning more grid cells than this skip the grid and are tested by every query.
const MAX_GRID_CELLS: u64 = 256;

/// Static colliders bucketed into a uniform grid.
#[derive(Debug, Clone)]
pub struct CollisionWorld {
    cell_size: Fp,
    colliders: IndexMap<ColliderHandle, Collider>,
    cells: FnvHashMap<(i32, i32), Vec<ColliderHandle>>,
    /// Colliders too large (or unbounded) for the grid.
    oversized: Vec<ColliderHandle>,
    next_handle: u32,
}

impl CollisionWorld {
    /// `cell_size` should be around the size of a typical collider. Panics if not positive.
    pub fn new(cell_size: Fp) -> CollisionWorld {
        assert!(cell_size > 0.0);
        CollisionWorld {
            cell_size,
            colliders: IndexMap::new(),
            cells: FnvHashMap::default(),
            oversized: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn insert(&mut self, shape: impl Into<Shape>, layers: LayerMask) -> ColliderHandle {
        let shape = shape.into();
        let handle = ColliderHandle(self.next_handle);
        self.next_handle += 1;

        let (xs, ys) = self.cell_range(&shape.bounding_box());
        if cell_count(&xs, &ys) > MAX_GRID_CELLS {
            self.oversized.push(handle);
        } else {
            for x in xs {
                for y in ys.clone() {
                    self.cells.entry((x, y)).or_default().push(handle);
                }
            }
        }
        self.colliders.insert(handle, Collider { shape, layers });
        handle
    }

    pub fn remove(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let collider = self.colliders.shift_remove(&handle)?;

        let (xs, ys) = self.cell_range(&collider.shape.bounding_box());
        if cell_count(&xs, &ys) > MAX_GRID_CELLS {
            self.oversized.retain(|&h| h != handle);
            return Some(collider);
        }
        for x in xs {
            for y in ys.clone() {
                if let Some(cell) = self.cells.get_mut(&(x, y)) {
                    cell.retain(|&h| h != handle);
                    if cell.is_empty() {
                        self.cells.remove(&(x, y));
                    }
                }
            }
        }
        Some(collider)
    }

    /// Inserts an occupancy grid, indexed `tiles[y][x]` with `y` increasing upward from
    /// `origin`. Nonzero tiles are solid. Each horizontal run of solid tiles becomes one box.
    pub fn insert_tiles<R: AsRef<[u8]>>(&mut self, tiles: &[R], origin: Vec2, tile_size: Fp, layers: LayerMask) -> Vec<ColliderHandle> {
        let mut handles = Vec::new();
        for (y, row) in tiles.iter().enumerate() {
            let row = row.as_ref();
            let mut x = 0;
            while x < row.len() {
                if row[x] == 0 {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < row.len() && row[x] != 0 {
                    x += 1;
                }
                let min = origin + Vec2::new(start as Fp, y as Fp) * tile_size;
                let max = origin + Vec2::new(x as Fp, (y + 1) as Fp) * tile_size;
                handles.push(self.insert(Aabb { min, max }, layers));
            }
        }
        handles
    }

    #[inline]
    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(&handle)
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> + '_ {
        self.colliders.iter().map(|(h, c)| (*h, c))
    }

    fn cell_range(&self, aabb: &Aabb) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let cell = |v: Fp| (v / self.cell_size).floor() as i32;
        (cell(aabb.min.x)..=cell(aabb.max.x), cell(aabb.min.y)..=cell(aabb.max.y))
    }

    fn candidates(&self, area: &Aabb) -> IndexSet<ColliderHandle> {
        let (xs, ys) = self.cell_range(area);

        // long rays cover more cells than there are colliders
        if cell_count(&xs, &ys) > self.colliders.len() as u64 {
            return self.colliders.keys().copied().collect();
        }

        let mut set: IndexSet<ColliderHandle> = self.oversized.iter().copied().collect();
        for x in xs {
            for y in ys.clone() {
                if let Some(cell) = self.cells.get(&(x, y)) {
                    set.extend(cell.iter().copied());
                }
            }
        }
        set
    }
}

/// Cells covered by a pair of ranges. Saturates rather than overflowing for unbounded ranges.
fn cell_count(xs: &RangeInclusive<i32>, ys: &RangeInclusive<i32>) -> u64 {
    let span = |r: &RangeInclusive<i32>| (*r.end() as i64 - *r.start() as i64 + 1).max(0) as u64;
    span(xs).saturating_mul(span(ys))
}

impl CollisionSurface for CollisionWorld {
    fn raycast(&self, origin: Vec2, dir: Vec2, max_dist: Fp, mask: LayerMask) -> Option<RayHit> {
        if mask == LayerMask::NONE || self.colliders.is_empty() {
            return None;
        }

        let area = Aabb { min: origin, max: origin }.broaden(dir * max_dist);
        let mut nearest: Option<RayHit> = None;
        for handle in self.candidates(&area) {
            let collider = &self.colliders[&handle];
            if !collider.layers.intersects(mask) {
                continue;
            }
            if let Some(distance) = collider.shape.ray_query(origin, dir, max_dist) {
                let closer = match nearest {
                    Some(n) => distance < n.distance || (distance == n.distance && handle < n.handle),
                    None => true,
                };
                if closer {
                    nearest = Some(RayHit { distance, point: origin + dir * distance, handle });
                }
            }
        }
        nearest
    }
}
