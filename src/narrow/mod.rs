//! Narrowphase shapes and ray queries.

use crate::{Fp, Vec2};

// ---------- Point & Line ---------- //

#[inline]
pub fn point_normal_test(loc: Vec2, a: Vec2, normal: Vec2) -> bool {
    //! Returns whether the point is toward the opposite direction of the normal from the vertex `a`.
    normal.dot(loc - a) <= 0.0
}
#[inline]
pub fn seg_seg_query(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Fp> {
    //! Returns the coefficient distance along line segment `a` an intersection occurs.
    let da = a2 - a1;
    let db = b2 - b1;

    let dot = da.perp_dot(db);
    if dot == 0.0 { return None; } // guard against colinearity
    let dd = dot * dot;

    let nd1 = a1 - b1;
    let tdd = db.perp_dot(nd1) * dot;
    if tdd < 0.0 || tdd > dd { return None; } // seg a guard

    let udd = da.perp_dot(nd1) * dot;
    if udd < 0.0 || udd > dd { return None; } // seg b guard

    Some(tdd / dd)
}

// ---------- Shapes ---------- //

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub rad: Fp,
    pub pos: Vec2,
}
impl Circle {
    #[inline]
    pub fn new(rad: Fp, posx: Fp, posy: Fp) -> Circle {
        Circle {
            rad: rad.abs(),
            pos: Vec2::new(posx, posy),
        }
    }
    #[inline]
    pub fn translate(self, offset: Vec2) -> Circle {
        Circle {
            pos: self.pos + offset,
            rad: self.rad,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}
impl Aabb {
    #[inline]
    pub fn new(minx: Fp, miny: Fp, maxx: Fp, maxy: Fp) -> Aabb {
        assert!(minx < maxx);
        assert!(miny < maxy);

        Aabb {
            min: Vec2::new(minx, miny),
            max: Vec2::new(maxx, maxy),
        }
    }
    pub fn new_safe(ax: Fp, by: Fp, cx: Fp, dy: Fp) -> Aabb {
        //! Orders minimum and maximum values.
        Aabb {
            min: Vec2::new(Fp::min(ax, cx), Fp::min(by, dy)),
            max: Vec2::new(Fp::max(ax, cx), Fp::max(by, dy)),
        }
    }
    #[inline]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Aabb {
        let half = size * 0.5;
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> Fp {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> Fp {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn minx_maxy(self) -> Vec2 {
        Vec2::new(self.min.x, self.max.y)
    }
    #[inline]
    pub fn maxx_miny(self) -> Vec2 {
        Vec2::new(self.max.x, self.min.y)
    }
    #[inline]
    pub fn translate(self, offset: Vec2) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
    #[inline]
    pub fn shrink(self, amount: Fp) -> Aabb {
        //! Moves every edge inward by `amount`. Edges cross over when `amount` exceeds half an extent.
        let inset = Vec2::new(amount, amount);
        Aabb {
            min: self.min + inset,
            max: self.max - inset,
        }
    }

    #[inline]
    pub fn broaden(&self, dir: Vec2) -> Aabb {
        Aabb {
            min: Vec2::new(
                Fp::min(self.min.x, self.min.x + dir.x),
                Fp::min(self.min.y, self.min.y + dir.y),
            ),
            max: Vec2::new(
                Fp::max(self.max.x, self.max.x + dir.x),
                Fp::max(self.max.y, self.max.y + dir.y),
            ),
        }
    }

    #[inline]
    pub fn aabb_test(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// A 2D convex polygon, vertices arranged clockwise - tailed with a duplicate of the first, with unit-length normals - without duplication.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    pub aabb: Aabb,
    /// First vertex's duplicate tails. `verts.len() - 1 == norms.len()`
    pub verts: Vec<Vec2>,
    /// Length equals actual vertex count. `verts.len() - 1 == norms.len()`
    pub norms: Vec<Vec2>,
}
impl Poly {
    /// `verts` must form a convex polygon. `verts` must not contain duplicate or interior vertices.
    pub fn new(verts: &[Vec2]) -> Poly {
        let len = verts.len();
        let mut order: Vec<usize> = (0..len).collect();

        let mut top = 0;
        for (i, v) in verts.iter().enumerate() {
            if v.y > verts[top].y {
                top = i;
            }
        }
        order.swap(0, top);

        // giftwrap, clockwise from the topmost vertex
        let mut heading = Vec2::new(1.0, 0.0);
        for v in 0..(len - 1) {
            let vert = verts[order[v]];
            let mut next = v + 1;
            let mut best = Fp::MIN;
            for i in (v + 1)..len {
                let dot = heading.dot((verts[order[i]] - vert).normalize());
                if dot > best {
                    next = i;
                    best = dot;
                }
            }
            heading = verts[order[next]] - vert;
            order.swap(v + 1, next);
        }

        let mut wound: Vec<Vec2> = order.iter().map(|&i| verts[i]).collect();
        wound.push(verts[order[0]]);
        Poly::new_from_wound(wound)
    }
    /// `verts` must form a convex polygon, be wrapped clockwise, and must contain a duplicate of the first trailing vertex.
    pub fn new_from_wound(verts: Vec<Vec2>) -> Poly {
        let len = verts.len() - 1;
        let mut norms = Vec::with_capacity(len);
        let (mut ix, mut iy, mut ax, mut ay) = (Fp::MAX, Fp::MAX, Fp::MIN, Fp::MIN);
        for i in 0..len {
            let edge = verts[i + 1] - verts[i];
            norms.push(Vec2::new(-edge.y, edge.x).normalize());

            ix = ix.min(verts[i].x);
            ax = ax.max(verts[i].x);
            iy = iy.min(verts[i].y);
            ay = ay.max(verts[i].y);
        }

        Poly { aabb: Aabb::new(ix, iy, ax, ay), verts, norms }
    }

    #[inline]
    pub fn translate(mut self, offset: Vec2) -> Poly {
        self.aabb = self.aabb.translate(offset);
        for v in self.verts.iter_mut() {
            *v += offset;
        }
        self
    }
}

// ---------- RayQuery ---------- //

/// Geometry that rays can be cast against.
pub trait RayQuery {
    fn bounding_box(&self) -> Aabb;

    fn point_test(&self, point: Vec2) -> bool;

    /// Returns the distance along the unit direction `dir` from `origin` at which the ray first
    /// touches the shape, if within `max_dist`. Origins inside or on the boundary report `0.0`.
    fn ray_query(&self, origin: Vec2, dir: Vec2, max_dist: Fp) -> Option<Fp>;
}

impl RayQuery for Circle {
    #[inline]
    fn bounding_box(&self) -> Aabb {
        let splat = Vec2::splat(self.rad);
        Aabb {
            min: self.pos - splat,
            max: self.pos + splat,
        }
    }

    #[inline]
    fn point_test(&self, point: Vec2) -> bool {
        (point - self.pos).length_squared() <= self.rad * self.rad
    }
    fn ray_query(&self, origin: Vec2, dir: Vec2, max_dist: Fp) -> Option<Fp> {
        let co = origin - self.pos;
        let c = co.length_squared() - self.rad * self.rad;
        if c <= 0.0 {
            return Some(0.0);
        }
        let b = co.dot(dir);
        if b > 0.0 {
            return None; // outside and heading away
        }
        let discr = b * b - c;
        if discr < 0.0 {
            return None;
        }
        let dist = -b - discr.sqrt();
        if dist <= max_dist { Some(dist.max(0.0)) } else { None }
    }
}

impl RayQuery for Aabb {
    #[inline]
    fn bounding_box(&self) -> Aabb {
        *self
    }

    #[inline]
    fn point_test(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
    fn ray_query(&self, origin: Vec2, dir: Vec2, max_dist: Fp) -> Option<Fp> {
        if self.point_test(origin) {
            return Some(0.0);
        }

        // slab test, clipping [entry, exit] against each axis in turn
        let mut entry: Fp = 0.0;
        let mut exit = max_dist;
        for &(o, d, lo, hi) in &[
            (origin.x, dir.x, self.min.x, self.max.x),
            (origin.y, dir.y, self.min.y, self.max.y),
        ] {
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                entry = entry.max(t0);
                exit = exit.min(t1);
                if entry > exit {
                    return None;
                }
            }
        }
        Some(entry)
    }
}

impl RayQuery for Poly {
    #[inline]
    fn bounding_box(&self) -> Aabb {
        self.aabb
    }

    fn point_test(&self, loc: Vec2) -> bool {
        (0..self.norms.len()).all(|i| point_normal_test(loc, self.verts[i], self.norms[i]))
    }
    fn ray_query(&self, origin: Vec2, dir: Vec2, max_dist: Fp) -> Option<Fp> {
        if self.point_test(origin) {
            return Some(0.0);
        }
        if max_dist <= 0.0 {
            return None;
        }

        let end = origin + dir * max_dist;
        let mut best: Option<Fp> = None;
        for i in 0..self.norms.len() {
            // only edges facing the origin can be entered
            if point_normal_test(origin, self.verts[i], self.norms[i]) || self.norms[i].dot(dir) >= 0.0 {
                continue;
            }
            if let Some(t) = seg_seg_query(origin, end, self.verts[i], self.verts[i + 1]) {
                let dist = t * max_dist;
                if best.map_or(true, |b| dist < b) {
                    best = Some(dist);
                }
            }
        }
        best
    }
}

// ---------- Shape ---------- //

/// Static collision geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Aabb(Aabb),
    Poly(Poly),
}
impl Shape {
    pub fn translate(self, offset: Vec2) -> Shape {
        match self {
            Shape::Circle(c) => Shape::Circle(c.translate(offset)),
            Shape::Aabb(a) => Shape::Aabb(a.translate(offset)),
            Shape::Poly(p) => Shape::Poly(p.translate(offset)),
        }
    }
}
impl RayQuery for Shape {
    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Circle(c) => c.bounding_box(),
            Shape::Aabb(a) => *a,
            Shape::Poly(p) => p.aabb,
        }
    }

    fn point_test(&self, point: Vec2) -> bool {
        match self {
            Shape::Circle(c) => c.point_test(point),
            Shape::Aabb(a) => a.point_test(point),
            Shape::Poly(p) => p.point_test(point),
        }
    }
    fn ray_query(&self, origin: Vec2, dir: Vec2, max_dist: Fp) -> Option<Fp> {
        match self {
            Shape::Circle(c) => c.ray_query(origin, dir, max_dist),
            Shape::Aabb(a) => a.ray_query(origin, dir, max_dist),
            Shape::Poly(p) => p.ray_query(origin, dir, max_dist),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
impl From<Aabb> for Shape {
    fn from(aabb: Aabb) -> Self {
        Shape::Aabb(aabb)
    }
}
impl From<Poly> for Shape {
    fn from(poly: Poly) -> Self {
        Shape::Poly(poly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn line_seg_test() {
        assert_eq!(seg_seg_query(Vec2::new(0.0, 0.0), Vec2::new(3.0, 1.0), Vec2::new(2.0, 1.0), Vec2::new(2.0, -4.0)), Some(2.0 / 3.0));
        assert_eq!(seg_seg_query(Vec2::new(3.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0), Vec2::new(2.0, -4.0)), Some(1.0 / 3.0));
    }

    #[test]
    fn aabb_ray() {
        let a = Aabb::new(2.0, -1.0, 3.0, 1.0);
        let right = Vec2::new(1.0, 0.0);

        assert_eq!(a.ray_query(Vec2::new(0.0, 0.0), right, 5.0), Some(2.0));
        assert_eq!(a.ray_query(Vec2::new(0.0, 0.0), right, 1.5), None);
        assert_eq!(a.ray_query(Vec2::new(0.0, 0.0), -right, 5.0), None);
        assert_eq!(a.ray_query(Vec2::new(0.0, 2.0), right, 5.0), None);
        // grazing the top face still counts
        assert_eq!(a.ray_query(Vec2::new(0.0, 1.0), right, 5.0), Some(2.0));

        // inside and on the boundary
        assert_eq!(a.ray_query(Vec2::new(2.5, 0.0), right, 5.0), Some(0.0));
        assert_eq!(a.ray_query(Vec2::new(2.0, 0.0), -right, 5.0), Some(0.0));

        let down = Vec2::new(0.0, -1.0);
        assert_eq!(a.ray_query(Vec2::new(2.5, 3.0), down, 2.0), Some(2.0));
        assert_eq!(a.ray_query(Vec2::new(2.5, 3.0), down, 1.9), None);
    }

    #[test]
    fn aabb_shrink() {
        let a = Aabb::new(0.0, 0.0, 2.0, 1.0).shrink(0.25);
        assert_eq!(a, Aabb::new(0.25, 0.25, 1.75, 0.75));
        assert_eq!(a.size(), Vec2::new(1.5, 0.5));
        assert_eq!(Aabb::new_safe(2.0, 1.0, 0.0, 0.0), Aabb::new(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn circle_ray() {
        let c = Circle::new(0.5, 3.0, 0.0);
        let right = Vec2::new(1.0, 0.0);

        assert_relative_eq!(c.ray_query(Vec2::new(0.0, 0.0), right, 5.0).unwrap(), 2.5);
        assert!(c.ray_query(Vec2::new(0.0, 0.0), -right, 5.0).is_none());
        assert!(c.ray_query(Vec2::new(0.0, 1.0), right, 5.0).is_none());
        assert!(c.ray_query(Vec2::new(0.0, 0.0), right, 2.0).is_none());
        assert_eq!(c.ray_query(Vec2::new(3.25, 0.0), right, 5.0), Some(0.0));
    }

    #[test]
    fn poly_winding() {
        let p = Poly::new(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);

        assert_eq!(p.verts.len(), 5);
        assert_eq!(p.verts[0], p.verts[4]);
        assert_eq!(p.aabb, Aabb::new(0.0, 0.0, 1.0, 1.0));
        // outward normals
        for i in 0..p.norms.len() {
            assert!(p.norms[i].dot(Vec2::new(0.5, 0.5) - p.verts[i]) < 0.0);
        }
        assert!(p.point_test(Vec2::new(0.5, 0.5)));
        assert!(!p.point_test(Vec2::new(1.5, 0.5)));
    }

    #[test]
    fn poly_ray() {
        let p = Poly::new(&[
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(3.0, -1.0),
        ]);
        let right = Vec2::new(1.0, 0.0);

        assert_relative_eq!(p.ray_query(Vec2::new(0.0, 0.0), right, 5.0).unwrap(), 2.0);
        assert_relative_eq!(p.ray_query(Vec2::new(0.0, 0.5), right, 5.0).unwrap(), 2.5);
        assert!(p.ray_query(Vec2::new(0.0, 0.5), right, 2.0).is_none());
        assert!(p.ray_query(Vec2::new(0.0, 0.5), -right, 5.0).is_none());
        assert_eq!(p.ray_query(Vec2::new(3.0, 0.0), right, 5.0), Some(0.0));
    }

    #[test]
    fn shape_dispatch() {
        let shape: Shape = Aabb::new(0.0, 0.0, 1.0, 1.0).into();
        let moved = shape.translate(Vec2::new(1.0, 0.0));

        assert_eq!(moved.bounding_box(), Aabb::new(1.0, 0.0, 2.0, 1.0));
        assert!(moved.point_test(Vec2::new(1.5, 0.5)));
        assert_eq!(moved.ray_query(Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.0), 2.0), Some(1.0));
    }
}
