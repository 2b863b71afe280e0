extern crate nalgebra as na;

use super::*;

/// Segment from `a` to `b`. As a body shape both ends are relative to the
/// pose position, which sits at the midpoint after construction.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LineSegment {
    a: P2,
    b: P2,
    normal: V2,
}

impl LineSegment {
    pub fn from_ab(a: P2, b: P2) -> LineSegment {
        let normal = (b - a).turn(Turn::CounterClockwise).normalize_or_zero();
        LineSegment { a, b, normal }
    }

    /// segment centered on the local origin
    pub fn centered(a: P2, b: P2) -> LineSegment {
        let mid = (a.coords + b.coords) * 0.5;
        LineSegment::from_ab(a - mid, b - mid)
    }

    pub fn get_a(&self) -> P2 {
        self.a
    }

    pub fn get_b(&self) -> P2 {
        self.b
    }

    pub fn get_normal(&self) -> V2 {
        self.normal
    }

    pub fn shift(&mut self, v: &V2) {
        self.a += *v;
        self.b += *v;
    }

    pub fn length(&self) -> Float {
        distance(&self.a, &self.b)
    }

    fn world(&self, pose: &Pose) -> LineSegment {
        let mut ls = *self;
        ls.shift(&pose.position.coords);
        ls
    }

    /// closest point of the segment itself, no pose applied
    pub fn closest_point(&self, p: &P2) -> P2 {
        let ab = self.b - self.a;
        let len_sq = ab.norm_squared();
        if len_sq == 0.0 {
            return self.a;
        }
        let r = ((p - self.a).dot(&ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * r
    }

    pub fn distance(&self, p: &P2) -> Float {
        distance(&self.closest_point(p), p)
    }
}

impl Project for LineSegment {
    fn project(&self, pose: &Pose, axis: &V2) -> Projection {
        let world = self.world(pose);
        Projection::new(world.a.coords.dot(axis), world.b.coords.dot(axis))
    }
}

impl ClosestPoint for LineSegment {
    fn closest_point_to(&self, pose: &Pose, p: &P2) -> P2 {
        self.world(pose).closest_point(p)
    }
}

impl HasAabb for LineSegment {
    fn get_aabb(&self, pose: &Pose) -> Aabb {
        let world = self.world(pose);
        Aabb::new(world.a.x, world.b.x, world.a.y, world.b.y)
    }
}

impl HasArea for LineSegment {
    fn area(&self, _pose: &Pose) -> Float {
        0.0
    }
}

impl HasNormals for LineSegment {
    fn normals(&self) -> &[V2] {
        if self.normal == V2::zeros() {
            &[]
        } else {
            std::slice::from_ref(&self.normal)
        }
    }
}

impl Scale for LineSegment {
    fn scale(&mut self, pose: &Pose, scale_x: Float, scale_y: Float) {
        let scale = |p: &P2| {
            P2::from(
                p.coords
                    .rotated(-pose.rotation)
                    .scaled_xy(scale_x, scale_y)
                    .rotated(pose.rotation),
            )
        };
        *self = LineSegment::from_ab(scale(&self.a), scale(&self.b));
    }
}

impl Rotate for LineSegment {
    fn rotate(&mut self, radians: Float) {
        let origin = P2::origin();
        self.a = rotate_point_about(&self.a, radians, &origin);
        self.b = rotate_point_about(&self.b, radians, &origin);
        self.normal.rotate_mut(radians);
    }
}
