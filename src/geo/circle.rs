extern crate nalgebra as na;

use super::*;
use std::f64::consts::PI;

/// Circle centered on the pose position. Under non-uniform scale it covers an
/// ellipse with semi axes `radius * scale_x` and `radius * scale_y` in the
/// rotated frame.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Circle {
    pub radius: Float,
}

impl Circle {
    pub fn new(radius: Float) -> Circle {
        Circle {
            radius: radius.abs(),
        }
    }

    /// distance from the center to the support point along the unit `axis`
    pub fn extent(&self, pose: &Pose, axis: &V2) -> Float {
        let local = pose.to_local_direction(axis);
        self.radius * quadratic_sum(local.x * pose.scale_x, local.y * pose.scale_y).sqrt()
    }

    /// radius along the direction from the center towards `p`
    pub fn radius_towards(&self, pose: &Pose, p: &P2) -> Float {
        let dir = (p - pose.position).normalize_or_zero();
        if dir == V2::zeros() {
            // any direction works for a uniform scale, take the smaller semi axis otherwise
            self.radius * pose.scale_x.abs().min(pose.scale_y.abs())
        } else {
            self.extent(pose, &dir)
        }
    }
}

impl Project for Circle {
    fn project(&self, pose: &Pose, axis: &V2) -> Projection {
        let center = pose.position.coords.dot(axis);
        let extent = self.extent(pose, axis);
        Projection::new(center - extent, center + extent)
    }
}

impl ClosestPoint for Circle {
    /// exact for uniform scale, the support point along the center line otherwise
    fn closest_point_to(&self, pose: &Pose, p: &P2) -> P2 {
        let dir = (p - pose.position).normalize_or_zero();
        if dir == V2::zeros() {
            return pose.position + V2::x() * self.extent(pose, &V2::x());
        }
        pose.position + dir * self.extent(pose, &dir)
    }
}

impl HasAabb for Circle {
    fn get_aabb(&self, pose: &Pose) -> Aabb {
        let (s, c) = pose.rotation.sin_cos();
        let half_width = self.radius * quadratic_sum(c * pose.scale_x, s * pose.scale_y).sqrt();
        let half_height = self.radius * quadratic_sum(s * pose.scale_x, c * pose.scale_y).sqrt();
        Aabb::from_center(&pose.position, half_width, half_height)
    }
}

impl HasArea for Circle {
    fn area(&self, pose: &Pose) -> Float {
        PI * self.radius * self.radius * (pose.scale_x * pose.scale_y).abs()
    }
}

impl HasNormals for Circle {
    fn normals(&self) -> &[V2] {
        &[]
    }
}

// radius stays untouched, the pose carries the scale
impl Scale for Circle {
    fn scale(&mut self, _pose: &Pose, _scale_x: Float, _scale_y: Float) {}
}

impl Rotate for Circle {
    fn rotate(&mut self, _radians: Float) {}
}

impl Distribution<Circle> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Circle {
        Circle::new(rng.gen_range(0.1..5.0))
    }
}
