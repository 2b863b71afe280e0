extern crate nalgebra as na;

use super::*;

/// Where a shape currently sits: the owning body's position, rotation and
/// per-axis scale. Shapes keep their own geometry relative to this.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Pose {
    pub position: P2,
    pub rotation: Float,
    pub scale_x: Float,
    pub scale_y: Float,
}

impl Pose {
    pub fn at(position: P2) -> Pose {
        Pose {
            position,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// converts a world direction into the unrotated local frame
    pub fn to_local_direction(&self, v: &V2) -> V2 {
        v.rotated(-self.rotation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::at(P2::origin())
    }
}

/// interval covered by a shape along an axis
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Projection {
    pub min: Float,
    pub max: Float,
}

impl Projection {
    pub fn new(a: Float, b: Float) -> Projection {
        Projection {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_values<I: IntoIterator<Item = Float>>(values: I) -> Option<Projection> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Projection { min: v, max: v }),
            Some(p) => Some(Projection {
                min: p.min.min(v),
                max: p.max.max(v),
            }),
        })
    }

    /// true if there is a strict gap between the two intervals
    pub fn separated_from(&self, other: &Projection) -> bool {
        self.max < other.min || other.max < self.min
    }
}

/// support-function projection onto a unit axis
pub trait Project {
    fn project(&self, pose: &Pose, axis: &V2) -> Projection;
}

/// trait to calculate the closest point which lies on the circumference of an object to a given point
pub trait ClosestPoint {
    fn closest_point_to(&self, pose: &Pose, p: &P2) -> P2;
}

pub trait HasAabb {
    fn get_aabb(&self, pose: &Pose) -> Aabb;
}

pub trait HasArea {
    fn area(&self, pose: &Pose) -> Float;
}

/// edge normals used as separating axes
pub trait HasNormals {
    fn normals(&self) -> &[V2];
}

pub trait Scale {
    /// scales the geometry by `scale_x`, `scale_y` along the local axes of `pose`
    fn scale(&mut self, pose: &Pose, scale_x: Float, scale_y: Float);
}

pub trait Rotate {
    /// rotates the geometry about the pose position
    fn rotate(&mut self, radians: Float);
}
