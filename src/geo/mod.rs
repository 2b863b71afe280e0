pub mod aabb;
pub mod circle;
pub mod line_segment;
pub mod polygon;
pub mod traits;

extern crate nalgebra as na;

pub use crate::utils::*;
pub use aabb::*;
pub use circle::*;
pub use line_segment::*;
pub use na::{distance, distance_squared, Unit};
pub use polygon::*;
pub use rand::distributions::{Distribution, Standard};
pub use rand::Rng;
pub use traits::*;
use serde::*;

/// The closed set of body shapes.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
    Line(LineSegment),
}

impl Shape {
    pub fn is_circle(&self) -> bool {
        matches!(self, Shape::Circle(_))
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(c) => Some(c),
            _ => None,
        }
    }
}

impl Project for Shape {
    fn project(&self, pose: &Pose, axis: &V2) -> Projection {
        match self {
            Shape::Circle(g) => g.project(pose, axis),
            Shape::Polygon(g) => g.project(pose, axis),
            Shape::Line(g) => g.project(pose, axis),
        }
    }
}

impl ClosestPoint for Shape {
    fn closest_point_to(&self, pose: &Pose, p: &P2) -> P2 {
        match self {
            Shape::Circle(g) => g.closest_point_to(pose, p),
            Shape::Polygon(g) => g.closest_point_to(pose, p),
            Shape::Line(g) => g.closest_point_to(pose, p),
        }
    }
}

impl HasAabb for Shape {
    fn get_aabb(&self, pose: &Pose) -> Aabb {
        match self {
            Shape::Circle(g) => g.get_aabb(pose),
            Shape::Polygon(g) => g.get_aabb(pose),
            Shape::Line(g) => g.get_aabb(pose),
        }
    }
}

impl HasArea for Shape {
    fn area(&self, pose: &Pose) -> Float {
        match self {
            Shape::Circle(g) => g.area(pose),
            Shape::Polygon(g) => g.area(pose),
            Shape::Line(g) => g.area(pose),
        }
    }
}

impl HasNormals for Shape {
    fn normals(&self) -> &[V2] {
        match self {
            Shape::Circle(g) => g.normals(),
            Shape::Polygon(g) => g.normals(),
            Shape::Line(g) => g.normals(),
        }
    }
}

impl Scale for Shape {
    fn scale(&mut self, pose: &Pose, scale_x: Float, scale_y: Float) {
        match self {
            Shape::Circle(g) => g.scale(pose, scale_x, scale_y),
            Shape::Polygon(g) => g.scale(pose, scale_x, scale_y),
            Shape::Line(g) => g.scale(pose, scale_x, scale_y),
        }
    }
}

impl Rotate for Shape {
    fn rotate(&mut self, radians: Float) {
        match self {
            Shape::Circle(g) => g.rotate(radians),
            Shape::Polygon(g) => g.rotate(radians),
            Shape::Line(g) => g.rotate(radians),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}
impl From<LineSegment> for Shape {
    fn from(ls: LineSegment) -> Self {
        Shape::Line(ls)
    }
}
