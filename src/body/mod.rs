pub mod filter;

use crate::geo::*;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use filter::*;

static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(1);

/// Process unique body handle. Contacts refer to bodies through it, so a
/// stale id of a removed body is harmless.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct BodyId(u64);

impl BodyId {
    fn next() -> BodyId {
        BodyId(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// collision response parameters
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// fraction of the penetration corrected per resolve
    pub stiffness: Float,
    /// penetration depth tolerated without correction
    pub slop: Float,
    pub friction: Float,
    pub static_friction: Float,
    /// restitution, 0 is fully inelastic
    pub elasticity: Float,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            stiffness: 0.8,
            slop: 0.05,
            friction: 0.1,
            static_friction: 0.5,
            elasticity: 0.2,
        }
    }
}

impl Material {
    /// no friction, no correction tolerance, fully elastic
    pub fn elastic() -> Self {
        Material {
            stiffness: 1.0,
            slop: 0.0,
            friction: 0.0,
            static_friction: 0.0,
            elasticity: 1.0,
        }
    }
}

/// A rigid body: kinematic state, mass properties, collision filters and a
/// shape evaluated at the body's pose.
///
/// A clone shares the id of its source and stands for the same body.
#[derive(Clone, Debug)]
pub struct Body {
    id: BodyId,
    shape: Shape,
    pose: Pose,
    pub velocity: V2,
    /// never reset by the body itself, effects own transient forces
    pub acceleration: V2,
    area: Float,
    mass: Float,
    density: Float,
    is_static: bool,
    /// inactive bodies keep their velocity through collisions
    pub active: bool,
    bounds: Aabb,
    /// what this body is
    pub category: u32,
    /// what this body collides with
    pub collision_filter: u32,
    /// what this body only senses
    pub sensor_filter: u32,
    pub material: Material,
    /// integrate after collision solving instead of before
    pub defer_update: bool,
    contact: BTreeSet<BodyId>,
}

impl Body {
    pub fn new(shape: Shape, position: P2, density: Float) -> Body {
        let pose = Pose::at(position);
        let area = shape.area(&pose);
        let bounds = shape.get_aabb(&pose);
        Body {
            id: BodyId::next(),
            shape,
            pose,
            velocity: V2::zeros(),
            acceleration: V2::zeros(),
            area,
            mass: area * density,
            density,
            is_static: false,
            active: true,
            bounds,
            category: 1,
            collision_filter: u32::MAX,
            sensor_filter: 0,
            material: Material::default(),
            defer_update: false,
            contact: BTreeSet::new(),
        }
    }

    pub fn circle(position: P2, radius: Float, density: Float) -> Body {
        Body::new(Circle::new(radius).into(), position, density)
    }

    /// `vertices` are relative to `position` and get recentered on their centroid
    pub fn polygon(position: P2, vertices: &[V2], density: Float) -> Body {
        Body::new(Polygon::new(vertices).into(), position, density)
    }

    pub fn rectangle(position: P2, width: Float, height: Float, density: Float) -> Body {
        Body::new(Polygon::rectangle(width, height).into(), position, density)
    }

    /// segment between two world points, positioned at its midpoint
    pub fn line(a: P2, b: P2) -> Body {
        let mid = P2::from((a.coords + b.coords) * 0.5);
        Body::new(LineSegment::centered(a, b).into(), mid, 0.0)
    }

    pub fn with_material(mut self, material: Material) -> Body {
        self.material = material;
        self
    }

    pub fn with_filters(mut self, category: u32, collision_filter: u32, sensor_filter: u32) -> Body {
        self.category = category;
        self.collision_filter = collision_filter;
        self.sensor_filter = sensor_filter;
        self
    }

    pub fn with_velocity(mut self, velocity: V2) -> Body {
        self.velocity = velocity;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Body {
        self.set_static(is_static);
        self
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn position(&self) -> P2 {
        self.pose.position
    }

    pub fn rotation(&self) -> Float {
        self.pose.rotation
    }

    pub fn scale_x(&self) -> Float {
        self.pose.scale_x
    }

    pub fn scale_y(&self) -> Float {
        self.pose.scale_y
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn area(&self) -> Float {
        self.area
    }

    pub fn mass(&self) -> Float {
        self.mass
    }

    pub fn density(&self) -> Float {
        self.density
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// whether collision impulses may change this body
    pub fn is_movable(&self) -> bool {
        self.active && !self.is_static
    }

    pub fn has_mass(&self) -> bool {
        self.mass > 0.0
    }

    /// mass as seen by the solver, infinite for bodies impulses can't move
    pub fn effective_mass(&self) -> Float {
        if self.is_movable() {
            self.mass
        } else {
            Float::INFINITY
        }
    }

    pub fn contact(&self) -> &BTreeSet<BodyId> {
        &self.contact
    }

    pub fn clear_contacts(&mut self) {
        self.contact.clear();
    }

    pub(crate) fn add_contact(&mut self, other: BodyId) {
        self.contact.insert(other);
    }

    pub(crate) fn forget_contact(&mut self, other: BodyId) {
        self.contact.remove(&other);
    }

    /// registered tags of this body's category
    pub fn category_tags<'a>(&self, registry: &'a FilterRegistry) -> Vec<&'a str> {
        registry.tags_of(self.category)
    }

    pub fn set_position(&mut self, position: P2) {
        let delta = position - self.pose.position;
        self.translate(&delta);
    }

    pub fn translate(&mut self, delta: &V2) {
        self.pose.position += *delta;
        self.bounds.move_vector(delta);
    }

    pub fn update_bounds(&mut self) {
        self.bounds = self.shape.get_aabb(&self.pose);
    }

    /// Multiplies the geometry by `scale_x`, `scale_y` in the body's local
    /// frame. With an `origin` the position is scaled about it as well.
    pub fn scale(&mut self, scale_x: Float, scale_y: Float, origin: Option<&P2>) {
        if !valid_scale(scale_x) || !valid_scale(scale_y) {
            warn!(
                "ignoring scale ({}, {}) of body {}: factors must be finite and non zero",
                scale_x, scale_y, self.id
            );
            return;
        }
        self.shape.scale(&self.pose, scale_x, scale_y);
        self.pose.scale_x *= scale_x;
        self.pose.scale_y *= scale_y;
        if let Some(origin) = origin {
            let mut p = self.pose.position.coords;
            p.scale_about_mut(scale_x, scale_y, &origin.coords);
            self.pose.position = P2::from(p);
        }
        self.area = self.shape.area(&self.pose);
        if !self.is_static {
            self.mass = self.area * self.density;
        }
        self.update_bounds();
    }

    pub fn set_scale(&mut self, scale_x: Float, scale_y: Float) {
        if !valid_scale(scale_x) || !valid_scale(scale_y) {
            warn!(
                "ignoring scale ({}, {}) of body {}: factors must be finite and non zero",
                scale_x, scale_y, self.id
            );
            return;
        }
        self.scale(scale_x / self.pose.scale_x, scale_y / self.pose.scale_y, None);
    }

    pub fn shrink(&mut self, scale_x: Float, scale_y: Float, origin: Option<&P2>) {
        if !valid_scale(scale_x) || !valid_scale(scale_y) {
            warn!(
                "ignoring shrink ({}, {}) of body {}: factors must be finite and non zero",
                scale_x, scale_y, self.id
            );
            return;
        }
        self.scale(1.0 / scale_x, 1.0 / scale_y, origin);
    }

    /// Rotates the geometry, and the position when `origin` is given, by `radians`.
    pub fn rotate(&mut self, radians: Float, origin: Option<&P2>) {
        self.shape.rotate(radians);
        self.pose.rotation += radians;
        if let Some(origin) = origin {
            self.pose.position = rotate_point_about(&self.pose.position, radians, origin);
        }
        self.update_bounds();
    }

    pub fn set_rotation(&mut self, radians: Float, origin: Option<&P2>) {
        self.rotate(radians - self.pose.rotation, origin);
    }

    pub fn set_density(&mut self, density: Float) {
        self.density = density;
        if !self.is_static {
            self.mass = self.area * density;
        }
    }

    pub fn set_mass(&mut self, mass: Float) {
        if !self.is_static {
            self.mass = mass;
        }
        if self.area > 0.0 {
            self.density = mass / self.area;
        }
    }

    /// A static body has conceptually infinite mass and ignores forces,
    /// integration and collision impulses.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.velocity = V2::zeros();
            self.acceleration = V2::zeros();
        } else {
            self.mass = self.area * self.density;
        }
    }

    /// Adds `force / mass` to the acceleration. Static and massless bodies
    /// ignore forces.
    pub fn apply_force(&mut self, force: &V2) {
        if self.is_static || !self.has_mass() {
            return;
        }
        self.acceleration += *force / self.mass;
    }

    /// Semi implicit Euler step. Static bodies don't move.
    pub fn update(&mut self, time_scale: Float) {
        if self.is_static {
            return;
        }
        self.velocity += self.acceleration * time_scale;
        let delta = self.velocity * time_scale;
        self.translate(&delta);
    }

    /// interval the body covers along the unit `axis`
    pub fn project(&self, axis: &V2) -> Projection {
        self.shape.project(&self.pose, axis)
    }

    /// boundary point closest to `target`
    pub fn get_closest(&self, target: &P2) -> P2 {
        self.shape.closest_point_to(&self.pose, target)
    }

    pub fn normals(&self) -> &[V2] {
        self.shape.normals()
    }

    pub fn is_circle(&self) -> bool {
        self.shape.is_circle()
    }

    /// Whether `point` lies inside the body, boundary included. Lines have no
    /// inside.
    pub fn contains_point(&self, point: &P2) -> bool {
        if !self.bounds.contains(point) {
            return false;
        }
        match &self.shape {
            Shape::Circle(c) => distance(&self.pose.position, point) <= c.radius_towards(&self.pose, point),
            Shape::Polygon(_) => self.normals().iter().all(|n| {
                let p = self.project(n);
                let v = point.coords.dot(n);
                p.min <= v && v <= p.max
            }),
            Shape::Line(_) => false,
        }
    }

    pub fn vertices(&self) -> Vec<P2> {
        match &self.shape {
            Shape::Polygon(p) => p.vertices(&self.pose),
            Shape::Line(ls) => vec![
                self.pose.position + ls.get_a().coords,
                self.pose.position + ls.get_b().coords,
            ],
            Shape::Circle(_) => Vec::new(),
        }
    }
}

fn valid_scale(factor: Float) -> bool {
    factor.is_finite() && factor != 0.0
}
