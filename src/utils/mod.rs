extern crate nalgebra as na;
use na::{Point2, Rotation2, Vector2};

pub type Float = f64;
pub type P2 = Point2<Float>;
pub type V2 = Vector2<Float>;
pub type Rot2 = Rotation2<Float>;
pub const EPSILON: Float = 0.000_001;

/// significant digits used when comparing edge normals for duplicates
pub const NORMAL_PRECISION: i32 = 3;

pub fn between(num: Float, a: Float, b: Float) -> bool {
    (num >= a) && (num <= b)
}

/// sum of squares, the radicand of every scaled-extent computation
pub fn quadratic_sum(a: Float, b: Float) -> Float {
    a * a + b * b
}

pub fn round_to(value: Float, decimals: i32) -> Float {
    let factor = (10.0 as Float).powi(decimals);
    let rounded = (value * factor).round() / factor;
    // keeps -0.0 and 0.0 from hashing or comparing as different axes
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds to `digits` significant digits, so small components keep their
/// precision.
pub fn round_to_significant(value: Float, digits: i32) -> Float {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    round_to(value, digits - 1 - magnitude)
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Turn {
    /// (x, y) -> (-y, x)
    CounterClockwise,
    /// (x, y) -> (y, -x)
    Clockwise,
}

/// Vector operations the physics core needs on top of nalgebra.
///
/// Methods taking `&self` return a fresh vector; methods ending in `_mut` and
/// `set_modulus` change the receiver in place.
pub trait VectorExt: Sized {
    fn add_xy(&self, x: Float, y: Float) -> Self;
    fn sub_xy(&self, x: Float, y: Float) -> Self;
    fn scaled_xy(&self, scale_x: Float, scale_y: Float) -> Self;
    /// per-axis scale of `self` about `origin`
    fn scale_about_mut(&mut self, scale_x: Float, scale_y: Float, origin: &Self);
    fn rotated(&self, radians: Float) -> Self;
    fn rotate_mut(&mut self, radians: Float);
    fn rotate_about_mut(&mut self, radians: Float, origin: &Self);
    /// signed area of the parallelogram spanned by `self` and `other`
    fn cross2(&self, other: &Self) -> Float;
    fn modulus(&self) -> Float;
    /// Rescales to length `modulus`. A zero vector stays zero.
    fn set_modulus(&mut self, modulus: Float);
    /// Scalar projection onto `direction`, `0.0` for a zero direction.
    fn project_onto(&self, direction: &Self) -> Float;
    fn turn(&self, turn: Turn) -> Self;
    fn reversed(&self) -> Self;
    /// Unit vector in the same direction, or the zero vector unchanged.
    fn normalize_or_zero(&self) -> Self;
}

impl VectorExt for V2 {
    fn add_xy(&self, x: Float, y: Float) -> V2 {
        V2::new(self.x + x, self.y + y)
    }

    fn sub_xy(&self, x: Float, y: Float) -> V2 {
        V2::new(self.x - x, self.y - y)
    }

    fn scaled_xy(&self, scale_x: Float, scale_y: Float) -> V2 {
        V2::new(self.x * scale_x, self.y * scale_y)
    }

    fn scale_about_mut(&mut self, scale_x: Float, scale_y: Float, origin: &V2) {
        self.x = origin.x + (self.x - origin.x) * scale_x;
        self.y = origin.y + (self.y - origin.y) * scale_y;
    }

    fn rotated(&self, radians: Float) -> V2 {
        Rot2::new(radians) * self
    }

    fn rotate_mut(&mut self, radians: Float) {
        *self = self.rotated(radians);
    }

    fn rotate_about_mut(&mut self, radians: Float, origin: &V2) {
        *self = origin + (*self - origin).rotated(radians);
    }

    fn cross2(&self, other: &V2) -> Float {
        self.x * other.y - self.y * other.x
    }

    fn modulus(&self) -> Float {
        self.norm()
    }

    fn set_modulus(&mut self, modulus: Float) {
        let n = self.norm();
        if n > 0.0 {
            *self *= modulus / n;
        }
    }

    fn project_onto(&self, direction: &V2) -> Float {
        let n = direction.norm();
        if n > 0.0 {
            self.dot(direction) / n
        } else {
            0.0
        }
    }

    fn turn(&self, turn: Turn) -> V2 {
        match turn {
            Turn::CounterClockwise => V2::new(-self.y, self.x),
            Turn::Clockwise => V2::new(self.y, -self.x),
        }
    }

    fn reversed(&self) -> V2 {
        -self
    }

    fn normalize_or_zero(&self) -> V2 {
        self.try_normalize(0.0).unwrap_or_else(V2::zeros)
    }
}

/// rotates a point about `origin`
pub fn rotate_point_about(p: &P2, radians: Float, origin: &P2) -> P2 {
    origin + (p - origin).rotated(radians)
}

/// sum of all vectors
pub fn mix<'a, I>(vectors: I) -> V2
where
    I: IntoIterator<Item = &'a V2>,
{
    vectors.into_iter().fold(V2::zeros(), |acc, v| acc + v)
}

/// arithmetic mean of all vectors, zero for an empty sequence
pub fn mean<'a, I>(vectors: I) -> V2
where
    I: IntoIterator<Item = &'a V2>,
{
    let (sum, count) = vectors
        .into_iter()
        .fold((V2::zeros(), 0usize), |(acc, n), v| (acc + v, n + 1));
    if count == 0 {
        sum
    } else {
        sum / count as Float
    }
}

/// Splits the velocity change `axis * scale` between `va` and `vb` by inverse
/// mass: `va` gains its share, `vb` loses its share, so the relative velocity
/// `vb - va` changes by exactly `-axis * scale`.
///
/// Pass `Float::INFINITY` as the mass of an immovable body. Nothing happens
/// when both masses are infinite.
pub fn distribute(axis: &V2, va: &mut V2, vb: &mut V2, mass_a: Float, mass_b: Float, scale: Float) {
    let inv_a = 1.0 / mass_a;
    let inv_b = 1.0 / mass_b;
    let total = inv_a + inv_b;
    if !(total > 0.0) || !total.is_finite() {
        return;
    }
    let impulse = axis * scale;
    *va += impulse * (inv_a / total);
    *vb -= impulse * (inv_b / total);
}
