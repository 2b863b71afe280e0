extern crate nalgebra as na;

use super::*;

/// Axis aligned bounds. `top` is the smaller y value.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub left: Float,
    pub right: Float,
    pub top: Float,
    pub bottom: Float,
}

impl Aabb {
    pub fn new(left: Float, right: Float, top: Float, bottom: Float) -> Aabb {
        Aabb {
            left: left.min(right),
            right: left.max(right),
            top: top.min(bottom),
            bottom: top.max(bottom),
        }
    }

    pub fn from_center(center: &P2, half_width: Float, half_height: Float) -> Aabb {
        Aabb::new(
            center.x - half_width,
            center.x + half_width,
            center.y - half_height,
            center.y + half_height,
        )
    }

    pub fn from_points<'a, I>(points: I) -> Option<Aabb>
    where
        I: IntoIterator<Item = &'a P2>,
    {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Aabb::new(p.x, p.x, p.y, p.y)),
            Some(b) => Some(Aabb {
                left: b.left.min(p.x),
                right: b.right.max(p.x),
                top: b.top.min(p.y),
                bottom: b.bottom.max(p.y),
            }),
        })
    }

    pub fn width(&self) -> Float {
        self.right - self.left
    }

    pub fn height(&self) -> Float {
        self.bottom - self.top
    }

    pub fn center(&self) -> P2 {
        P2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    /// closed intervals: touching edges overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.right < other.left
            || other.right < self.left
            || self.bottom < other.top
            || other.bottom < self.top)
    }

    pub fn get_overlap(a: &Aabb, b: &Aabb) -> Option<Aabb> {
        if !a.overlaps(b) {
            return None;
        }
        Some(Aabb {
            left: a.left.max(b.left),
            right: a.right.min(b.right),
            top: a.top.max(b.top),
            bottom: a.bottom.min(b.bottom),
        })
    }

    pub fn move_by(&mut self, dx: Float, dy: Float) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    pub fn move_vector(&mut self, v: &V2) {
        self.move_by(v.x, v.y);
    }

    pub fn contains(&self, p: &P2) -> bool {
        between(p.x, self.left, self.right) && between(p.y, self.top, self.bottom)
    }
}

impl Distribution<Aabb> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Aabb {
        let center = P2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        Aabb::from_center(&center, rng.gen_range(0.1..5.0), rng.gen_range(0.1..5.0))
    }
}
