pub mod checker;
pub mod solver;

use crate::body::BodyId;
use crate::geo::*;

pub use checker::*;
pub use solver::*;

/// Minimum translation needed to push body1 out of body2.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CollisionResult {
    overlap: Float,
    overlap_vector: V2,
}

impl CollisionResult {
    pub fn new(overlap: Float, overlap_vector: V2) -> CollisionResult {
        CollisionResult {
            overlap,
            overlap_vector,
        }
    }

    pub fn overlap(&self) -> Float {
        self.overlap
    }

    /// points from body2 towards body1, length `overlap`
    pub fn overlap_vector(&self) -> V2 {
        self.overlap_vector
    }
}

/// A detected pair, valid for one detection pass.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CollisionInfo {
    pub result: CollisionResult,
    pub body1: BodyId,
    pub body2: BodyId,
    /// positions of the pair in the slice handed to `find`
    pub index1: usize,
    pub index2: usize,
    /// unit tangent of the contact, `None` for a zero overlap
    pub edge_vector: Option<V2>,
    /// `velocity2 - velocity1` at detection time
    pub relative_velocity: V2,
}

impl CollisionInfo {
    pub fn overlap(&self) -> Float {
        self.result.overlap()
    }

    pub fn overlap_vector(&self) -> V2 {
        self.result.overlap_vector()
    }
}

/// Reported once per detected pair by `CollisionSolver::resolve`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CollisionEvent {
    pub body1: BodyId,
    pub body2: BodyId,
    pub overlap: Float,
    pub overlap_vector: V2,
    /// the pair only senses each other, no impulse was applied
    pub sensor: bool,
}

impl CollisionEvent {
    pub fn involves(&self, id: BodyId) -> bool {
        self.body1 == id || self.body2 == id
    }
}
