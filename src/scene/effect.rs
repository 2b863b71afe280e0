use crate::body::Body;
use crate::geo::*;
use serde::{Deserialize, Serialize};

/// Handle returned by `Scene::use_effect`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct EffectId(pub(crate) u64);

/// Per tick callback over the scene's objects.
pub trait Effect {
    fn apply(&mut self, bodies: &mut [Body], time_scale: Float);

    /// deferred effects run after collisions were resolved
    fn is_deferred(&self) -> bool {
        false
    }
}

/// Adapts a closure to `Effect`.
pub struct FnEffect<F> {
    f: F,
    deferred: bool,
}

impl<F> FnEffect<F>
where
    F: FnMut(&mut [Body], Float),
{
    pub fn new(f: F) -> Self {
        FnEffect { f, deferred: false }
    }

    pub fn deferred(f: F) -> Self {
        FnEffect { f, deferred: true }
    }
}

impl<F> Effect for FnEffect<F>
where
    F: FnMut(&mut [Body], Float),
{
    fn apply(&mut self, bodies: &mut [Body], time_scale: Float) {
        (self.f)(bodies, time_scale)
    }

    fn is_deferred(&self) -> bool {
        self.deferred
    }
}

/// Constant acceleration of every movable body. Works on the velocity, the
/// body's own acceleration is left to the application.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Gravity {
    pub acceleration: V2,
}

impl Gravity {
    pub fn new(acceleration: V2) -> Self {
        Gravity { acceleration }
    }
}

impl Effect for Gravity {
    fn apply(&mut self, bodies: &mut [Body], time_scale: Float) {
        for body in bodies.iter_mut().filter(|b| b.is_movable()) {
            body.velocity += self.acceleration * time_scale;
        }
    }
}
