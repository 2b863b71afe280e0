pub mod body;
pub mod collision_system;
pub mod config;
pub mod error;
pub mod geo;
pub mod scene;
pub mod utils;

pub use body::{Body, BodyId, FilterRegistry, Material};
pub use collision_system::{CheckerKind, CollisionChecker, CollisionEvent, CollisionSolver};
pub use config::PhysicsConfig;
pub use error::{Error, Result};
pub use scene::Scene;

#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;
