use crate::body::Material;
use crate::collision_system::{CheckerKind, SolverConfig};
use crate::error::Result;
use crate::geo::*;
use serde::{Deserialize, Serialize};

/// Scene wide settings, usually read from a RON file. Missing fields take
/// their defaults.
///
/// ```text
/// (
///     time_scale: 1.0,
///     gravity: (0.0, 9.81),
///     checker: Smart,
///     solver: (max_static_speed: 1.0),
///     material: (friction: 0.2),
/// )
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub time_scale: Float,
    /// acceleration added to every movable body, y points down
    pub gravity: [Float; 2],
    pub solver: SolverConfig,
    pub checker: CheckerKind,
    /// default material handed out by the scene
    pub material: Material,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            time_scale: 1.0,
            gravity: [0.0, 0.0],
            solver: SolverConfig::default(),
            checker: CheckerKind::default(),
            material: Material::default(),
        }
    }
}

impl PhysicsConfig {
    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    pub fn gravity_vector(&self) -> V2 {
        V2::new(self.gravity[0], self.gravity[1])
    }
}
