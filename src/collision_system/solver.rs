use super::{CollisionChecker, CollisionEvent, CollisionInfo};
use crate::body::Body;
use crate::geo::*;
use log::trace;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// tangential speed below which static friction may stick a contact
    pub max_static_speed: Float,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_static_speed: 1.0,
        }
    }
}

/// Finds colliding pairs and answers them with impulses, positional
/// correction and friction.
#[derive(Copy, Clone, Debug, Default)]
pub struct CollisionSolver {
    pub config: SolverConfig,
}

fn collidable(body: &Body) -> bool {
    body.category != 0 && body.collision_filter != 0
}

fn filters_match(a: &Body, b: &Body) -> bool {
    a.category & b.collision_filter != 0 && a.collision_filter & b.category != 0
}

fn is_sensor_pair(a: &Body, b: &Body) -> bool {
    a.category & b.sensor_filter != 0 || b.category & a.sensor_filter != 0
}

/// whether impulses between the pair can have any effect
fn can_respond(a: &Body, b: &Body) -> bool {
    let weighed = |body: &Body| !body.is_movable() || body.has_mass();
    (a.is_movable() || b.is_movable()) && weighed(a) && weighed(b)
}

/// two distinct bodies of the slice, `i < j`
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

impl CollisionSolver {
    pub fn new(config: SolverConfig) -> Self {
        CollisionSolver { config }
    }

    /// All pairs `i < j` whose filters match and that `checker` reports as
    /// colliding, in slice order. Bodies are not modified.
    pub fn find<C>(&self, bodies: &[Body], checker: &C) -> Vec<CollisionInfo>
    where
        C: CollisionChecker + ?Sized,
    {
        let candidates: Vec<usize> = (0..bodies.len())
            .filter(|&i| collidable(&bodies[i]))
            .collect();
        let mut infos = Vec::new();
        for (n, &i) in candidates.iter().enumerate() {
            for &j in &candidates[n + 1..] {
                let (body1, body2) = (&bodies[i], &bodies[j]);
                if !filters_match(body1, body2) {
                    continue;
                }
                if let Some(result) = checker.check(body1, body2) {
                    let edge_vector = if result.overlap() == 0.0 {
                        None
                    } else {
                        Some(
                            result
                                .overlap_vector()
                                .turn(Turn::CounterClockwise)
                                .normalize_or_zero(),
                        )
                    };
                    infos.push(CollisionInfo {
                        result,
                        body1: body1.id(),
                        body2: body2.id(),
                        index1: i,
                        index2: j,
                        edge_vector,
                        relative_velocity: body2.velocity - body1.velocity,
                    });
                }
            }
        }
        infos
    }

    /// Detects collisions and resolves them in place.
    ///
    /// The first pass applies the normal impulse and positional correction
    /// of every pair, the second records contacts and applies friction to
    /// the pairs that kept a tangent. Returns one event per detected pair,
    /// sensor pairs included.
    pub fn resolve<C>(&self, bodies: &mut [Body], checker: &C) -> Vec<CollisionEvent>
    where
        C: CollisionChecker + ?Sized,
    {
        let infos = self.find(bodies, checker);
        let mut events = Vec::with_capacity(infos.len());
        let mut touching = Vec::new();

        for info in &infos {
            let (body1, body2) = pair_mut(bodies, info.index1, info.index2);
            let sensor = is_sensor_pair(body1, body2);
            events.push(CollisionEvent {
                body1: info.body1,
                body2: info.body2,
                overlap: info.overlap(),
                overlap_vector: info.overlap_vector(),
                sensor,
            });
            if sensor {
                trace!("{} senses {}", info.body1, info.body2);
                continue;
            }
            if info.edge_vector.is_some() {
                touching.push(info);
            }
            if info.overlap() <= 0.0 || !can_respond(body1, body2) {
                continue;
            }
            trace!(
                "{} hits {}: overlap {} along {:?}",
                info.body1,
                info.body2,
                info.overlap(),
                info.overlap_vector()
            );
            self.resolve_normal(body1, body2, info);
        }

        for info in touching {
            let (body1, body2) = pair_mut(bodies, info.index1, info.index2);
            body1.add_contact(body2.id());
            body2.add_contact(body1.id());
            if let Some(tangent) = info.edge_vector {
                if can_respond(body1, body2) {
                    self.resolve_friction(body1, body2, info, &tangent);
                }
            }
        }
        events
    }

    fn resolve_normal(&self, body1: &mut Body, body2: &mut Body, info: &CollisionInfo) {
        let normal = info.overlap_vector().normalize_or_zero();
        let (mat1, mat2) = (body1.material, body2.material);
        let (mass1, mass2) = (body1.effective_mass(), body2.effective_mass());

        let relative = body2.velocity - body1.velocity;
        // separating pairs only get their positions corrected
        if relative.dot(&info.overlap_vector()) >= 0.0 {
            let bounce = mat1.elasticity.max(mat2.elasticity) + 1.0;
            let normal_speed = relative.dot(&normal);
            distribute(
                &normal,
                &mut body1.velocity,
                &mut body2.velocity,
                mass1,
                mass2,
                normal_speed * bounce,
            );
        }

        let stiffness = (mat1.stiffness + mat2.stiffness) / 2.0;
        let slop = mat1.slop + mat2.slop;
        let impulse = info.overlap() * stiffness;
        let impulse_scale = if impulse > 0.0 {
            ((impulse - slop) / impulse).max(0.0)
        } else {
            0.0
        };
        if impulse_scale == 0.0 {
            return;
        }
        let mut shift1 = V2::zeros();
        let mut shift2 = V2::zeros();
        distribute(
            &normal,
            &mut shift1,
            &mut shift2,
            mass1,
            mass2,
            impulse * impulse_scale,
        );
        body1.translate(&shift1);
        body2.translate(&shift2);
    }

    fn resolve_friction(&self, body1: &mut Body, body2: &mut Body, info: &CollisionInfo, tangent: &V2) {
        let (mat1, mat2) = (body1.material, body2.material);
        let (mass1, mass2) = (body1.effective_mass(), body2.effective_mass());
        let tangent_speed = (body2.velocity - body1.velocity).dot(tangent);
        if tangent_speed == 0.0 {
            return;
        }
        let static_friction = mat1.static_friction.min(mat2.static_friction);
        let friction = mat1.friction.min(mat2.friction);
        let overlap = info.overlap();

        let speed = tangent_speed.abs();
        let change = if speed < self.config.max_static_speed && speed <= overlap * static_friction {
            // sticks, the tangential relative motion is cancelled
            tangent_speed
        } else {
            tangent_speed.signum() * speed.min(overlap * friction)
        };
        trace!(
            "friction between {} and {}: {} of {}",
            info.body1,
            info.body2,
            change,
            tangent_speed
        );
        distribute(
            tangent,
            &mut body1.velocity,
            &mut body2.velocity,
            mass1,
            mass2,
            change,
        );
    }
}
