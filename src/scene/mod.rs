pub mod constraint;
pub mod effect;

use crate::body::{Body, BodyId, Material};
use crate::collision_system::*;
use crate::config::PhysicsConfig;
use crate::error::{Error, Result};
use crate::geo::*;
use log::debug;

pub use constraint::*;
pub use effect::*;

type Listener = Box<dyn FnMut(&CollisionEvent)>;

/// Owns the simulated bodies and steps them one tick at a time.
///
/// `objects` collide with each other, `attachments` are integrated like
/// objects but never take part in collision solving.
pub struct Scene {
    objects: Vec<Body>,
    attachments: Vec<Body>,
    effects: Vec<(EffectId, Box<dyn Effect>)>,
    next_effect: u64,
    /// multiplier applied to the time scale passed to `update`
    pub time_scale: Float,
    checker: Box<dyn CollisionChecker>,
    pub solver: CollisionSolver,
    pointer: PointerConstraint,
    listeners: Vec<Listener>,
    material: Material,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            objects: Vec::new(),
            attachments: Vec::new(),
            effects: Vec::new(),
            next_effect: 0,
            time_scale: 1.0,
            checker: Box::new(SmartChecker),
            solver: CollisionSolver::default(),
            pointer: PointerConstraint::new(),
            listeners: Vec::new(),
            material: Material::default(),
        }
    }

    /// Scene set up from `config`. A non zero gravity becomes a `Gravity` effect.
    pub fn with_config(config: &PhysicsConfig) -> Self {
        let mut scene = Scene::new();
        scene.time_scale = config.time_scale;
        scene.solver = CollisionSolver::new(config.solver);
        scene.checker = Box::new(config.checker);
        scene.material = config.material;
        let gravity = config.gravity_vector();
        if gravity != V2::zeros() {
            scene.use_effect(Gravity::new(gravity));
        }
        scene
    }

    pub fn set_checker<C: CollisionChecker + 'static>(&mut self, checker: C) {
        self.checker = Box::new(checker);
    }

    /// default material for bodies created for this scene
    pub fn material(&self) -> Material {
        self.material
    }

    pub fn add(&mut self, body: Body) -> BodyId {
        let id = body.id();
        debug!("adding object {}", id);
        self.objects.push(body);
        id
    }

    /// Removes an object or attachment. Other bodies forget it as a contact.
    pub fn remove(&mut self, id: BodyId) -> Result<Body> {
        let mut body = if let Some(i) = self.objects.iter().position(|b| b.id() == id) {
            self.objects.remove(i)
        } else if let Some(i) = self.attachments.iter().position(|b| b.id() == id) {
            self.attachments.remove(i)
        } else {
            return Err(Error::UnknownBody(id));
        };
        for other in self.objects.iter_mut().chain(self.attachments.iter_mut()) {
            other.forget_contact(id);
        }
        if self.pointer.grabbed() == Some(id) {
            self.pointer.release(std::slice::from_mut(&mut body));
        }
        debug!("removed {}", id);
        Ok(body)
    }

    pub fn attach(&mut self, body: Body) -> BodyId {
        let id = body.id();
        debug!("attaching {}", id);
        self.attachments.push(body);
        id
    }

    pub fn detach(&mut self, id: BodyId) -> Result<Body> {
        let i = self
            .attachments
            .iter()
            .position(|b| b.id() == id)
            .ok_or(Error::UnknownBody(id))?;
        debug!("detaching {}", id);
        Ok(self.attachments.remove(i))
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.objects
            .iter()
            .chain(self.attachments.iter())
            .find(|b| b.id() == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.objects
            .iter_mut()
            .chain(self.attachments.iter_mut())
            .find(|b| b.id() == id)
    }

    pub fn objects(&self) -> &[Body] {
        &self.objects
    }

    pub fn attachments(&self) -> &[Body] {
        &self.attachments
    }

    /// topmost object containing `point`, the last added one wins
    pub fn body_at(&self, point: &P2) -> Option<BodyId> {
        self.objects
            .iter()
            .rev()
            .find(|b| b.contains_point(point))
            .map(Body::id)
    }

    pub fn use_effect<E: Effect + 'static>(&mut self, effect: E) -> EffectId {
        let id = EffectId(self.next_effect);
        self.next_effect += 1;
        debug!("using effect {:?}, deferred: {}", id, effect.is_deferred());
        self.effects.push((id, Box::new(effect)));
        id
    }

    /// Returns whether the effect was in use.
    pub fn disuse_effect(&mut self, id: EffectId) -> bool {
        let before = self.effects.len();
        self.effects.retain(|(effect_id, _)| *effect_id != id);
        before != self.effects.len()
    }

    /// Calls `listener` for every collision event of every later `update`.
    pub fn on_collision<F>(&mut self, listener: F)
    where
        F: FnMut(&CollisionEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn pointer(&self) -> &PointerConstraint {
        &self.pointer
    }

    /// Starts dragging object `id` with the pointer at `pointer`, releasing
    /// any body dragged before. A refused grab keeps the current drag.
    pub fn grab(&mut self, id: BodyId, pointer: P2) -> Result<()> {
        let i = self
            .objects
            .iter()
            .position(|b| b.id() == id)
            .ok_or(Error::UnknownBody(id))?;
        if self.objects[i].is_static() {
            return Err(Error::StaticBody(id));
        }
        self.pointer.release(&mut self.objects);
        self.pointer.grab(&mut self.objects[i], pointer)
    }

    pub fn move_pointer(&mut self, pointer: P2) {
        self.pointer.move_to(pointer);
    }

    pub fn release(&mut self) -> Option<BodyId> {
        self.pointer.release(&mut self.objects)
    }

    /// Advances the scene by one tick and returns the collision events of
    /// the tick.
    ///
    /// Order: effects, pointer constraint, integration, dragged body
    /// velocity, collision solving, deferred integration, deferred effects.
    pub fn update(&mut self, time_scale: Float) -> Vec<CollisionEvent> {
        let time_scale = time_scale * self.time_scale;

        let mut deferred = Vec::new();
        for (i, (_, effect)) in self.effects.iter_mut().enumerate() {
            if effect.is_deferred() {
                deferred.push(i);
            } else {
                effect.apply(&mut self.objects, time_scale);
            }
        }

        let dragged = self.pointer.apply(&mut self.objects);

        for (i, body) in self.objects.iter_mut().enumerate() {
            // the pointer moves the dragged body
            if Some(i) == dragged || body.defer_update {
                continue;
            }
            body.update(time_scale);
        }
        for body in self.attachments.iter_mut().filter(|b| !b.defer_update) {
            body.update(time_scale);
        }

        if let Some(i) = dragged {
            self.objects[i].velocity = self.pointer.take_velocity(time_scale);
        }

        for body in self.objects.iter_mut() {
            body.clear_contacts();
        }
        let events = self.solver.resolve(&mut self.objects, self.checker.as_ref());
        for event in &events {
            for listener in self.listeners.iter_mut() {
                listener(event);
            }
        }

        for (i, body) in self.objects.iter_mut().enumerate() {
            if body.defer_update && Some(i) != dragged {
                body.update(time_scale);
            }
        }
        for body in self.attachments.iter_mut().filter(|b| b.defer_update) {
            body.update(time_scale);
        }

        for i in deferred {
            self.effects[i].1.apply(&mut self.objects, time_scale);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn integrates_objects_and_attachments() {
        let mut scene = Scene::new();
        scene.time_scale = 0.5;
        let a = scene.add(Body::circle(P2::origin(), 1.0, 1.0).with_velocity(V2::new(2.0, 0.0)));
        let b = scene.attach(Body::circle(P2::origin(), 1.0, 1.0).with_velocity(V2::new(0.0, 2.0)));
        let events = scene.update(2.0);
        // attachments never collide even when overlapping
        assert!(events.is_empty());
        assert_eq!(scene.get(a).unwrap().position(), P2::new(2.0, 0.0));
        assert_eq!(scene.get(b).unwrap().position(), P2::new(0.0, 2.0));
    }

    #[test]
    fn effects_run_in_order_around_collisions() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new();
        let a = scene.add(Body::circle(P2::new(0.0, 0.0), 1.0, 1.0).with_velocity(V2::new(1.0, 0.0)));
        scene.add(Body::circle(P2::new(2.5, 0.0), 1.0, 1.0));

        let early = log.clone();
        scene.use_effect(FnEffect::new(move |bodies: &mut [Body], _| {
            early.borrow_mut().push(("effect", bodies[0].position().x));
        }));
        let late = log.clone();
        scene.use_effect(FnEffect::deferred(move |bodies: &mut [Body], _| {
            late.borrow_mut().push(("deferred", bodies[0].position().x));
        }));
        let seen = log.clone();
        scene.on_collision(move |event| {
            seen.borrow_mut().push(("collision", event.overlap));
        });

        let events = scene.update(1.0);
        assert_eq!(events.len(), 1);
        assert!(events[0].involves(a));
        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], ("effect", 0.0));
        assert_eq!(log[1].0, "collision");
        assert_relative_eq!(log[1].1, 0.5);
        assert_eq!(log[2].0, "deferred");
        // the deferred effect sees the corrected position
        assert!(log[2].1 < 1.0);
    }

    #[test]
    fn deferred_objects_move_after_collisions() {
        let mut scene = Scene::new();
        let mut mover = Body::circle(P2::new(0.0, 0.0), 1.0, 1.0).with_velocity(V2::new(1.0, 0.0));
        mover.defer_update = true;
        let mover = scene.add(mover);
        scene.add(Body::circle(P2::new(2.5, 0.0), 1.0, 1.0));
        // not overlapping when collisions are solved
        assert!(scene.update(1.0).is_empty());
        assert_eq!(scene.get(mover).unwrap().position(), P2::new(1.0, 0.0));
    }

    #[test]
    fn disused_effects_stop_running() {
        let mut scene = Scene::new();
        let id = scene.add(Body::circle(P2::origin(), 1.0, 1.0));
        let gravity = scene.use_effect(Gravity::new(V2::new(0.0, 1.0)));
        scene.update(1.0);
        assert!(scene.disuse_effect(gravity));
        assert!(!scene.disuse_effect(gravity));
        scene.update(1.0);
        let body = scene.get(id).unwrap();
        assert_eq!(body.velocity, V2::new(0.0, 1.0));
        assert_eq!(body.position(), P2::new(0.0, 2.0));
    }

    #[test]
    fn removal_purges_contacts() {
        let mut scene = Scene::new();
        let a = scene.add(Body::rectangle(P2::new(0.0, 0.0), 2.0, 2.0, 1.0));
        let b = scene.add(Body::rectangle(P2::new(1.5, 0.0), 2.0, 2.0, 1.0));
        scene.update(0.0);
        assert!(scene.get(a).unwrap().contact().contains(&b));
        let removed = scene.remove(b).unwrap();
        assert_eq!(removed.id(), b);
        assert!(scene.get(a).unwrap().contact().is_empty());
        assert!(matches!(scene.remove(b), Err(Error::UnknownBody(id)) if id == b));
        assert!(scene.detach(a).is_err());
    }

    #[test]
    fn dragged_body_follows_pointer_and_is_thrown() {
        let mut scene = Scene::new();
        let id = scene.add(Body::circle(P2::new(1.0, 1.0), 1.0, 1.0).with_velocity(V2::new(5.0, 5.0)));
        assert_eq!(scene.body_at(&P2::new(1.2, 1.0)), Some(id));
        scene.grab(id, P2::new(1.0, 1.0)).unwrap();
        scene.move_pointer(P2::new(3.0, 1.0));
        scene.update(0.5);
        let body = scene.get(id).unwrap();
        assert_eq!(body.position(), P2::new(3.0, 1.0));
        assert_eq!(body.velocity, V2::new(4.0, 0.0));
        assert!(!body.active);
        assert_eq!(scene.release(), Some(id));
        assert!(scene.get(id).unwrap().active);
        scene.update(0.5);
        assert_eq!(scene.get(id).unwrap().position(), P2::new(5.0, 1.0));
    }

    #[test]
    fn removing_the_dragged_body_restores_it() {
        let mut scene = Scene::new();
        let id = scene.add(Body::circle(P2::origin(), 1.0, 1.0));
        scene.grab(id, P2::origin()).unwrap();
        assert!(!scene.get(id).unwrap().active);
        let body = scene.remove(id).unwrap();
        assert!(body.active);
        assert!(scene.pointer().grabbed().is_none());

        let mut inactive = Body::circle(P2::origin(), 1.0, 1.0);
        inactive.active = false;
        let id = scene.add(inactive);
        scene.grab(id, P2::origin()).unwrap();
        assert!(!scene.remove(id).unwrap().active);
    }

    #[test]
    fn refused_grab_keeps_the_current_drag() {
        let mut scene = Scene::new();
        let ball = scene.add(Body::circle(P2::origin(), 1.0, 1.0));
        let wall = scene.add(Body::rectangle(P2::new(10.0, 0.0), 2.0, 2.0, 1.0).with_static(true));
        scene.grab(ball, P2::origin()).unwrap();

        assert!(matches!(scene.grab(wall, P2::new(10.0, 0.0)), Err(Error::StaticBody(id)) if id == wall));
        assert_eq!(scene.pointer().grabbed(), Some(ball));
        assert!(!scene.get(ball).unwrap().active);

        let stranger = Body::circle(P2::origin(), 1.0, 1.0).id();
        assert!(matches!(scene.grab(stranger, P2::origin()), Err(Error::UnknownBody(_))));
        assert_eq!(scene.pointer().grabbed(), Some(ball));

        // switching to another body lets go of the first
        let other = scene.add(Body::circle(P2::new(5.0, 0.0), 1.0, 1.0));
        scene.grab(other, P2::new(5.0, 0.0)).unwrap();
        assert_eq!(scene.pointer().grabbed(), Some(other));
        assert!(scene.get(ball).unwrap().active);
    }

    #[test]
    fn static_rectangle_holds_still_over_many_ticks() {
        let mut scene = Scene::new();
        let ball = scene.add(Body::circle(P2::new(0.0, 0.0), 5.0, 1.0).with_velocity(V2::new(5.0, 0.0)));
        let wall = scene.add(Body::rectangle(P2::new(12.0, 0.0), 10.0, 10.0, 1.0).with_static(true));
        let mut hits = 0;
        for _ in 0..100 {
            hits += scene.update(0.1).len();
            let wall = scene.get(wall).unwrap();
            assert_eq!(wall.position(), P2::new(12.0, 0.0));
            assert_eq!(wall.velocity, V2::zeros());
            assert_eq!(wall.bounds(), &Aabb::new(7.0, 17.0, -5.0, 5.0));
        }
        assert!(hits > 0);
        assert!(scene.get(ball).unwrap().position().x < 7.0);
    }

    #[test]
    fn static_bodies_refuse_the_pointer() {
        let mut scene = Scene::new();
        let wall = scene.add(Body::rectangle(P2::origin(), 2.0, 2.0, 1.0).with_static(true));
        assert!(matches!(scene.grab(wall, P2::origin()), Err(Error::StaticBody(_))));
        assert!(scene.pointer().grabbed().is_none());
    }

    #[test]
    fn configured_scene() {
        let config = PhysicsConfig {
            time_scale: 2.0,
            gravity: [0.0, 1.0],
            checker: CheckerKind::Aabb,
            ..PhysicsConfig::default()
        };
        let mut scene = Scene::with_config(&config);
        assert_eq!(scene.material(), config.material);
        let id = scene.add(Body::circle(P2::origin(), 1.0, 1.0));
        scene.update(1.0);
        assert_eq!(scene.get(id).unwrap().velocity, V2::new(0.0, 2.0));
    }

    #[test]
    fn falling_ball_rests_on_static_floor() {
        let mut scene = Scene::new();
        scene.use_effect(Gravity::new(V2::new(0.0, 0.5)));
        let floor = scene.add(Body::line(P2::new(-20.0, 0.0), P2::new(20.0, 0.0)).with_static(true));
        let ball = scene.add(Body::circle(P2::new(0.0, -3.0), 1.0, 1.0));
        let mut touched = false;
        for _ in 0..200 {
            let events = scene.update(0.1);
            touched |= events.iter().any(|e| e.involves(floor));
        }
        assert!(touched);
        let ball = scene.get(ball).unwrap();
        // sits on the floor within the penetration tolerance
        assert!(ball.position().y < -0.5 && ball.position().y > -1.5);
        assert!(ball.velocity.y.abs() < 0.5);
    }
}
